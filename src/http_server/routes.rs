//! Clinic HTTP Routes
//!
//! Thin handlers over the registry and session store.

use std::sync::Arc;

use axum::{
    extract::{Json, Path, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{
    hash_password, verify_password, AuthError, IssuedToken, SessionConfig, SessionStore,
    SessionUser,
};
use crate::registry::Registry;
use crate::table::schemas::{BULLETINS, CLINICS, SYMPTOMS, USERS};
use crate::table::{Entry, Record};

use super::errors::{ApiError, ApiResult};

/// User columns safe to return to clients
pub const PUBLIC_USER_FIELDS: [&str; 4] = ["user_id", "username", "permission", "auth_method"];

/// Shared request state
pub struct AppState {
    pub registry: Registry,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(registry: Registry, sessions: SessionConfig) -> Self {
        Self {
            registry,
            sessions: SessionStore::new(sessions),
        }
    }
}

pub fn clinic_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/api/user", post(create_user_handler))
        .route("/api/user/:user_id", get(get_user_handler))
        .route("/api/login", post(login_handler))
        .route("/api/logout", post(logout_handler))
        .route("/api/me", get(me_handler))
        .route("/api/symptoms", get(symptoms_handler))
        .route("/api/bulletins", get(bulletins_handler))
        .route("/api/clinics", get(clinics_handler))
        .with_state(state)
}

// ==================
// Request Types
// ==================

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

fn filter(key: &str, value: Value) -> Entry {
    let mut entry = Entry::new();
    entry.insert(key.to_string(), value);
    entry
}

fn bearer_token(headers: &HeaderMap) -> ApiResult<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(ApiError::Auth(AuthError::AuthenticationRequired))
}

fn session_user(record: &Record) -> Option<SessionUser> {
    Some(SessionUser {
        user_id: record.get("user_id")?.as_i64()?,
        username: record.get("username")?.as_str()?.to_string(),
        permission: record.get("permission")?.as_i64().unwrap_or_default(),
        auth_method: record
            .get("auth_method")?
            .as_str()
            .unwrap_or_default()
            .to_string(),
    })
}

// ==================
// Handlers
// ==================

async fn root_handler() -> Json<Value> {
    Json(json!({"Hello": "World"}))
}

async fn create_user_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CredentialsRequest>,
) -> ApiResult<impl IntoResponse> {
    if req.username.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::InvalidBody(
            "username and password are required".to_string(),
        ));
    }

    let taken = state.registry.query_value(
        USERS,
        &filter("username", json!(req.username)),
        Some(&["user_id"][..]),
    )?;
    if !taken.is_empty() {
        return Err(AuthError::UsernameTaken.into());
    }

    let mut entry = Entry::new();
    entry.insert("username".into(), json!(req.username));
    entry.insert("password".into(), json!(hash_password(&req.password)?));
    entry.insert("permission".into(), json!(0));
    entry.insert("auth_method".into(), json!("password"));

    let mut user = state.registry.create(USERS, &entry)?;
    user.remove("password");

    Ok((StatusCode::CREATED, Json(Value::Object(user))))
}

async fn get_user_handler(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<Value>> {
    let user = state
        .registry
        .read(
            USERS,
            &filter("user_id", json!(user_id)),
            Some(PUBLIC_USER_FIELDS.as_slice()),
        )?
        .into_iter()
        .next()
        .ok_or(ApiError::NotFound)?;

    Ok(Json(Value::Object(user)))
}

async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CredentialsRequest>,
) -> ApiResult<Json<IssuedToken>> {
    let record = state
        .registry
        .read(USERS, &filter("username", json!(req.username)), None)?
        .into_iter()
        .next()
        .ok_or(AuthError::InvalidCredentials)?;

    let stored = record
        .get("password")
        .and_then(Value::as_str)
        .unwrap_or_default();
    if !verify_password(&req.password, stored) {
        return Err(AuthError::InvalidCredentials.into());
    }

    let user = session_user(&record).ok_or(AuthError::InvalidCredentials)?;
    Ok(Json(state.sessions.create(user)?))
}

async fn logout_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<StatusCode> {
    state.sessions.revoke(bearer_token(&headers)?)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn me_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Json<SessionUser>> {
    Ok(Json(state.sessions.lookup(bearer_token(&headers)?)?))
}

/// Symptom leaderboard, most visited first
async fn symptoms_handler(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Record>>> {
    let mut symptoms = state.registry.read(SYMPTOMS, &Entry::new(), None)?;
    let visits = |r: &Record| r.get("visit").and_then(Value::as_i64).unwrap_or_default();
    symptoms.sort_by(|a, b| visits(b).cmp(&visits(a)));
    Ok(Json(symptoms))
}

async fn bulletins_handler(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Record>>> {
    Ok(Json(state.registry.read(BULLETINS, &Entry::new(), None)?))
}

async fn clinics_handler(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Record>>> {
    Ok(Json(state.registry.read(CLINICS, &Entry::new(), None)?))
}
