//! # Session Store
//!
//! Maps opaque tokens to a projection of the logged-in user.
//!
//! Lifecycle:
//! - `create` on login issues a token (only its hash is kept)
//! - `lookup` on each authenticated request
//! - sessions expire after the configured TTL; expired entries are
//!   dropped on lookup and by `purge_expired`
//! - `revoke` on logout

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::crypto::{generate_token, hash_token};
use super::errors::{AuthError, AuthResult};

/// Denormalized user fields carried by a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub user_id: i64,
    pub username: String,
    pub permission: i64,
    pub auth_method: String,
}

/// One live session
#[derive(Debug, Clone)]
pub struct Session {
    pub user: SessionUser,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Session store configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Lifetime of a session from login
    pub ttl: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::days(1),
        }
    }
}

/// Token issued on login
#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// In-process session store keyed by token hash
#[derive(Debug)]
pub struct SessionStore {
    config: SessionConfig,
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Start a session for `user`
    pub fn create(&self, user: SessionUser) -> AuthResult<IssuedToken> {
        self.create_at(user, Utc::now())
    }

    fn create_at(&self, user: SessionUser, now: DateTime<Utc>) -> AuthResult<IssuedToken> {
        let token = generate_token();
        let expires_at = now + self.config.ttl;

        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| AuthError::StorageError("Lock poisoned".to_string()))?;
        sessions.insert(
            hash_token(&token),
            Session {
                user,
                created_at: now,
                expires_at,
            },
        );

        Ok(IssuedToken { token, expires_at })
    }

    /// Resolve a token to its user
    pub fn lookup(&self, token: &str) -> AuthResult<SessionUser> {
        self.lookup_at(token, Utc::now())
    }

    fn lookup_at(&self, token: &str, now: DateTime<Utc>) -> AuthResult<SessionUser> {
        let key = hash_token(token);
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| AuthError::StorageError("Lock poisoned".to_string()))?;

        let session = sessions.get(&key).ok_or(AuthError::SessionInvalid)?;
        if session.expires_at <= now {
            sessions.remove(&key);
            return Err(AuthError::SessionExpired);
        }
        Ok(session.user.clone())
    }

    /// End a session immediately
    pub fn revoke(&self, token: &str) -> AuthResult<()> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| AuthError::StorageError("Lock poisoned".to_string()))?;
        sessions
            .remove(&hash_token(token))
            .map(|_| ())
            .ok_or(AuthError::SessionInvalid)
    }

    /// Drop every expired session, returning how many were evicted
    pub fn purge_expired(&self) -> AuthResult<usize> {
        self.purge_expired_at(Utc::now())
    }

    fn purge_expired_at(&self, now: DateTime<Utc>) -> AuthResult<usize> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| AuthError::StorageError("Lock poisoned".to_string()))?;
        let before = sessions.len();
        sessions.retain(|_, s| s.expires_at > now);
        Ok(before - sessions.len())
    }

    /// Number of sessions currently held
    pub fn len(&self) -> usize {
        self.sessions.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}
