//! # HTTP Server
//!
//! Binds the clinic routes behind a CORS layer.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::ServiceConfig;
use crate::observability::Logger;

use super::routes::{clinic_routes, AppState};

/// How often expired sessions are evicted
const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(600);

pub struct HttpServer {
    addr: String,
    state: Arc<AppState>,
    router: Router,
}

impl HttpServer {
    pub fn new(config: &ServiceConfig, state: Arc<AppState>) -> Self {
        let router = Self::build_router(&config.cors_origins, Arc::clone(&state));
        Self {
            addr: config.socket_addr(),
            state,
            router,
        }
    }

    /// Build the router with CORS applied
    ///
    /// An empty origin list allows any origin.
    pub fn build_router(cors_origins: &[String], state: Arc<AppState>) -> Router {
        let cors = if cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        clinic_routes(state).layer(cors)
    }

    pub fn socket_addr(&self) -> &str {
        &self.addr
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Serve until the listener fails
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self
            .addr
            .parse()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(SESSION_PURGE_INTERVAL);
            loop {
                ticker.tick().await;
                match state.sessions.purge_expired() {
                    Ok(0) => {}
                    Ok(n) => Logger::info("SESSIONS_PURGED", &[("count", n.to_string().as_str())]),
                    Err(e) => Logger::warn("SESSION_PURGE_FAILED", &[("error", e.to_string().as_str())]),
                }
            }
        });

        let listener = TcpListener::bind(addr).await?;
        Logger::info("HTTP_SERVER_STARTED", &[("addr", self.addr.as_str())]);
        axum::serve(listener, self.router).await?;

        Ok(())
    }
}
