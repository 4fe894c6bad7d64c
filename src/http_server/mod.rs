//! # Clinic HTTP Server
//!
//! Request layer over the registry.
//!
//! # Endpoints
//!
//! - `GET /` - Liveness greeting
//! - `POST /api/user`, `GET /api/user/:user_id` - Accounts
//! - `POST /api/login`, `POST /api/logout`, `GET /api/me` - Sessions
//! - `GET /api/symptoms`, `/api/bulletins`, `/api/clinics` - Listings

pub mod errors;
pub mod routes;
pub mod server;

pub use errors::{ApiError, ApiResult};
pub use routes::{clinic_routes, AppState};
pub use server::HttpServer;
