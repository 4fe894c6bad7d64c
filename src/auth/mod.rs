//! # Authentication
//!
//! Password hashing and the explicit session store used by the request
//! layer.

pub mod crypto;
pub mod errors;
pub mod session;

pub use crypto::{hash_password, verify_password};
pub use errors::{AuthError, AuthResult};
pub use session::{IssuedToken, SessionConfig, SessionStore, SessionUser};
