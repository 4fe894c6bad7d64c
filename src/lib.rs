//! clinicdb - clinic information service over a schema-driven table layer
//!
//! Tables are declared once as schemas, compiled into DDL, and accessed
//! through typed CRUD operations routed by the master registry.

pub mod auth;
pub mod cli;
pub mod config;
pub mod criterion;
pub mod http_server;
pub mod native;
pub mod observability;
pub mod registry;
pub mod schema;
pub mod seed;
pub mod table;
