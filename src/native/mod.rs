//! Native connection to the embedded relational engine

mod connection;
mod errors;
mod values;

pub use connection::{NativeConnection, IN_MEMORY};
pub use errors::{NativeError, NativeResult};
pub use values::{from_sql_value, to_sql_value, Row};
