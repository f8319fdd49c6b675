//! Failures raised by entity store adapters.

use super::define_port_error;

define_port_error! {
    /// Store errors carry the driver message verbatim; services wrap them
    /// into classified errors before they leave the domain.
    pub enum StoreError {
        /// The connection could not be used.
        Connection { message: String } => "store connection failed: {message}",
        /// A query, exec, or row decode failed.
        Query { message: String } => "{message}",
        /// A uniqueness constraint rejected the write.
        UniqueViolation { message: String } => "unique constraint violated: {message}",
    }
}
