//! Table registry error types.

use super::entities::TableId;
use thiserror::Error;

/// Registry errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// Table name contains characters outside the allowed set
    #[error("Invalid table name: {0:?}")]
    InvalidName(String),

    /// Table options failed validation
    #[error("Invalid table options: {0}")]
    InvalidOptions(String),

    /// No table with this ID is registered
    #[error("Table {0} does not exist.")]
    NotFound(TableId),

    /// Request submitted after shutdown
    #[error("The table registry is closed")]
    RegistryClosed,
}

/// Result type for registry operations
pub type TableResult<T> = Result<T, TableError>;
