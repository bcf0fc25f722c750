//! Error types for sqlf

use thiserror::Error;

/// Result type alias for sqlf operations
pub type SqlfResult<T> = Result<T, SqlfError>;

/// Errors raised while composing a query.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SqlfError {
    /// A placeholder resolved to an argument position that does not exist.
    ///
    /// `index` is 1-based, matching the `%[n]s` syntax in templates.
    #[error("argument index [{index}] out of range; have {count} args")]
    IndexOutOfRange { index: usize, count: usize },
}
