//! Error types for Lugh Core

use thiserror::Error;

/// Result type alias using Lugh's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Lugh error types
///
/// `NoData` and `AmbiguousData` are the recoverable outcomes of the checked
/// singular accessors on [`QueryResult`](crate::QueryResult). The remaining
/// variants reject malformed construction or mutation at the call site.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("No data")]
    NoData,

    #[error("Ambiguous data: {count} candidates")]
    AmbiguousData { count: usize },

    #[error("Forbidden relation: {0}. Construct a named node instead")]
    ForbiddenRelation(String),

    #[error("Invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    #[error("Invalid literal type: {0}")]
    InvalidLiteralType(String),

    #[error("Invalid language tag: {0:?}")]
    InvalidLanguage(String),

    #[error("Invalid sequence index: {0}")]
    InvalidIndex(u64),
}
