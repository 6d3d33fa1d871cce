//! Error types for the todo application.

use thiserror::Error;
use unistore_runtime::StoreError;

/// Errors surfaced by the todo application
#[derive(Error, Debug)]
pub enum TodoError {
    /// A visibility filter name that is not one of `SHOW_ALL`, `SHOW_ACTIVE`
    /// or `SHOW_COMPLETED`
    #[error("Unrecognized visibility filter: {0}")]
    UnrecognizedFilter(String),

    /// JSON input that does not describe an action
    #[error("Malformed action: {0}")]
    MalformedAction(#[from] serde_json::Error),

    /// The store refused a dispatch
    #[error(transparent)]
    Store(#[from] StoreError),
}
