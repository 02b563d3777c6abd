//! Errors raised by collections and the store.

use thiserror::Error;

use schema::ValidationError;

/// Errors raised by [`crate::Collection`] and [`crate::Store`] operations.
#[derive(Debug, Error)]
pub enum CollectionError {
    /// `update` targeted an identifier with no live document.
    #[error("no document '{id}' in this collection")]
    NotFound { id: String },
    /// A document failed one of its schema's rules.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
    /// The underlying engine failed a read, write, or compaction.
    #[error("storage error: {0}")]
    Storage(#[from] engine::EngineError),
    /// A stored document's JSON payload could not be decoded (or a document
    /// could not be encoded for storage).
    #[error("document encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
    /// `close` was called while a collection handle was still outstanding.
    #[error("store closed while a collection handle was still in use")]
    EngineBusy,
}
