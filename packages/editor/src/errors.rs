//! Error types for the editor

use thiserror::Error;

use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unknown block type: {0}")]
    UnknownBlockType(String),

    #[error("Unknown page status: {0}")]
    UnknownPageStatus(String),

    #[error("Page not found: {0}")]
    PageNotFound(String),

    #[error("Page {page_id} was modified concurrently (expected version {expected}, found {found})")]
    Conflict {
        page_id: String,
        expected: u64,
        found: u64,
    },

    #[error("Edit session is closed")]
    SessionClosed,
}
