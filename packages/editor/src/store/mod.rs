//! # Document Store
//!
//! The external persistence collaborator: a key-addressed collection of
//! JSON records. The editor only needs three calls:
//!
//! ```text
//! load(collection)            -> [Document]
//! save_all(collection, docs)  -> ()        upsert by id, batch
//! delete_one(collection, id)  -> bool
//! ```
//!
//! Backends:
//! - [`MemoryStore`]: process-local, for tests and ephemeral tooling
//! - [`JsonFileStore`]: one JSON array file per collection

mod json_file;
mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

/// One record in a collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub data: Value,
}

impl Document {
    pub fn new(id: impl Into<String>, data: Value) -> Self {
        Self { id: id.into(), data }
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid collection name: {0:?}")]
    InvalidCollection(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All documents in a collection, in stored order. Unknown collections are empty.
    async fn load(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    /// Write a batch. Existing ids are replaced in place, new ids are appended.
    async fn save_all(&self, collection: &str, docs: Vec<Document>) -> Result<(), StoreError>;

    /// Remove one document. Returns whether it existed.
    async fn delete_one(&self, collection: &str, id: &str) -> Result<bool, StoreError>;
}

/// Upsert `docs` into `existing`, keeping positions of known ids
pub(crate) fn upsert(existing: &mut Vec<Document>, docs: Vec<Document>) {
    for doc in docs {
        match existing.iter_mut().find(|d| d.id == doc.id) {
            Some(slot) => *slot = doc,
            None => existing.push(doc),
        }
    }
}

pub(crate) fn validate_collection(collection: &str) -> Result<(), StoreError> {
    let valid = !collection.is_empty()
        && collection
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidCollection(collection.to_string()))
    }
}
