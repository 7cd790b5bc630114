//! # Page Repository
//!
//! Page-level view over a [`DocumentStore`] collection.
//!
//! Saves go through [`PageRepository::replace_page`], which checks the
//! stored version against the version the editor started from before
//! writing. A mismatch means another session saved in between and is
//! reported as [`EditorError::Conflict`] instead of silently overwriting.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::page::required_pages;
use crate::store::{Document, DocumentStore};
use crate::{EditorError, PageData};

/// Default collection holding page records
pub const PAGES_COLLECTION: &str = "pages";

pub struct PageRepository {
    store: Arc<dyn DocumentStore>,
    collection: String,
    /// Serializes check-then-write cycles from this process
    write_lock: Mutex<()>,
}

impl PageRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self::with_collection(store, PAGES_COLLECTION)
    }

    pub fn with_collection(store: Arc<dyn DocumentStore>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// All pages in stored order
    pub async fn load_pages(&self) -> Result<Vec<PageData>, EditorError> {
        let docs = self.store.load(&self.collection).await?;
        let pages = docs
            .into_iter()
            .map(|doc| serde_json::from_value(doc.data))
            .collect::<Result<Vec<PageData>, _>>()?;
        debug!(collection = %self.collection, pages = pages.len(), "Loaded pages");
        Ok(pages)
    }

    pub async fn find_page(&self, id: &str) -> Result<Option<PageData>, EditorError> {
        Ok(self.load_pages().await?.into_iter().find(|p| p.id == id))
    }

    /// Write every page in `pages` as one batch
    pub async fn persist_set_pages(&self, pages: &[PageData]) -> Result<(), EditorError> {
        let docs = pages
            .iter()
            .map(|page| serde_json::to_value(page).map(|data| Document::new(page.id.clone(), data)))
            .collect::<Result<Vec<_>, _>>()?;
        self.store.save_all(&self.collection, docs).await?;
        Ok(())
    }

    /// Replace the page with `next.id`, provided it is still at `expected_version`.
    ///
    /// Other pages in the list are written back unchanged.
    pub async fn replace_page(
        &self,
        next: PageData,
        expected_version: u64,
    ) -> Result<PageData, EditorError> {
        let _guard = self.write_lock.lock().await;

        let mut pages = self.load_pages().await?;
        let slot = pages
            .iter_mut()
            .find(|p| p.id == next.id)
            .ok_or_else(|| EditorError::PageNotFound(next.id.clone()))?;

        if slot.version != expected_version {
            warn!(
                page = %next.id,
                expected = expected_version,
                found = slot.version,
                "Rejecting save of stale page"
            );
            return Err(EditorError::Conflict {
                page_id: next.id,
                expected: expected_version,
                found: slot.version,
            });
        }

        *slot = next.clone();
        self.persist_set_pages(&pages).await?;
        info!(page = %next.id, version = next.version, blocks = next.blocks.len(), "Saved page");
        Ok(next)
    }

    /// Insert any required page missing from the store. Returns how many were added.
    pub async fn seed_required_pages(&self) -> Result<usize, EditorError> {
        let _guard = self.write_lock.lock().await;

        let existing = self.load_pages().await?;
        let missing: Vec<PageData> = required_pages()
            .into_iter()
            .filter(|required| !existing.iter().any(|p| p.id == required.id))
            .collect();

        if missing.is_empty() {
            debug!("All required pages present");
            return Ok(0);
        }

        self.persist_set_pages(&missing).await?;
        info!(
            pages = ?missing.iter().map(|p| p.id.as_str()).collect::<Vec<_>>(),
            "Seeded required pages"
        );
        Ok(missing.len())
    }
}
