use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use super::{upsert, validate_collection, Document, DocumentStore, StoreError};

/// File-backed store: `<data_dir>/<collection>.json` holds a JSON array of documents
#[derive(Debug)]
pub struct JsonFileStore {
    data_dir: PathBuf,
    /// Serializes read-modify-write cycles
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn collection_path(&self, collection: &str) -> Result<PathBuf, StoreError> {
        validate_collection(collection)?;
        Ok(self.data_dir.join(format!("{collection}.json")))
    }

    async fn read(&self, path: &Path) -> Result<Vec<Document>, StoreError> {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write through a temp file so readers never see a half-written collection
    async fn write(&self, path: &Path, docs: &[Document]) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.data_dir).await?;
        let content = serde_json::to_string_pretty(docs)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, content).await?;
        tokio::fs::rename(&tmp, path).await?;
        debug!(path = %path.display(), documents = docs.len(), "Wrote collection");
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for JsonFileStore {
    async fn load(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let path = self.collection_path(collection)?;
        self.read(&path).await
    }

    async fn save_all(&self, collection: &str, docs: Vec<Document>) -> Result<(), StoreError> {
        let path = self.collection_path(collection)?;
        let _guard = self.write_lock.lock().await;

        let mut existing = self.read(&path).await?;
        upsert(&mut existing, docs);
        self.write(&path, &existing).await
    }

    async fn delete_one(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let path = self.collection_path(collection)?;
        let _guard = self.write_lock.lock().await;

        let mut existing = self.read(&path).await?;
        let before = existing.len();
        existing.retain(|d| d.id != id);
        if existing.len() == before {
            return Ok(false);
        }
        self.write(&path, &existing).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_is_empty_collection() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path());
        assert!(store.load("pages").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_documents_persist_across_instances() {
        let dir = TempDir::new().unwrap();
        let data_dir = dir.path().join("data");

        JsonFileStore::new(&data_dir)
            .save_all(
                "pages",
                vec![
                    Document::new("home", json!({"title": "Home"})),
                    Document::new("blog", json!({"title": "Blog"})),
                ],
            )
            .await
            .unwrap();

        let reopened = JsonFileStore::new(&data_dir);
        let docs = reopened.load("pages").await.unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[1].data, json!({"title": "Blog"}));
        assert!(!data_dir.join("pages.json.tmp").exists());

        assert!(reopened.delete_one("pages", "home").await.unwrap());
        assert_eq!(reopened.load("pages").await.unwrap()[0].id, "blog");
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("pages.json"), "{oops").unwrap();

        let store = JsonFileStore::new(dir.path());
        assert!(matches!(
            store.load("pages").await,
            Err(StoreError::Serialization(_))
        ));
    }

    #[tokio::test]
    async fn test_rejects_path_like_collection() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path());
        assert!(matches!(
            store.load("../pages").await,
            Err(StoreError::InvalidCollection(_))
        ));
    }
}
