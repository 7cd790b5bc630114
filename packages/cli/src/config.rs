use serde::{Deserialize, Serialize};
use sproux_editor::{JsonFileStore, PageRepository, PAGES_COLLECTION};
use std::path::PathBuf;
use std::sync::Arc;

pub const DEFAULT_CONFIG_NAME: &str = "sproux.config.json";

/// SprouX configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory holding one JSON file per collection
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Collection holding page records
    #[serde(default = "default_pages_collection")]
    pub pages_collection: String,
}

fn default_data_dir() -> String {
    ".sproux/data".to_string()
}

fn default_pages_collection() -> String {
    PAGES_COLLECTION.to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    /// Get absolute path to the data directory
    pub fn get_data_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.data_dir)
    }

    /// Page repository over the configured file store
    pub fn repository(&self, cwd: &str) -> PageRepository {
        let store = JsonFileStore::new(self.get_data_dir(cwd));
        PageRepository::with_collection(Arc::new(store), self.pages_collection.clone())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            pages_collection: default_pages_collection(),
        }
    }
}
