//! Analysis record stores
//!
//! The progressor and HTTP handlers only see [`AnalysisStore`]; records are
//! kept either in process memory or in a SQLite file.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use palm_common::config::{RootFolderInitializer, RootFolderResolver, StorageKind, TomlConfig};
use palm_common::{AnalysisRecord, AnalysisUpdate, NewAnalysis, Result};
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

/// Persistence for analysis records
///
/// Updates for different ids never interfere; updates for one id are applied
/// whole or not at all.
#[async_trait]
pub trait AnalysisStore: Send + Sync {
    /// Insert a new record in `processing` at progress 0
    async fn create(&self, new: NewAnalysis) -> Result<AnalysisRecord>;

    /// Fetch a record, `None` if the id is unknown
    async fn get(&self, id: Uuid) -> Result<Option<AnalysisRecord>>;

    /// Merge a partial update, `None` if the id is unknown
    async fn update(&self, id: Uuid, update: AnalysisUpdate) -> Result<Option<AnalysisRecord>>;

    /// Backend name for logging
    fn backend(&self) -> &'static str;
}

/// Shared handle used by handlers and background tasks
pub type SharedStore = Arc<dyn AnalysisStore>;

/// Open the store selected by configuration
///
/// A configured `database` path selects SQLite even when `storage` is left at
/// its default. SQLite uses `database` when set, otherwise
/// `<root_folder>/palm.db`.
pub async fn open_store(config: &TomlConfig, root_override: Option<PathBuf>) -> Result<SharedStore> {
    let storage = if config.database.is_some() {
        StorageKind::Sqlite
    } else {
        config.storage
    };

    match storage {
        StorageKind::Memory => {
            tracing::info!("Using in-memory analysis store");
            Ok(Arc::new(MemoryStore::new()))
        }
        StorageKind::Sqlite => {
            let db_path = match &config.database {
                Some(path) => path.clone(),
                None => {
                    let root_folder = RootFolderResolver::new("palm-ra")
                        .with_cli_arg(root_override)
                        .with_toml_config(config)
                        .resolve();
                    let initializer = RootFolderInitializer::new(root_folder);
                    initializer.ensure_directory_exists()?;
                    initializer.database_path()
                }
            };
            tracing::info!("Using SQLite analysis store: {}", db_path.display());
            Ok(Arc::new(SqliteStore::open(&db_path).await?))
        }
    }
}
