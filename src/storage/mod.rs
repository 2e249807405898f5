use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::StaticConfig;
use crate::errors::{Result, SnaplinkError};

pub mod backend;
pub mod memory;
pub mod models;

pub use backend::SeaOrmStorage;
pub use memory::MemoryLinkStore;
pub use models::{BatchDeleteReport, LinkKey, LinkRecord, ScanCursor, ScanPage};

/// Link 持久化抽象
///
/// Shared by the HTTP handlers and the sweeper. Single-key operations are
/// atomic; there are no multi-key transactions.
#[async_trait]
pub trait LinkStore: Send + Sync {
    fn backend_name(&self) -> &str;

    async fn get(&self, id: &str) -> Result<Option<LinkRecord>>;

    /// Unconditional write, replaces any record with the same id.
    async fn put(&self, record: LinkRecord) -> Result<()>;

    /// Writes only when the id is free. Returns false on collision.
    async fn insert_if_absent(&self, record: LinkRecord) -> Result<bool>;

    /// Idempotent: an absent id is not an error.
    async fn delete(&self, id: &str) -> Result<()>;

    /// Deletes the record only if both id and `created_at` match.
    async fn delete_matching(&self, key: &LinkKey) -> Result<bool>;

    /// Unordered, unbounded.
    async fn query_by_identity(&self, identity_hash: &str) -> Result<Vec<LinkRecord>>;

    /// One page of a full scan, starting after `cursor`.
    async fn scan_page(&self, cursor: Option<&ScanCursor>, limit: u64) -> Result<ScanPage>;

    /// Best-effort batch delete; every item is attempted.
    async fn delete_batch(&self, keys: &[LinkKey]) -> BatchDeleteReport {
        let mut report = BatchDeleteReport::default();

        for key in keys {
            match self.delete_matching(key).await {
                Ok(true) => report.deleted.push(key.id.clone()),
                Ok(false) => {
                    debug!("Skipped delete of {}: absent or recreated", key.id);
                    report.skipped.push(key.id.clone());
                }
                Err(e) => {
                    warn!("Failed to delete link {}: {}", key.id, e);
                    report.failed.push((key.id.clone(), e));
                }
            }
        }

        report
    }
}

pub struct StorageFactory;

impl StorageFactory {
    pub async fn create(config: &StaticConfig) -> Result<Arc<dyn LinkStore>> {
        match config.store.backend.as_str() {
            "memory" => Ok(Arc::new(MemoryLinkStore::new())),
            "database" => {
                let database_url = &config.database.database_url;

                // 从 URL 自动推断数据库类型
                let backend_type = backend::infer_backend_from_url(database_url)?;

                let storage =
                    SeaOrmStorage::new(database_url, &backend_type, &config.database).await?;
                Ok(Arc::new(storage))
            }
            other => Err(SnaplinkError::config(format!(
                "Unknown store backend '{}'. Supported: database, memory",
                other
            ))),
        }
    }
}
