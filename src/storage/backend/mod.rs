//! SeaORM storage backend
//!
//! Relational Link Store over SQLite, MySQL/MariaDB or PostgreSQL. The
//! schema lives in the `migration` crate; the identity lookup is served by
//! the `idx_links_identity_hash` index.

mod connection;
mod converters;
mod mutations;
mod query;
pub mod retry;

use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use tracing::warn;

use crate::config::DatabaseConfig;
use crate::errors::{Result, SnaplinkError};
use crate::storage::{LinkKey, LinkRecord, LinkStore, ScanCursor, ScanPage};

pub use connection::{connect_generic, connect_sqlite, run_migrations};
pub use converters::{model_to_record, record_to_active_model};

/// 从数据库 URL 推断数据库类型
pub fn infer_backend_from_url(database_url: &str) -> Result<String> {
    if database_url.starts_with("sqlite:")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
        || database_url == ":memory:"
    {
        Ok("sqlite".to_string())
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok("mysql".to_string())
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok("postgres".to_string())
    } else {
        Err(SnaplinkError::database_config(format!(
            "Cannot infer database type from URL: {}. Supported: sqlite://, mysql://, mariadb://, postgres://",
            database_url
        )))
    }
}

/// SeaORM-based Link Store
#[derive(Clone)]
pub struct SeaOrmStorage {
    db: DatabaseConnection,
    backend_name: String,
    retry_config: retry::RetryConfig,
}

impl SeaOrmStorage {
    pub async fn new(
        database_url: &str,
        backend_name: &str,
        config: &DatabaseConfig,
    ) -> Result<Self> {
        if database_url.is_empty() {
            return Err(SnaplinkError::database_config("database_url is not set"));
        }

        let db = if backend_name == "sqlite" {
            connect_sqlite(database_url).await?
        } else {
            connect_generic(database_url, backend_name, config.pool_size).await?
        };

        run_migrations(&db).await?;

        warn!("{} Storage initialized.", backend_name.to_uppercase());
        Ok(Self::from_connection(db, backend_name, config))
    }

    /// Wraps an already-migrated connection.
    pub fn from_connection(
        db: DatabaseConnection,
        backend_name: &str,
        config: &DatabaseConfig,
    ) -> Self {
        Self {
            db,
            backend_name: backend_name.to_string(),
            retry_config: retry::RetryConfig::from(config),
        }
    }
}

#[async_trait]
impl LinkStore for SeaOrmStorage {
    fn backend_name(&self) -> &str {
        &self.backend_name
    }

    async fn get(&self, id: &str) -> Result<Option<LinkRecord>> {
        self.find(id).await
    }

    async fn put(&self, record: LinkRecord) -> Result<()> {
        self.upsert(&record).await
    }

    async fn insert_if_absent(&self, record: LinkRecord) -> Result<bool> {
        self.try_insert(&record).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.remove(id).await
    }

    async fn delete_matching(&self, key: &LinkKey) -> Result<bool> {
        self.remove_matching(key).await
    }

    async fn query_by_identity(&self, identity_hash: &str) -> Result<Vec<LinkRecord>> {
        self.find_by_identity(identity_hash).await
    }

    async fn scan_page(&self, cursor: Option<&ScanCursor>, limit: u64) -> Result<ScanPage> {
        self.page_after(cursor, limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_backend_from_url() {
        assert_eq!(infer_backend_from_url("snaplink.db").unwrap(), "sqlite");
        assert_eq!(
            infer_backend_from_url("sqlite://data/links.db?mode=rwc").unwrap(),
            "sqlite"
        );
        assert_eq!(infer_backend_from_url(":memory:").unwrap(), "sqlite");
        assert_eq!(
            infer_backend_from_url("mariadb://u:p@localhost/links").unwrap(),
            "mysql"
        );
        assert_eq!(
            infer_backend_from_url("postgresql://localhost/links").unwrap(),
            "postgres"
        );
        assert!(infer_backend_from_url("redis://localhost").is_err());
    }
}
