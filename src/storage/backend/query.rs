//! Read operations for SeaOrmStorage

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use tracing::debug;

use super::converters::model_to_record;
use super::retry::{into_store_error, with_retry};
use super::SeaOrmStorage;
use crate::errors::Result;
use crate::storage::{LinkRecord, ScanCursor, ScanPage};

use migration::entities::link;

impl SeaOrmStorage {
    pub(super) async fn find(&self, id: &str) -> Result<Option<LinkRecord>> {
        let db = &self.db;
        let op = format!("get({})", id);

        let model = with_retry(&op, self.retry_config, || async {
            link::Entity::find_by_id(id.to_string()).one(db).await
        })
        .await
        .map_err(|e| into_store_error(&op, e))?;

        Ok(model.map(model_to_record))
    }

    pub(super) async fn find_by_identity(&self, identity_hash: &str) -> Result<Vec<LinkRecord>> {
        let db = &self.db;

        let models = with_retry("query_by_identity", self.retry_config, || async {
            link::Entity::find()
                .filter(link::Column::IdentityHash.eq(identity_hash))
                .all(db)
                .await
        })
        .await
        .map_err(|e| into_store_error("query_by_identity", e))?;

        Ok(models.into_iter().map(model_to_record).collect())
    }

    /// Keyset page ordered by id: rows strictly after the cursor.
    pub(super) async fn page_after(
        &self,
        cursor: Option<&ScanCursor>,
        limit: u64,
    ) -> Result<ScanPage> {
        let db = &self.db;
        let limit = limit.max(1);
        let after = cursor.map(|c| c.as_str().to_string());

        let models = with_retry("scan_page", self.retry_config, || async {
            let mut select = link::Entity::find();
            if let Some(after) = &after {
                select = select.filter(link::Column::Id.gt(after.as_str()));
            }
            select
                .order_by_asc(link::Column::Id)
                .limit(limit)
                .all(db)
                .await
        })
        .await
        .map_err(|e| into_store_error("scan_page", e))?;

        debug!(
            "Scanned page of {} links after {:?}",
            models.len(),
            cursor.map(|c| c.as_str())
        );

        let records = models.into_iter().map(model_to_record).collect();
        Ok(ScanPage::from_keyset(records, limit))
    }
}
