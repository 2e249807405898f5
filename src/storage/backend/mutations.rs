//! Write operations for SeaOrmStorage

use sea_orm::{ColumnTrait, DbErr, EntityTrait, QueryFilter, sea_query::OnConflict};
use tracing::debug;

use super::converters::record_to_active_model;
use super::retry::{into_store_error, with_retry};
use super::SeaOrmStorage;
use crate::errors::Result;
use crate::storage::{LinkKey, LinkRecord};

use migration::entities::link;

impl SeaOrmStorage {
    /// 使用 ON CONFLICT 的原子 upsert
    pub(super) async fn upsert(&self, record: &LinkRecord) -> Result<()> {
        let db = &self.db;
        let op = format!("put({})", record.id);

        with_retry(&op, self.retry_config, || async {
            link::Entity::insert(record_to_active_model(record))
                .on_conflict(
                    OnConflict::column(link::Column::Id)
                        .update_columns([
                            link::Column::Link,
                            link::Column::IdentityHash,
                            link::Column::CreatedAt,
                        ])
                        .to_owned(),
                )
                .exec_without_returning(db)
                .await
        })
        .await
        .map_err(|e| into_store_error(&op, e))?;

        debug!("Link stored: {}", record.id);
        Ok(())
    }

    /// INSERT ... ON CONFLICT DO NOTHING; false when the id is taken
    pub(super) async fn try_insert(&self, record: &LinkRecord) -> Result<bool> {
        let db = &self.db;
        let op = format!("insert_if_absent({})", record.id);

        let result = with_retry(&op, self.retry_config, || async {
            link::Entity::insert(record_to_active_model(record))
                .on_conflict(
                    OnConflict::column(link::Column::Id)
                        .do_nothing()
                        .to_owned(),
                )
                .exec_without_returning(db)
                .await
        })
        .await;

        match result {
            Ok(rows) if rows > 0 => Ok(true),
            Ok(_) | Err(DbErr::RecordNotInserted) => {
                debug!("Id already taken: {}", record.id);
                Ok(false)
            }
            Err(e) => Err(into_store_error(&op, e)),
        }
    }

    pub(super) async fn remove(&self, id: &str) -> Result<()> {
        let db = &self.db;
        let op = format!("delete({})", id);

        let result = with_retry(&op, self.retry_config, || async {
            link::Entity::delete_by_id(id.to_string()).exec(db).await
        })
        .await
        .map_err(|e| into_store_error(&op, e))?;

        if result.rows_affected > 0 {
            debug!("Link row removed: {}", id);
        }
        Ok(())
    }

    pub(super) async fn remove_matching(&self, key: &LinkKey) -> Result<bool> {
        let db = &self.db;
        let op = format!("delete_matching({})", key.id);

        let result = with_retry(&op, self.retry_config, || async {
            link::Entity::delete_many()
                .filter(link::Column::Id.eq(key.id.as_str()))
                .filter(link::Column::CreatedAt.eq(key.created_at))
                .exec(db)
                .await
        })
        .await
        .map_err(|e| into_store_error(&op, e))?;

        Ok(result.rows_affected > 0)
    }
}
