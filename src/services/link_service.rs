//! Link management service
//!
//! Composes the store, the validator and the id generator into the
//! operations the HTTP layer exposes.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::LinksConfig;
use crate::errors::{Result, SnaplinkError};
use crate::storage::{LinkRecord, LinkStore};
use crate::utils::{CallerMetadata, generate_short_id, is_valid_short_id};

use super::prober::LinkValidator;

pub struct LinkService {
    store: Arc<dyn LinkStore>,
    validator: LinkValidator,
    settings: LinksConfig,
}

impl LinkService {
    pub fn new(store: Arc<dyn LinkStore>, validator: LinkValidator, settings: LinksConfig) -> Self {
        Self {
            store,
            validator,
            settings,
        }
    }

    /// Validates `link`, then stores it under a fresh id.
    ///
    /// Ids are claimed with a conditional insert; a collision draws a new id,
    /// up to `max_create_attempts` times.
    pub async fn create(
        &self,
        link: &str,
        metadata: &CallerMetadata,
        now: i64,
    ) -> Result<LinkRecord> {
        if let Err(reason) = self.validator.good_to_create(link).await {
            info!("Rejected link \"{}\": {}", link, reason);
            return Err(SnaplinkError::validation(reason.to_string()));
        }

        let identity_hash = metadata.identity_hash();
        let attempts = self.settings.max_create_attempts.max(1);

        for attempt in 1..=attempts {
            let id = generate_short_id(self.settings.id_length);
            let record = LinkRecord::new(&id, link, Some(identity_hash.clone()), now);

            if self.store.insert_if_absent(record.clone()).await? {
                info!(
                    "Link created: {} -> {} (identity {})",
                    id,
                    link,
                    &identity_hash[..8.min(identity_hash.len())]
                );
                return Ok(record);
            }

            warn!(
                "Id collision on {} (attempt {}/{}), drawing a new id",
                id, attempt, attempts
            );
        }

        Err(SnaplinkError::id_space_exhausted(format!(
            "No free id after {} attempts",
            attempts
        )))
    }

    pub async fn resolve(&self, id: &str) -> Result<LinkRecord> {
        if !is_valid_short_id(id, self.settings.id_length) {
            debug!("Malformed id rejected: {}", id);
            return Err(SnaplinkError::not_found(format!("Link '{}' not found", id)));
        }

        self.store
            .get(id)
            .await?
            .ok_or_else(|| SnaplinkError::not_found(format!("Link '{}' not found", id)))
    }

    /// Idempotent. A malformed id can never exist, so it is a no-op.
    pub async fn delete(&self, id: &str) -> Result<()> {
        if !is_valid_short_id(id, self.settings.id_length) {
            debug!("Delete of malformed id ignored: {}", id);
            return Ok(());
        }

        self.store.delete(id).await?;
        info!("Link deleted: {}", id);
        Ok(())
    }

    pub async fn list_by_identity(&self, metadata: &CallerMetadata) -> Result<Vec<LinkRecord>> {
        let identity_hash = metadata.identity_hash();
        let records = self.store.query_by_identity(&identity_hash).await?;
        debug!(
            "Identity {} owns {} links",
            &identity_hash[..8.min(identity_hash.len())],
            records.len()
        );
        Ok(records)
    }
}
