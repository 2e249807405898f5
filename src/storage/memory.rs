//! 内存存储后端
//!
//! Ordered map keyed by id plus an identity index. Used for the `memory`
//! backend and as a lightweight store in tests.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::ops::Bound;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::{LinkKey, LinkRecord, LinkStore, ScanCursor, ScanPage};
use crate::errors::Result;

#[derive(Default)]
struct Tables {
    links: BTreeMap<String, LinkRecord>,
    by_identity: HashMap<String, BTreeSet<String>>,
}

impl Tables {
    fn index(&mut self, record: &LinkRecord) {
        if let Some(hash) = &record.identity_hash {
            self.by_identity
                .entry(hash.clone())
                .or_default()
                .insert(record.id.clone());
        }
    }

    fn unindex(&mut self, record: &LinkRecord) {
        if let Some(hash) = &record.identity_hash
            && let Some(ids) = self.by_identity.get_mut(hash)
        {
            ids.remove(&record.id);
            if ids.is_empty() {
                self.by_identity.remove(hash);
            }
        }
    }

    fn insert(&mut self, record: LinkRecord) {
        if let Some(old) = self.links.remove(&record.id) {
            self.unindex(&old);
        }
        self.index(&record);
        self.links.insert(record.id.clone(), record);
    }

    fn remove(&mut self, id: &str) -> Option<LinkRecord> {
        let old = self.links.remove(id)?;
        self.unindex(&old);
        Some(old)
    }
}

#[derive(Default)]
pub struct MemoryLinkStore {
    tables: RwLock<Tables>,
}

impl MemoryLinkStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tables.read().links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl LinkStore for MemoryLinkStore {
    fn backend_name(&self) -> &str {
        "memory"
    }

    async fn get(&self, id: &str) -> Result<Option<LinkRecord>> {
        Ok(self.tables.read().links.get(id).cloned())
    }

    async fn put(&self, record: LinkRecord) -> Result<()> {
        self.tables.write().insert(record);
        Ok(())
    }

    async fn insert_if_absent(&self, record: LinkRecord) -> Result<bool> {
        let mut tables = self.tables.write();
        if tables.links.contains_key(&record.id) {
            return Ok(false);
        }
        tables.insert(record);
        Ok(true)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.tables.write().remove(id);
        Ok(())
    }

    async fn delete_matching(&self, key: &LinkKey) -> Result<bool> {
        let mut tables = self.tables.write();
        let matches = tables
            .links
            .get(&key.id)
            .is_some_and(|r| r.created_at == key.created_at);
        if matches {
            tables.remove(&key.id);
        }
        Ok(matches)
    }

    async fn query_by_identity(&self, identity_hash: &str) -> Result<Vec<LinkRecord>> {
        let tables = self.tables.read();
        let records = tables
            .by_identity
            .get(identity_hash)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| tables.links.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default();
        Ok(records)
    }

    async fn scan_page(&self, cursor: Option<&ScanCursor>, limit: u64) -> Result<ScanPage> {
        let limit = limit.max(1);
        let tables = self.tables.read();

        let start = match cursor {
            Some(c) => Bound::Excluded(c.as_str().to_string()),
            None => Bound::Unbounded,
        };

        let records: Vec<LinkRecord> = tables
            .links
            .range((start, Bound::Unbounded))
            .take(limit as usize)
            .map(|(_, r)| r.clone())
            .collect();

        Ok(ScanPage::from_keyset(records, limit))
    }
}
