use serde::{Deserialize, Serialize};

use crate::errors::SnaplinkError;

/// 一条短链接记录
///
/// Immutable between creation and deletion. On the wire the destination is
/// exposed under `link`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub id: String,
    #[serde(rename = "link")]
    pub destination: String,
    #[serde(default)]
    pub identity_hash: Option<String>,
    /// Unix seconds
    pub created_at: i64,
}

impl LinkRecord {
    pub fn new(
        id: impl Into<String>,
        destination: impl Into<String>,
        identity_hash: Option<String>,
        created_at: i64,
    ) -> Self {
        Self {
            id: id.into(),
            destination: destination.into(),
            identity_hash,
            created_at,
        }
    }

    pub fn key(&self) -> LinkKey {
        LinkKey {
            id: self.id.clone(),
            created_at: self.created_at,
        }
    }

    /// `created_at + ttl < now`
    pub fn is_expired(&self, ttl_secs: i64, now: i64) -> bool {
        self.created_at.saturating_add(ttl_secs) < now
    }
}

/// Identifies one incarnation of an id.
///
/// A record recreated under the same id gets a new `created_at`, so a
/// delete by key never removes the newer record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LinkKey {
    pub id: String,
    pub created_at: i64,
}

/// Opaque continuation token for [`super::LinkStore::scan_page`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanCursor(String);

impl ScanCursor {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScanPage {
    pub records: Vec<LinkRecord>,
    /// None once the scan is complete
    pub next_cursor: Option<ScanCursor>,
}

impl ScanPage {
    /// Builds a keyset page: a full page continues after its last id.
    pub fn from_keyset(records: Vec<LinkRecord>, limit: u64) -> Self {
        let next_cursor = if limit > 0 && records.len() as u64 >= limit {
            records.last().map(|r| ScanCursor::new(r.id.clone()))
        } else {
            None
        };
        Self {
            records,
            next_cursor,
        }
    }
}

/// 批量删除结果
#[derive(Debug, Default)]
pub struct BatchDeleteReport {
    /// Ids whose matching record was removed
    pub deleted: Vec<String>,
    /// Ids already gone, or recreated with a different `created_at`
    pub skipped: Vec<String>,
    /// Items that errored; the rest of the batch still ran
    pub failed: Vec<(String, SnaplinkError)>,
}

impl BatchDeleteReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: i64 = 24 * 60 * 60;

    #[test]
    fn test_expiry_is_strict() {
        let now = 1_700_000_000;
        let ttl = 30 * DAY;

        assert!(LinkRecord::new("a", "https://a", None, now - 31 * DAY).is_expired(ttl, now));
        assert!(!LinkRecord::new("b", "https://b", None, now - DAY).is_expired(ttl, now));
        // exactly at the boundary is not expired yet
        assert!(!LinkRecord::new("c", "https://c", None, now - ttl).is_expired(ttl, now));
    }

    #[test]
    fn test_serializes_destination_as_link() {
        let record = LinkRecord::new("ab12Cd", "https://example.com", Some("f".repeat(40)), 42);
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["id"], "ab12Cd");
        assert_eq!(json["link"], "https://example.com");
        assert_eq!(json["created_at"], 42);
        assert!(json.get("destination").is_none());
    }

    #[test]
    fn test_keyset_page_cursor() {
        let records: Vec<_> = ["a", "b"]
            .iter()
            .map(|id| LinkRecord::new(*id, "https://x", None, 1))
            .collect();

        let full = ScanPage::from_keyset(records.clone(), 2);
        assert_eq!(full.next_cursor, Some(ScanCursor::new("b")));

        let short = ScanPage::from_keyset(records, 3);
        assert!(short.next_cursor.is_none());
    }
}
