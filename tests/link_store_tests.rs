//! Link store conformance tests
//!
//! The same contract is checked against the in-memory store and the SeaORM
//! store on a temporary SQLite database.

use std::collections::BTreeSet;
use std::sync::Arc;

use snaplink::config::DatabaseConfig;
use snaplink::storage::{
    LinkKey, LinkRecord, LinkStore, MemoryLinkStore, ScanCursor, SeaOrmStorage,
};
use tempfile::TempDir;

// =============================================================================
// Test Setup
// =============================================================================

async fn sqlite_store() -> (Arc<dyn LinkStore>, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("links_test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let storage = SeaOrmStorage::new(&db_url, "sqlite", &DatabaseConfig::default())
        .await
        .expect("Failed to create storage");

    (Arc::new(storage), temp_dir)
}

fn record(id: &str, identity: Option<&str>, created_at: i64) -> LinkRecord {
    LinkRecord::new(
        id,
        format!("https://{}.example.com/", id.to_lowercase()),
        identity.map(String::from),
        created_at,
    )
}

fn key(id: &str, created_at: i64) -> LinkKey {
    LinkKey {
        id: id.to_string(),
        created_at,
    }
}

// =============================================================================
// Contract
// =============================================================================

async fn check_get_put(store: &dyn LinkStore) {
    assert!(store.get("absent").await.unwrap().is_none());

    let rec = record("aB3dE6", Some("h1"), 100);
    store.put(rec.clone()).await.unwrap();
    assert_eq!(store.get("aB3dE6").await.unwrap(), Some(rec));

    // put 无条件覆盖
    let replaced = LinkRecord::new("aB3dE6", "https://other.example/", Some("h2".into()), 200);
    store.put(replaced.clone()).await.unwrap();
    assert_eq!(store.get("aB3dE6").await.unwrap(), Some(replaced));
    assert!(store.query_by_identity("h1").await.unwrap().is_empty());

    store.delete("aB3dE6").await.unwrap();
}

async fn check_insert_if_absent(store: &dyn LinkStore) {
    assert!(store.insert_if_absent(record("cond01", None, 1)).await.unwrap());
    assert!(!store.insert_if_absent(record("cond01", Some("h"), 2)).await.unwrap());

    let kept = store.get("cond01").await.unwrap().unwrap();
    assert_eq!(kept.created_at, 1);
    assert_eq!(kept.identity_hash, None);

    store.delete("cond01").await.unwrap();
}

async fn check_ids_are_case_sensitive(store: &dyn LinkStore) {
    store.put(record("aaaaaa", Some("lower"), 1)).await.unwrap();
    assert!(store.get("AAAAAA").await.unwrap().is_none());
    assert!(store.insert_if_absent(record("AAAAAA", Some("upper"), 2)).await.unwrap());

    assert_eq!(store.get("aaaaaa").await.unwrap().unwrap().created_at, 1);
    assert_eq!(store.get("AAAAAA").await.unwrap().unwrap().created_at, 2);

    let page = store.scan_page(None, 10).await.unwrap();
    assert_eq!(page.records.len(), 2);

    // 删除大写 ID 不影响小写记录
    store.delete("AAAAAA").await.unwrap();
    assert!(!store.delete_matching(&key("AAAAAA", 1)).await.unwrap());
    assert!(store.get("aaaaaa").await.unwrap().is_some());

    store.delete("aaaaaa").await.unwrap();
}

async fn check_delete_is_idempotent(store: &dyn LinkStore) {
    store.put(record("del001", None, 1)).await.unwrap();
    store.delete("del001").await.unwrap();
    store.delete("del001").await.unwrap();
    store.delete("never1").await.unwrap();
    assert!(store.get("del001").await.unwrap().is_none());
}

async fn check_query_by_identity(store: &dyn LinkStore) {
    store.put(record("idn001", Some("alice"), 1)).await.unwrap();
    store.put(record("idn002", Some("alice"), 2)).await.unwrap();
    store.put(record("idn003", Some("bob"), 3)).await.unwrap();
    store.put(record("idn004", None, 4)).await.unwrap();

    let alice: BTreeSet<String> = store
        .query_by_identity("alice")
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();
    let expected: BTreeSet<String> = ["idn001", "idn002"].iter().map(|s| s.to_string()).collect();
    assert_eq!(alice, expected);
    assert_eq!(store.query_by_identity("bob").await.unwrap().len(), 1);
    assert!(store.query_by_identity("carol").await.unwrap().is_empty());

    for id in ["idn001", "idn002", "idn003", "idn004"] {
        store.delete(id).await.unwrap();
    }
}

async fn check_scan_covers_everything(store: &dyn LinkStore) {
    let ids: BTreeSet<String> = (0..23).map(|i| format!("scn{:03}", i)).collect();
    for (i, id) in ids.iter().enumerate() {
        store.put(record(id, None, i as i64)).await.unwrap();
    }

    let mut seen = Vec::new();
    let mut cursor: Option<ScanCursor> = None;
    let mut pages = 0;
    loop {
        let page = store.scan_page(cursor.as_ref(), 5).await.unwrap();
        pages += 1;
        assert!(page.records.len() <= 5);
        seen.extend(page.records.into_iter().map(|r| r.id));
        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    assert_eq!(pages, 5);
    assert_eq!(seen.len(), ids.len());
    assert_eq!(seen.iter().cloned().collect::<BTreeSet<_>>(), ids);

    for id in &ids {
        store.delete(id).await.unwrap();
    }
}

async fn check_delete_batch(store: &dyn LinkStore) {
    store.put(record("bat001", None, 10)).await.unwrap();
    store.put(record("bat002", None, 20)).await.unwrap();
    // 已被重建：created_at 不匹配
    store.put(record("bat003", None, 99)).await.unwrap();

    let report = store
        .delete_batch(&[
            key("bat001", 10),
            key("bat002", 20),
            key("bat003", 30),
            key("gone01", 1),
        ])
        .await;

    assert!(report.is_complete());
    assert_eq!(report.deleted, vec!["bat001", "bat002"]);
    assert_eq!(report.skipped, vec!["bat003", "gone01"]);
    assert!(store.get("bat003").await.unwrap().is_some());

    store.delete("bat003").await.unwrap();
}

async fn run_contract(store: &dyn LinkStore) {
    check_get_put(store).await;
    check_insert_if_absent(store).await;
    check_ids_are_case_sensitive(store).await;
    check_delete_is_idempotent(store).await;
    check_query_by_identity(store).await;
    check_scan_covers_everything(store).await;
    check_delete_batch(store).await;

    let empty = store.scan_page(None, 10).await.unwrap();
    assert!(empty.records.is_empty());
    assert!(empty.next_cursor.is_none());
}

// =============================================================================
// Backends
// =============================================================================

#[tokio::test]
async fn test_memory_store_contract() {
    let store = MemoryLinkStore::new();
    assert_eq!(store.backend_name(), "memory");
    run_contract(&store).await;
}

#[tokio::test]
async fn test_sqlite_store_contract() {
    let (store, _dir) = sqlite_store().await;
    assert_eq!(store.backend_name(), "sqlite");
    run_contract(store.as_ref()).await;
}

#[tokio::test]
async fn test_sqlite_store_persists_across_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let db_url = format!(
        "sqlite://{}?mode=rwc",
        temp_dir.path().join("reopen.db").display()
    );

    {
        let storage = SeaOrmStorage::new(&db_url, "sqlite", &DatabaseConfig::default())
            .await
            .unwrap();
        storage
            .put(record("keep01", Some("h"), 1_700_000_000))
            .await
            .unwrap();
    }

    let storage = SeaOrmStorage::new(&db_url, "sqlite", &DatabaseConfig::default())
        .await
        .unwrap();
    let rec = storage.get("keep01").await.unwrap().unwrap();
    assert_eq!(rec.created_at, 1_700_000_000);
    assert_eq!(rec.identity_hash.as_deref(), Some("h"));
}
