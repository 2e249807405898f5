//! 过期链接清理任务
//!
//! Walks the whole store page by page and deletes every record whose
//! `created_at + ttl < now`. Deletes are keyed by `(id, created_at)` so a
//! record recreated under the same id between scan and delete survives.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::{StoreConfig, SweeperConfig};
use crate::errors::Result;
use crate::storage::{LinkKey, LinkStore, ScanCursor};

#[derive(Debug, Clone)]
pub struct SweepSettings {
    pub ttl_secs: i64,
    pub page_size: u64,
    /// 页与页之间的暂停
    pub page_pause: Duration,
    pub interval: Duration,
    pub initial_delay: Duration,
}

impl SweepSettings {
    pub fn from_config(sweeper: &SweeperConfig, store: &StoreConfig) -> Self {
        Self {
            ttl_secs: sweeper.ttl_secs(),
            page_size: store.page_size.max(1),
            page_pause: Duration::from_millis(sweeper.page_pause_ms),
            interval: Duration::from_secs(sweeper.interval_hours.max(1) * 60 * 60),
            initial_delay: Duration::from_secs(sweeper.initial_delay_secs),
        }
    }
}

/// 清理报告
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SweepReport {
    pub pages: u64,
    pub scanned: u64,
    pub expired: u64,
    pub deleted: u64,
    /// Expired on scan but absent or recreated at delete time
    pub skipped: u64,
    pub failed: u64,
}

pub struct AntiEntropySweeper {
    store: Arc<dyn LinkStore>,
    settings: SweepSettings,
}

impl AntiEntropySweeper {
    pub fn new(store: Arc<dyn LinkStore>, settings: SweepSettings) -> Self {
        Self { store, settings }
    }

    /// One full pass using the wall clock.
    pub async fn run_once(&self) -> Result<SweepReport> {
        self.sweep_at(Utc::now().timestamp()).await
    }

    /// One full pass, judging expiry against `now` (Unix seconds).
    ///
    /// Per-item delete failures are counted and the pass continues. A failed
    /// page fetch ends the pass with that error.
    pub async fn sweep_at(&self, now: i64) -> Result<SweepReport> {
        let mut report = SweepReport::default();
        let mut cursor: Option<ScanCursor> = None;

        loop {
            let page = match self
                .store
                .scan_page(cursor.as_ref(), self.settings.page_size)
                .await
            {
                Ok(page) => page,
                Err(e) => {
                    error!(
                        "Sweep aborted on page {} after scanning {} links: {}",
                        report.pages + 1,
                        report.scanned,
                        e
                    );
                    return Err(e);
                }
            };

            report.pages += 1;
            report.scanned += page.records.len() as u64;

            let expired: Vec<LinkKey> = page
                .records
                .iter()
                .filter(|r| r.is_expired(self.settings.ttl_secs, now))
                .map(|r| r.key())
                .collect();

            if !expired.is_empty() {
                report.expired += expired.len() as u64;

                let batch = self.store.delete_batch(&expired).await;
                report.deleted += batch.deleted.len() as u64;
                report.skipped += batch.skipped.len() as u64;
                report.failed += batch.failed.len() as u64;

                if !batch.is_complete() {
                    warn!(
                        "Sweep page {}: {} of {} deletes failed",
                        report.pages,
                        batch.failed.len(),
                        expired.len()
                    );
                }
            }

            debug!(
                "Sweep page {}: scanned {}, expired {}",
                report.pages,
                page.records.len(),
                expired.len()
            );

            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }

            if !self.settings.page_pause.is_zero() {
                tokio::time::sleep(self.settings.page_pause).await;
            }
        }

        info!(
            "Sweep completed: {} pages, {} scanned, {} expired, {} deleted, {} skipped, {} failed",
            report.pages,
            report.scanned,
            report.expired,
            report.deleted,
            report.skipped,
            report.failed
        );

        Ok(report)
    }

    /// 启动后台清理任务
    ///
    /// First pass after `initial_delay`, then every `interval`.
    pub fn spawn_background_task(self: Arc<Self>) -> JoinHandle<()> {
        let interval = self.settings.interval;
        let initial_delay = self.settings.initial_delay;

        info!(
            "Sweeper background task started (interval: {:?}, first run in {:?})",
            interval, initial_delay
        );

        tokio::spawn(async move {
            tokio::time::sleep(initial_delay).await;

            loop {
                if let Err(e) = self.run_once().await {
                    error!("Sweep pass failed: {}", e);
                }

                tokio::time::sleep(interval).await;
            }
        })
    }
}
