//! 数据库操作重试
//!
//! Transient failures (pool exhaustion, dropped connections, deadlocks, busy
//! SQLite files) are retried with exponential backoff. Everything else is
//! returned immediately.

use std::future::Future;
use std::time::Duration;

use sea_orm::DbErr;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::DatabaseConfig;
use crate::errors::SnaplinkError;

/// 判断数据库错误是否可重试
pub fn is_retryable_error(err: &DbErr) -> bool {
    match err {
        DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => true,
        DbErr::Exec(runtime_err) | DbErr::Query(runtime_err) => {
            is_retryable_runtime_error(runtime_err)
        }
        _ => false,
    }
}

fn is_retryable_runtime_error(err: &sea_orm::error::RuntimeErr) -> bool {
    use sea_orm::error::RuntimeErr;

    match err {
        RuntimeErr::SqlxError(sqlx_err) => {
            use std::ops::Deref;
            if let Some(db_err) = sqlx_err.deref().as_database_error()
                && let Some(code) = db_err.code()
            {
                return matches!(
                    code.as_ref(),
                    // MySQL deadlock / lock wait timeout
                    "1213" | "1205" |
                    // PostgreSQL serialization failure / deadlock
                    "40001" | "40P01" |
                    // SQLite BUSY / LOCKED
                    "5" | "6"
                );
            }
            is_retryable_message(&sqlx_err.to_string().to_lowercase())
        }
        RuntimeErr::Internal(msg) => is_retryable_message(&msg.to_lowercase()),
        #[allow(unreachable_patterns)]
        _ => false,
    }
}

fn is_retryable_message(msg: &str) -> bool {
    msg.contains("deadlock")
        || msg.contains("lock wait timeout")
        || msg.contains("database is locked")
        || msg.contains("serialization failure")
}

/// Maps a final database error onto the store taxonomy.
///
/// Transient errors that survived every retry mean the store is unavailable.
pub fn into_store_error(operation: &str, err: DbErr) -> SnaplinkError {
    if is_retryable_error(&err) {
        SnaplinkError::store_unavailable(format!("{} failed after retries: {}", operation, err))
    } else {
        SnaplinkError::store_operation(format!("{} failed: {}", operation, err))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 100,
            max_delay_ms: 2000,
        }
    }
}

impl From<&DatabaseConfig> for RetryConfig {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            max_retries: config.retry_count,
            base_delay_ms: config.retry_base_delay_ms,
            max_delay_ms: config.retry_max_delay_ms,
        }
    }
}

/// Runs `operation`, retrying transient failures up to `config.max_retries` times.
pub async fn with_retry<T, F, Fut>(
    operation_name: &str,
    config: RetryConfig,
    mut operation: F,
) -> Result<T, DbErr>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DbErr>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(result) => {
                if attempt > 0 {
                    debug!(
                        "Operation '{}' succeeded after {} retries",
                        operation_name, attempt
                    );
                }
                return Ok(result);
            }
            Err(e) if is_retryable_error(&e) && attempt < config.max_retries => {
                attempt += 1;
                let delay = backoff_delay(attempt, config.base_delay_ms, config.max_delay_ms);
                warn!(
                    "Operation '{}' failed (attempt {}/{}): {}; retrying in {} ms",
                    operation_name,
                    attempt,
                    config.max_retries + 1,
                    e,
                    delay
                );
                sleep(Duration::from_millis(delay)).await;
            }
            Err(e) => return Err(e),
        }
    }
}

/// base * 2^(attempt-1), capped, plus up to 25% jitter
fn backoff_delay(attempt: u32, base_ms: u64, max_ms: u64) -> u64 {
    let exp_delay = base_ms.saturating_mul(2u64.saturating_pow(attempt.saturating_sub(1)));
    let capped = exp_delay.min(max_ms);
    let jitter = rand::random_range(0..=capped / 4);
    capped.saturating_add(jitter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_config(max_retries: u32) -> RetryConfig {
        RetryConfig {
            max_retries,
            base_delay_ms: 5,
            max_delay_ms: 20,
        }
    }

    #[test]
    fn test_transient_errors_are_retryable() {
        assert!(is_retryable_error(&DbErr::ConnectionAcquire(
            sea_orm::error::ConnAcquireErr::Timeout
        )));
        assert!(is_retryable_error(&DbErr::Query(
            sea_orm::error::RuntimeErr::Internal("database is locked".to_string())
        )));
        assert!(!is_retryable_error(&DbErr::RecordNotFound(
            "missing".to_string()
        )));
    }

    #[test]
    fn test_into_store_error_classification() {
        let unavailable = into_store_error(
            "get(abc)",
            DbErr::ConnectionAcquire(sea_orm::error::ConnAcquireErr::Timeout),
        );
        assert!(matches!(unavailable, SnaplinkError::StoreUnavailable(_)));

        let operation = into_store_error("get(abc)", DbErr::Custom("bad column".to_string()));
        assert!(matches!(operation, SnaplinkError::StoreOperation(_)));
    }

    #[test]
    fn test_backoff_is_capped() {
        let first = backoff_delay(1, 100, 2000);
        assert!((100..=125).contains(&first));

        let late = backoff_delay(12, 100, 2000);
        assert!((2000..=2500).contains(&late));
    }

    #[tokio::test]
    async fn test_retries_until_success() {
        let calls = AtomicU32::new(0);

        let result = with_retry("op", fast_config(3), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(DbErr::ConnectionAcquire(
                        sea_orm::error::ConnAcquireErr::Timeout,
                    ))
                } else {
                    Ok(7)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_retryable_error_returns_immediately() {
        let calls = AtomicU32::new(0);

        let result = with_retry("op", fast_config(3), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<(), _>(DbErr::Custom("constraint".to_string())) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retries_are_bounded() {
        let calls = AtomicU32::new(0);

        let result = with_retry("op", fast_config(2), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err::<(), _>(DbErr::ConnectionAcquire(
                    sea_orm::error::ConnAcquireErr::Timeout,
                ))
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
