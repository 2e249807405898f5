//! 目标 URL 校验与存活探测
//!
//! `good_to_create = is_valid_url && is_live`, evaluated in that order.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, trace, warn};
use ureq::Agent;

use crate::config::ProbeConfig;
use crate::utils::url_validator::{UrlValidationError, validate_url};

/// 存活探测接口
///
/// Never fails: transport errors, timeouts and non-200 statuses all
/// answer `false`.
#[async_trait]
pub trait LivenessProbe: Send + Sync {
    async fn is_live(&self, url: &str) -> bool;
}

/// HTTP GET prober backed by a shared `ureq` agent
pub struct HttpProber {
    agent: Agent,
    timeout: Duration,
}

impl HttpProber {
    pub fn new(config: &ProbeConfig) -> Self {
        let timeout = Duration::from_millis(config.timeout_ms.max(1));
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .user_agent(config.user_agent.as_str())
            // 非 2xx 也按正常响应返回，由我们自己判断状态码
            .http_status_as_error(false)
            .build()
            .into();

        Self { agent, timeout }
    }

    /// 同步探测（在 spawn_blocking 中调用）
    fn probe_sync(agent: Agent, url: String) -> bool {
        match agent.get(&url).call() {
            Ok(resp) => {
                let status = resp.status().as_u16();
                trace!("Probe {} answered {}", url, status);
                status == 200
            }
            Err(e) => {
                debug!("Probe request to \"{}\" failed: {}", url, e);
                false
            }
        }
    }
}

#[async_trait]
impl LivenessProbe for HttpProber {
    async fn is_live(&self, url: &str) -> bool {
        let agent = self.agent.clone();
        let url_owned = url.to_string();

        let task = tokio::task::spawn_blocking(move || Self::probe_sync(agent, url_owned));

        // agent 的全局超时之外再加一层，防止阻塞线程池耗尽时无限等待
        match tokio::time::timeout(self.timeout + Duration::from_millis(250), task).await {
            Ok(Ok(live)) => live,
            Ok(Err(e)) => {
                warn!("Probe spawn_blocking failed: {}", e);
                false
            }
            Err(_) => {
                debug!("Probe of \"{}\" timed out after {:?}", url, self.timeout);
                false
            }
        }
    }
}

/// Why a candidate destination was refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    Malformed(UrlValidationError),
    NotLive,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed(e) => write!(f, "{}", e),
            Self::NotLive => write!(f, "destination did not answer 200"),
        }
    }
}

#[derive(Clone)]
pub struct LinkValidator {
    probe: Arc<dyn LivenessProbe>,
}

impl LinkValidator {
    pub fn new(probe: Arc<dyn LivenessProbe>) -> Self {
        Self { probe }
    }

    /// Syntax first; the probe is never hit for a malformed URL.
    pub async fn good_to_create(&self, link: &str) -> Result<(), Rejection> {
        validate_url(link).map_err(Rejection::Malformed)?;

        if self.probe.is_live(link).await {
            Ok(())
        } else {
            Err(Rejection::NotLive)
        }
    }
}
