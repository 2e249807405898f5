use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::config::StaticConfig;
use crate::services::{
    AntiEntropySweeper, HttpProber, LinkService, LinkValidator, SweepSettings,
};
use crate::storage::{LinkStore, StorageFactory};

pub struct StartupContext {
    pub store: Arc<dyn LinkStore>,
    pub link_service: Arc<LinkService>,
    pub sweeper: Arc<AntiEntropySweeper>,
}

/// 准备启动上下文：存储、校验器、链接服务与清理任务
///
/// Every component receives its configuration here; nothing below this
/// point reads the global config.
pub async fn prepare_startup(config: &StaticConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let store = StorageFactory::create(config)
        .await
        .context("Failed to create link store")?;
    info!("Using link store backend: {}", store.backend_name());

    let prober = Arc::new(HttpProber::new(&config.probe));
    debug!(
        "Liveness probe timeout: {} ms",
        config.probe.timeout_ms
    );

    let link_service = Arc::new(LinkService::new(
        store.clone(),
        LinkValidator::new(prober),
        config.links.clone(),
    ));

    let sweeper = Arc::new(AntiEntropySweeper::new(
        store.clone(),
        SweepSettings::from_config(&config.sweeper, &config.store),
    ));

    debug!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );

    Ok(StartupContext {
        store,
        link_service,
        sweeper,
    })
}
