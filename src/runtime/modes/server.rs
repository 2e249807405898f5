//! Server mode
//!
//! Wires the link API into an actix-web server and starts the background
//! sweeper when enabled.

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::api::middleware::RequestIdMiddleware;
use crate::api::services::{ApiState, LinkApi, link_routes};
use crate::config::StaticConfig;
use crate::runtime::lifetime;

/// Run the HTTP server
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server(config: Arc<StaticConfig>) -> Result<()> {
    let startup = lifetime::startup::prepare_startup(&config)
        .await
        .inspect_err(|e| tracing::error!("Server startup failed: {:#}", e))?;

    let sweeper_task = if config.sweeper.enabled {
        Some(startup.sweeper.clone().spawn_background_task())
    } else {
        warn!("Sweeper disabled; expired links will not be reclaimed");
        None
    };

    if config.server.trusted_proxies.is_empty() {
        info!("No trusted proxies configured; sourceIp is the TCP peer address");
    } else {
        warn!(
            "Honouring X-Forwarded-For from trusted proxies: {:?}",
            config.server.trusted_proxies
        );
    }

    let state = web::Data::new(ApiState::new(
        startup.link_service.clone(),
        config.site.clone(),
        config.server.trusted_proxies.clone(),
    ));

    let cpu_count = config.server.cpu_count.clamp(1, 32);
    warn!("Using {} CPU cores for the server", cpu_count);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(RequestIdMiddleware)
            .app_data(state.clone())
            .service(link_routes())
            .default_service(web::to(LinkApi::fallback))
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .client_disconnect_timeout(std::time::Duration::from_millis(1000))
    .workers(cpu_count)
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run();

    warn!("Starting server at http://{}", bind_address);

    tokio::select! {
        res = server => {
            res?;
        }
        _ = lifetime::shutdown::listen_for_shutdown(sweeper_task) => {
            warn!("Graceful shutdown complete");
        }
    }

    Ok(())
}
