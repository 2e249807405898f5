use std::sync::{Arc, OnceLock};

use super::StaticConfig;

static CONFIG: OnceLock<Arc<StaticConfig>> = OnceLock::new();

/// Initialize the global configuration
///
/// Loads `path` (or "config.toml" in the current directory) plus `SL__*`
/// environment overrides. A missing file falls back to in-memory defaults.
/// Later calls keep the first configuration.
///
/// # Examples
/// ```no_run
/// use snaplink::config::init_config;
/// init_config(None);
/// ```
pub fn init_config(path: Option<&str>) -> Arc<StaticConfig> {
    CONFIG
        .get_or_init(|| Arc::new(StaticConfig::load(path)))
        .clone()
}
