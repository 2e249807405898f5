use serde::{Deserialize, Serialize};

/// 静态配置（从 TOML 加载，启动时使用）
///
/// - server: 监听地址、端口、可信代理
/// - store: 存储后端选择与扫描分页
/// - database: 数据库连接与重试
/// - site: 站点根地址与 CORS 源
/// - links: 短 ID 生成策略
/// - probe: 目标 URL 存活探测
/// - sweeper: 过期链接清理任务
/// - logging: 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub links: LinksConfig,
    #[serde(default)]
    pub probe: ProbeConfig,
    #[serde(default)]
    pub sweeper: SweeperConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > config.toml > 默认值
    /// ENV 前缀：SL，分隔符：__
    /// 示例：SL__SERVER__PORT=9999
    pub fn load(path: Option<&str>) -> Self {
        use config::{Config, Environment, File};

        let path = path.unwrap_or(DEFAULT_CONFIG_PATH);

        let builder = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("SL")
                    .separator("__")
                    .try_parsing(true),
            );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<StaticConfig>() {
                Ok(config) => {
                    if std::path::Path::new(path).exists() {
                        eprintln!("[INFO] Configuration loaded from: {}", path);
                    }
                    config
                }
                Err(e) => {
                    eprintln!("[ERROR] Failed to deserialize config: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("[ERROR] Failed to build config: {}", e);
                Self::default()
            }
        }
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(
        &self,
        path: P,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_cpu_count")]
    pub cpu_count: usize,
    /// 信任其 X-Forwarded-For 的代理（IP 或 CIDR）
    #[serde(default)]
    pub trusted_proxies: Vec<String>,
}

/// Link store backend selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// "database" or "memory"
    #[serde(default = "default_store_backend")]
    pub backend: String,
    /// Records per scan page
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

/// 数据库连接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_database_pool_size")]
    pub pool_size: u32,
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
    #[serde(default = "default_retry_max_delay_ms")]
    pub retry_max_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// `GET /` redirects here
    #[serde(default = "default_site_root")]
    pub root_url: String,
    /// Fixed Access-Control-Allow-Origin value
    #[serde(default = "default_site_root")]
    pub allow_origin: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinksConfig {
    #[serde(default = "default_id_length")]
    pub id_length: usize,
    /// Fresh ids tried before giving up on a create
    #[serde(default = "default_max_create_attempts")]
    pub max_create_attempts: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    #[serde(default = "default_probe_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_probe_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweeperConfig {
    #[serde(default = "default_sweeper_enabled")]
    pub enabled: bool,
    #[serde(default = "default_ttl_days")]
    pub ttl_days: u64,
    #[serde(default = "default_interval_hours")]
    pub interval_hours: u64,
    #[serde(default = "default_initial_delay_secs")]
    pub initial_delay_secs: u64,
    /// 每页之间的暂停，限制对存储的压力
    #[serde(default = "default_page_pause_ms")]
    pub page_pause_ms: u64,
}

impl SweeperConfig {
    pub fn ttl_secs(&self) -> i64 {
        (self.ttl_days as i64).saturating_mul(24 * 60 * 60)
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

// ============================================================
// Default value functions for static config
// ============================================================

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_cpu_count() -> usize {
    num_cpus::get()
}

fn default_store_backend() -> String {
    "database".to_string()
}

fn default_page_size() -> u64 {
    100
}

fn default_database_url() -> String {
    "snaplink.db".to_string()
}

fn default_database_pool_size() -> u32 {
    10
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_base_delay_ms() -> u64 {
    100
}

fn default_retry_max_delay_ms() -> u64 {
    2000
}

fn default_site_root() -> String {
    "http://localhost:3000".to_string()
}

fn default_id_length() -> usize {
    6
}

fn default_max_create_attempts() -> u32 {
    5
}

fn default_probe_timeout_ms() -> u64 {
    3000
}

fn default_probe_user_agent() -> String {
    concat!("snaplink-probe/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_sweeper_enabled() -> bool {
    true
}

fn default_ttl_days() -> u64 {
    30
}

fn default_interval_hours() -> u64 {
    24 * 7
}

fn default_initial_delay_secs() -> u64 {
    300
}

fn default_page_pause_ms() -> u64 {
    500
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            cpu_count: default_cpu_count(),
            trusted_proxies: Vec::new(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_store_backend(),
            page_size: default_page_size(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            pool_size: default_database_pool_size(),
            retry_count: default_retry_count(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            retry_max_delay_ms: default_retry_max_delay_ms(),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            root_url: default_site_root(),
            allow_origin: default_site_root(),
        }
    }
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            id_length: default_id_length(),
            max_create_attempts: default_max_create_attempts(),
        }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_probe_timeout_ms(),
            user_agent: default_probe_user_agent(),
        }
    }
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            enabled: default_sweeper_enabled(),
            ttl_days: default_ttl_days(),
            interval_hours: default_interval_hours(),
            initial_delay_secs: default_initial_delay_secs(),
            page_pause_ms: default_page_pause_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StaticConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.store.backend, "database");
        assert_eq!(config.links.id_length, 6);
        assert_eq!(config.sweeper.ttl_days, 30);
        assert_eq!(config.sweeper.interval_hours, 168);
        assert!(config.probe.timeout_ms > 0);
    }

    #[test]
    fn test_ttl_secs() {
        let sweeper = SweeperConfig::default();
        assert_eq!(sweeper.ttl_secs(), 2_592_000);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: StaticConfig = toml::from_str(
            r#"
            [store]
            backend = "memory"

            [sweeper]
            ttl_days = 7
            "#,
        )
        .unwrap();

        assert_eq!(config.store.backend, "memory");
        assert_eq!(config.store.page_size, 100);
        assert_eq!(config.sweeper.ttl_days, 7);
        assert!(config.sweeper.enabled);
        assert_eq!(config.site.root_url, config.site.allow_origin);
    }

    #[test]
    fn test_sample_config_round_trips() {
        let sample = StaticConfig::generate_sample_config();
        let parsed: StaticConfig = toml::from_str(&sample).unwrap();
        assert_eq!(parsed.links.max_create_attempts, 5);
    }
}
