use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

use crate::jobs::JobsConfig;
use crate::session::SessionConfig;
use crate::utils::get_env_with_prefix;

/// Main configuration for the dugout application
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub site: SiteConfig,
    pub logging: LoggingConfig,
    pub stats: StatsConfig,
    pub digest: DigestConfig,
    pub session: SessionConfig,
    pub jobs: JobsConfig,
    pub bootstrap: BootstrapConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Maximum request body size in bytes (default: 1MB; forms only)
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SiteConfig {
    #[serde(default = "default_site_title")]
    pub title: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_json")]
    pub json: bool,
}

/// Settings for the upstream stats API and report display.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StatsConfig {
    /// Base URL of the stats API, without a trailing slash.
    #[serde(default = "default_stats_base_url")]
    pub base_url: String,
    /// IANA timezone name used to display game times and to anchor "today".
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

/// Settings for the daily email digest.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DigestConfig {
    /// Whether the daily digest job is scheduled at startup.
    #[serde(default = "default_digest_enabled")]
    pub enabled: bool,
    /// Local hour of day (0-23) at which the digest fires.
    #[serde(default = "default_digest_hour")]
    pub hour: u32,
}

/// Startup admin account, created when no user with the address exists.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BootstrapConfig {
    #[serde(default)]
    pub admin_email: Option<String>,
    #[serde(default)]
    pub admin_password: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            site: SiteConfig::default(),
            logging: LoggingConfig::default(),
            stats: StatsConfig::default(),
            digest: DigestConfig::default(),
            session: SessionConfig::default(),
            jobs: JobsConfig::default(),
            bootstrap: BootstrapConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_size: default_max_body_size(),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: default_site_title(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: default_json(),
        }
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            base_url: default_stats_base_url(),
            timezone: default_timezone(),
        }
    }
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            enabled: default_digest_enabled(),
            hour: default_digest_hour(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_max_body_size() -> usize {
    1024 * 1024
}

fn default_site_title() -> String {
    "Daily MLB Report".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_json() -> bool {
    false
}

fn default_stats_base_url() -> String {
    "https://statsapi.mlb.com/api".to_string()
}

fn default_timezone() -> String {
    "America/New_York".to_string()
}

fn default_digest_enabled() -> bool {
    true
}

fn default_digest_hour() -> u32 {
    6
}

impl ServerConfig {
    pub fn addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

impl StatsConfig {
    /// Parsed display timezone. `build()` guarantees this succeeds for
    /// validated configs.
    pub fn tz(&self) -> Option<chrono_tz::Tz> {
        self.timezone.parse().ok()
    }
}

/// Builder for Config with environment variable support
#[must_use = "builder does nothing until you call build()"]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.config.server.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.config.server.port = port;
        self
    }

    pub fn with_site_title(mut self, title: impl Into<String>) -> Self {
        self.config.site.title = title.into();
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    pub fn with_json_logging(mut self, enabled: bool) -> Self {
        self.config.logging.json = enabled;
        self
    }

    pub fn with_stats_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.stats.base_url = base_url.into();
        self
    }

    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.config.stats.timezone = timezone.into();
        self
    }

    pub fn with_digest_enabled(mut self, enabled: bool) -> Self {
        self.config.digest.enabled = enabled;
        self
    }

    pub fn with_digest_hour(mut self, hour: u32) -> Self {
        self.config.digest.hour = hour;
        self
    }

    pub fn with_session_config(mut self, session: SessionConfig) -> Self {
        self.config.session = session;
        self
    }

    pub fn with_jobs_config(mut self, jobs: JobsConfig) -> Self {
        self.config.jobs = jobs;
        self
    }

    pub fn with_admin_bootstrap(
        mut self,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.config.bootstrap.admin_email = Some(email.into());
        self.config.bootstrap.admin_password = Some(password.into());
        self
    }

    /// Load configuration from environment variables with DUGOUT_ prefix
    pub fn from_env(mut self) -> Self {
        if let Some(host) = get_env_with_prefix("HOST") {
            self.config.server.host = host;
        }
        // Check DUGOUT_PORT first, fall back to PORT (for Railway/Heroku compatibility)
        if let Some(port) = get_env_with_prefix("PORT") {
            if let Ok(p) = port.parse() {
                self.config.server.port = p;
            }
        }
        if let Some(max_body_size) = get_env_with_prefix("MAX_BODY_SIZE") {
            if let Ok(size) = max_body_size.parse() {
                self.config.server.max_body_size = size;
            }
        }
        if let Some(title) = get_env_with_prefix("SITE_TITLE") {
            self.config.site.title = title;
        }
        if let Some(level) = get_env_with_prefix("LOG_LEVEL") {
            self.config.logging.level = level;
        }
        if let Some(json) = get_env_with_prefix("LOG_JSON") {
            self.config.logging.json = json.parse().unwrap_or(false);
        }
        if let Some(base_url) = get_env_with_prefix("STATS_BASE_URL") {
            self.config.stats.base_url = base_url;
        }
        if let Some(timezone) = get_env_with_prefix("TIMEZONE") {
            self.config.stats.timezone = timezone;
        }
        if let Some(enabled) = get_env_with_prefix("DIGEST_ENABLED") {
            self.config.digest.enabled = enabled.parse().unwrap_or(true);
        }
        if let Some(hour) = get_env_with_prefix("DIGEST_HOUR") {
            if let Ok(h) = hour.parse() {
                self.config.digest.hour = h;
            }
        }
        if let Some(email) = get_env_with_prefix("ADMIN_EMAIL") {
            self.config.bootstrap.admin_email = Some(email);
        }
        if let Some(password) = get_env_with_prefix("ADMIN_PASSWORD") {
            self.config.bootstrap.admin_password = Some(password);
        }

        // Load session config
        self.config.session = SessionConfig::from_env();

        // Load jobs config
        self.config.jobs = JobsConfig::from_env();

        self
    }

    /// Build the configuration, validating all settings
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration is invalid:
    /// - Invalid server address (host:port)
    /// - Invalid log level
    /// - Unknown display timezone
    /// - Digest hour outside 0-23
    /// - Other configuration validation failures
    pub fn build(self) -> crate::error::Result<Config> {
        // Validate server address
        self.config.server.addr().map_err(|e| {
            crate::error::DugoutError::config(format!(
                "Invalid server address {}:{} - {}",
                self.config.server.host, self.config.server.port, e
            ))
        })?;

        if self.config.server.port == 0 {
            return Err(crate::error::DugoutError::config(
                "Server port must be greater than 0",
            ));
        }

        if self.config.server.max_body_size == 0 {
            return Err(crate::error::DugoutError::config(
                "Maximum body size must be greater than 0",
            ));
        }

        // Validate log level
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.config.logging.level.to_lowercase().as_str()) {
            return Err(crate::error::DugoutError::config(format!(
                "Invalid log level: {}. Must be one of: {}",
                self.config.logging.level,
                valid_log_levels.join(", ")
            )));
        }

        // Validate display timezone
        if self.config.stats.tz().is_none() {
            return Err(crate::error::DugoutError::config(format!(
                "Unknown timezone: {}",
                self.config.stats.timezone
            )));
        }

        if self.config.digest.hour > 23 {
            return Err(crate::error::DugoutError::config(format!(
                "Digest hour must be 0-23, got {}",
                self.config.digest.hour
            )));
        }

        // Bootstrap admin needs both halves or neither
        if self.config.bootstrap.admin_email.is_some()
            != self.config.bootstrap.admin_password.is_some()
        {
            return Err(crate::error::DugoutError::config(
                "Admin bootstrap requires both ADMIN_EMAIL and ADMIN_PASSWORD",
            ));
        }

        if self.config.session.default_ttl_seconds == 0 {
            return Err(crate::error::DugoutError::config(
                "Session TTL must be greater than 0",
            ));
        }

        if self.config.jobs.worker_count == 0 {
            return Err(crate::error::DugoutError::config(
                "Job worker count must be greater than 0",
            ));
        }

        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ============ Default tests ============

    #[test]
    fn test_default_config_builds() {
        let config = ConfigBuilder::new().build().unwrap();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.stats.base_url, "https://statsapi.mlb.com/api");
        assert_eq!(config.stats.timezone, "America/New_York");
        assert_eq!(config.digest.hour, 6);
        assert!(config.digest.enabled);
        assert_eq!(config.jobs.worker_count, 1);
        assert_eq!(config.jobs.max_retries, 0);
    }

    #[test]
    fn test_default_timezone_parses() {
        let config = Config::default();
        assert_eq!(config.stats.tz(), Some(chrono_tz::America::New_York));
    }

    // ============ Builder tests ============

    #[test]
    fn test_builder_overrides() {
        let config = ConfigBuilder::new()
            .with_host("127.0.0.1")
            .with_port(9000)
            .with_site_title("Clubhouse Report")
            .with_digest_hour(7)
            .with_timezone("America/Chicago")
            .build()
            .unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.site.title, "Clubhouse Report");
        assert_eq!(config.digest.hour, 7);
        assert_eq!(config.stats.tz(), Some(chrono_tz::America::Chicago));
    }

    #[test]
    fn test_builder_admin_bootstrap() {
        let config = ConfigBuilder::new()
            .with_admin_bootstrap("admin@example.com", "opening-day")
            .build()
            .unwrap();

        assert_eq!(
            config.bootstrap.admin_email.as_deref(),
            Some("admin@example.com")
        );
        assert_eq!(
            config.bootstrap.admin_password.as_deref(),
            Some("opening-day")
        );
    }

    // ============ Validation tests ============

    #[test]
    fn test_invalid_host_rejected() {
        let result = ConfigBuilder::new().with_host("not a host").build();
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let result = ConfigBuilder::new().with_log_level("verbose").build();
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_timezone_rejected() {
        let result = ConfigBuilder::new().with_timezone("Mars/Olympus_Mons").build();
        assert!(result.is_err());
    }

    #[test]
    fn test_digest_hour_out_of_range_rejected() {
        let result = ConfigBuilder::new().with_digest_hour(24).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_half_configured_bootstrap_rejected() {
        let mut builder = ConfigBuilder::new();
        builder.config.bootstrap.admin_email = Some("admin@example.com".to_string());
        let result = builder.build();
        assert!(result.is_err());
    }
}
