//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`LG_SECTION__KEY`)

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Loading configuration
    #[serde(default)]
    pub loading: LoadingConfig,
    /// Platform configuration
    #[serde(default)]
    pub platform: PlatformConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            loading: LoadingConfig::default(),
            platform: PlatformConfig::default(),
            debug: DebugConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`LG_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        // Load default config (required)
        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        // Load user config (optional)
        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // Environment variables override everything
        // LG_LOADING__MANIFEST=assets/other.ron -> loading.manifest = "assets/other.ron"
        figment = figment.merge(Env::prefixed("LG_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }
}

/// Loading configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadingConfig {
    /// Path to the scenario manifest (RON)
    pub manifest: String,
    /// Delay between event-pump iterations, in milliseconds
    pub poll_interval_ms: u64,
    /// Chunk size for file reads, in bytes
    pub chunk_size: usize,
}

impl Default for LoadingConfig {
    fn default() -> Self {
        Self {
            manifest: "assets/demo.ron".to_string(),
            poll_interval_ms: 10,
            chunk_size: 64 * 1024,
        }
    }
}

/// Platform configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Treat the host as a mobile platform (keeps the interface hidden
    /// after loading)
    pub mobile: bool,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self { mobile: false }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}
