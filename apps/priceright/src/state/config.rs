//! # Application Configuration
//!
//! Loaded once at startup, read-only afterwards.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     PRICERIGHT_DB_PATH=/tmp/pr.db                                      │
//! │     PRICERIGHT_APP_URL=https://shop.example                            │
//! │     PRICERIGHT_ADVISOR_URL / PRICERIGHT_CHECKOUT_URL                   │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     PRICERIGHT_CONFIG, or the platform config dir:                     │
//! │     ~/.config/priceright/priceright.toml (Linux)                       │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     app url http://localhost:9002, no collaborators                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [database]
//! path = "/var/lib/priceright/priceright.db"
//!
//! [app]
//! url = "https://shop.example"
//!
//! [collaborators]
//! advisor_url = "http://localhost:3400/estimateProfitMargin"
//! checkout_url = "http://localhost:3401/checkout"
//! timeout_secs = 30
//! ```

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::error::{AppError, AppResult};

const CONFIG_FILE_NAME: &str = "priceright.toml";
const DATABASE_FILE_NAME: &str = "priceright.db";

// =============================================================================
// Sections
// =============================================================================

/// Where state is stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// Explicit database file. Default: platform data dir.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// The app's public origin, used for checkout return URLs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_url")]
    pub url: String,
}

fn default_app_url() -> String {
    "http://localhost:9002".to_string()
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            url: default_app_url(),
        }
    }
}

/// External collaborator endpoints. Absent means unavailable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollaboratorSettings {
    #[serde(default)]
    pub advisor_url: Option<String>,

    #[serde(default)]
    pub checkout_url: Option<String>,

    /// Per-request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_timeout() -> u64 {
    30
}

impl Default for CollaboratorSettings {
    fn default() -> Self {
        CollaboratorSettings {
            advisor_url: None,
            checkout_url: None,
            timeout_secs: default_timeout(),
        }
    }
}

// =============================================================================
// AppConfig
// =============================================================================

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub app: AppSettings,

    #[serde(default)]
    pub collaborators: CollaboratorSettings,
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config_path`, else `PRICERIGHT_CONFIG`, else platform dir)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        let path = config_path
            .or_else(|| std::env::var("PRICERIGHT_CONFIG").ok().map(PathBuf::from))
            .or_else(Self::default_config_path);

        if let Some(path) = path {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> AppResult<()> {
        check_http_url("app.url", &self.app.url)?;

        if let Some(ref url) = self.collaborators.advisor_url {
            check_http_url("collaborators.advisor_url", url)?;
        }
        if let Some(ref url) = self.collaborators.checkout_url {
            check_http_url("collaborators.checkout_url", url)?;
        }

        if self.collaborators.timeout_secs == 0 {
            return Err(AppError::Config(
                "collaborators.timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("PRICERIGHT_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = Some(PathBuf::from(path));
        }

        if let Ok(url) = std::env::var("PRICERIGHT_APP_URL") {
            debug!(url = %url, "Overriding app url from environment");
            self.app.url = url;
        }

        if let Ok(url) = std::env::var("PRICERIGHT_ADVISOR_URL") {
            self.collaborators.advisor_url = Some(url);
        }

        if let Ok(url) = std::env::var("PRICERIGHT_CHECKOUT_URL") {
            self.collaborators.checkout_url = Some(url);
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Resolves the database file, creating its directory if needed.
    ///
    /// ## Platform-Specific Defaults
    /// - **macOS**: `~/Library/Application Support/com.priceright.app/priceright.db`
    /// - **Windows**: `%APPDATA%\priceright\app\data\priceright.db`
    /// - **Linux**: `~/.local/share/priceright/priceright.db`
    pub fn database_path(&self) -> AppResult<PathBuf> {
        let path = match &self.database.path {
            Some(path) => path.clone(),
            None => project_dirs()
                .ok_or_else(|| AppError::Config("Could not determine app data directory".into()))?
                .data_dir()
                .join(DATABASE_FILE_NAME),
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        Ok(path)
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "priceright", "app")
}

fn check_http_url(name: &str, url: &str) -> AppResult<()> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(AppError::Config(format!(
            "{} must start with http:// or https://, got: {}",
            name, url
        )))
    }
}
