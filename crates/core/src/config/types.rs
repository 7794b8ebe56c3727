use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub brickset: BricksetConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
}

/// Brickset API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BricksetConfig {
    /// Brickset API key (required)
    pub api_key: String,
    /// Account username; without it sets are fetched anonymously
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Account password
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// SOAP endpoint URL
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

impl Default for BricksetConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            username: None,
            password: None,
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "https://brickset.com/api/v3.asmx".to_string()
}

fn default_timeout() -> u32 {
    30
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("lego_sets.db")
}

/// Ingestion loop configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IngestConfig {
    /// Text file listing the themes to fetch
    #[serde(default = "default_themes_file")]
    pub themes_file: PathBuf,
    /// Sets requested per page (Brickset caps this at 500)
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Pause before each additional page of a theme, in milliseconds
    #[serde(default = "default_page_delay_ms")]
    pub page_delay_ms: u64,
    /// Pause after each theme, in milliseconds
    #[serde(default = "default_theme_delay_ms")]
    pub theme_delay_ms: u64,
    /// Only process the first N themes of the list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_themes: Option<usize>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            themes_file: default_themes_file(),
            page_size: default_page_size(),
            page_delay_ms: default_page_delay_ms(),
            theme_delay_ms: default_theme_delay_ms(),
            max_themes: None,
        }
    }
}

impl IngestConfig {
    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }

    pub fn theme_delay(&self) -> Duration {
        Duration::from_millis(self.theme_delay_ms)
    }
}

fn default_themes_file() -> PathBuf {
    PathBuf::from("lego_themes.txt")
}

fn default_page_size() -> u32 {
    500
}

fn default_page_delay_ms() -> u64 {
    500
}

fn default_theme_delay_ms() -> u64 {
    300
}

/// Sanitized config for logging (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub brickset: SanitizedBricksetConfig,
    pub database: DatabaseConfig,
    pub ingest: IngestConfig,
}

/// Sanitized Brickset config (API key and password hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedBricksetConfig {
    pub base_url: String,
    pub api_key_configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub password_configured: bool,
    pub timeout_secs: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            brickset: SanitizedBricksetConfig {
                base_url: config.brickset.base_url.clone(),
                api_key_configured: !config.brickset.api_key.is_empty(),
                username: config.brickset.username.clone(),
                password_configured: config
                    .brickset
                    .password
                    .as_ref()
                    .is_some_and(|p| !p.is_empty()),
                timeout_secs: config.brickset.timeout_secs,
            },
            database: config.database.clone(),
            ingest: config.ingest.clone(),
        }
    }
}
