//! Configuration management for sectorfinder
//!
//! All configuration is loaded from `./config/sectorfinder.toml`.
//! No hardcoded defaults exist in source code - all defaults are in the config template.

use serde::Deserialize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration file path relative to working directory
pub const CONFIG_PATH: &str = "./config/sectorfinder.toml";

/// Default configuration file content - this is the ONLY place defaults exist
pub const DEFAULT_CONFIG: &str = include_str!("../config/sectorfinder.toml");

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found at {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] io::Error),

    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid URL in '{field}': {url}")]
    InvalidUrl { field: String, url: String },

    #[error("Configuration field '{field}' cannot be empty")]
    EmptyRequired { field: String },
}

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub endpoints: EndpointsConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub data: DataConfig,
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub user_agent: String,
    pub request_timeout_secs: u64,
}

/// External collaborator endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct EndpointsConfig {
    pub registry_url: String,
    pub search_url: String,
    pub ai_url: String,
    /// Name of the environment variable holding the AI API key
    #[serde(default = "default_ai_key_env")]
    pub ai_key_env: String,
}

fn default_ai_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

/// Input normalization configuration
#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    /// Local ISP mail domains filtered in addition to the built-in global providers
    #[serde(default = "default_personal_email_domains")]
    pub personal_email_domains: Vec<String>,
}

fn default_personal_email_domains() -> Vec<String> {
    vec!["wanadoo".to_string(), "laposte".to_string()]
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            personal_email_domains: default_personal_email_domains(),
        }
    }
}

/// Rate limiting configuration. 0 = unlimited.
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_batch_items_per_minute")]
    pub batch_items_per_minute: u32,
    #[serde(default = "default_ai_requests_per_minute")]
    pub ai_requests_per_minute: u32,
}

fn default_batch_items_per_minute() -> u32 {
    60
}

fn default_ai_requests_per_minute() -> u32 {
    15
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            batch_items_per_minute: default_batch_items_per_minute(),
            ai_requests_per_minute: default_ai_requests_per_minute(),
        }
    }
}

/// Durable data locations
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: default_data_dir(),
        }
    }
}

impl DataConfig {
    /// Path to the persisted user-correction map
    pub fn corrections_path(&self) -> PathBuf {
        self.dir.join("corrections.json")
    }

    /// Path to the persisted custom sector list
    pub fn custom_sectors_path(&self) -> PathBuf {
        self.dir.join("custom_sectors.json")
    }
}

impl AppConfig {
    /// Load configuration from the default path
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path(Path::new(CONFIG_PATH))
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse the embedded default configuration. Used when no config file
    /// exists and the caller does not want the interactive prompt.
    pub fn builtin() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("embedded default config must parse")
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.user_agent.is_empty() {
            return Err(ConfigError::EmptyRequired {
                field: "http.user_agent".to_string(),
            });
        }
        if self.http.request_timeout_secs == 0 {
            return Err(ConfigError::EmptyRequired {
                field: "http.request_timeout_secs".to_string(),
            });
        }

        for (field, url) in [
            ("endpoints.registry_url", &self.endpoints.registry_url),
            ("endpoints.search_url", &self.endpoints.search_url),
            ("endpoints.ai_url", &self.endpoints.ai_url),
        ] {
            if !url.starts_with("https://") && !url.starts_with("http://") {
                return Err(ConfigError::InvalidUrl {
                    field: field.to_string(),
                    url: url.clone(),
                });
            }
        }

        if self.endpoints.ai_key_env.is_empty() {
            return Err(ConfigError::EmptyRequired {
                field: "endpoints.ai_key_env".to_string(),
            });
        }

        Ok(())
    }

    /// Create default configuration file at the standard location
    pub fn create_default_config() -> Result<PathBuf, ConfigError> {
        let path = Path::new(CONFIG_PATH);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = fs::File::create(path)?;
        file.write_all(DEFAULT_CONFIG.as_bytes())?;

        Ok(path.to_path_buf())
    }

    /// Check if stdin is a TTY (interactive terminal)
    pub fn is_interactive() -> bool {
        atty::is(atty::Stream::Stdin)
    }

    /// Prompt user to create default config (only in interactive mode)
    pub fn prompt_create_config() -> Result<Option<PathBuf>, ConfigError> {
        if !Self::is_interactive() {
            return Ok(None);
        }

        print!("Configuration file not found. Create default config? [Y/n] ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let input = input.trim().to_lowercase();

        if input.is_empty() || input == "y" || input == "yes" {
            let path = Self::create_default_config()?;
            Ok(Some(path))
        } else {
            Ok(None)
        }
    }
}
