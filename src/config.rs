//! Configuration management for Studio
//!
//! This module handles loading, validating, and managing configuration
//! for the content studio: where history is persisted, how the remote
//! content service is reached, per-tool history bounds and logging.

use crate::error::{Error, Result};
use crate::tools::ToolKind;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = ".studio.json";

/// Default content service URL
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Environment variable overriding `backend.base_url`
pub const BACKEND_URL_ENV: &str = "STUDIO_BACKEND_URL";

/// Main configuration structure for Studio
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Persistence surface settings
    pub storage: StorageConfig,

    /// Remote content service settings
    pub backend: BackendConfig,

    /// Per-tool history bounds
    pub history: HistoryConfig,

    /// Chat behaviour
    pub chat: ChatConfig,

    /// Export settings
    pub export: ExportConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Which key-value surface backs the history stores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    File,
    Sqlite,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,

    /// Directory holding the JSON files or the SQLite database
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the content service
    pub base_url: String,

    /// Whole-request timeout in seconds
    pub timeout_secs: u64,

    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
}

/// How new record ids are minted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdFormat {
    Timestamp,
    Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub summarizer_max: usize,
    pub ideas_max: usize,
    pub refiner_max: usize,
    pub chatbot_max: usize,
    pub id_format: IdFormat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Number of prior messages sent along with a chat message
    pub context_messages: usize,

    /// Session titles are cut to this many characters
    pub title_length: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Where exported history files are written
    pub directory: PathBuf,
}

/// Configuration for logging
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            backend: BackendConfig::default(),
            history: HistoryConfig::default(),
            chat: ChatConfig::default(),
            export: ExportConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let path = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join("studio");
        Self {
            backend: StorageBackend::File,
            path,
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
            timeout_secs: 60,
            connect_timeout_secs: 5,
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            summarizer_max: 10,
            ideas_max: 10,
            refiner_max: 10,
            chatbot_max: 20,
            id_format: IdFormat::Timestamp,
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            context_messages: 5,
            title_length: 50,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        let directory = dirs::download_dir()
            .or_else(home::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        Self { directory }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    ///
    /// A missing file yields the defaults. The backend URL environment
    /// override is applied either way.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = fs::read_to_string(path)?;
            serde_json::from_str(&content)?
        } else {
            Self::default()
        };

        if let Ok(url) = std::env::var(BACKEND_URL_ENV) {
            if !url.trim().is_empty() {
                config.backend.base_url = url;
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        self.validate()?;

        // Create parent directories if they don't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;

        Ok(())
    }

    /// Get the default configuration file path
    pub fn default_config_path() -> Result<PathBuf> {
        let home = home::home_dir().ok_or(Error::HomeDirectoryNotFound)?;
        Ok(home.join(DEFAULT_CONFIG_FILE))
    }

    /// History bound for a tool
    pub fn max_items(&self, tool: ToolKind) -> usize {
        match tool {
            ToolKind::Summarizer => self.history.summarizer_max,
            ToolKind::Ideas => self.history.ideas_max,
            ToolKind::Refiner => self.history.refiner_max,
            ToolKind::Chatbot => self.history.chatbot_max,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        for tool in ToolKind::ALL {
            if self.max_items(tool) == 0 {
                return Err(Error::config_validation(
                    format!("history.{}_max", tool.name()),
                    "must be greater than 0".to_string(),
                ));
            }
        }

        if reqwest::Url::parse(&self.backend.base_url).is_err() {
            return Err(Error::config_validation(
                "backend.base_url",
                "must be an absolute URL",
            ));
        }

        if self.backend.timeout_secs == 0 {
            return Err(Error::config_validation(
                "backend.timeout_secs",
                "must be greater than 0",
            ));
        }

        // Validate logging level
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(Error::config_validation(
                    "logging.level",
                    "must be one of: trace, debug, info, warn, error",
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.max_items(ToolKind::Summarizer), 10);
        assert_eq!(config.max_items(ToolKind::Chatbot), 20);
        assert_eq!(config.chat.context_messages, 5);
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();

        config.history.ideas_max = 0;
        assert!(config.validate().is_err());

        config.history.ideas_max = 5;
        config.backend.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        config.backend.base_url = DEFAULT_BACKEND_URL.to_string();
        config.logging.level = "invalid".to_string();
        assert!(config.validate().is_err());

        config.logging.level = "debug".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_save_load() {
        let temp_file = NamedTempFile::new().unwrap();
        let config_path = temp_file.path().to_path_buf();

        let mut config = Config::default();
        config.history.chatbot_max = 42;
        config.storage.backend = StorageBackend::Sqlite;

        config.save_to_path(&config_path).unwrap();
        let loaded = Config::load_from_path(&config_path).unwrap();

        assert_eq!(loaded.history.chatbot_max, 42);
        assert_eq!(loaded.storage.backend, StorageBackend::Sqlite);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let temp_file = NamedTempFile::new().unwrap();
        fs::write(temp_file.path(), r#"{"history": {"refiner_max": 3}}"#).unwrap();

        let loaded = Config::load_from_path(temp_file.path()).unwrap();
        assert_eq!(loaded.max_items(ToolKind::Refiner), 3);
        assert_eq!(loaded.max_items(ToolKind::Summarizer), 10);
        assert_eq!(loaded.chat.title_length, 50);
    }

    #[test]
    fn test_missing_config_file_yields_defaults() {
        let path = Path::new("/nonexistent/dir/.studio.json");
        let loaded = Config::load_from_path(path).unwrap();
        assert_eq!(loaded.max_items(ToolKind::Ideas), 10);
    }
}
