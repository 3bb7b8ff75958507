//! Configuration management
//!
//! Settings load from three layers:
//! 1. Environment variables (highest priority)
//! 2. Configuration file (TOML format)
//! 3. Default values (lowest priority)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Main configuration struct for the relay service
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GantryConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Tool inventory configuration
    #[serde(default)]
    pub tools: ToolsConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
}

/// Tool inventory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Directory holding one tool binary per version, plus `latest`
    pub dir: PathBuf,
    /// Log commands instead of executing them
    pub dry_run: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Directory for log files; `None` disables file logging
    pub log_dir: Option<PathBuf>,
    /// Emit file logs as JSON
    pub json_format: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8070,
        }
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("/opt/gantry/tools"),
            dry_run: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: None,
            json_format: true,
        }
    }
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    FileRead(PathBuf, String),

    #[error("Failed to parse config: {0}")]
    Parse(String),
}

impl GantryConfig {
    /// Load configuration from environment variables and optional config file
    pub fn load() -> Self {
        let mut config = Self::default();

        if let Some(config_path) = Self::find_config_file() {
            if let Ok(file_config) = Self::load_from_file(&config_path) {
                config = file_config;
            }
        }

        config.apply_env_overrides();
        config
    }

    /// Load configuration from a specific file path
    pub fn load_from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.clone(), e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let paths = [
            std::env::var("GANTRY_CONFIG").ok().map(PathBuf::from),
            Some(PathBuf::from("/etc/gantry/config.toml")),
            Some(PathBuf::from("./gantry.toml")),
        ];

        paths.into_iter().flatten().find(|p| p.exists())
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("GANTRY_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("GANTRY_PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Ok(dir) = std::env::var("GANTRY_TOOL_DIR") {
            self.tools.dir = PathBuf::from(dir);
        }
        if let Ok(dry_run) = std::env::var("GANTRY_DRY_RUN") {
            self.tools.dry_run = dry_run == "1" || dry_run.eq_ignore_ascii_case("true");
        }
        if let Ok(level) = std::env::var("GANTRY_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(dir) = std::env::var("GANTRY_LOG_DIR") {
            self.logging.log_dir = Some(PathBuf::from(dir));
        }
    }

    /// Socket address string for the HTTP listener
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GantryConfig::default();
        assert_eq!(config.server.port, 8070);
        assert_eq!(config.tools.dir, PathBuf::from("/opt/gantry/tools"));
        assert!(!config.tools.dry_run);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gantry.toml");
        std::fs::write(
            &path,
            r#"
[server]
host = "127.0.0.1"
port = 9000

[tools]
dir = "/srv/tools"
dry_run = true
"#,
        )
        .unwrap();

        let config = GantryConfig::load_from_file(&path).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.tools.dir, PathBuf::from("/srv/tools"));
        assert!(config.tools.dry_run);
        // Missing sections fall back to defaults
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gantry.toml");
        std::fs::write(&path, "not [valid toml").unwrap();
        assert!(matches!(
            GantryConfig::load_from_file(&path),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_listen_addr() {
        let config = GantryConfig::default();
        assert_eq!(config.listen_addr(), "0.0.0.0:8070");
    }
}
