//! Service configuration, read from a YAML file.
//!
//! ```yaml
//! server:
//!   host: 0.0.0.0
//!   port: 8000
//! model:
//!   path: models/churn_pipeline.json
//!   threshold: 0.4
//!   intra_threads: 1
//! logging:
//!   level: info
//!   format: text
//! metrics:
//!   enabled: true
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::decision::DecisionThreshold;
use crate::error::ConfigError;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "CHURNSERVE_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub model: ModelConfig,
    pub logging: LoggingConfig,
    pub metrics: MetricsConfig,
}

#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            host: "127.0.0.1".to_string(),
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct ModelConfig {
    /// Serialized model artifact, read once at startup.
    pub path: PathBuf,
    pub threshold: DecisionThreshold,
    pub intra_threads: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("models/churn_pipeline.json"),
            threshold: DecisionThreshold::default(),
            intra_threads: 1,
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl AppConfig {
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = serde_yaml::from_str(content)?;
        config.check()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Path from `CHURNSERVE_CONFIG`, falling back to `config.yaml`.
    pub fn path_from_env() -> PathBuf {
        std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.model.intra_threads == 0 {
            return Err(ConfigError::Invalid(
                "model.intra_threads must be at least 1".to_string(),
            ));
        }
        if self.model.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("model.path must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_full_config() {
        let config = AppConfig::from_yaml(
            r#"
server:
  host: 0.0.0.0
  port: 9000
model:
  path: /srv/models/churn.json
  threshold: 0.35
  intra_threads: 2
logging:
  level: debug
  format: json
metrics:
  enabled: false
"#,
        )
        .unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:9000");
        assert_eq!(config.model.path, PathBuf::from("/srv/models/churn.json"));
        assert_eq!(config.model.threshold.value(), 0.35);
        assert_eq!(config.model.intra_threads, 2);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(!config.metrics.enabled);
    }

    #[test]
    fn test_defaults_fill_missing_sections() {
        let config = AppConfig::from_yaml("model:\n  path: m.json\n").unwrap();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.model.threshold.value(), 0.4);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Text);
        assert!(config.metrics.enabled);
    }

    #[test]
    fn test_threshold_out_of_range_rejected() {
        let result = AppConfig::from_yaml("model:\n  threshold: 1.4\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_zero_threads_rejected() {
        let result = AppConfig::from_yaml("model:\n  intra_threads: 0\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "server:\n  port: 8123").unwrap();
        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.server.port, 8123);
    }

    #[test]
    fn test_load_missing_file() {
        match AppConfig::load("does/not/exist.yaml") {
            Err(ConfigError::Io { path, .. }) => {
                assert_eq!(path, PathBuf::from("does/not/exist.yaml"))
            }
            other => panic!("Expected Io error, got {other:?}"),
        }
    }
}
