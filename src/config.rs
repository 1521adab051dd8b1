use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::core::scoring::MatchThresholds;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub extractor: ExtractorSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
    /// Maximum JSON body size in bytes (two photos per request)
    #[serde(default = "default_json_limit")]
    pub json_limit_bytes: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
            json_limit_bytes: default_json_limit(),
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8000 }
fn default_json_limit() -> usize { 16 * 1024 * 1024 }

/// Embedding backend connection
///
/// An empty or missing endpoint is allowed: the service still starts and
/// answers match requests with 503 until one is configured.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtractorSettings {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl ExtractorSettings {
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_max_distance")]
    pub max_distance: f64,
    #[serde(default = "default_min_similarity")]
    pub min_similarity: f64,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            max_distance: default_max_distance(),
            min_similarity: default_min_similarity(),
        }
    }
}

impl MatchingSettings {
    pub fn thresholds(&self) -> MatchThresholds {
        MatchThresholds {
            max_distance: self.max_distance,
            min_similarity: self.min_similarity,
        }
    }
}

fn default_max_distance() -> f64 { 0.6 }
fn default_min_similarity() -> f64 { 0.45 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with FACEMATCH__)
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., FACEMATCH__EXTRACTOR__ENDPOINT -> extractor.endpoint
            .add_source(environment())
            .build()?
            .try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?
            .try_deserialize()
    }
}

fn environment() -> Environment {
    Environment::with_prefix("FACEMATCH")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(source: &str) -> Settings {
        Config::builder()
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults_from_empty_file() {
        let settings = from_toml("");

        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.server.port, 8000);
        assert_eq!(settings.server.json_limit_bytes, 16 * 1024 * 1024);
        assert!(settings.extractor.endpoint().is_none());
        assert_eq!(settings.matching.thresholds(), MatchThresholds::default());
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
    }

    #[test]
    fn test_extractor_section() {
        let settings = from_toml(
            r#"
            [extractor]
            endpoint = "http://localhost:9000"
            timeout_secs = 10

            [matching]
            max_distance = 0.5
            "#,
        );

        assert_eq!(settings.extractor.endpoint(), Some("http://localhost:9000"));
        assert_eq!(settings.extractor.timeout(), Some(Duration::from_secs(10)));
        assert_eq!(settings.matching.max_distance, 0.5);
        assert_eq!(settings.matching.min_similarity, 0.45);
    }

    #[test]
    fn test_blank_endpoint_counts_as_missing() {
        let settings = ExtractorSettings {
            endpoint: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(settings.endpoint().is_none());
    }
}
