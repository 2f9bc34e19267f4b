/*
[INPUT]:  Optional YAML configuration file
[OUTPUT]: Parsed CLI configuration and the adapter ClientConfig built from it
[POS]:    Configuration layer - client setup
[UPDATE]: When adding new configuration options
*/

use std::path::Path;
use std::time::Duration;

use allcash_adapter::{ClientConfig, DEFAULT_BASE_URL};
use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Settings the `allcash` binary needs to build a client
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CliConfig {
    /// API key; `--api-key` / `ALLCASH_API_KEY` take precedence
    #[serde(default)]
    pub api_key: Option<String>,
    /// Demo (paper trading) account
    #[serde(default = "default_demo_mode")]
    pub demo_mode: bool,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            demo_mode: default_demo_mode(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

fn default_demo_mode() -> bool {
    true
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

impl CliConfig {
    /// Load configuration from YAML file
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content).context("parse config yaml")?;
        Ok(config)
    }

    /// Load the file when given, defaults otherwise
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_demo_against_official_host() {
        let config = CliConfig::default();
        assert!(config.demo_mode);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.api_key.is_none());

        let client_config = config.client_config();
        assert_eq!(client_config.timeout, Duration::from_secs(30));
        assert_eq!(client_config.connect_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_from_file_fills_missing_fields() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "api_key: \"Bearer abc\"\ndemo_mode: false\ntimeout_secs: 5").expect("write");

        let config = CliConfig::from_file(file.path()).expect("load config");
        assert_eq!(config.api_key.as_deref(), Some("Bearer abc"));
        assert!(!config.demo_mode);
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.connect_timeout_secs, 10);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_load_without_path_uses_defaults() {
        let config = CliConfig::load(None).expect("defaults");
        assert_eq!(config, CliConfig::default());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = CliConfig::from_file(Path::new("/definitely/not/here.yaml"))
            .expect_err("should fail");
        assert!(err.to_string().contains("read config file"));
    }
}
