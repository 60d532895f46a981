//! Agent configuration
//!
//! Parses the agent's YAML file and layers environment variables on top.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};

/// Connection settings for the Home Assistant REST API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HomeAssistantConfig {
    /// Base URL of the instance, without the `/api` suffix
    pub url: String,
    /// Long-lived access token sent as a bearer token
    pub token: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for HomeAssistantConfig {
    fn default() -> Self {
        Self {
            url: "http://supervisor/core".to_string(),
            token: None,
            timeout_secs: 30,
        }
    }
}

/// Listen address of the agent's own HTTP API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8099,
        }
    }
}

impl ServerConfig {
    /// Address in `host:port` form, ready for `TcpListener::bind`
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Commit logging of configuration changes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitConfig {
    pub enabled: bool,
    /// Working tree the commits are recorded in
    pub repo_path: PathBuf,
    pub author_name: Option<String>,
    pub author_email: Option<String>,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            repo_path: PathBuf::from("/config"),
            author_name: None,
            author_email: None,
        }
    }
}

/// Full agent configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub home_assistant: HomeAssistantConfig,
    pub server: ServerConfig,
    pub git: GitConfig,
    /// Default tracing filter when `RUST_LOG` is not set
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            home_assistant: HomeAssistantConfig::default(),
            server: ServerConfig::default(),
            git: GitConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl AgentConfig {
    /// Load configuration from an optional file, then apply the process
    /// environment.
    ///
    /// Without a path the agent runs on defaults plus environment. A path
    /// that was given but cannot be read is an error.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a YAML config file
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config = Self::parse(&content, path)?;
        debug!("Loaded agent config from {:?}", path);
        Ok(config)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        Self::parse(content, Path::new("<string>"))
    }

    fn parse(content: &str, origin: &Path) -> ConfigResult<Self> {
        // An empty document deserialises to null, not to an empty mapping
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| ConfigError::ParseYaml {
            path: origin.to_path_buf(),
            source: e,
        })
    }

    /// Override settings from environment variables looked up through `var`.
    /// Variables set to an empty string count as unset.
    pub fn apply_env<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(url) = var("HA_URL") {
            self.home_assistant.url = url;
        }
        if let Some(token) = var("HA_TOKEN").or_else(|| var("SUPERVISOR_TOKEN")) {
            self.home_assistant.token = Some(token);
        }
        if let Some(timeout) = var("HA_TIMEOUT_SECS") {
            self.home_assistant.timeout_secs = parse_env("HA_TIMEOUT_SECS", &timeout)?;
        }
        if let Some(host) = var("AGENT_HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("AGENT_PORT") {
            self.server.port = parse_env("AGENT_PORT", &port)?;
        }
        if let Some(enabled) = var("GIT_ENABLED") {
            self.git.enabled = parse_bool("GIT_ENABLED", &enabled)?;
        }
        if let Some(path) = var("GIT_REPO_PATH") {
            self.git.repo_path = PathBuf::from(path);
        }
        if let Some(level) = var("LOG_LEVEL") {
            self.log_level = level;
        }
        Ok(())
    }

    /// Check values that serde cannot reject on its own
    pub fn validate(&self) -> ConfigResult<()> {
        let url = &self.home_assistant.url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::ValidationFailed {
                message: format!("home_assistant.url must be an http(s) URL, got '{}'", url),
            });
        }
        if self.home_assistant.timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed {
                message: "home_assistant.timeout_secs must be greater than 0".to_string(),
            });
        }
        if self.server.port == 0 {
            return Err(ConfigError::ValidationFailed {
                message: "server.port must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> ConfigResult<T>
where
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

fn parse_bool(key: &str, value: &str) -> ConfigResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            reason: format!("expected a boolean, got '{}'", other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = AgentConfig::default();
        assert_eq!(config.home_assistant.url, "http://supervisor/core");
        assert_eq!(config.home_assistant.timeout_secs, 30);
        assert_eq!(config.server.bind_addr(), "0.0.0.0:8099");
        assert!(!config.git.enabled);
        assert_eq!(config.log_level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_from_yaml() {
        let config = AgentConfig::from_yaml_str(
            r#"
home_assistant:
  url: http://homeassistant.local:8123
  token: abc123
server:
  port: 9000
git:
  enabled: true
  repo_path: /tmp/ha-config
  author_name: Agent
"#,
        )
        .unwrap();

        assert_eq!(config.home_assistant.url, "http://homeassistant.local:8123");
        assert_eq!(config.home_assistant.token.as_deref(), Some("abc123"));
        // Unset keys inside a present section keep their defaults
        assert_eq!(config.home_assistant.timeout_secs, 30);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert!(config.git.enabled);
        assert_eq!(config.git.repo_path, PathBuf::from("/tmp/ha-config"));
        assert_eq!(config.git.author_name.as_deref(), Some("Agent"));
        assert_eq!(config.git.author_email, None);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config = AgentConfig::from_yaml_str("  \n").unwrap();
        assert_eq!(config.server.port, 8099);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AgentConfig::default();
        config
            .apply_env(env(&[
                ("HA_URL", "https://ha.example.com"),
                ("SUPERVISOR_TOKEN", "supervisor"),
                ("AGENT_PORT", "8100"),
                ("GIT_ENABLED", "yes"),
                ("GIT_REPO_PATH", "/srv/config"),
                ("LOG_LEVEL", "debug"),
            ]))
            .unwrap();

        assert_eq!(config.home_assistant.url, "https://ha.example.com");
        assert_eq!(config.home_assistant.token.as_deref(), Some("supervisor"));
        assert_eq!(config.server.port, 8100);
        assert!(config.git.enabled);
        assert_eq!(config.git.repo_path, PathBuf::from("/srv/config"));
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_ha_token_wins_over_supervisor_token() {
        let mut config = AgentConfig::default();
        config
            .apply_env(env(&[("HA_TOKEN", "user"), ("SUPERVISOR_TOKEN", "supervisor")]))
            .unwrap();
        assert_eq!(config.home_assistant.token.as_deref(), Some("user"));
    }

    #[test]
    fn test_empty_ha_token_falls_back_to_supervisor_token() {
        let mut config = AgentConfig::default();
        config
            .apply_env(env(&[("HA_TOKEN", ""), ("SUPERVISOR_TOKEN", "supervisor")]))
            .unwrap();
        assert_eq!(config.home_assistant.token.as_deref(), Some("supervisor"));
    }

    #[test]
    fn test_empty_env_values_are_ignored() {
        let mut config = AgentConfig::from_yaml_str("git:\n  enabled: true").unwrap();
        config
            .apply_env(env(&[("HA_URL", " "), ("GIT_ENABLED", ""), ("AGENT_PORT", "")]))
            .unwrap();
        assert_eq!(config.home_assistant.url, "http://supervisor/core");
        assert!(config.git.enabled);
        assert_eq!(config.server.port, 8099);
        assert_eq!(config.home_assistant.token, None);
    }

    #[test]
    fn test_invalid_env_values() {
        let mut config = AgentConfig::default();
        let err = config.apply_env(env(&[("AGENT_PORT", "http")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "AGENT_PORT"));

        let err = config
            .apply_env(env(&[("GIT_ENABLED", "maybe")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "GIT_ENABLED"));
    }

    #[test]
    fn test_validate() {
        let mut config = AgentConfig::default();
        config.home_assistant.url = "homeassistant:8123".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationFailed { .. })
        ));

        let mut config = AgentConfig::default();
        config.server.port = 0;
        assert!(config.validate().is_err());

        let mut config = AgentConfig::default();
        config.home_assistant.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "log_level: warn\nserver:\n  host: 127.0.0.1").unwrap();

        let config = AgentConfig::from_file(file.path()).unwrap();
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.server.bind_addr(), "127.0.0.1:8099");
    }

    #[test]
    fn test_from_file_bad_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "server: [unclosed").unwrap();

        let err = AgentConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseYaml { .. }));
    }

    #[test]
    fn test_from_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let config = AgentConfig::from_file(&dir.path().join("missing.yaml"));
        assert!(matches!(config, Err(ConfigError::ReadFile { .. })));
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agent.yaml");
        let err = AgentConfig::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { path: ref p, .. } if p == &path));
    }
}
