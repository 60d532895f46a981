//! Configuration for the helper agent
//!
//! Settings come from an optional YAML file, then environment variables
//! override individual keys:
//!
//! - `HA_URL`, `HA_TOKEN` (falls back to `SUPERVISOR_TOKEN`), `HA_TIMEOUT_SECS`
//! - `AGENT_HOST`, `AGENT_PORT`
//! - `GIT_ENABLED`, `GIT_REPO_PATH`
//! - `LOG_LEVEL`
//!
//! # Example
//!
//! ```ignore
//! use ha_config::AgentConfig;
//!
//! let config = AgentConfig::load(Some(Path::new("/data/agent.yaml")))?;
//! config.validate()?;
//! ```

mod agent_config;
mod error;

pub use agent_config::{AgentConfig, GitConfig, HomeAssistantConfig, ServerConfig};
pub use error::{ConfigError, ConfigResult};
