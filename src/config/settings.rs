use super::{default_state_root, ConfigError};
use crate::shared::ids::validate_identifier_value;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Fixed routing roles. Each maps to one opaque agent identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    DecisionClarifier,
    TradeOffMapper,
    BiasDetector,
    FramingAssistant,
    ContentWriter,
    ContentPublisher,
}

pub const ALL_AGENT_ROLES: [AgentRole; 6] = [
    AgentRole::DecisionClarifier,
    AgentRole::TradeOffMapper,
    AgentRole::BiasDetector,
    AgentRole::FramingAssistant,
    AgentRole::ContentWriter,
    AgentRole::ContentPublisher,
];

impl AgentRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DecisionClarifier => "decision_clarifier",
            Self::TradeOffMapper => "trade_off_mapper",
            Self::BiasDetector => "bias_detector",
            Self::FramingAssistant => "framing_assistant",
            Self::ContentWriter => "content_writer",
            Self::ContentPublisher => "content_publisher",
        }
    }
}

impl std::fmt::Display for AgentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub state_root: Option<PathBuf>,
    #[serde(default)]
    pub gateway: GatewaySettings,
    #[serde(default)]
    pub agents: AgentDirectory,
    #[serde(default)]
    pub workflow: WorkflowSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GatewaySettings {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub api_key_env: Option<String>,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key_env: None,
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl GatewaySettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Reads the bearer token from the configured environment variable, if any.
    pub fn resolve_api_key(&self) -> Option<String> {
        let name = self.api_key_env.as_deref()?;
        std::env::var(name).ok().filter(|v| !v.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AgentDirectory {
    #[serde(default = "default_decision_clarifier")]
    pub decision_clarifier: String,
    #[serde(default = "default_trade_off_mapper")]
    pub trade_off_mapper: String,
    #[serde(default = "default_bias_detector")]
    pub bias_detector: String,
    #[serde(default = "default_framing_assistant")]
    pub framing_assistant: String,
    #[serde(default = "default_content_writer")]
    pub content_writer: String,
    #[serde(default = "default_content_publisher")]
    pub content_publisher: String,
}

impl Default for AgentDirectory {
    fn default() -> Self {
        Self {
            decision_clarifier: default_decision_clarifier(),
            trade_off_mapper: default_trade_off_mapper(),
            bias_detector: default_bias_detector(),
            framing_assistant: default_framing_assistant(),
            content_writer: default_content_writer(),
            content_publisher: default_content_publisher(),
        }
    }
}

impl AgentDirectory {
    pub fn agent_id(&self, role: AgentRole) -> &str {
        match role {
            AgentRole::DecisionClarifier => &self.decision_clarifier,
            AgentRole::TradeOffMapper => &self.trade_off_mapper,
            AgentRole::BiasDetector => &self.bias_detector,
            AgentRole::FramingAssistant => &self.framing_assistant,
            AgentRole::ContentWriter => &self.content_writer,
            AgentRole::ContentPublisher => &self.content_publisher,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct WorkflowSettings {
    #[serde(default = "default_auto_advance_delay_ms")]
    pub auto_advance_delay_ms: u64,
    #[serde(default = "default_still_working_after_seconds")]
    pub still_working_after_seconds: u64,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            auto_advance_delay_ms: default_auto_advance_delay_ms(),
            still_working_after_seconds: default_still_working_after_seconds(),
        }
    }
}

impl WorkflowSettings {
    pub fn auto_advance_delay(&self) -> Duration {
        Duration::from_millis(self.auto_advance_delay_ms)
    }

    pub fn still_working_after(&self) -> Duration {
        Duration::from_secs(self.still_working_after_seconds)
    }
}

fn default_endpoint() -> String {
    "http://127.0.0.1:3000/api/agent".to_string()
}

fn default_timeout_seconds() -> u64 {
    120
}

fn default_decision_clarifier() -> String {
    "decision-clarifier".to_string()
}

fn default_trade_off_mapper() -> String {
    "trade-off-mapper".to_string()
}

fn default_bias_detector() -> String {
    "bias-detector".to_string()
}

fn default_framing_assistant() -> String {
    "framing-assistant".to_string()
}

fn default_content_writer() -> String {
    "content-writer".to_string()
}

fn default_content_publisher() -> String {
    "content-publisher".to_string()
}

fn default_auto_advance_delay_ms() -> u64 {
    300
}

fn default_still_working_after_seconds() -> u64 {
    15
}

impl Settings {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let endpoint = self.gateway.endpoint.trim();
        if endpoint.is_empty() {
            return Err(ConfigError::Settings(
                "`gateway.endpoint` must be non-empty".to_string(),
            ));
        }
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(ConfigError::Settings(format!(
                "`gateway.endpoint` must be an http(s) url, got `{endpoint}`"
            )));
        }
        if self.gateway.timeout_seconds == 0 {
            return Err(ConfigError::Settings(
                "`gateway.timeout_seconds` must be greater than zero".to_string(),
            ));
        }
        if let Some(name) = self.gateway.api_key_env.as_deref() {
            if name.trim().is_empty() {
                return Err(ConfigError::Settings(
                    "`gateway.api_key_env` must be non-empty when set".to_string(),
                ));
            }
        }
        for role in ALL_AGENT_ROLES {
            validate_identifier_value(role.as_str(), self.agents.agent_id(role))
                .map_err(|err| ConfigError::Settings(format!("`agents.{role}`: {err}")))?;
        }
        if let Some(root) = self.state_root.as_ref() {
            if !root.is_absolute() {
                return Err(ConfigError::Settings(
                    "`state_root` must be an absolute path".to_string(),
                ));
            }
        }
        Ok(())
    }

    pub fn resolve_state_root(&self) -> Result<PathBuf, ConfigError> {
        match self.state_root.as_ref() {
            Some(root) => Ok(root.clone()),
            None => default_state_root(),
        }
    }
}
