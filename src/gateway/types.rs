use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const SUCCESS_STATUS: &str = "success";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("agent `{agent_id}` request failed: {reason}")]
    Transport { agent_id: String, reason: String },
    #[error("agent `{agent_id}` request timed out after {timeout_seconds}s")]
    Timeout {
        agent_id: String,
        timeout_seconds: u64,
    },
    #[error("agent `{agent_id}` returned http status {status}")]
    HttpStatus { agent_id: String, status: u16 },
    #[error("agent `{agent_id}` response could not be decoded: {reason}")]
    Decode { agent_id: String, reason: String },
    #[error("agent `{agent_id}` reported failure: {message}")]
    Rejected { agent_id: String, message: String },
    #[error("agent `{agent_id}` returned status `{status}`")]
    UnexpectedStatus { agent_id: String, status: String },
}

impl GatewayError {
    pub fn agent_id(&self) -> &str {
        match self {
            Self::Transport { agent_id, .. }
            | Self::Timeout { agent_id, .. }
            | Self::HttpStatus { agent_id, .. }
            | Self::Decode { agent_id, .. }
            | Self::Rejected { agent_id, .. }
            | Self::UnexpectedStatus { agent_id, .. } => agent_id,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub response: Option<AgentResponse>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
}

/// The usable part of an accepted envelope.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentPayload<'a> {
    pub result: Option<&'a Value>,
    pub message: Option<&'a str>,
}

impl<'a> AgentPayload<'a> {
    pub fn from_result(result: &'a Value) -> Self {
        Self {
            result: Some(result),
            message: None,
        }
    }

    pub fn empty() -> Self {
        Self {
            result: None,
            message: None,
        }
    }
}

impl AgentEnvelope {
    pub fn succeeded(result: Value) -> Self {
        Self {
            success: true,
            response: Some(AgentResponse {
                status: SUCCESS_STATUS.to_string(),
                result: Some(result),
                message: None,
            }),
            error: None,
        }
    }

    pub fn succeeded_with_message(result: Option<Value>, message: impl Into<String>) -> Self {
        Self {
            success: true,
            response: Some(AgentResponse {
                status: SUCCESS_STATUS.to_string(),
                result,
                message: Some(message.into()),
            }),
            error: None,
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            response: None,
            error: Some(reason.into()),
        }
    }

    /// Accepts the envelope only when `success` is set and the inner status is
    /// `success`.
    pub fn accepted(&self, agent_id: &str) -> Result<AgentPayload<'_>, GatewayError> {
        if !self.success {
            return Err(GatewayError::Rejected {
                agent_id: agent_id.to_string(),
                message: self
                    .error
                    .clone()
                    .unwrap_or_else(|| "success flag was false".to_string()),
            });
        }
        let Some(response) = self.response.as_ref() else {
            return Err(GatewayError::UnexpectedStatus {
                agent_id: agent_id.to_string(),
                status: "missing response".to_string(),
            });
        };
        if response.status != SUCCESS_STATUS {
            return Err(GatewayError::UnexpectedStatus {
                agent_id: agent_id.to_string(),
                status: response.status.clone(),
            });
        }
        Ok(AgentPayload {
            result: response.result.as_ref(),
            message: response.message.as_deref(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_only_successful_envelopes() {
        let ok = AgentEnvelope::succeeded(json!({"questions": []}));
        assert!(ok.accepted("a").expect("accepted").result.is_some());

        let rejected = AgentEnvelope::failed("quota");
        assert_eq!(
            rejected.accepted("a"),
            Err(GatewayError::Rejected {
                agent_id: "a".to_string(),
                message: "quota".to_string()
            })
        );

        let odd: AgentEnvelope =
            serde_json::from_value(json!({"success": true, "response": {"status": "error"}}))
                .expect("envelope");
        assert!(matches!(
            odd.accepted("a"),
            Err(GatewayError::UnexpectedStatus { .. })
        ));
    }

    #[test]
    fn null_result_decodes_as_absent() {
        let envelope: AgentEnvelope = serde_json::from_value(json!({
            "success": true,
            "response": {"status": "success", "result": null, "message": "hi"}
        }))
        .expect("envelope");
        let payload = envelope.accepted("a").expect("accepted");
        assert!(payload.result.is_none());
        assert_eq!(payload.message, Some("hi"));
    }
}
