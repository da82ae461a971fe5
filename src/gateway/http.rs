use super::{AgentEnvelope, AgentGateway, GatewayError};
use crate::config::GatewaySettings;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Serialize)]
struct AgentRequest<'a> {
    message: &'a str,
    agent_id: &'a str,
}

/// Posts `{message, agent_id}` as JSON and decodes the envelope from the body.
#[derive(Debug, Clone)]
pub struct HttpAgentGateway {
    agent: ureq::Agent,
    endpoint: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl HttpAgentGateway {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
            endpoint: endpoint.into(),
            api_key: None,
            timeout,
        }
    }

    pub fn from_settings(settings: &GatewaySettings) -> Self {
        let gateway = Self::new(settings.endpoint.trim(), settings.timeout());
        match settings.resolve_api_key() {
            Some(key) => gateway.with_api_key(key),
            None => gateway,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn transport_error(&self, agent_id: &str, transport: &ureq::Transport) -> GatewayError {
        let reason = transport.to_string();
        let io_timeout = std::error::Error::source(transport)
            .and_then(|source| source.downcast_ref::<std::io::Error>())
            .is_some_and(|err| {
                matches!(
                    err.kind(),
                    std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock
                )
            });
        if io_timeout || reason.to_ascii_lowercase().contains("timed out") {
            return GatewayError::Timeout {
                agent_id: agent_id.to_string(),
                timeout_seconds: self.timeout.as_secs(),
            };
        }
        GatewayError::Transport {
            agent_id: agent_id.to_string(),
            reason,
        }
    }
}

impl AgentGateway for HttpAgentGateway {
    fn call(&self, prompt: &str, agent_id: &str) -> Result<AgentEnvelope, GatewayError> {
        let mut request = self
            .agent
            .post(&self.endpoint)
            .set("Content-Type", "application/json");
        if let Some(api_key) = self.api_key.as_deref() {
            request = request.set("Authorization", &format!("Bearer {api_key}"));
        }

        match request.send_json(AgentRequest {
            message: prompt,
            agent_id,
        }) {
            Ok(response) => {
                response
                    .into_json::<AgentEnvelope>()
                    .map_err(|err| GatewayError::Decode {
                        agent_id: agent_id.to_string(),
                        reason: err.to_string(),
                    })
            }
            // Error statuses may still carry a well-formed failure envelope.
            Err(ureq::Error::Status(status, response)) => response
                .into_json::<AgentEnvelope>()
                .map_err(|_| GatewayError::HttpStatus {
                    agent_id: agent_id.to_string(),
                    status,
                }),
            Err(ureq::Error::Transport(transport)) => {
                Err(self.transport_error(agent_id, &transport))
            }
        }
    }
}
