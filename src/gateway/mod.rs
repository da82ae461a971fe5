//! Boundary to the external reasoning service. One call sends a prompt to an
//! agent identifier and returns a pass/fail envelope around an arbitrarily
//! shaped payload.

pub mod http;
pub mod scripted;
pub mod types;

pub use http::HttpAgentGateway;
pub use scripted::{RecordedCall, ScriptedGateway, ScriptedReply};
pub use types::{AgentEnvelope, AgentPayload, AgentResponse, GatewayError};

pub trait AgentGateway {
    /// `Err` means the call itself failed (transport, timeout, undecodable body).
    /// A delivered envelope that reports failure is still `Ok`.
    fn call(&self, prompt: &str, agent_id: &str) -> Result<AgentEnvelope, GatewayError>;
}

impl<T: AgentGateway + ?Sized> AgentGateway for &T {
    fn call(&self, prompt: &str, agent_id: &str) -> Result<AgentEnvelope, GatewayError> {
        (**self).call(prompt, agent_id)
    }
}

impl<T: AgentGateway + ?Sized> AgentGateway for Box<T> {
    fn call(&self, prompt: &str, agent_id: &str) -> Result<AgentEnvelope, GatewayError> {
        (**self).call(prompt, agent_id)
    }
}
