use super::{AgentEnvelope, AgentGateway, GatewayError};
use std::cell::RefCell;
use std::collections::VecDeque;

pub type ScriptedReply = Result<AgentEnvelope, GatewayError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub prompt: String,
    pub agent_id: String,
}

/// Replays queued replies in order, then repeats the default reply. Used for
/// offline runs and tests.
#[derive(Debug)]
pub struct ScriptedGateway {
    replies: RefCell<VecDeque<ScriptedReply>>,
    default_reply: ScriptedReply,
    calls: RefCell<Vec<RecordedCall>>,
}

impl Default for ScriptedGateway {
    fn default() -> Self {
        Self::always(Ok(AgentEnvelope::failed("no scripted reply")))
    }
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn always(reply: ScriptedReply) -> Self {
        Self {
            replies: RefCell::new(VecDeque::new()),
            default_reply: reply,
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn with_reply(self, reply: ScriptedReply) -> Self {
        self.replies.borrow_mut().push_back(reply);
        self
    }

    pub fn push_reply(&self, reply: ScriptedReply) {
        self.replies.borrow_mut().push_back(reply);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }
}

impl AgentGateway for ScriptedGateway {
    fn call(&self, prompt: &str, agent_id: &str) -> Result<AgentEnvelope, GatewayError> {
        self.calls.borrow_mut().push(RecordedCall {
            prompt: prompt.to_string(),
            agent_id: agent_id.to_string(),
        });
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| self.default_reply.clone())
    }
}
