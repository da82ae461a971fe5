use super::content::{normalize_draft, normalize_post_url};
use super::{
    ArtifactLedger, ArtifactPatch, ArtifactStatus, ContentError, ContentStyle, GeneratedArtifact,
    KeyValueStore, LedgerError,
};
use crate::config::{AgentDirectory, AgentRole};
use crate::gateway::AgentGateway;
use crate::shared::ids::{generate_artifact_id, ArtifactId};
use crate::shared::logging::EventLog;
use chrono::Utc;

pub fn render_draft_prompt(topic: &str, style: ContentStyle) -> String {
    format!(
        "Write a {style} social media post about: {}\n\nBack every statistic or claim with a citation (source, claim, url) and suggest a few hashtags.",
        topic.trim()
    )
}

pub fn render_publish_prompt(artifact: &GeneratedArtifact) -> String {
    let mut prompt = format!("Publish this post:\n\n{}", artifact.content);
    if let Some(hashtags) = artifact.hashtags.as_ref().filter(|tags| !tags.is_empty()) {
        let tags = hashtags.iter().cloned().collect::<Vec<_>>().join(" ");
        prompt.push_str(&format!("\n\n{tags}"));
    }
    prompt
}

/// Content-creation flow on top of the ledger: drafts come from the writer
/// agent, posts go out through the publisher agent.
#[derive(Debug)]
pub struct ContentStudio<G, S> {
    gateway: G,
    agents: AgentDirectory,
    ledger: ArtifactLedger<S>,
    log: EventLog,
}

impl<G: AgentGateway, S: KeyValueStore> ContentStudio<G, S> {
    pub fn new(gateway: G, agents: AgentDirectory, ledger: ArtifactLedger<S>) -> Self {
        Self {
            gateway,
            agents,
            ledger,
            log: EventLog::disabled(),
        }
    }

    pub fn with_event_log(mut self, log: EventLog) -> Self {
        self.log = log;
        self
    }

    pub fn ledger(&self) -> &ArtifactLedger<S> {
        &self.ledger
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn generate_draft(
        &mut self,
        topic: &str,
        style: ContentStyle,
    ) -> Result<&GeneratedArtifact, ContentError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(ContentError::EmptyTopic);
        }
        let agent_id = self.agents.agent_id(AgentRole::ContentWriter);
        let envelope = self
            .gateway
            .call(&render_draft_prompt(topic, style), agent_id)?;
        let payload = envelope.accepted(agent_id)?;
        let draft = normalize_draft(&payload).ok_or(ContentError::EmptyContent)?;

        let now = Utc::now();
        let id = generate_artifact_id(now.timestamp_millis()).map_err(ContentError::Id)?;
        let artifact = GeneratedArtifact {
            id,
            content: draft.content,
            citations: draft.citations,
            style,
            date: now.to_rfc3339(),
            status: ArtifactStatus::Draft,
            post_url: None,
            word_count: Some(draft.word_count),
            hashtags: draft.hashtags,
            topic: Some(topic.to_string()),
        };
        Ok(self.ledger.save(artifact)?)
    }

    /// Rewrites a draft's content, addressed by id.
    pub fn edit_draft(
        &mut self,
        id: &ArtifactId,
        content: impl Into<String>,
    ) -> Result<&GeneratedArtifact, ContentError> {
        Ok(self.ledger.update(id, ArtifactPatch::content(content))?)
    }

    /// Sends a draft to the publisher. An accepted envelope marks it
    /// `posted`; any failure marks it `failed` and leaves the content as is.
    /// Either way the updated entry is returned.
    pub fn publish(&mut self, id: &ArtifactId) -> Result<&GeneratedArtifact, ContentError> {
        let artifact = self
            .ledger
            .get(id)
            .ok_or_else(|| LedgerError::UnknownArtifact { id: id.clone() })?;
        if artifact.status != ArtifactStatus::Draft {
            return Err(LedgerError::NotEditable {
                id: id.clone(),
                status: artifact.status,
            }
            .into());
        }

        let agent_id = self.agents.agent_id(AgentRole::ContentPublisher);
        let prompt = render_publish_prompt(artifact);
        let result = self
            .gateway
            .call(&prompt, agent_id)
            .and_then(|envelope| {
                let payload = envelope.accepted(agent_id)?;
                Ok(normalize_post_url(&payload))
            });

        let patch = match result {
            Ok(post_url) => {
                self.log.info(
                    "content.publish",
                    &format!(
                        "id={id} status=posted url={}",
                        post_url.as_deref().unwrap_or("-")
                    ),
                );
                ArtifactPatch::status(ArtifactStatus::Posted).with_post_url(post_url)
            }
            Err(err) => {
                self.log.warn(
                    "content.publish",
                    &format!("id={id} status=failed error={err}"),
                );
                ArtifactPatch::status(ArtifactStatus::Failed)
            }
        };
        Ok(self.ledger.update(id, patch)?)
    }
}
