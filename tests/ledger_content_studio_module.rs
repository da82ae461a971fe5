use decision_companion::config::AgentDirectory;
use decision_companion::gateway::{AgentEnvelope, GatewayError, ScriptedGateway};
use decision_companion::ledger::{
    ArtifactLedger, ArtifactStatus, ContentError, ContentStudio, ContentStyle, LedgerError,
    MemoryKeyValueStore, LEDGER_KEY,
};
use decision_companion::shared::logging::EventLog;
use serde_json::{json, Value};
use std::fs;
use tempfile::tempdir;

fn studio(
    gateway: ScriptedGateway,
    store: &MemoryKeyValueStore,
) -> ContentStudio<ScriptedGateway, &MemoryKeyValueStore> {
    let ledger = ArtifactLedger::load(store, EventLog::disabled());
    ContentStudio::new(gateway, AgentDirectory::default(), ledger)
}

fn writer_reply(content: &str) -> AgentEnvelope {
    AgentEnvelope::succeeded(json!({
        "content": content,
        "citations": [
            {"source": "Gallup", "claim": "Engagement is at 23%", "url": "https://gallup.com"},
            "BLS"
        ],
        "hashtags": ["future", "#work"]
    }))
}

#[test]
fn generated_drafts_are_saved_with_citations_and_topic() {
    let store = MemoryKeyValueStore::new();
    let gateway = ScriptedGateway::new().with_reply(Ok(writer_reply("Work is changing fast.")));
    let mut studio = studio(gateway, &store);

    let artifact = studio
        .generate_draft("  future of work ", ContentStyle::Analytical)
        .expect("draft")
        .clone();
    assert_eq!(artifact.status, ArtifactStatus::Draft);
    assert_eq!(artifact.content, "Work is changing fast.");
    assert_eq!(artifact.word_count, Some(4));
    assert_eq!(artifact.topic.as_deref(), Some("future of work"));
    assert_eq!(artifact.style, ContentStyle::Analytical);
    assert_eq!(artifact.citations.len(), 2);
    assert_eq!(
        artifact.citations[0].assertion(),
        Some("Engagement is at 23%")
    );
    assert_eq!(artifact.citations[1].source, "BLS");
    assert!(artifact.id.as_str().starts_with("art-"));
    assert!(chrono::DateTime::parse_from_rfc3339(&artifact.date).is_ok());

    let calls = studio.gateway().calls();
    assert_eq!(calls[0].agent_id, "content-writer");
    assert!(calls[0].prompt.contains("analytical"));
    assert!(calls[0].prompt.contains("future of work"));

    let persisted: Value =
        serde_json::from_str(&store.value(LEDGER_KEY).expect("persisted")).expect("json");
    assert_eq!(persisted[0]["topic"], json!("future of work"));
    assert_eq!(persisted[0]["hashtags"], json!(["#future", "#work"]));
}

#[test]
fn draft_generation_failures_save_nothing() {
    let store = MemoryKeyValueStore::new();
    let gateway = ScriptedGateway::new()
        .with_reply(Ok(AgentEnvelope::failed("writer offline")))
        .with_reply(Ok(AgentEnvelope::succeeded(json!({"content": "  "}))));
    let mut studio = studio(gateway, &store);

    assert!(matches!(
        studio.generate_draft(" ", ContentStyle::Professional),
        Err(ContentError::EmptyTopic)
    ));
    assert!(matches!(
        studio.generate_draft("remote work", ContentStyle::Professional),
        Err(ContentError::Gateway(GatewayError::Rejected { .. }))
    ));
    assert!(matches!(
        studio.generate_draft("remote work", ContentStyle::Professional),
        Err(ContentError::EmptyContent)
    ));
    assert!(studio.ledger().entries().is_empty());
    assert!(store.value(LEDGER_KEY).is_none());
}

#[test]
fn edit_targets_the_draft_by_id_even_with_identical_content() {
    let store = MemoryKeyValueStore::new();
    let gateway = ScriptedGateway::new()
        .with_reply(Ok(writer_reply("Same words.")))
        .with_reply(Ok(writer_reply("Same words.")));
    let mut studio = studio(gateway, &store);
    let older = studio
        .generate_draft("topic one", ContentStyle::Storytelling)
        .expect("first draft")
        .id
        .clone();
    let newer = studio
        .generate_draft("topic two", ContentStyle::Storytelling)
        .expect("second draft")
        .id
        .clone();
    assert_ne!(older, newer);

    studio
        .edit_draft(&older, "Rewritten older draft.")
        .expect("edit");
    let ledger = studio.ledger();
    assert_eq!(
        ledger.get(&older).map(|a| a.content.as_str()),
        Some("Rewritten older draft.")
    );
    assert_eq!(
        ledger.get(&newer).map(|a| a.content.as_str()),
        Some("Same words.")
    );
}

#[test]
fn successful_publish_marks_posted_with_url() {
    let store = MemoryKeyValueStore::new();
    let gateway = ScriptedGateway::new()
        .with_reply(Ok(writer_reply("Ship it.")))
        .with_reply(Ok(AgentEnvelope::succeeded(
            json!({"post_url": "https://social.example/p/42"}),
        )));
    let mut studio = studio(gateway, &store);
    let id = studio
        .generate_draft("launch", ContentStyle::Professional)
        .expect("draft")
        .id
        .clone();

    let published = studio.publish(&id).expect("publish");
    assert_eq!(published.status, ArtifactStatus::Posted);
    assert_eq!(
        published.post_url.as_deref(),
        Some("https://social.example/p/42")
    );

    let calls = studio.gateway().calls();
    assert_eq!(calls[1].agent_id, "content-publisher");
    assert!(calls[1].prompt.contains("Ship it."));
    assert!(calls[1].prompt.contains("#future #work"));

    assert!(studio.ledger().drafts().is_empty());
    assert_eq!(studio.ledger().posted().len(), 1);
}

#[test]
fn failed_publish_marks_failed_and_keeps_content() {
    let temp = tempdir().expect("tempdir");
    let log = EventLog::at_state_root(temp.path());
    let store = MemoryKeyValueStore::new();
    let gateway = ScriptedGateway::new()
        .with_reply(Ok(writer_reply("Keep this text.")))
        .with_reply(Err(GatewayError::Transport {
            agent_id: "content-publisher".to_string(),
            reason: "connection reset".to_string(),
        }));
    let mut studio = studio(gateway, &store).with_event_log(log.clone());
    let id = studio
        .generate_draft("resilience", ContentStyle::Conversational)
        .expect("draft")
        .id
        .clone();

    let failed = studio.publish(&id).expect("recorded failure");
    assert_eq!(failed.status, ArtifactStatus::Failed);
    assert_eq!(failed.content, "Keep this text.");
    assert_eq!(failed.post_url, None);
    assert_eq!(studio.ledger().failed().len(), 1);

    let err = studio.publish(&id).expect_err("failed is terminal");
    assert!(matches!(
        err,
        ContentError::Ledger(LedgerError::NotEditable {
            status: ArtifactStatus::Failed,
            ..
        })
    ));
    assert!(matches!(
        studio.edit_draft(&id, "too late"),
        Err(ContentError::Ledger(LedgerError::NotEditable { .. }))
    ));
    assert_eq!(studio.gateway().calls().len(), 2);

    let raw = fs::read_to_string(log.path().expect("log path")).expect("read log");
    assert!(raw.contains("content.publish"));
    assert!(raw.contains("status=failed"));
}

#[test]
fn rejected_publish_envelope_also_fails_the_draft() {
    let store = MemoryKeyValueStore::new();
    let gateway = ScriptedGateway::new()
        .with_reply(Ok(writer_reply("Draft body.")))
        .with_reply(Ok(AgentEnvelope::failed("rate limited")));
    let mut studio = studio(gateway, &store);
    let id = studio
        .generate_draft("limits", ContentStyle::Professional)
        .expect("draft")
        .id
        .clone();

    let failed = studio.publish(&id).expect("recorded failure");
    assert_eq!(failed.status, ArtifactStatus::Failed);
    assert_eq!(failed.content, "Draft body.");
}
