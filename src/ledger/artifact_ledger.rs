use super::{ArtifactPatch, ArtifactStatus, GeneratedArtifact, KeyValueStore, LedgerError};
use crate::shared::ids::ArtifactId;
use crate::shared::logging::EventLog;
use serde_json::Value;

pub const LEDGER_KEY: &str = "generated_artifacts";

/// Newest-first sequence of generated artifacts, persisted wholesale under
/// [`LEDGER_KEY`] after every mutation.
#[derive(Debug)]
pub struct ArtifactLedger<S> {
    store: S,
    entries: Vec<GeneratedArtifact>,
    log: EventLog,
}

impl<S: KeyValueStore> ArtifactLedger<S> {
    /// Loads the persisted sequence. An unreadable or corrupt value yields an
    /// empty ledger, and individual malformed entries are skipped.
    pub fn load(store: S, log: EventLog) -> Self {
        let entries = match store.read(LEDGER_KEY) {
            Ok(Some(raw)) => decode_entries_lenient(&raw, &log),
            Ok(None) => Vec::new(),
            Err(err) => {
                log.warn(
                    "ledger.load_failed",
                    &format!("key={LEDGER_KEY} error={err}"),
                );
                Vec::new()
            }
        };
        Self {
            store,
            entries,
            log,
        }
    }

    /// Loads the persisted sequence, failing on any read or decode error.
    pub fn load_strict(store: S, log: EventLog) -> Result<Self, LedgerError> {
        let entries = match store.read(LEDGER_KEY)? {
            Some(raw) => serde_json::from_str(&raw).map_err(|source| LedgerError::Json {
                key: LEDGER_KEY.to_string(),
                source,
            })?,
            None => Vec::new(),
        };
        Ok(Self {
            store,
            entries,
            log,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn entries(&self) -> &[GeneratedArtifact] {
        &self.entries
    }

    pub fn get(&self, id: &ArtifactId) -> Option<&GeneratedArtifact> {
        self.entries.iter().find(|entry| &entry.id == id)
    }

    /// Prepends `artifact` and persists the whole sequence.
    pub fn save(&mut self, artifact: GeneratedArtifact) -> Result<&GeneratedArtifact, LedgerError> {
        if self.get(&artifact.id).is_some() {
            return Err(LedgerError::DuplicateArtifact { id: artifact.id });
        }
        self.log.info(
            "ledger.save",
            &format!("id={} status={}", artifact.id, artifact.status),
        );
        self.entries.insert(0, artifact);
        self.persist("ledger.save");
        Ok(&self.entries[0])
    }

    /// Merges `patch` into the entry with `id`. Status only moves
    /// `draft -> posted|failed`; entries in a terminal status reject edits.
    pub fn update(
        &mut self,
        id: &ArtifactId,
        patch: ArtifactPatch,
    ) -> Result<&GeneratedArtifact, LedgerError> {
        let position = self
            .entries
            .iter()
            .position(|entry| &entry.id == id)
            .ok_or_else(|| LedgerError::UnknownArtifact { id: id.clone() })?;
        let entry = &mut self.entries[position];

        if entry.status.is_terminal() {
            return Err(LedgerError::NotEditable {
                id: id.clone(),
                status: entry.status,
            });
        }
        if let Some(next) = patch.status {
            if next != entry.status && !entry.status.can_transition_to(next) {
                return Err(LedgerError::InvalidStatusTransition {
                    id: id.clone(),
                    from: entry.status,
                    to: next,
                });
            }
        }

        if let Some(content) = patch.content {
            entry.word_count = Some(super::artifact::count_words(&content));
            entry.content = content;
        }
        if let Some(status) = patch.status {
            entry.status = status;
        }
        if let Some(post_url) = patch.post_url {
            entry.post_url = Some(post_url);
        }
        if let Some(citations) = patch.citations {
            entry.citations = citations;
        }
        if let Some(hashtags) = patch.hashtags {
            entry.hashtags = Some(hashtags);
        }
        self.log.info(
            "ledger.update",
            &format!("id={} status={}", entry.id, entry.status),
        );
        self.persist("ledger.update");
        Ok(&self.entries[position])
    }

    pub fn with_status(&self, status: ArtifactStatus) -> Vec<&GeneratedArtifact> {
        self.entries
            .iter()
            .filter(|entry| entry.status == status)
            .collect()
    }

    pub fn drafts(&self) -> Vec<&GeneratedArtifact> {
        self.with_status(ArtifactStatus::Draft)
    }

    pub fn posted(&self) -> Vec<&GeneratedArtifact> {
        self.with_status(ArtifactStatus::Posted)
    }

    pub fn failed(&self) -> Vec<&GeneratedArtifact> {
        self.with_status(ArtifactStatus::Failed)
    }

    /// Writes the current sequence, surfacing any store failure.
    pub fn flush(&self) -> Result<(), LedgerError> {
        let body = serde_json::to_string(&self.entries).map_err(|source| LedgerError::Json {
            key: LEDGER_KEY.to_string(),
            source,
        })?;
        self.store.write(LEDGER_KEY, &body)?;
        Ok(())
    }

    fn persist(&self, event: &str) {
        if let Err(err) = self.flush() {
            self.log
                .error(event, &format!("key={LEDGER_KEY} persist failed: {err}"));
        }
    }
}

fn decode_entries_lenient(raw: &str, log: &EventLog) -> Vec<GeneratedArtifact> {
    let items = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => items,
        Ok(_) => {
            log.warn(
                "ledger.load_failed",
                &format!("key={LEDGER_KEY} error=value is not an array"),
            );
            return Vec::new();
        }
        Err(err) => {
            log.warn(
                "ledger.load_failed",
                &format!("key={LEDGER_KEY} error={err}"),
            );
            return Vec::new();
        }
    };

    let total = items.len();
    let mut entries: Vec<GeneratedArtifact> = Vec::with_capacity(total);
    for item in items {
        let Ok(entry) = serde_json::from_value::<GeneratedArtifact>(item) else {
            continue;
        };
        if entries.iter().any(|existing| existing.id == entry.id) {
            continue;
        }
        entries.push(entry);
    }
    if entries.len() < total {
        log.warn(
            "ledger.load_failed",
            &format!(
                "key={LEDGER_KEY} skipped={} kept={}",
                total - entries.len(),
                entries.len()
            ),
        );
    }
    entries
}
