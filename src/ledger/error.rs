use super::{ArtifactStatus, StoreError};
use crate::gateway::GatewayError;
use crate::shared::ids::ArtifactId;

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("artifact `{id}` not found")]
    UnknownArtifact { id: ArtifactId },
    #[error("artifact `{id}` already exists")]
    DuplicateArtifact { id: ArtifactId },
    #[error("artifact `{id}` status transition `{from}` -> `{to}` is invalid")]
    InvalidStatusTransition {
        id: ArtifactId,
        from: ArtifactStatus,
        to: ArtifactStatus,
    },
    #[error("artifact `{id}` is {status} and can no longer be edited")]
    NotEditable {
        id: ArtifactId,
        status: ArtifactStatus,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("ledger value under `{key}` is not valid json: {source}")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("topic must be non-empty")]
    EmptyTopic,
    #[error("agent returned no usable content")]
    EmptyContent,
    #[error("content agent call failed: {0}")]
    Gateway(#[from] GatewayError),
    #[error("failed to allocate artifact id: {0}")]
    Id(String),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
