//! Generated-artifact ledger and the content-creation flow that feeds it.

pub mod artifact;
pub mod artifact_ledger;
pub mod content;
pub mod error;
pub mod store;
pub mod studio;

pub use artifact::{ArtifactPatch, ArtifactStatus, Citation, ContentStyle, GeneratedArtifact};
pub use artifact_ledger::{ArtifactLedger, LEDGER_KEY};
pub use content::{normalize_draft, normalize_post_url, DraftContent};
pub use error::{ContentError, LedgerError};
pub use store::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore, StoreError};
pub use studio::ContentStudio;
