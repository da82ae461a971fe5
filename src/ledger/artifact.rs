use crate::shared::ids::ArtifactId;
use crate::shared::payload::text_field;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactStatus {
    Draft,
    Posted,
    Failed,
}

impl ArtifactStatus {
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (ArtifactStatus::Draft, ArtifactStatus::Posted)
                | (ArtifactStatus::Draft, ArtifactStatus::Failed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ArtifactStatus::Posted | ArtifactStatus::Failed)
    }
}

impl std::fmt::Display for ArtifactStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArtifactStatus::Draft => write!(f, "draft"),
            ArtifactStatus::Posted => write!(f, "posted"),
            ArtifactStatus::Failed => write!(f, "failed"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentStyle {
    #[default]
    Professional,
    Conversational,
    Storytelling,
    Analytical,
}

impl ContentStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentStyle::Professional => "professional",
            ContentStyle::Conversational => "conversational",
            ContentStyle::Storytelling => "storytelling",
            ContentStyle::Analytical => "analytical",
        }
    }

    /// Unknown names map to the default style.
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "conversational" => ContentStyle::Conversational,
            "storytelling" => ContentStyle::Storytelling,
            "analytical" => ContentStyle::Analytical,
            _ => ContentStyle::Professional,
        }
    }
}

impl std::fmt::Display for ContentStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ContentStyle {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse_lenient(&raw))
    }
}

/// A cited source. `claim` and `stat` both carry the cited assertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct Citation {
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claim: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stat: Option<String>,
}

impl Citation {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            claim: None,
            title: None,
            url: None,
            stat: None,
        }
    }

    /// Coerces a loosely shaped citation. Strings become the source; objects
    /// need one of `source`, `publisher` or `name`.
    pub fn from_value(value: &Value) -> Option<Self> {
        if let Some(raw) = value.as_str() {
            let raw = raw.trim();
            return (!raw.is_empty()).then(|| Self::new(raw));
        }
        let source = text_field(value, &["source", "publisher", "name"])?;
        Some(Self {
            source,
            claim: text_field(value, &["claim"]),
            title: text_field(value, &["title"]),
            url: text_field(value, &["url"]),
            stat: text_field(value, &["stat"]),
        })
    }

    /// The cited assertion, whichever field carries it.
    pub fn assertion(&self) -> Option<&str> {
        self.claim.as_deref().or(self.stat.as_deref())
    }
}

impl TryFrom<Value> for Citation {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(&value).ok_or_else(|| "citation requires a source".to_string())
    }
}

/// Drops unusable citations instead of failing the whole entry.
fn lenient_citations<'de, D>(deserializer: D) -> Result<Vec<Citation>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(match raw {
        Value::Array(items) => items.iter().filter_map(Citation::from_value).collect(),
        _ => Vec::new(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedArtifact {
    pub id: ArtifactId,
    pub content: String,
    #[serde(default, deserialize_with = "lenient_citations")]
    pub citations: Vec<Citation>,
    #[serde(default)]
    pub style: ContentStyle,
    #[serde(default)]
    pub date: String,
    pub status: ArtifactStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hashtags: Option<BTreeSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
}

impl GeneratedArtifact {
    pub fn draft(
        id: ArtifactId,
        content: impl Into<String>,
        style: ContentStyle,
        date: impl Into<String>,
    ) -> Self {
        let content = content.into();
        Self {
            id,
            word_count: Some(count_words(&content)),
            content,
            citations: Vec::new(),
            style,
            date: date.into(),
            status: ArtifactStatus::Draft,
            post_url: None,
            hashtags: None,
            topic: None,
        }
    }
}

/// Fields merged into an existing entry by [`super::ArtifactLedger::update`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactPatch {
    pub content: Option<String>,
    pub status: Option<ArtifactStatus>,
    pub post_url: Option<String>,
    pub citations: Option<Vec<Citation>>,
    pub hashtags: Option<BTreeSet<String>>,
}

impl ArtifactPatch {
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn status(status: ArtifactStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn with_post_url(mut self, post_url: Option<String>) -> Self {
        self.post_url = post_url;
        self
    }
}

pub fn count_words(content: &str) -> u32 {
    u32::try_from(content.split_whitespace().count()).unwrap_or(u32::MAX)
}
