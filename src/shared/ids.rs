use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

const BASE36_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ARTIFACT_SUFFIX_SPACE: u32 = 36 * 36 * 36 * 36;

pub fn validate_identifier_value(kind: &str, value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err(format!("{kind} must be non-empty"));
    }
    if value
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
    {
        return Ok(());
    }
    Err(format!(
        "{kind} must use only ASCII letters, digits, '-' or '_'"
    ))
}

macro_rules! define_id_type {
    ($name:ident, $kind:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn parse(raw: &str) -> Result<Self, String> {
                validate_identifier_value($kind, raw)?;
                Ok(Self(raw.to_string()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }

        impl TryFrom<String> for $name {
            type Error = String;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(&value)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                Self::parse(&raw).map_err(|err| {
                    D::Error::custom(format!("invalid {} `{}`: {}", $kind, raw, err))
                })
            }
        }
    };
}

define_id_type!(ArtifactId, "artifact id");

/// Builds `art-<base36 millis>-<4 random base36 chars>`.
pub fn generate_artifact_id(now_millis: i64) -> Result<ArtifactId, String> {
    let timestamp = u64::try_from(now_millis)
        .map_err(|_| "artifact ids require a non-negative timestamp".to_string())?;
    let mut bytes = [0_u8; 4];
    getrandom::getrandom(&mut bytes)
        .map_err(|err| format!("failed to generate artifact id randomness: {err}"))?;
    let sample = u32::from_le_bytes(bytes) % ARTIFACT_SUFFIX_SPACE;
    ArtifactId::parse(&format!(
        "art-{}-{}",
        base36_encode_u64(timestamp),
        base36_encode_fixed_u32(sample, 4)
    ))
}

fn base36_encode_u64(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut chars = Vec::new();
    while value > 0 {
        chars.push(BASE36_ALPHABET[(value % 36) as usize] as char);
        value /= 36;
    }
    chars.iter().rev().collect()
}

fn base36_encode_fixed_u32(mut value: u32, width: usize) -> String {
    let mut chars = vec!['0'; width];
    for idx in (0..width).rev() {
        chars[idx] = BASE36_ALPHABET[(value % 36) as usize] as char;
        value /= 36;
    }
    chars.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base36_encodes_known_values() {
        assert_eq!(base36_encode_u64(0), "0");
        assert_eq!(base36_encode_u64(35), "z");
        assert_eq!(base36_encode_u64(36), "10");
        assert_eq!(base36_encode_fixed_u32(1, 4), "0001");
    }

    #[test]
    fn generated_artifact_ids_are_valid_identifiers() {
        let id = generate_artifact_id(1_700_000_000_000).expect("artifact id");
        assert!(id.as_str().starts_with("art-"));
        assert!(ArtifactId::parse(id.as_str()).is_ok());
        assert!(generate_artifact_id(-1).is_err());
    }
}
