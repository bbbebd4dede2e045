// ── Identity type ──
//
// The API hands out UUIDs for most resources, but a few legacy tables
// still use numeric keys. EntityId unifies both behind one type.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Canonical identifier for any server resource.
///
/// The client never assigns identity; this only mirrors what the API sent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityId {
    Uuid(Uuid),
    Key(String),
}

impl EntityId {
    pub fn as_uuid(&self) -> Option<&Uuid> {
        match self {
            Self::Uuid(u) => Some(u),
            Self::Key(_) => None,
        }
    }

    /// Short form for tables: the first UUID group, or the key as-is.
    pub fn short(&self) -> String {
        match self {
            Self::Uuid(u) => u.simple().to_string().chars().take(8).collect(),
            Self::Key(k) => k.clone(),
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uuid(u) => write!(f, "{u}"),
            Self::Key(s) => write!(f, "{s}"),
        }
    }
}

impl FromStr for EntityId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.to_owned()))
    }
}

impl From<Uuid> for EntityId {
    fn from(u: Uuid) -> Self {
        Self::Uuid(u)
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        match Uuid::parse_str(&s) {
            Ok(u) => Self::Uuid(u),
            Err(_) => Self::Key(s),
        }
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self::from(s.to_owned())
    }
}

impl From<u64> for EntityId {
    fn from(n: u64) -> Self {
        Self::Key(n.to_string())
    }
}

impl Serialize for EntityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Self::from(n),
            Raw::Text(s) => Self::from(s),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn uuid_strings_parse_as_uuid() {
        let id = EntityId::from("9b2f3c1e-4d5a-4b6c-8d7e-0f1a2b3c4d5e");
        assert!(id.as_uuid().is_some());
        assert_eq!(id.short(), "9b2f3c1e");
    }

    #[test]
    fn numeric_ids_deserialize_as_keys() {
        let id: EntityId = serde_json::from_str("42").unwrap();
        assert_eq!(id, EntityId::Key("42".into()));
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"42\"");
    }

    #[test]
    fn uuid_roundtrips_as_plain_string() {
        let raw = "\"9b2f3c1e-4d5a-4b6c-8d7e-0f1a2b3c4d5e\"";
        let id: EntityId = serde_json::from_str(raw).unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), raw);
    }
}
