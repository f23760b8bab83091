//! Identifier version selector.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Which RFC 4122 generation scheme to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum UuidVersion {
    /// Timestamp + clock sequence + node (legacy layout).
    #[serde(rename = "v1")]
    V1,
    /// Fully random.
    #[default]
    #[serde(rename = "v4")]
    V4,
    /// Millisecond-timestamp-prefixed, lexicographically time-ordered.
    #[serde(rename = "v7")]
    V7,
}

impl UuidVersion {
    /// Parse a version selector, falling back to `V4` for anything
    /// unrecognized. The fallback logs a warning rather than failing —
    /// callers sending a bad selector still get a usable identifier.
    pub fn parse_lossy(s: &str) -> Self {
        match s {
            "v1" => UuidVersion::V1,
            "v4" => UuidVersion::V4,
            "v7" => UuidVersion::V7,
            other => {
                tracing::warn!(version = %other, "unknown identifier version, falling back to v4");
                UuidVersion::V4
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UuidVersion::V1 => "v1",
            UuidVersion::V4 => "v4",
            UuidVersion::V7 => "v7",
        }
    }

    /// The version digit encoded in the third hex group.
    pub fn number(&self) -> u8 {
        match self {
            UuidVersion::V1 => 1,
            UuidVersion::V4 => 4,
            UuidVersion::V7 => 7,
        }
    }
}

impl fmt::Display for UuidVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Deserialize through `parse_lossy` so an unknown selector in a request
// never rejects the request.
impl<'de> Deserialize<'de> for UuidVersion {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(UuidVersion::parse_lossy(&s))
    }
}
