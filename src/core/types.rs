use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// A supported translation of the text.
///
/// The set is closed; identifiers outside it map to [`Version::Unknown`],
/// which never matches any stored translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Version {
    Amp,
    Asv,
    Cev,
    Darby,
    Esv,
    Kjv,
    Msg,
    Nasb,
    Niv,
    Nkjv,
    Nlt,
    Nrsv,
    Ylt,
    Unknown,
}

/// Every real translation, in display order. Excludes [`Version::Unknown`].
pub const ALL_VERSIONS: [Version; 13] = [
    Version::Amp,
    Version::Asv,
    Version::Cev,
    Version::Darby,
    Version::Esv,
    Version::Kjv,
    Version::Msg,
    Version::Nasb,
    Version::Niv,
    Version::Nkjv,
    Version::Nlt,
    Version::Nrsv,
    Version::Ylt,
];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown version: '{0}'")]
pub struct UnknownVersion(pub String);

impl Version {
    /// Map an identifier to a version, falling back to the `Unknown` sentinel.
    #[must_use]
    pub fn from_id(id: &str) -> Self {
        id.parse().unwrap_or(Self::Unknown)
    }

    /// Short lowercase identifier, as used in file names and URLs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Amp => "amp",
            Self::Asv => "asv",
            Self::Cev => "cev",
            Self::Darby => "darby",
            Self::Esv => "esv",
            Self::Kjv => "kjv",
            Self::Msg => "msg",
            Self::Nasb => "nasb",
            Self::Niv => "niv",
            Self::Nkjv => "nkjv",
            Self::Nlt => "nlt",
            Self::Nrsv => "nrsv",
            Self::Ylt => "ylt",
            Self::Unknown => "unknown",
        }
    }

    #[must_use]
    pub fn is_known(self) -> bool {
        self != Self::Unknown
    }
}

impl FromStr for Version {
    type Err = UnknownVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ALL_VERSIONS
            .iter()
            .copied()
            .find(|v| v.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownVersion(wanted.to_string()))
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A concrete (chapter, verse) position within a book
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub chapter: u32,
    pub verse: u32,
}

impl Coordinate {
    #[must_use]
    pub fn new(chapter: u32, verse: u32) -> Self {
        Self { chapter, verse }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.chapter, self.verse)
    }
}

/// A verse ready for display: label, text and the translation it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedVerse {
    /// e.g. "John 3:16"
    pub display_name: String,

    /// Verse text; empty when the store has no text for the coordinate
    pub content: String,

    pub version: Version,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_from_id() {
        assert_eq!(Version::from_id("kjv"), Version::Kjv);
        assert_eq!(Version::from_id(" NIV "), Version::Niv);
        assert_eq!(Version::from_id("darby"), Version::Darby);
        assert_eq!(Version::from_id("vulgate"), Version::Unknown);
        assert_eq!(Version::from_id(""), Version::Unknown);
    }

    #[test]
    fn test_version_parse_rejects_sentinel() {
        // "unknown" is not a real translation identifier
        let err = "unknown".parse::<Version>().unwrap_err();
        assert_eq!(err, UnknownVersion("unknown".to_string()));
        assert!(!Version::from_id("unknown").is_known());
    }

    #[test]
    fn test_version_round_trips_through_identifier() {
        for version in ALL_VERSIONS {
            assert_eq!(version.as_str().parse::<Version>(), Ok(version));
        }
    }

    #[test]
    fn test_version_serde() {
        assert_eq!(serde_json::to_string(&Version::Nkjv).unwrap(), "\"nkjv\"");
        let v: Version = serde_json::from_str("\"ylt\"").unwrap();
        assert_eq!(v, Version::Ylt);
    }

    #[test]
    fn test_coordinate_display() {
        assert_eq!(Coordinate::new(3, 16).to_string(), "3:16");
    }

    #[test]
    fn test_resolved_verse_json_shape() {
        let verse = ResolvedVerse {
            display_name: "John 3:16".to_string(),
            content: "For God so loved the world".to_string(),
            version: Version::Kjv,
        };
        let json = serde_json::to_value(&verse).unwrap();
        assert_eq!(json["displayName"], "John 3:16");
        assert_eq!(json["content"], "For God so loved the world");
        assert_eq!(json["version"], "kjv");
    }
}
