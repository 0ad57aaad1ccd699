//! Optional `serde` support, enabled by the `serde` Cargo feature.
//!
//! Marshaling writes the rendered string. Unmarshaling is stricter than a
//! plain `Display`/`FromStr` round-trip: it always runs a full validating
//! parse against the embedded registry, so a `LanguageTag` deserialized
//! from untrusted input is guaranteed canonical, not merely well-formed.
//! An empty string deserializes to an empty tag rather than an error, as a
//! sentinel for "no language specified".

use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

use crate::parser::Parser;
use crate::tag::LanguageTag;

impl Serialize for LanguageTag {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LanguageTag {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        if raw.is_empty() {
            return Ok(crate::render::whole(String::new(), false));
        }
        Parser::new_embedded()
            .parse_and_normalize(&raw)
            .map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_json() {
        let tag = Parser::new_embedded().parse_and_normalize("MN-cYrL-mn").unwrap();
        let json = serde_json::to_string(&tag).unwrap();
        assert_eq!(json, "\"mn-MN\"");
        let back: LanguageTag = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tag);
    }

    #[test]
    fn empty_string_deserializes_to_empty_tag() {
        let back: LanguageTag = serde_json::from_str("\"\"").unwrap();
        assert_eq!(back.as_str(), "");
    }

    #[test]
    fn invalid_tag_fails_to_deserialize() {
        let result: Result<LanguageTag, _> = serde_json::from_str("\"en_US\"");
        assert!(result.is_err());
    }
}
