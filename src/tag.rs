//! The immutable `LanguageTag` output type, its component accessors, and
//! the small split-iterators they're built from.

use std::fmt;
use std::str::{FromStr, Split};

use crate::error::ParseError;
use crate::parser::Parser;

/// One extension section: a singleton (any ASCII letter or digit other
/// than `x`/`X`) followed by one or more subtags.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Extension {
    pub(crate) singleton: char,
    pub(crate) value: String,
}

impl Extension {
    /// The lowercase singleton that opens this extension section.
    #[inline]
    pub fn singleton(&self) -> char {
        self.singleton
    }

    /// The hyphen-joined, lowercase subtags following the singleton.
    #[inline]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.singleton, self.value)
    }
}

/// A parsed, immutable BCP 47 language tag.
///
/// Produced by [`crate::Parser::parse`] or
/// [`crate::Parser::parse_and_normalize`]. `LanguageTag` is cheap to clone,
/// `Send + Sync`, and safe to share across threads.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct LanguageTag {
    pub(crate) tag: String,
    pub(crate) language_end: usize,
    pub(crate) extlang_end: usize,
    pub(crate) script_end: usize,
    pub(crate) region_end: usize,
    pub(crate) variant_end: usize,
    pub(crate) extension_end: usize,
    pub(crate) extensions: Vec<Extension>,
    pub(crate) is_grandfathered: bool,
}

impl LanguageTag {
    /// The rendered serialization of this tag.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.tag
    }

    /// Consumes the tag, returning its rendered serialization.
    #[inline]
    pub fn into_string(self) -> String {
        self.tag
    }

    /// The primary language subtag, or `""` for a private-use-only tag.
    #[inline]
    pub fn primary_language(&self) -> &str {
        &self.tag[..self.language_end]
    }

    /// The extended language subtag, and whether one is present.
    #[inline]
    pub fn extended_language(&self) -> (&str, bool) {
        if self.language_end == self.extlang_end {
            ("", false)
        } else {
            (&self.tag[self.language_end + 1..self.extlang_end], true)
        }
    }

    /// Iterate the extended language subtags (at most one in a tag produced
    /// by this crate, but the registry's `Prefix` chains are general).
    #[inline]
    pub fn extended_language_subtags(&self) -> impl Iterator<Item = &str> {
        SubtagListIterator::new(self.extended_language().0)
    }

    /// The primary language subtag plus any extended language subtags.
    #[inline]
    pub fn full_language(&self) -> &str {
        &self.tag[..self.extlang_end]
    }

    /// The script subtag, and whether one is present.
    #[inline]
    pub fn script(&self) -> (&str, bool) {
        if self.extlang_end == self.script_end {
            ("", false)
        } else {
            (&self.tag[self.extlang_end + 1..self.script_end], true)
        }
    }

    /// The region subtag, and whether one is present.
    #[inline]
    pub fn region(&self) -> (&str, bool) {
        if self.script_end == self.region_end {
            ("", false)
        } else {
            (&self.tag[self.script_end + 1..self.region_end], true)
        }
    }

    /// All variant subtags joined by `-`, and whether any are present.
    #[inline]
    pub fn variant(&self) -> (&str, bool) {
        if self.region_end == self.variant_end {
            ("", false)
        } else {
            (&self.tag[self.region_end + 1..self.variant_end], true)
        }
    }

    /// Iterate the individual variant subtags.
    #[inline]
    pub fn variant_subtags(&self) -> impl Iterator<Item = &str> {
        SubtagListIterator::new(self.variant().0)
    }

    /// The parsed extension sections, in their current (possibly
    /// canonically reordered) order.
    #[inline]
    pub fn extension_subtags(&self) -> &[Extension] {
        &self.extensions
    }

    /// The private use section with its leading `x-`/`X-` singleton
    /// stripped, and whether one is present.
    pub fn private_use(&self) -> (&str, bool) {
        if self.tag.starts_with("x-") || self.tag.starts_with("X-") {
            (&self.tag[2..], true)
        } else if self.extension_end >= self.tag.len() {
            ("", false)
        } else {
            // `tag[extension_end]` is the separating `-`, followed by the
            // `x-` singleton, then the private use subtags themselves.
            (&self.tag[self.extension_end + 3..], true)
        }
    }

    /// Iterate the individual private use subtags.
    #[inline]
    pub fn private_use_subtags(&self) -> impl Iterator<Item = &str> {
        let (part, present) = self.private_use();
        if !present {
            return SubtagListIterator::new("");
        }
        SubtagListIterator::new(part)
    }

    /// True iff this tag matched a grandfathered/redundant registry record
    /// with no replacement and was preserved whole.
    #[inline]
    pub fn is_grandfathered(&self) -> bool {
        self.is_grandfathered
    }

    /// Checks if this tag has no extension or private use sections, making
    /// it usable as a basic language range in [`LanguageTag::matches`].
    pub fn is_language_range(&self) -> bool {
        self.extensions.is_empty() && !self.private_use().1
    }

    /// Basic language-range matching: `self` acts as a range, `other` as a
    /// concrete tag. `None` fields in the range match anything. This is
    /// *not* full RFC 4647 filtering, just the equality-style check over
    /// already-parsed components.
    ///
    /// # Panics
    /// If `self` is not a language range (has extensions or private use).
    pub fn matches(&self, other: &LanguageTag) -> bool {
        assert!(
            self.is_language_range(),
            "matches() requires a basic language range (no extensions/private use)"
        );
        fn matches_component(range: (&str, bool), tag: (&str, bool)) -> bool {
            if !range.1 {
                return true;
            }
            tag.1 && range.0.eq_ignore_ascii_case(tag.0)
        }
        self.full_language().eq_ignore_ascii_case(other.full_language())
            && matches_component(self.script(), other.script())
            && matches_component(self.region(), other.region())
            && self
                .variant_subtags()
                .zip(other.variant_subtags())
                .all(|(a, b)| a.eq_ignore_ascii_case(b))
    }
}

impl fmt::Display for LanguageTag {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag)
    }
}

/// Parses with the embedded registry's well-formedness rules (equivalent
/// to `Parser::new_embedded().parse(s)`). Callers who already hold a
/// [`Parser`], or who need `ParseAndNormalize` semantics, should call it
/// directly instead.
impl FromStr for LanguageTag {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Parser::new_embedded().parse(s)
    }
}

/// Splits a hyphen-joined subtag list, skipping the (never-empty in
/// practice) trailing fragment produced by splitting `""`.
pub(crate) struct SubtagListIterator<'a> {
    split: Split<'a, char>,
}

impl<'a> SubtagListIterator<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        Self {
            split: input.split('-'),
        }
    }
}

impl<'a> Iterator for SubtagListIterator<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let tag = self.split.next()?;
        if tag.is_empty() {
            None
        } else {
            Some(tag)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(s: &str) -> LanguageTag {
        // Minimal hand-built tags for accessor unit tests; the state
        // machine and canonicalizer have their own integration tests that
        // exercise real parsing.
        LanguageTag {
            tag: s.to_string(),
            language_end: 2,
            extlang_end: 2,
            script_end: 2,
            region_end: 5,
            variant_end: 5,
            extension_end: 5,
            extensions: vec![],
            is_grandfathered: false,
        }
    }

    #[test]
    fn accessors_partition_en_us() {
        let t = tag("en-US");
        assert_eq!(t.primary_language(), "en");
        assert_eq!(t.region(), ("US", true));
        assert_eq!(t.script(), ("", false));
    }

    #[test]
    fn private_use_whole_tag() {
        let t = LanguageTag {
            tag: "x-whatever".to_string(),
            language_end: 0,
            extlang_end: 0,
            script_end: 0,
            region_end: 0,
            variant_end: 0,
            extension_end: 0,
            extensions: vec![],
            is_grandfathered: false,
        };
        assert_eq!(t.private_use(), ("whatever", true));
        assert_eq!(t.private_use_subtags().collect::<Vec<_>>(), vec!["whatever"]);
    }

    #[test]
    fn from_str_parses_without_validating() {
        let t: LanguageTag = "qq-Zzzz".parse().unwrap();
        assert_eq!(t.primary_language(), "qq");
        assert_eq!(t.script(), ("Zzzz", true));
    }
}
