//! The public parser handle: built once from a registry byte blob (or the
//! compiled-in IANA excerpt), immutable and freely shareable thereafter.

use std::sync::{Arc, OnceLock};

use crate::canonicalize::canonicalize;
use crate::chars::is_langtag_char;
use crate::error::ParseError;
use crate::registry::{self, RecordType, Registry, RegistryError};
use crate::render;
use crate::state_machine::{self, lookup_whole_tag};
use crate::tag::LanguageTag;

/// The IANA Language Subtag Registry excerpt compiled into this crate.
///
/// This is a representative subset of the real registry (enough to cover
/// the subtags and ranges this crate's own test suite exercises), not the
/// full published file. Callers who need the authoritative, up-to-date
/// registry should fetch it themselves and build a [`Parser`] with
/// [`Parser::new`].
const EMBEDDED_REGISTRY: &[u8] = include_bytes!("../assets/iana-language-subtag-registry.txt");

static EMBEDDED: OnceLock<Arc<Registry>> = OnceLock::new();

/// A reusable handle over a loaded [`Registry`].
///
/// Construction parses the registry blob once; `clone()` is an `Arc` bump
/// and every subsequent `parse`/`parse_and_normalize`/`to_extlang_form`
/// call only allocates its own scratch state, never reparsing the
/// registry. `Parser` is `Send + Sync` and meant to be built once per
/// process and shared.
#[derive(Debug, Clone)]
pub struct Parser {
    registry: Arc<Registry>,
}

impl Parser {
    /// Build a parser from a registry byte blob in IANA record-jar format.
    pub fn new(registry_bytes: &[u8]) -> Result<Self, RegistryError> {
        let registry = registry::parse(registry_bytes)?;
        Ok(Self {
            registry: Arc::new(registry),
        })
    }

    /// Build a parser from the registry excerpt compiled into this crate.
    /// Parses it once per process; subsequent calls reuse the cached
    /// [`Registry`].
    pub fn new_embedded() -> Self {
        let registry = EMBEDDED
            .get_or_init(|| Arc::new(registry::parse(EMBEDDED_REGISTRY).expect("embedded registry is well-formed")))
            .clone();
        Self { registry }
    }

    /// Well-formedness check only: accepts any tag conforming to the RFC
    /// 5646 ABNF, plus any tag matching a grandfathered/redundant record
    /// (preserved whole, flagged [`LanguageTag::is_grandfathered`]).
    pub fn parse(&self, input: &str) -> Result<LanguageTag, ParseError> {
        if !input.chars().all(is_langtag_char) {
            return Err(ParseError::ForbiddenChar);
        }
        if let Some(record) = lookup_whole_tag(&self.registry, input) {
            let canonical = record.tag.clone().unwrap_or_else(|| input.to_string());
            return Ok(render::whole(canonical, true));
        }
        let acc = state_machine::run(input, None)?;
        Ok(render::render(&acc, false))
    }

    /// Full validity check plus canonicalization: registry-backed subtag
    /// validation, the five canonicalization passes, then a confirming
    /// non-validating re-parse of the rendered result.
    pub fn parse_and_normalize(&self, input: &str) -> Result<LanguageTag, ParseError> {
        if !input.chars().all(is_langtag_char) {
            return Err(ParseError::ForbiddenChar);
        }
        if let Some(record) = lookup_whole_tag(&self.registry, input) {
            if let Some(preferred) = &record.preferred_value {
                return self.parse_and_normalize(preferred);
            }
            let canonical = record.tag.clone().unwrap_or_else(|| input.to_string());
            return Ok(render::whole(canonical, true));
        }

        let mut acc = state_machine::run(input, Some(&self.registry))?;
        canonicalize(&mut acc, &self.registry);
        let rendered = render::render(&acc, false);

        // Defensive re-parse: reconstruct offsets from the rendered string
        // and, should a malformed registry have produced an unparseable
        // canonical form, surface that failure instead of a bad LanguageTag.
        self.parse(rendered.as_str())
    }

    /// Convert a canonical tag to "extlang form": if the primary language
    /// is registered as an extlang with a recommended prefix, prepend that
    /// prefix. Grandfathered tags and tags without a primary language are
    /// returned unchanged.
    pub fn to_extlang_form(&self, tag: &LanguageTag) -> Result<LanguageTag, ParseError> {
        if tag.is_grandfathered() {
            return Ok(tag.clone());
        }
        let primary = tag.primary_language();
        if primary.is_empty() {
            return Ok(tag.clone());
        }
        let Some(record) = self.registry.get_component(RecordType::Extlang, primary) else {
            return Ok(tag.clone());
        };
        let Some(prefix) = record.prefix.first() else {
            return Ok(tag.clone());
        };
        let prefixed = format!("{prefix}-{}", tag.as_str());
        if !prefixed.chars().all(is_langtag_char) {
            return Err(ParseError::ForbiddenChar);
        }
        // Re-parse directly through the non-validating state machine rather
        // than `self.parse`: the latter also checks the whole-tag
        // grandfathered/redundant lookup, which would wrongly flag the
        // result as grandfathered if `prefixed` happened to collide with
        // such a record. Per spec, the extlang form always carries
        // `is_grandfathered = false`.
        let acc = state_machine::run(&prefixed, None)?;
        Ok(render::render(&acc, false))
    }
}

impl Default for Parser {
    /// Equivalent to [`Parser::new_embedded`].
    fn default() -> Self {
        Self::new_embedded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_registry() {
        assert_eq!(Parser::new(b"").err(), Some(RegistryError::EmptyRegistry));
    }

    // A crafted registry where the extlang form of "foo" ("bar-foo")
    // happens to also be a registered grandfathered tag. `to_extlang_form`
    // must still report `is_grandfathered() == false` per spec §4.6,
    // since it builds the result from the non-validating state machine
    // directly rather than `Parser::parse`'s whole-tag lookup.
    const COLLIDING_REGISTRY: &str = "\
Type: language
Subtag: bar
Description: Bar
Added: 2005-10-16
%%
Type: extlang
Subtag: foo
Description: Foo
Prefix: bar
Added: 2005-10-16
%%
Type: grandfathered
Tag: bar-foo
Description: Bar Foo
Added: 2005-10-16
";

    #[test]
    fn extlang_form_never_reports_grandfathered_even_on_collision() {
        let parser = Parser::new(COLLIDING_REGISTRY.as_bytes()).unwrap();
        let tag = parser.parse("foo").unwrap();
        let extlang_form = parser.to_extlang_form(&tag).unwrap();
        assert_eq!(extlang_form.as_str(), "bar-foo");
        assert!(!extlang_form.is_grandfathered());
    }
}
