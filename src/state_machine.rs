//! The tag parsing state machine: syntactic acceptance (`Parse`) plus
//! optional registry-backed semantic validation (`ParseAndNormalize`).

use crate::chars::{is_alphabetic, is_alphanumeric, is_langtag_char, is_numeric};
use crate::error::ParseError;
use crate::registry::{Record, RecordType, Registry};
use crate::tag::Extension;

/// Structured, not-yet-rendered view of a tag's components. Canonicalization
/// operates on this; rendering turns it into the final `LanguageTag`.
#[derive(Debug, Clone, Default)]
pub(crate) struct Accumulator {
    pub(crate) language: Option<String>,
    pub(crate) extlangs: Vec<String>,
    pub(crate) script: Option<String>,
    pub(crate) region: Option<String>,
    pub(crate) variants: Vec<String>,
    pub(crate) extensions: Vec<Extension>,
    pub(crate) private_use: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    AfterLanguage,
    AfterExtLang,
    AfterScript,
    AfterRegion,
    InVariant,
    InExtension { expected: bool },
    InPrivateUse,
}

/// Split on `-`; report whether a trailing hyphen left an empty final
/// token (stripped for processing, remembered for the end-of-input check).
fn tokenize(input: &str) -> (Vec<&str>, bool) {
    let mut tokens: Vec<&str> = input.split('-').collect();
    let trailing = tokens.last().is_some_and(|t| t.is_empty());
    if trailing {
        tokens.pop();
    }
    (tokens, trailing)
}

/// Run the state machine over `input`. When `registry` is `Some`, every
/// subtag category that has one is checked against it (`ParseAndNormalize`
/// semantics); when `None`, only format and state gates apply (`Parse`
/// semantics).
pub(crate) fn run(input: &str, registry: Option<&Registry>) -> Result<Accumulator, ParseError> {
    if !input.chars().all(is_langtag_char) {
        return Err(ParseError::ForbiddenChar);
    }

    let (tokens, _trailing_hyphen) = tokenize(input);

    if tokens.is_empty() {
        return Err(ParseError::EmptySubtag);
    }

    // Private-use-only short circuit: `x`/`X` as the very first subtag.
    if tokens[0].eq_ignore_ascii_case("x") {
        let mut private_use = Vec::new();
        for subtag in &tokens[1..] {
            check_generic(subtag)?;
            private_use.push(subtag.to_ascii_lowercase());
        }
        if private_use.is_empty() {
            return Err(ParseError::EmptyPrivateUse);
        }
        return Ok(Accumulator {
            private_use,
            ..Accumulator::default()
        });
    }

    let mut acc = Accumulator::default();
    let mut state = State::Start;
    let mut seen_singletons: Vec<char> = Vec::new();

    for (index, subtag) in tokens.iter().enumerate() {
        check_generic(subtag)?;

        if index == 0 {
            let valid_format = if registry.is_some() {
                (2..=8).contains(&subtag.len()) && is_alphabetic(subtag)
            } else {
                (1..=8).contains(&subtag.len()) && is_alphabetic(subtag)
            };
            let registered = registry
                .map(|r| r.get_component(RecordType::Language, subtag).is_some())
                .unwrap_or(true);
            if !valid_format || !registered {
                return Err(ParseError::InvalidLanguage((*subtag).to_string()));
            }
            acc.language = Some(subtag.to_ascii_lowercase());
            state = if subtag.len() <= 3 {
                State::AfterLanguage
            } else {
                State::AfterExtLang
            };
            continue;
        }

        if state == State::InPrivateUse {
            acc.private_use.push(subtag.to_ascii_lowercase());
            continue;
        }

        if subtag.len() == 1 {
            if let State::InExtension { expected: true } = state {
                return Err(ParseError::EmptyExtension(seen_singletons.last().copied().unwrap_or('?')));
            }
            let singleton = subtag.chars().next().unwrap().to_ascii_lowercase();
            if singleton == 'x' {
                state = State::InPrivateUse;
                continue;
            }
            if registry.is_some() && seen_singletons.contains(&singleton) {
                return Err(ParseError::DuplicateSingleton(singleton));
            }
            seen_singletons.push(singleton);
            acc.extensions.push(Extension {
                singleton,
                value: String::new(),
            });
            state = State::InExtension { expected: true };
            continue;
        }

        match state {
            State::InExtension { .. } => {
                if !is_alphanumeric(subtag) {
                    return Err(ParseError::InvalidSubtag((*subtag).to_string()));
                }
                let ext = acc.extensions.last_mut().expect("extension section open");
                if !ext.value.is_empty() {
                    ext.value.push('-');
                }
                ext.value.extend(subtag.chars().map(|c| c.to_ascii_lowercase()));
                state = State::InExtension { expected: false };
            }
            _ => {
                state = dispatch(&mut acc, subtag, state, registry)?;
            }
        }
    }

    if let State::InExtension { expected: true } = state {
        return Err(ParseError::EmptyExtension(seen_singletons.last().copied().unwrap_or('?')));
    }
    if state == State::InPrivateUse && acc.private_use.is_empty() {
        return Err(ParseError::EmptyPrivateUse);
    }

    Ok(acc)
}

fn check_generic(subtag: &str) -> Result<(), ParseError> {
    if subtag.is_empty() {
        return Err(ParseError::EmptySubtag);
    }
    if subtag.len() > 8 {
        return Err(ParseError::SubtagTooLong(subtag.to_string()));
    }
    Ok(())
}

/// Dispatch a non-first, non-singleton, non-extension/private-use subtag
/// through extlang -> script -> region -> variant, in that order.
fn dispatch(
    acc: &mut Accumulator,
    subtag: &str,
    state: State,
    registry: Option<&Registry>,
) -> Result<State, ParseError> {
    let after_language_ish = matches!(state, State::AfterLanguage | State::AfterExtLang);

    // An already-consumed extlang blocks a second one outright, even though
    // the extlang format gate below would also reject it by state alone.
    if after_language_ish
        && subtag.len() == 3
        && is_alphabetic(subtag)
        && !acc.extlangs.is_empty()
    {
        return Err(ParseError::TooManyExtlangs);
    }

    // extlang
    if state == State::AfterLanguage
        && subtag.len() == 3
        && is_alphabetic(subtag)
        && acc.extlangs.is_empty()
        && registry_ok(registry, RecordType::Extlang, subtag)
    {
        acc.extlangs.push(subtag.to_ascii_lowercase());
        return Ok(State::AfterExtLang);
    }

    // script
    if matches!(state, State::AfterLanguage | State::AfterExtLang)
        && subtag.len() == 4
        && is_alphabetic(subtag)
        && registry_ok(registry, RecordType::Script, subtag)
    {
        acc.script = Some(title_case(subtag));
        return Ok(State::AfterScript);
    }

    // region
    if matches!(
        state,
        State::AfterLanguage | State::AfterExtLang | State::AfterScript
    ) && ((subtag.len() == 2 && is_alphabetic(subtag)) || (subtag.len() == 3 && is_numeric(subtag)))
        && registry_ok(registry, RecordType::Region, subtag)
    {
        acc.region = Some(subtag.to_ascii_uppercase());
        return Ok(State::AfterRegion);
    }

    // variant
    let variant_state_ok = if registry.is_some() {
        matches!(
            state,
            State::AfterLanguage
                | State::AfterExtLang
                | State::AfterScript
                | State::AfterRegion
                | State::InVariant
        )
    } else {
        matches!(state, State::AfterRegion | State::InVariant)
    };
    let variant_format_ok = if registry.is_some() {
        is_alphanumeric(subtag)
            && ((subtag.len() >= 5 && is_alphabetic(&subtag[0..1]))
                || (subtag.len() >= 4 && is_numeric(&subtag[0..1])))
    } else {
        is_alphanumeric(subtag)
    };
    if variant_state_ok
        && variant_format_ok
        && registry_ok(registry, RecordType::Variant, subtag)
    {
        if acc
            .variants
            .iter()
            .any(|v| v.eq_ignore_ascii_case(subtag))
        {
            return Err(ParseError::DuplicateVariant(subtag.to_string()));
        }
        acc.variants.push(subtag.to_ascii_lowercase());
        return Ok(State::InVariant);
    }

    Err(ParseError::InvalidSubtag(subtag.to_string()))
}

fn registry_ok(registry: Option<&Registry>, kind: RecordType, subtag: &str) -> bool {
    match registry {
        None => true,
        Some(r) => r.get_component(kind, subtag).is_some(),
    }
}

fn title_case(s: &str) -> String {
    crate::chars::to_titlecase(s).collect()
}

/// Look up a whole-tag grandfathered/redundant record, case-insensitively.
pub(crate) fn lookup_whole_tag<'a>(registry: &'a Registry, input: &str) -> Option<&'a Record> {
    registry.get_tag(input).filter(|r| r.is_grandfathered())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forbidden_char_rejected() {
        assert_eq!(run("en_US", None), Err(ParseError::ForbiddenChar));
    }

    #[test]
    fn non_validating_accepts_unregistered_language() {
        let acc = run("qq-Zzzz", None).unwrap();
        assert_eq!(acc.language.as_deref(), Some("qq"));
        assert_eq!(acc.script.as_deref(), Some("Zzzz"));
    }

    #[test]
    fn private_use_only_short_circuit() {
        let acc = run("x-whatever", None).unwrap();
        assert_eq!(acc.private_use, vec!["whatever"]);
        assert!(acc.language.is_none());
    }

    #[test]
    fn empty_private_use_errors() {
        assert_eq!(run("x-", None), Err(ParseError::EmptyPrivateUse));
        assert_eq!(run("x", None), Err(ParseError::EmptyPrivateUse));
    }

    #[test]
    fn single_character_private_use_subtag_is_appended_not_reopened() {
        let acc = run("en-x-a", None).unwrap();
        assert_eq!(acc.language.as_deref(), Some("en"));
        assert_eq!(acc.private_use, vec!["a"]);
        assert!(acc.extensions.is_empty());
    }
}
