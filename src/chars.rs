//! ASCII character and string predicates shared by the registry parser and
//! the tag state machine, plus the title-case writer used by the renderer.

use std::iter::once;

pub(crate) fn is_alphabetic(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic())
}

pub(crate) fn is_numeric(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

pub(crate) fn is_alphanumeric(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric())
}

/// `[A-Za-z0-9-]`, used for the whole-input pre-pass.
pub(crate) fn is_langtag_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-'
}

pub(crate) fn to_lowercase(s: &str) -> impl Iterator<Item = char> + '_ {
    s.chars().map(|c| c.to_ascii_lowercase())
}

pub(crate) fn to_uppercase(s: &str) -> impl Iterator<Item = char> + '_ {
    s.chars().map(|c| c.to_ascii_uppercase())
}

/// First byte uppercase, remaining bytes lowercase. Panics on an empty
/// string; every caller only ever passes an already-validated subtag.
pub(crate) fn to_titlecase(s: &str) -> impl Iterator<Item = char> + '_ {
    let mut chars = s.chars();
    let first = chars
        .next()
        .expect("titlecase writer requires a non-empty subtag")
        .to_ascii_uppercase();
    once(first).chain(chars.map(|c| c.to_ascii_lowercase()))
}
