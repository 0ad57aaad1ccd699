//! Errors raised while parsing or canonicalizing a language tag.

/// Errors returned by [`crate::Parser::parse`] and
/// [`crate::Parser::parse_and_normalize`].
#[derive(Debug, Clone, thiserror::Error, Eq, PartialEq)]
pub enum ParseError {
    /// The input contains a character outside `[A-Za-z0-9-]`.
    #[error("language tag contains a character outside [A-Za-z0-9-]")]
    ForbiddenChar,
    /// Two consecutive hyphens, or equivalent.
    #[error("subtag must not be empty")]
    EmptySubtag,
    /// A subtag is longer than eight characters.
    #[error("subtag {0:?} is longer than eight characters")]
    SubtagTooLong(String),
    /// A singleton (other than `x`) has no follow-on subtag.
    #[error("extension {0:?} has no subtags")]
    EmptyExtension(char),
    /// The `x` singleton has no follow-on subtag.
    #[error("private use section `x` has no subtags")]
    EmptyPrivateUse,
    /// The first subtag fails format or registry validation.
    #[error("{0:?} is not a valid primary language subtag")]
    InvalidLanguage(String),
    /// A non-first subtag matches no category.
    #[error("{0:?} is not a valid subtag in this position")]
    InvalidSubtag(String),
    /// More than one extlang subtag was present.
    #[error("at most one extended language subtag is allowed")]
    TooManyExtlangs,
    /// The same variant subtag appears twice.
    #[error("variant {0:?} appears more than once")]
    DuplicateVariant(String),
    /// The same extension singleton appears twice.
    #[error("extension singleton {0:?} appears more than once")]
    DuplicateSingleton(char),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_non_empty() {
        assert!(!ParseError::ForbiddenChar.to_string().is_empty());
        assert!(!ParseError::TooManyExtlangs.to_string().is_empty());
    }
}
