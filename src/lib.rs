//! IANA-registry-backed parsing, validation and canonicalization of BCP 47
//! / RFC 5646 language tags.
//!
//! ```
//! use bcp47_tags::Parser;
//!
//! let parser = Parser::new_embedded();
//! let tag = parser.parse_and_normalize("en-latn-us").unwrap();
//! assert_eq!(tag.as_str(), "en-Latn-US");
//! ```
//!
//! Two entry points are provided on [`Parser`]:
//!
//! - [`Parser::parse`] only checks that a tag is well-formed per the RFC
//!   5646 ABNF (or matches a grandfathered/redundant registry record),
//!   without consulting the registry for subtag-level validity.
//! - [`Parser::parse_and_normalize`] additionally validates every subtag
//!   against the registry and rewrites the tag into canonical form:
//!   extlang promotion, deprecated-subtag replacement, variant reordering,
//!   suppressed-script removal and extension ordering.
//!
//! A [`Parser`] is built once from a registry blob (or the excerpt
//! compiled into this crate via [`Parser::new_embedded`]) and is cheap to
//! clone and safe to share across threads.

mod canonicalize;
mod chars;
mod error;
mod parser;
mod registry;
mod render;
mod state_machine;
mod tag;

#[cfg(feature = "serde")]
mod serde_impl;

pub use error::ParseError;
pub use parser::Parser;
pub use registry::{Record, RecordType, Registry, RegistryError};
pub use tag::{Extension, LanguageTag};
