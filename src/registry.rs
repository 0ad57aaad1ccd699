//! The IANA Language Subtag Registry: its record shape, a tolerant
//! record-jar reader, and subtag/tag range expansion.

use std::collections::HashMap;
use std::fmt;

/// Upper bound on the number of records a single numeric range may expand
/// into. Matches the registry's own largest `NNN..NNN` region ranges with
/// generous headroom; guards against a corrupt or hostile registry blob
/// exhausting memory during load.
const MAX_NUMERIC_RANGE: u32 = 20_000;

/// Upper bound on the number of records a single alphabetic range may
/// expand into (26^3, the largest fully-expanded 3-letter range, with
/// headroom).
const MAX_ALPHABETIC_RANGE: u32 = 40_000;

/// The kind of a registry record, per the `Type:` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    Language,
    Extlang,
    Script,
    Region,
    Variant,
    Grandfathered,
    Redundant,
    PrivateUse,
}

impl RecordType {
    fn parse(s: &str) -> Option<Self> {
        Some(match s.to_ascii_lowercase().as_str() {
            "language" => Self::Language,
            "extlang" => Self::Extlang,
            "script" => Self::Script,
            "region" => Self::Region,
            "variant" => Self::Variant,
            "grandfathered" => Self::Grandfathered,
            "redundant" => Self::Redundant,
            "private-use" | "privateuse" => Self::PrivateUse,
            _ => return None,
        })
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Language => "language",
            Self::Extlang => "extlang",
            Self::Script => "script",
            Self::Region => "region",
            Self::Variant => "variant",
            Self::Grandfathered => "grandfathered",
            Self::Redundant => "redundant",
            Self::PrivateUse => "private-use",
        })
    }
}

/// One IANA registry entry.
#[derive(Debug, Clone, Default)]
pub struct Record {
    pub r#type: Option<RecordType>,
    pub subtag: Option<String>,
    pub tag: Option<String>,
    pub description: Vec<String>,
    pub added: Option<String>,
    pub deprecated: Option<String>,
    pub preferred_value: Option<String>,
    pub prefix: Vec<String>,
    pub suppress_script: Option<String>,
    pub macrolanguage: Option<String>,
    pub scope: Option<String>,
    pub comments: Vec<String>,
}

impl Record {
    pub fn is_grandfathered(&self) -> bool {
        matches!(
            self.r#type,
            Some(RecordType::Grandfathered) | Some(RecordType::Redundant)
        )
    }
}

/// A parsed registry: the `File-Date` header and every record, keyed by
/// `lowercase(type):lowercase(subtag)` for component records or
/// `lowercase(tag)` for grandfathered/redundant records.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    pub file_date: Option<String>,
    records: HashMap<String, Record>,
}

impl Registry {
    pub fn get_component(&self, r#type: RecordType, subtag: &str) -> Option<&Record> {
        self.records
            .get(&format!("{}:{}", r#type, subtag.to_ascii_lowercase()))
    }

    pub fn get_tag(&self, tag: &str) -> Option<&Record> {
        self.records.get(&tag.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn key_for(record: &Record) -> Option<String> {
        if record.is_grandfathered() {
            record.tag.as_ref().map(|t| t.to_ascii_lowercase())
        } else {
            let r#type = record.r#type?;
            let subtag = record.subtag.as_ref()?;
            Some(format!("{}:{}", r#type, subtag.to_ascii_lowercase()))
        }
    }

    fn insert(&mut self, record: Record) {
        if let Some(key) = Self::key_for(&record) {
            self.records.insert(key, record);
        }
    }
}

/// Errors raised while loading a registry blob.
#[derive(Debug, thiserror::Error, Eq, PartialEq)]
pub enum RegistryError {
    #[error("registry blob is empty")]
    EmptyRegistry,
    #[error("registry is not valid UTF-8")]
    NotUtf8,
    #[error("malformed field line: {0:?}")]
    InvalidFieldLine(String),
    #[error("malformed range: {0:?}")]
    MalformedRange(String),
    #[error("range {0:?} is descending (start > end)")]
    RangeDescending(String),
    #[error("range {0:?} expands to more records than allowed")]
    RangeTooLarge(String),
}

/// Parse an IANA-registry-shaped record-jar byte stream into a [`Registry`].
pub fn parse(bytes: &[u8]) -> Result<Registry, RegistryError> {
    if bytes.is_empty() {
        return Err(RegistryError::EmptyRegistry);
    }
    let text = std::str::from_utf8(bytes).map_err(|_| RegistryError::NotUtf8)?;

    let mut registry = Registry::default();
    let mut fields: HashMap<String, Vec<String>> = HashMap::new();
    let mut last_field: Option<String> = None;
    let mut seen_first_record = false;

    for line in text.lines() {
        if line == "%%" {
            close_record(&mut registry, &mut fields)?;
            last_field = None;
            seen_first_record = true;
            continue;
        }
        if line.starts_with(' ') || line.starts_with('\t') {
            // Continuation: fold into the most recent value of the last field.
            let Some(name) = last_field.clone() else {
                return Err(RegistryError::InvalidFieldLine(line.to_string()));
            };
            let trimmed = line.trim();
            if let Some(values) = fields.get_mut(&name) {
                if let Some(last) = values.last_mut() {
                    if !last.is_empty() && !trimmed.is_empty() {
                        last.push(' ');
                    }
                    last.push_str(trimmed);
                }
            }
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }
        let Some((name, body)) = line.split_once(':') else {
            return Err(RegistryError::InvalidFieldLine(line.to_string()));
        };
        let name = name.trim().to_ascii_lowercase();
        let body = body.trim().to_string();

        if name == "file-date" && !seen_first_record {
            registry.file_date = Some(body);
            last_field = None;
            continue;
        }

        fields.entry(name.clone()).or_default().push(body);
        last_field = Some(name);
    }
    close_record(&mut registry, &mut fields)?;

    Ok(registry)
}

fn close_record(
    registry: &mut Registry,
    fields: &mut HashMap<String, Vec<String>>,
) -> Result<(), RegistryError> {
    if fields.is_empty() {
        return Ok(());
    }
    let taken = std::mem::take(fields);
    let record = build_record(taken);

    let range_subtag = record.subtag.as_deref().filter(|s| s.contains(".."));
    let range_tag = record.tag.as_deref().filter(|s| s.contains(".."));

    if let Some(range) = range_subtag {
        for subtag in expand_range(range)? {
            let mut clone = record.clone();
            clone.subtag = Some(subtag);
            registry.insert(clone);
        }
    } else if let Some(range) = range_tag {
        for tag in expand_range(range)? {
            let mut clone = record.clone();
            clone.tag = Some(tag);
            registry.insert(clone);
        }
    } else {
        registry.insert(record);
    }
    Ok(())
}

fn build_record(fields: HashMap<String, Vec<String>>) -> Record {
    let mut record = Record::default();
    for (name, mut values) in fields {
        match name.as_str() {
            "type" => record.r#type = values.pop().and_then(|v| RecordType::parse(&v)),
            "subtag" => record.subtag = values.pop(),
            "tag" => record.tag = values.pop(),
            "description" => record.description = values,
            "added" => record.added = values.pop(),
            "deprecated" => record.deprecated = values.pop(),
            "preferred-value" => record.preferred_value = values.pop(),
            "prefix" => record.prefix = values,
            "suppress-script" => record.suppress_script = values.pop(),
            "macrolanguage" => record.macrolanguage = values.pop(),
            "scope" => record.scope = values.pop(),
            "comments" => record.comments = values,
            _ => {} // unknown fields are ignored silently
        }
    }
    record
}

/// Expand a `start..end` range into its individual (still-cased) values.
fn expand_range(range: &str) -> Result<Vec<String>, RegistryError> {
    let Some((start, end)) = range.split_once("..") else {
        return Err(RegistryError::MalformedRange(range.to_string()));
    };
    if start.is_empty() || end.is_empty() || start.len() != end.len() {
        return Err(RegistryError::MalformedRange(range.to_string()));
    }

    if start.chars().all(|c| c.is_ascii_digit()) && end.chars().all(|c| c.is_ascii_digit()) {
        let width = start.len();
        let start_n: u64 = start.parse().map_err(|_| RegistryError::MalformedRange(range.to_string()))?;
        let end_n: u64 = end.parse().map_err(|_| RegistryError::MalformedRange(range.to_string()))?;
        if start_n > end_n {
            return Err(RegistryError::RangeDescending(range.to_string()));
        }
        if end_n - start_n > MAX_NUMERIC_RANGE as u64 {
            return Err(RegistryError::RangeTooLarge(range.to_string()));
        }
        return Ok((start_n..=end_n).map(|n| format!("{:0width$}", n, width = width)).collect());
    }

    if start.chars().all(|c| c.is_ascii_alphabetic()) && end.chars().all(|c| c.is_ascii_alphabetic())
    {
        let lower_start = start.to_ascii_lowercase();
        let lower_end = end.to_ascii_lowercase();
        if lower_start > lower_end {
            return Err(RegistryError::RangeDescending(range.to_string()));
        }
        let mut out = Vec::new();
        let mut current: Vec<u8> = lower_start.as_bytes().to_vec();
        let end_bytes = lower_end.as_bytes();
        loop {
            out.push(String::from_utf8(current.clone()).expect("ascii"));
            if current.as_slice() == end_bytes {
                break;
            }
            if out.len() as u32 > MAX_ALPHABETIC_RANGE {
                return Err(RegistryError::RangeTooLarge(range.to_string()));
            }
            increment_base26(&mut current);
        }
        return Ok(out);
    }

    Err(RegistryError::MalformedRange(range.to_string()))
}

/// Base-26 increment over ASCII lowercase letters, carrying `z` -> `a`
/// right to left.
fn increment_base26(value: &mut [u8]) {
    for byte in value.iter_mut().rev() {
        if *byte == b'z' {
            *byte = b'a';
        } else {
            *byte += 1;
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
File-Date: 2024-05-09
%%
Type: language
Subtag: en
Description: English
Added: 2005-10-16
%%
Type: language
Subtag: de
Description: German
  with a continuation
Added: 2005-10-16
%%
Type: region
Subtag: 001..003
Description: Region NNN
Added: 2005-10-16
%%
Type: extlang
Subtag: qaa..qac
Description: Private use extlang NNN
Prefix: und
Added: 2009-07-29
";

    #[test]
    fn loads_file_date_and_records() {
        let registry = parse(SAMPLE.as_bytes()).unwrap();
        assert_eq!(registry.file_date.as_deref(), Some("2024-05-09"));
        assert!(registry.get_component(RecordType::Language, "en").is_some());
    }

    #[test]
    fn folds_continuation_lines() {
        let registry = parse(SAMPLE.as_bytes()).unwrap();
        let de = registry.get_component(RecordType::Language, "de").unwrap();
        assert_eq!(de.description, vec!["German with a continuation"]);
    }

    #[test]
    fn expands_numeric_range() {
        let registry = parse(SAMPLE.as_bytes()).unwrap();
        for code in ["001", "002", "003"] {
            assert!(registry.get_component(RecordType::Region, code).is_some());
        }
        assert!(registry.get_component(RecordType::Region, "004").is_none());
    }

    #[test]
    fn expands_alphabetic_range() {
        let registry = parse(SAMPLE.as_bytes()).unwrap();
        for code in ["qaa", "qab", "qac"] {
            assert!(registry.get_component(RecordType::Extlang, code).is_some());
        }
        assert!(registry.get_component(RecordType::Extlang, "qad").is_none());
    }

    #[test]
    fn empty_registry_is_an_error() {
        assert_eq!(parse(b""), Err(RegistryError::EmptyRegistry));
    }

    #[test]
    fn descending_range_is_rejected() {
        assert_eq!(
            expand_range("003..001"),
            Err(RegistryError::RangeDescending("003..001".to_string()))
        );
    }

    #[test]
    fn mixed_range_is_rejected() {
        assert!(matches!(
            expand_range("aa..01"),
            Err(RegistryError::MalformedRange(_))
        ));
    }
}
