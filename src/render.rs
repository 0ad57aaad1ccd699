//! Renders an [`Accumulator`] into its canonical string form and computes
//! the six component end-offsets in one pass.

use crate::state_machine::Accumulator;
use crate::tag::LanguageTag;

pub(crate) fn render(acc: &Accumulator, is_grandfathered: bool) -> LanguageTag {
    let mut tag = String::new();

    if let Some(language) = &acc.language {
        tag.push_str(language);
    }
    let language_end = tag.len();

    for extlang in &acc.extlangs {
        tag.push('-');
        tag.push_str(extlang);
    }
    let extlang_end = tag.len();

    if let Some(script) = &acc.script {
        tag.push('-');
        tag.push_str(script);
    }
    let script_end = tag.len();

    if let Some(region) = &acc.region {
        tag.push('-');
        tag.push_str(region);
    }
    let region_end = tag.len();

    for variant in &acc.variants {
        tag.push('-');
        tag.push_str(variant);
    }
    let variant_end = tag.len();

    for extension in &acc.extensions {
        tag.push('-');
        tag.push(extension.singleton);
        if !extension.value.is_empty() {
            tag.push('-');
            tag.push_str(&extension.value);
        }
    }
    let extension_end = tag.len();

    if !acc.private_use.is_empty() {
        if tag.is_empty() {
            tag.push('x');
        } else {
            tag.push_str("-x");
        }
        for subtag in &acc.private_use {
            tag.push('-');
            tag.push_str(subtag);
        }
    }

    LanguageTag {
        tag,
        language_end,
        extlang_end,
        script_end,
        region_end,
        variant_end,
        extension_end,
        extensions: acc.extensions.clone(),
        is_grandfathered,
    }
}

/// Build a [`LanguageTag`] for a grandfathered/redundant whole-tag match:
/// the registry's stored casing is preserved verbatim and every offset
/// points past the end, since these tags aren't decomposed into the usual
/// language/script/region/variant components.
pub(crate) fn whole(tag: String, is_grandfathered: bool) -> LanguageTag {
    let end = tag.len();
    LanguageTag {
        tag,
        language_end: end,
        extlang_end: end,
        script_end: end,
        region_end: end,
        variant_end: end,
        extension_end: end,
        extensions: Vec::new(),
        is_grandfathered,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::Extension;

    #[test]
    fn renders_private_use_only_tag() {
        let acc = Accumulator {
            private_use: vec!["whatever".to_string()],
            ..Accumulator::default()
        };
        let tag = render(&acc, false);
        assert_eq!(tag.as_str(), "x-whatever");
        assert_eq!(tag.language_end, 0);
        assert_eq!(tag.extension_end, 0);
    }

    #[test]
    fn renders_full_tag_with_extensions() {
        let acc = Accumulator {
            language: Some("en".to_string()),
            extensions: vec![
                Extension {
                    singleton: 'a',
                    value: "aaa".to_string(),
                },
                Extension {
                    singleton: 'b',
                    value: "ccc".to_string(),
                },
            ],
            ..Accumulator::default()
        };
        let tag = render(&acc, false);
        assert_eq!(tag.as_str(), "en-a-aaa-b-ccc");
    }

    #[test]
    fn whole_preserves_casing_and_flags_grandfathered() {
        let tag = whole("i-klingon".to_string(), true);
        assert_eq!(tag.as_str(), "i-klingon");
        assert!(tag.is_grandfathered());
        assert_eq!(tag.primary_language(), "i-klingon");
    }
}
