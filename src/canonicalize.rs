//! The five ordered canonicalization passes applied after a validating
//! parse, in `ParseAndNormalize`. Order matters: later passes observe the
//! results of earlier ones.

use crate::registry::{RecordType, Registry};
use crate::state_machine::Accumulator;

pub(crate) fn canonicalize(acc: &mut Accumulator, registry: &Registry) {
    promote_extlang(acc, registry);
    replace_deprecated(acc, registry);
    reorder_variants(acc, registry);
    suppress_script(acc, registry);
    order_extensions(acc);
}

/// Pass 1: if the first extlang's registry record has a prefix matching the
/// current primary language and a preferred value, promote it to primary
/// language and drop the extlang.
fn promote_extlang(acc: &mut Accumulator, registry: &Registry) {
    let Some(first) = acc.extlangs.first() else {
        return;
    };
    let Some(record) = registry.get_component(RecordType::Extlang, first) else {
        return;
    };
    let Some(language) = &acc.language else {
        return;
    };
    let prefix_matches = record
        .prefix
        .iter()
        .any(|p| p.eq_ignore_ascii_case(language));
    if !prefix_matches {
        return;
    }
    let Some(preferred) = &record.preferred_value else {
        return;
    };
    acc.language = Some(preferred.to_ascii_lowercase());
    acc.extlangs.remove(0);
}

/// Pass 2: replace deprecated language/script/region/variant subtags with
/// their registry preferred value, when one exists.
fn replace_deprecated(acc: &mut Accumulator, registry: &Registry) {
    if let Some(language) = &acc.language {
        if let Some(replacement) = preferred_value(registry, RecordType::Language, language) {
            acc.language = Some(replacement.to_ascii_lowercase());
        }
    }
    if let Some(script) = &acc.script {
        if let Some(replacement) = preferred_value(registry, RecordType::Script, script) {
            acc.script = Some(replacement);
        }
    }
    if let Some(region) = &acc.region {
        if let Some(replacement) = preferred_value(registry, RecordType::Region, region) {
            acc.region = Some(replacement.to_ascii_uppercase());
        }
    }
    for variant in &mut acc.variants {
        if let Some(replacement) = preferred_value(registry, RecordType::Variant, variant) {
            *variant = replacement.to_ascii_lowercase();
        }
    }
}

fn preferred_value(registry: &Registry, kind: RecordType, subtag: &str) -> Option<String> {
    registry
        .get_component(kind, subtag)
        .and_then(|r| r.preferred_value.clone())
        .filter(|v| !v.is_empty())
}

/// Pass 3: reorder variants by prefix dependency (a variant whose registry
/// prefix names another present variant must come after it), then by
/// "has a prefix record at all", then alphabetically.
fn reorder_variants(acc: &mut Accumulator, registry: &Registry) {
    let variants = acc.variants.clone();
    let depends_on = |a: &str, b: &str| -> bool {
        registry
            .get_component(RecordType::Variant, a)
            .map(|r| {
                r.prefix.iter().any(|p| {
                    p.split('-').any(|part| part.eq_ignore_ascii_case(b))
                })
            })
            .unwrap_or(false)
    };
    let has_prefix = |a: &str| -> bool {
        registry
            .get_component(RecordType::Variant, a)
            .map(|r| !r.prefix.is_empty())
            .unwrap_or(false)
    };

    acc.variants.sort_by(|a, b| {
        if depends_on(a, b) {
            return std::cmp::Ordering::Greater;
        }
        if depends_on(b, a) {
            return std::cmp::Ordering::Less;
        }
        match (has_prefix(a), has_prefix(b)) {
            (true, false) => std::cmp::Ordering::Less,
            (false, true) => std::cmp::Ordering::Greater,
            _ => a.cmp(b),
        }
    });
    debug_assert_eq!(acc.variants.len(), variants.len());
}

/// Pass 4: drop the script if the primary language's registry record names
/// it as the suppressed default script.
fn suppress_script(acc: &mut Accumulator, registry: &Registry) {
    let (Some(language), Some(script)) = (&acc.language, &acc.script) else {
        return;
    };
    if let Some(record) = registry.get_component(RecordType::Language, language) {
        if let Some(suppressed) = &record.suppress_script {
            if suppressed.eq_ignore_ascii_case(script) {
                acc.script = None;
            }
        }
    }
}

/// Pass 5: stable sort extensions by ascending singleton.
fn order_extensions(acc: &mut Accumulator) {
    acc.extensions.sort_by_key(|e| e.singleton);
}
