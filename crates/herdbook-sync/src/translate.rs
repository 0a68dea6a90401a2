//! Translation merging.
//!
//! Merges one localization key across every available language into a
//! record's translation map. Values are normalized (surrounding whitespace
//! trimmed, the game's `|` display-control marker stripped) and a record's
//! `locked` flag keeps hand-corrected entries from being overwritten by
//! fresh extraction data.

use herdbook_extract::LocaleSource;
use herdbook_store::Translations;

/// What the merged string is, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationKind {
    Name,
    Description,
    AltName,
    CategoryName,
}

impl TranslationKind {
    fn label(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Description => "description",
            Self::AltName => "alt name",
            Self::CategoryName => "category name",
        }
    }
}

fn normalize(value: &str) -> String {
    value.trim().replace('|', "")
}

/// Merge `key` from every source into `existing`.
///
/// Postconditions: every source's language has an entry, and no stored value
/// contains `|`. A missing key is reported once per call, not once per
/// source. When `locked`, non-empty stored entries survive (normalized);
/// otherwise a differing stored value is reported and overwritten.
pub fn merge_translations(
    key: &str,
    sources: &[&dyn LocaleSource],
    existing: &mut Translations,
    kind: TranslationKind,
    locked: bool,
) {
    let mut missing_reported = false;
    for source in sources {
        let language = source.language().to_lowercase();
        let translated = source.lookup(key);
        if translated.is_none() && !missing_reported {
            tracing::warn!(key = %key, kind = kind.label(), "no translation for key");
            missing_reported = true;
        }
        let incoming = normalize(translated.unwrap_or_default());

        let current = existing.get(&language).cloned();
        match current {
            Some(current) if locked && !current.is_empty() => {
                let kept = normalize(&current);
                if kept != incoming {
                    tracing::info!(
                        key = %key,
                        language = %language,
                        kept = %kept,
                        ignored = %incoming,
                        kind = kind.label(),
                        "locked entry keeps stored value"
                    );
                }
                existing.insert(language, kept);
            }
            Some(current) => {
                let current = normalize(&current);
                if current != incoming {
                    tracing::info!(
                        key = %key,
                        language = %language,
                        old = %current,
                        new = %incoming,
                        kind = kind.label(),
                        "translation changed"
                    );
                }
                existing.insert(language, incoming);
            }
            None => {
                existing.insert(language, incoming);
            }
        }
    }
}
