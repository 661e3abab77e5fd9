//! Android resource directory names → locale identifiers.
//!
//! `values` is the default configuration and maps to `Base`. Locale-qualified
//! directories (`values-fr`, `values-pt-rBR`, `values-b+sr+Latn`) collapse to
//! a plain tag (`fr`, `pt-BR`, `sr-Latn`) which is then run through the
//! [`LocaleMapping`] override table. Any other qualifier (`values-night`,
//! `values-v21`, `values-fr-land`, …) is not a locale directory.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use unic_langid::LanguageIdentifier;

use crate::types::BASE_LOCALE;

/// Prefix shared by all Android value directories.
pub const VALUES_DIR: &str = "values";

/// Overrides from collapsed Android tags to the identifiers used on output.
///
/// Deserializes from a table such as:
///
/// ```toml
/// [overrides]
/// "zh-HK" = "zh-Hant"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleMapping {
    #[serde(default)]
    pub overrides: BTreeMap<String, String>,
}

impl Default for LocaleMapping {
    fn default() -> Self {
        let overrides = [
            ("zh-TW", "zh-Hant"),
            ("zh-CN", "zh-Hans"),
            ("zh-HK", "zh-Hant_HK"),
        ]
        .into_iter()
        .map(|(from, to)| (from.to_string(), to.to_string()))
        .collect();
        Self { overrides }
    }
}

impl LocaleMapping {
    /// A mapping with no overrides at all.
    pub fn empty() -> Self {
        Self {
            overrides: BTreeMap::new(),
        }
    }

    /// Layers `other` over `self`; `other` wins on conflicts.
    pub fn merged_with(mut self, other: LocaleMapping) -> Self {
        self.overrides.extend(other.overrides);
        self
    }

    /// Maps an Android resource directory name to a locale identifier.
    ///
    /// Returns `None` for directories that are not plain locale directories.
    pub fn locale_for_dir(&self, dir_name: &str) -> Option<String> {
        if dir_name == VALUES_DIR {
            return Some(BASE_LOCALE.to_string());
        }
        let qualifier = dir_name.strip_prefix(VALUES_DIR)?.strip_prefix('-')?;
        let tag = collapse_qualifier(qualifier)?;
        let mapped = self.overrides.get(&tag).cloned().unwrap_or(tag);
        is_valid_identifier(&mapped).then_some(mapped)
    }
}

/// `fr` → `fr`, `pt-rBR` → `pt-BR`, `b+sr+Latn+RS` → `sr-Latn-RS`.
fn collapse_qualifier(qualifier: &str) -> Option<String> {
    if let Some(bcp47) = qualifier.strip_prefix("b+") {
        let subtags: Vec<&str> = bcp47.split('+').collect();
        if subtags.iter().any(|s| s.is_empty()) {
            return None;
        }
        return Some(subtags.join("-"));
    }

    let mut parts = qualifier.split('-');
    let language = parts.next()?;
    if !(2..=3).contains(&language.len()) || !language.bytes().all(|b| b.is_ascii_lowercase()) {
        return None;
    }
    match (parts.next(), parts.next()) {
        (None, _) => Some(language.to_string()),
        (Some(region), None) => {
            let region = region.strip_prefix('r')?;
            let valid = (region.len() == 2 && region.bytes().all(|b| b.is_ascii_uppercase()))
                || (region.len() == 3 && region.bytes().all(|b| b.is_ascii_digit()));
            valid.then(|| format!("{}-{}", language, region))
        }
        _ => None,
    }
}

/// Identifiers are validated as BCP 47 after turning `_` into `-`.
fn is_valid_identifier(locale: &str) -> bool {
    locale.replace('_', "-").parse::<LanguageIdentifier>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directory_is_base() {
        let mapping = LocaleMapping::default();
        assert_eq!(mapping.locale_for_dir("values").as_deref(), Some("Base"));
    }

    #[test]
    fn test_language_and_region() {
        let mapping = LocaleMapping::default();
        assert_eq!(mapping.locale_for_dir("values-fr").as_deref(), Some("fr"));
        assert_eq!(mapping.locale_for_dir("values-pt-rBR").as_deref(), Some("pt-BR"));
        assert_eq!(mapping.locale_for_dir("values-es-r419").as_deref(), Some("es-419"));
    }

    #[test]
    fn test_chinese_overrides() {
        let mapping = LocaleMapping::default();
        assert_eq!(mapping.locale_for_dir("values-zh-rTW").as_deref(), Some("zh-Hant"));
        assert_eq!(mapping.locale_for_dir("values-zh-rCN").as_deref(), Some("zh-Hans"));
        assert_eq!(mapping.locale_for_dir("values-zh-rHK").as_deref(), Some("zh-Hant_HK"));
        assert_eq!(mapping.locale_for_dir("values-zh").as_deref(), Some("zh"));
    }

    #[test]
    fn test_hong_kong_override_is_configurable() {
        let custom = LocaleMapping {
            overrides: BTreeMap::from([("zh-HK".to_string(), "zh-Hant".to_string())]),
        };
        let mapping = LocaleMapping::default().merged_with(custom);
        assert_eq!(mapping.locale_for_dir("values-zh-rHK").as_deref(), Some("zh-Hant"));
        assert_eq!(mapping.locale_for_dir("values-zh-rTW").as_deref(), Some("zh-Hant"));
    }

    #[test]
    fn test_bcp47_directory() {
        let mapping = LocaleMapping::empty();
        assert_eq!(mapping.locale_for_dir("values-b+sr+Latn").as_deref(), Some("sr-Latn"));
        assert_eq!(mapping.locale_for_dir("values-b+es+419").as_deref(), Some("es-419"));
    }

    #[test]
    fn test_non_locale_qualifiers_are_skipped() {
        let mapping = LocaleMapping::default();
        for dir in [
            "values-night",
            "values-v21",
            "values-land",
            "values-sw600dp",
            "values-fr-land",
            "values-fr-rfr",
            "drawable",
            "valuesx",
            "values-b+",
        ] {
            assert_eq!(mapping.locale_for_dir(dir), None, "{dir} should be skipped");
        }
    }
}
