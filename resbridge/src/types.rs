//! Core, format-agnostic types for resbridge.
//! Readers decode into these; writers serialize these.

use std::{
    collections::BTreeMap,
    fmt::{Display, Formatter},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

/// The locale every fallback chain ends at.
pub const BASE_LOCALE: &str = "Base";

/// Values of an ordered string list. Holes appear when a CSV import only
/// fills some indices of an array.
pub type ArrayValue = Vec<Option<String>>;

/// Quantity-class → text for one plural entry, in canonical order.
pub type PluralForms = BTreeMap<QuantityClass, String>;

/// The three kinds of resources. Keys of different kinds never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Strings,
    Arrays,
    Plurals,
}

impl Display for ResourceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::Strings => write!(f, "strings"),
            ResourceKind::Arrays => write!(f, "arrays"),
            ResourceKind::Plurals => write!(f, "plurals"),
        }
    }
}

/// Placeholder syntax a stored value is written in.
///
/// Android resources and CSV reports carry Java printf specifiers (`%s`,
/// `%,d`); values read from an Apple tree are already in Apple syntax, where
/// `%s` means a C string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueOrigin {
    #[default]
    Android,
    Apple,
}

/// CLDR plural categories, plus any other tag carried through opaquely.
///
/// The derived ordering is the canonical output order: the six standard
/// categories first, custom tags after them in lexical order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantityClass {
    Zero,
    One,
    Two,
    Few,
    Many,
    Other,
    Custom(String),
}

impl QuantityClass {
    pub fn as_str(&self) -> &str {
        match self {
            QuantityClass::Zero => "zero",
            QuantityClass::One => "one",
            QuantityClass::Two => "two",
            QuantityClass::Few => "few",
            QuantityClass::Many => "many",
            QuantityClass::Other => "other",
            QuantityClass::Custom(tag) => tag,
        }
    }

    pub fn is_standard(&self) -> bool {
        !matches!(self, QuantityClass::Custom(_))
    }
}

impl Display for QuantityClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuantityClass {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(QuantityClass::from(s))
    }
}

impl From<&str> for QuantityClass {
    fn from(value: &str) -> Self {
        match value {
            "zero" => QuantityClass::Zero,
            "one" => QuantityClass::One,
            "two" => QuantityClass::Two,
            "few" => QuantityClass::Few,
            "many" => QuantityClass::Many,
            "other" => QuantityClass::Other,
            other => QuantityClass::Custom(other.to_string()),
        }
    }
}

/// All resources owned by one locale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocaleBundle {
    pub strings: BTreeMap<String, String>,
    pub arrays: BTreeMap<String, ArrayValue>,
    pub plurals: BTreeMap<String, PluralForms>,
}

impl LocaleBundle {
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty() && self.arrays.is_empty() && self.plurals.is_empty()
    }

    pub fn contains(&self, kind: ResourceKind, key: &str) -> bool {
        match kind {
            ResourceKind::Strings => self.strings.contains_key(key),
            ResourceKind::Arrays => self.arrays.contains_key(key),
            ResourceKind::Plurals => self.plurals.contains_key(key),
        }
    }
}

/// Number of meaningful slots in an array: one past the last present value.
pub fn present_len(values: &[Option<String>]) -> usize {
    values
        .iter()
        .rposition(Option::is_some)
        .map_or(0, |last| last + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_class_canonical_order() {
        let mut classes: Vec<QuantityClass> = ["other", "one", "zero", "many", "two", "few"]
            .into_iter()
            .map(QuantityClass::from)
            .collect();
        classes.sort();
        let names: Vec<&str> = classes.iter().map(QuantityClass::as_str).collect();
        assert_eq!(names, vec!["zero", "one", "two", "few", "many", "other"]);
    }

    #[test]
    fn test_custom_tags_sort_after_standard_lexically() {
        let mut classes = vec![
            QuantityClass::from("zulu"),
            QuantityClass::Other,
            QuantityClass::from("alpha"),
            QuantityClass::Zero,
        ];
        classes.sort();
        assert_eq!(
            classes,
            vec![
                QuantityClass::Zero,
                QuantityClass::Other,
                QuantityClass::Custom("alpha".to_string()),
                QuantityClass::Custom("zulu".to_string()),
            ]
        );
    }

    #[test]
    fn test_quantity_class_round_trips_through_str() {
        for tag in ["zero", "one", "two", "few", "many", "other", "fraction"] {
            assert_eq!(QuantityClass::from(tag).as_str(), tag);
        }
        assert!(!QuantityClass::from("fraction").is_standard());
    }

    #[test]
    fn test_present_len_ignores_trailing_holes() {
        let values = vec![Some("a".to_string()), None, Some("c".to_string()), None];
        assert_eq!(present_len(&values), 3);
        assert_eq!(present_len(&[None, None]), 0);
        assert_eq!(present_len(&[]), 0);
    }

    #[test]
    fn test_bundle_contains_by_kind() {
        let mut bundle = LocaleBundle::default();
        bundle.strings.insert("k".to_string(), "v".to_string());
        assert!(bundle.contains(ResourceKind::Strings, "k"));
        assert!(!bundle.contains(ResourceKind::Arrays, "k"));
        assert!(!bundle.is_empty());
    }
}
