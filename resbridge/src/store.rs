//! In-memory locale store and the frozen [`Catalog`] exporters read from.
//!
//! Importers write into a [`LocaleStore`] through its `insert_*`/`set_*`
//! methods, which merge per key (last writer wins) and record every key in the
//! store's [`KeyRegistry`]. [`LocaleStore::freeze`] finalizes the registry and
//! yields a read-only [`Catalog`].

use std::collections::{BTreeMap, BTreeSet};

use crate::{
    error::Error,
    registry::{FinalizedKeys, KeyRegistry},
    types::{
        ArrayValue, BASE_LOCALE, LocaleBundle, PluralForms, QuantityClass, ResourceKind,
        ValueOrigin, present_len,
    },
};

/// Largest array a CSV row id may address.
pub const MAX_ARRAY_LEN: usize = 65_536;

/// `(kind, locale, key)` of one stored entry.
type EntryId = (ResourceKind, String, String);

#[derive(Debug, Clone, Default)]
pub struct LocaleStore {
    bundles: BTreeMap<String, LocaleBundle>,
    registry: KeyRegistry,
    origin: ValueOrigin,
    apple_entries: BTreeSet<EntryId>,
}

impl LocaleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bundle(&self, locale: &str) -> Option<&LocaleBundle> {
        self.bundles.get(locale)
    }

    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.bundles.keys().map(String::as_str)
    }

    pub fn registry(&self) -> &KeyRegistry {
        &self.registry
    }

    pub fn is_empty(&self) -> bool {
        self.bundles.values().all(LocaleBundle::is_empty)
    }

    /// Sets the origin recorded for every entry inserted from now on.
    pub fn set_origin(&mut self, origin: ValueOrigin) {
        self.origin = origin;
    }

    /// Origin of the entry last written for `(kind, locale, key)`.
    pub fn origin(&self, kind: ResourceKind, locale: &str, key: &str) -> ValueOrigin {
        origin_of(&self.apple_entries, kind, locale, key)
    }

    /// Inserts or replaces a plain string.
    pub fn insert_string(&mut self, locale: &str, key: &str, value: impl Into<String>) {
        self.record(ResourceKind::Strings, locale, key);
        self.bundle_mut(locale)
            .strings
            .insert(key.to_string(), value.into());
    }

    /// Inserts or replaces a whole array.
    pub fn insert_array(&mut self, locale: &str, key: &str, values: Vec<String>) {
        self.record(ResourceKind::Arrays, locale, key);
        self.bundle_mut(locale)
            .arrays
            .insert(key.to_string(), values.into_iter().map(Some).collect());
    }

    /// Sets one element of an array, growing it with holes as needed.
    ///
    /// Indices at or past [`MAX_ARRAY_LEN`] are rejected.
    pub fn set_array_item(
        &mut self,
        locale: &str,
        key: &str,
        index: usize,
        value: impl Into<String>,
    ) -> Result<(), Error> {
        let len = index
            .checked_add(1)
            .filter(|len| *len <= MAX_ARRAY_LEN)
            .ok_or_else(|| {
                Error::DataMismatch(format!(
                    "array `{}` index {} exceeds the limit of {} items",
                    key, index, MAX_ARRAY_LEN
                ))
            })?;
        self.record(ResourceKind::Arrays, locale, key);
        let items = self
            .bundle_mut(locale)
            .arrays
            .entry(key.to_string())
            .or_default();
        if items.len() < len {
            items.resize(len, None);
        }
        items[index] = Some(value.into());
        Ok(())
    }

    /// Inserts or replaces a whole plural entry.
    pub fn insert_plural(&mut self, locale: &str, key: &str, forms: PluralForms) {
        self.record(ResourceKind::Plurals, locale, key);
        self.bundle_mut(locale)
            .plurals
            .insert(key.to_string(), forms);
    }

    /// Sets one quantity form of a plural entry, keeping the others.
    pub fn set_plural_form(
        &mut self,
        locale: &str,
        key: &str,
        quantity: QuantityClass,
        value: impl Into<String>,
    ) {
        self.record(ResourceKind::Plurals, locale, key);
        self.bundle_mut(locale)
            .plurals
            .entry(key.to_string())
            .or_default()
            .insert(quantity, value.into());
    }

    /// Merges a whole bundle into `locale`, entry by entry.
    pub fn merge_bundle(&mut self, locale: &str, bundle: LocaleBundle) {
        for (key, value) in bundle.strings {
            self.insert_string(locale, &key, value);
        }
        for (key, values) in bundle.arrays {
            self.record(ResourceKind::Arrays, locale, &key);
            self.bundle_mut(locale).arrays.insert(key, values);
        }
        for (key, forms) in bundle.plurals {
            self.insert_plural(locale, &key, forms);
        }
    }

    /// Synthesizes `locale` as a copy of the `Base` bundle.
    pub fn copy_base_to(&mut self, locale: &str) -> Result<(), Error> {
        if locale == BASE_LOCALE {
            return Err(Error::config("cannot copy Base onto itself"));
        }
        if self.bundles.contains_key(locale) {
            return Err(Error::config(format!(
                "locale `{}` already exists; refusing to overwrite it with a copy of Base",
                locale
            )));
        }
        let base = self
            .bundles
            .get(BASE_LOCALE)
            .cloned()
            .ok_or_else(|| Error::config("no Base locale to copy from"))?;
        self.bundles.insert(locale.to_string(), base);
        let copied: Vec<EntryId> = self
            .apple_entries
            .iter()
            .filter(|(_, from, _)| from == BASE_LOCALE)
            .map(|(kind, _, key)| (*kind, locale.to_string(), key.clone()))
            .collect();
        self.apple_entries.extend(copied);
        Ok(())
    }

    /// Finalizes the key registry and freezes the store.
    pub fn freeze(self) -> Catalog {
        Catalog {
            bundles: self.bundles,
            keys: self.registry.finalize(),
            apple_entries: self.apple_entries,
        }
    }

    fn record(&mut self, kind: ResourceKind, locale: &str, key: &str) {
        self.registry.record(kind, key);
        let id = (kind, locale.to_string(), key.to_string());
        match self.origin {
            ValueOrigin::Apple => {
                self.apple_entries.insert(id);
            }
            ValueOrigin::Android => {
                self.apple_entries.remove(&id);
            }
        }
    }

    fn bundle_mut(&mut self, locale: &str) -> &mut LocaleBundle {
        self.bundles.entry(locale.to_string()).or_default()
    }
}

/// Read-only locale data with finalized keys; the input of every writer.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    bundles: BTreeMap<String, LocaleBundle>,
    keys: FinalizedKeys,
    apple_entries: BTreeSet<EntryId>,
}

impl Catalog {
    pub fn keys(&self) -> &FinalizedKeys {
        &self.keys
    }

    pub fn bundle(&self, locale: &str) -> Option<&LocaleBundle> {
        self.bundles.get(locale)
    }

    /// Like [`Catalog::bundle`], also returning the catalog's own copy of the
    /// locale name.
    pub fn bundle_entry(&self, locale: &str) -> Option<(&str, &LocaleBundle)> {
        self.bundles
            .get_key_value(locale)
            .map(|(name, bundle)| (name.as_str(), bundle))
    }

    /// Origin of the entry stored for `(kind, locale, key)`.
    pub fn origin(&self, kind: ResourceKind, locale: &str, key: &str) -> ValueOrigin {
        origin_of(&self.apple_entries, kind, locale, key)
    }

    /// All locales, in lexical order.
    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.bundles.keys().map(String::as_str)
    }

    pub fn bundles(&self) -> impl Iterator<Item = (&str, &LocaleBundle)> {
        self.bundles.iter().map(|(locale, bundle)| (locale.as_str(), bundle))
    }

    /// Locales ordered for tabular output: `Base`, then `en`, then the rest
    /// lexically.
    pub fn report_locales(&self) -> Vec<&str> {
        const PINNED: [&str; 2] = [BASE_LOCALE, "en"];
        let mut ordered: Vec<&str> = PINNED
            .into_iter()
            .filter(|locale| self.bundles.contains_key(*locale))
            .collect();
        ordered.extend(self.locales().filter(|locale| !PINNED.contains(locale)));
        ordered
    }

    /// Longest array (ignoring trailing holes) stored for `key` in any locale.
    pub fn max_array_len(&self, key: &str) -> usize {
        self.bundles
            .values()
            .filter_map(|bundle| bundle.arrays.get(key))
            .map(|values| present_len(values))
            .max()
            .unwrap_or(0)
    }

    /// Every quantity class stored for `key` in any locale, canonical order.
    pub fn plural_classes(&self, key: &str) -> Vec<&QuantityClass> {
        let mut classes: Vec<&QuantityClass> = self
            .bundles
            .values()
            .filter_map(|bundle| bundle.plurals.get(key))
            .flat_map(|forms| forms.keys())
            .collect();
        classes.sort();
        classes.dedup();
        classes
    }
}

fn origin_of(
    apple_entries: &BTreeSet<EntryId>,
    kind: ResourceKind,
    locale: &str,
    key: &str,
) -> ValueOrigin {
    if apple_entries.contains(&(kind, locale.to_string(), key.to_string())) {
        ValueOrigin::Apple
    } else {
        ValueOrigin::Android
    }
}

/// Index access into an array that may contain holes.
pub trait ArrayLookup {
    fn item(&self, index: usize) -> Option<&str>;
}

impl ArrayLookup for ArrayValue {
    fn item(&self, index: usize) -> Option<&str> {
        self.get(index).and_then(|slot| slot.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_later_insert_wins_per_key() {
        let mut store = LocaleStore::new();
        store.insert_string("en", "a", "first");
        store.insert_string("en", "b", "kept");
        store.insert_string("en", "a", "second");

        let bundle = store.bundle("en").unwrap();
        assert_eq!(bundle.strings["a"], "second");
        assert_eq!(bundle.strings["b"], "kept");
    }

    #[test]
    fn test_set_array_item_pads_with_holes() {
        let mut store = LocaleStore::new();
        store.set_array_item("en", "planets", 2, "Earth").unwrap();
        store.set_array_item("en", "planets", 0, "Mercury").unwrap();

        let items = &store.bundle("en").unwrap().arrays["planets"];
        assert_eq!(
            items,
            &vec![Some("Mercury".to_string()), None, Some("Earth".to_string())]
        );
        assert_eq!(items.item(1), None);
        assert_eq!(items.item(2), Some("Earth"));
        assert_eq!(items.item(9), None);
    }

    #[test]
    fn test_set_array_item_rejects_huge_index() {
        let mut store = LocaleStore::new();
        for index in [usize::MAX, MAX_ARRAY_LEN] {
            let err = store.set_array_item("en", "a", index, "x").unwrap_err();
            assert!(matches!(err, Error::DataMismatch(_)));
        }
        assert!(store.is_empty());

        store.set_array_item("en", "a", MAX_ARRAY_LEN - 1, "last").unwrap();
        assert_eq!(store.bundle("en").unwrap().arrays["a"].len(), MAX_ARRAY_LEN);
    }

    #[test]
    fn test_origin_follows_last_writer() {
        let mut store = LocaleStore::new();
        store.set_origin(ValueOrigin::Apple);
        store.insert_string("Base", "a", "%s");
        store.insert_string("Base", "b", "%s");
        store.set_origin(ValueOrigin::Android);
        store.insert_string("Base", "b", "%s");
        store.copy_base_to("en").unwrap();

        assert_eq!(store.origin(ResourceKind::Strings, "Base", "a"), ValueOrigin::Apple);
        assert_eq!(store.origin(ResourceKind::Strings, "Base", "b"), ValueOrigin::Android);
        assert_eq!(store.origin(ResourceKind::Arrays, "Base", "a"), ValueOrigin::Android);

        let catalog = store.freeze();
        assert_eq!(catalog.origin(ResourceKind::Strings, "en", "a"), ValueOrigin::Apple);
        assert_eq!(catalog.origin(ResourceKind::Strings, "en", "b"), ValueOrigin::Android);
    }

    #[test]
    fn test_set_plural_form_keeps_other_forms() {
        let mut store = LocaleStore::new();
        store.set_plural_form("en", "apples", QuantityClass::One, "%d apple");
        store.set_plural_form("en", "apples", QuantityClass::Other, "%d apples");

        let forms = &store.bundle("en").unwrap().plurals["apples"];
        assert_eq!(forms.len(), 2);
    }

    #[test]
    fn test_keys_are_registered_globally() {
        let mut store = LocaleStore::new();
        store.insert_string("Base", "only_base", "x");
        store.insert_array("fr", "only_fr", vec!["un".to_string()]);

        let catalog = store.freeze();
        assert_eq!(catalog.keys().strings(), ["only_base"]);
        assert_eq!(catalog.keys().arrays(), ["only_fr"]);
    }

    #[test]
    fn test_copy_base_to_new_locale() {
        let mut store = LocaleStore::new();
        store.insert_string("Base", "hello", "Hello");
        store.copy_base_to("en-GB").unwrap();
        assert_eq!(store.bundle("en-GB").unwrap().strings["hello"], "Hello");
    }

    #[test]
    fn test_copy_base_to_rejects_existing_or_missing() {
        let mut store = LocaleStore::new();
        assert!(matches!(store.copy_base_to("en"), Err(Error::Config(_))));

        store.insert_string("Base", "hello", "Hello");
        store.insert_string("en", "hello", "Hello!");
        assert!(matches!(store.copy_base_to("en"), Err(Error::Config(_))));
    }

    #[test]
    fn test_report_locales_pins_base_and_en() {
        let mut store = LocaleStore::new();
        for locale in ["fr", "en", "de", "Base", "zh-Hant"] {
            store.insert_string(locale, "k", "v");
        }
        let catalog = store.freeze();
        assert_eq!(catalog.report_locales(), vec!["Base", "en", "de", "fr", "zh-Hant"]);
    }

    #[test]
    fn test_max_array_len_and_plural_classes() {
        let mut store = LocaleStore::new();
        store.insert_array("Base", "a", vec!["1".into(), "2".into()]);
        store.insert_array("fr", "a", vec!["1".into(), "2".into(), "3".into(), "4".into()]);
        store.set_plural_form("Base", "p", QuantityClass::Other, "x");
        store.set_plural_form("fr", "p", QuantityClass::One, "y");
        store.set_plural_form("fr", "p", QuantityClass::Other, "z");

        let catalog = store.freeze();
        assert_eq!(catalog.max_array_len("a"), 4);
        assert_eq!(
            catalog.plural_classes("p"),
            vec![&QuantityClass::One, &QuantityClass::Other]
        );
    }
}
