//! Locale fallback resolution.
//!
//! A lookup for `zh-Hant_HK` tries `zh-Hant_HK`, `zh-Hant`, `zh` and finally
//! `Base`; the first locale holding the key wins and values are never merged
//! across levels.

use crate::{
    store::Catalog,
    types::{ArrayValue, BASE_LOCALE, LocaleBundle, PluralForms, ResourceKind, ValueOrigin},
};

/// Iterator over the progressively more general identifiers for a locale.
#[derive(Debug, Clone)]
pub struct FallbackChain<'a> {
    next: Option<&'a str>,
}

impl<'a> FallbackChain<'a> {
    pub fn new(locale: &'a str) -> Self {
        Self { next: Some(locale) }
    }
}

impl<'a> Iterator for FallbackChain<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = if current == BASE_LOCALE {
            None
        } else {
            match current.rfind(['-', '_']) {
                Some(cut) if cut > 0 => Some(&current[..cut]),
                _ => Some(BASE_LOCALE),
            }
        };
        Some(current)
    }
}

/// A value found by [`Resolver::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved<'a> {
    String(&'a str),
    Array(&'a ArrayValue),
    Plural(&'a PluralForms),
}

/// A value found on a fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Found<'a, T> {
    /// Locale that holds the value.
    pub locale: &'a str,
    pub origin: ValueOrigin,
    pub value: T,
}

/// Fallback-aware, read-only view over a [`Catalog`].
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    catalog: &'a Catalog,
}

impl<'a> Resolver<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    /// Looks `key` up for `locale`, walking the fallback chain.
    ///
    /// Returns `None` when no locale on the chain, `Base` included, holds it.
    pub fn resolve(&self, locale: &str, kind: ResourceKind, key: &str) -> Option<Resolved<'a>> {
        match kind {
            ResourceKind::Strings => self.string(locale, key).map(Resolved::String),
            ResourceKind::Arrays => self.array(locale, key).map(Resolved::Array),
            ResourceKind::Plurals => self.plural(locale, key).map(Resolved::Plural),
        }
    }

    pub fn string(&self, locale: &str, key: &str) -> Option<&'a str> {
        self.locate_string(locale, key).map(|found| found.value)
    }

    pub fn array(&self, locale: &str, key: &str) -> Option<&'a ArrayValue> {
        self.locate_array(locale, key).map(|found| found.value)
    }

    pub fn plural(&self, locale: &str, key: &str) -> Option<&'a PluralForms> {
        self.locate_plural(locale, key).map(|found| found.value)
    }

    /// Like [`Resolver::string`], also reporting which locale on the chain
    /// held the value and where that value came from.
    pub fn locate_string(&self, locale: &str, key: &str) -> Option<Found<'a, &'a str>> {
        self.first_match(locale, ResourceKind::Strings, key, |bundle| {
            bundle.strings.get(key).map(String::as_str)
        })
    }

    pub fn locate_array(&self, locale: &str, key: &str) -> Option<Found<'a, &'a ArrayValue>> {
        self.first_match(locale, ResourceKind::Arrays, key, |bundle| {
            bundle.arrays.get(key)
        })
    }

    pub fn locate_plural(&self, locale: &str, key: &str) -> Option<Found<'a, &'a PluralForms>> {
        self.first_match(locale, ResourceKind::Plurals, key, |bundle| {
            bundle.plurals.get(key)
        })
    }

    fn first_match<T>(
        &self,
        locale: &str,
        kind: ResourceKind,
        key: &str,
        lookup: impl Fn(&'a LocaleBundle) -> Option<T>,
    ) -> Option<Found<'a, T>> {
        FallbackChain::new(locale)
            .filter_map(|candidate| self.catalog.bundle_entry(candidate))
            .find_map(|(found_in, bundle)| {
                lookup(bundle).map(|value| Found {
                    locale: found_in,
                    origin: self.catalog.origin(kind, found_in, key),
                    value,
                })
            })
    }
}
