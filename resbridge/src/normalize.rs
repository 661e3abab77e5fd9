//! Value normalization shared by every writer.
//!
//! All functions here are pure: they take a raw stored value and return a new
//! string. The shared pass ([`Normalizer::resolve_value`]) strips one layer of
//! wrapping quotes and follows `@string/` references; the per-target passes
//! layer escaping and placeholder rewriting on top of it.

use std::collections::BTreeSet;

use crate::{
    error::Error,
    placeholder::{to_apple_placeholders, ungroup_integers},
    resolver::Resolver,
    types::ValueOrigin,
};

/// Prefix of a value that points at another string resource.
pub const REFERENCE_MARKER: &str = "@string/";

/// Removes one layer of quotes wrapping the whole value (`"text"` → `text`).
pub fn strip_wrapping_quotes(raw: &str) -> &str {
    if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        &raw[1..raw.len() - 1]
    } else {
        raw
    }
}

/// The referenced key if `value` is exactly `@string/<key>`.
pub fn reference_target(value: &str) -> Option<&str> {
    value
        .strip_prefix(REFERENCE_MARKER)
        .filter(|key| !key.is_empty() && !key.contains(char::is_whitespace))
}

/// Undoes the Android escapes for quotes and apostrophes.
pub fn unescape_android_quotes(value: &str) -> String {
    value.replace("\\'", "'").replace("\\\"", "\"")
}

/// Escapes `"` for a quoted `.strings` value.
pub fn escape_quotes(value: &str) -> String {
    value.replace('"', "\\\"")
}

/// Reverses [`escape_quotes`] when reading `.strings` values back.
pub fn unescape_quotes(value: &str) -> String {
    value.replace("\\\"", "\"")
}

/// Normalizes raw values for one catalog, following references through
/// the fallback-aware [`Resolver`].
#[derive(Debug, Clone, Copy)]
pub struct Normalizer<'a> {
    resolver: Resolver<'a>,
}

impl<'a> Normalizer<'a> {
    pub fn new(resolver: Resolver<'a>) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &Resolver<'a> {
        &self.resolver
    }

    /// Strips wrapping quotes and follows `@string/` references, looking each
    /// target up from `locale`, until a literal value is reached.
    ///
    /// A missing target or a reference cycle is an
    /// [`Error::UnresolvedReference`].
    pub fn resolve_value(&self, locale: &str, raw: &str) -> Result<String, Error> {
        let literal = self.resolve_literal(locale, raw, ValueOrigin::Android)?;
        Ok(strip_wrapping_quotes(&literal.text).to_string())
    }

    /// Follows `@string/` references like [`Normalizer::resolve_value`] but
    /// returns the final literal as stored, wrapping quotes included, along
    /// with the origin of the entry it was read from.
    pub fn resolve_literal(
        &self,
        locale: &str,
        raw: &str,
        origin: ValueOrigin,
    ) -> Result<Literal, Error> {
        let mut visited = BTreeSet::new();
        let mut current = raw;
        let mut origin = origin;
        while let Some(target) = reference_target(strip_wrapping_quotes(current)) {
            if !visited.insert(target) {
                return Err(Error::unresolved(locale, target));
            }
            let found = self
                .resolver
                .locate_string(locale, target)
                .ok_or_else(|| Error::unresolved(locale, target))?;
            origin = found.origin;
            current = found.value;
        }
        Ok(Literal {
            text: current.to_string(),
            origin,
        })
    }

    /// Value as written into `.strings` and list files: references resolved,
    /// Android escapes undone, placeholders rewritten, quotes escaped.
    pub fn for_strings(&self, locale: &str, raw: &str, origin: ValueOrigin) -> Result<String, Error> {
        Ok(escape_quotes(&self.apple_text(locale, raw, origin)?))
    }

    /// Value as written into `.stringsdict` files. XML escaping is left to
    /// the writer. Grouped integers are rewritten whatever the origin.
    pub fn for_stringsdict(
        &self,
        locale: &str,
        raw: &str,
        origin: ValueOrigin,
    ) -> Result<String, Error> {
        Ok(ungroup_integers(&self.apple_text(locale, raw, origin)?))
    }

    /// Value as shown next to generated accessors: Apple placeholders, no
    /// file-level escaping.
    pub fn for_accessor(&self, locale: &str, raw: &str, origin: ValueOrigin) -> Result<String, Error> {
        self.apple_text(locale, raw, origin)
    }

    /// Value as written into a CSV cell: references followed, the literal
    /// kept as stored so a re-import resolves to the same text. Quoting is
    /// left to the CSV writer.
    pub fn for_csv(&self, locale: &str, raw: &str) -> Result<String, Error> {
        Ok(self.resolve_literal(locale, raw, ValueOrigin::Android)?.text)
    }

    /// Resolved text in Apple syntax. Only Android-origin text is rewritten.
    fn apple_text(&self, locale: &str, raw: &str, origin: ValueOrigin) -> Result<String, Error> {
        let literal = self.resolve_literal(locale, raw, origin)?;
        let value = strip_wrapping_quotes(&literal.text);
        Ok(match literal.origin {
            ValueOrigin::Android => to_apple_placeholders(&unescape_android_quotes(value)),
            ValueOrigin::Apple => value.to_string(),
        })
    }
}

/// A resolved value before per-target shaping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    pub text: String,
    pub origin: ValueOrigin,
}
