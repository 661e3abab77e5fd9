//! printf-style placeholder parsing and rewriting.
//!
//! Android and Apple share printf syntax except for two details the Apple
//! side cannot take as-is: Java's `%s` string conversion (Apple wants `%@`)
//! and Java's `,` grouping flag on integers. Each placeholder found in a value
//! is tokenized into a [`Specifier`] and run through a table of
//! [`RewriteRule`]s; everything else in the value is copied verbatim.

use std::fmt::{Display, Formatter};

use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    /// `%%`, or `%[n$][flags][width][.precision][length]conversion`.
    static ref SPECIFIER: Regex = Regex::new(
        r"%(?:%|(?P<position>[0-9]+\$)?(?P<flags>[-+#0,]*)(?P<width>[0-9]+|\*)?(?P<precision>\.(?:[0-9]+|\*))?(?P<length>hh|h|ll|l|q|L|z|t|j)?(?P<conversion>[@a-zA-Z]))"
    )
    .expect("specifier pattern is valid");
}

/// One tokenized placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Specifier {
    /// Positional prefix including the `$`, e.g. `1$`.
    pub position: String,
    pub flags: String,
    pub width: String,
    /// Precision including the leading `.`.
    pub precision: String,
    pub length: String,
    pub conversion: char,
}

impl Specifier {
    fn from_captures(caps: &Captures<'_>) -> Option<Self> {
        let conversion = caps.name("conversion")?.as_str().chars().next()?;
        let text = |name: &str| caps.name(name).map_or("", |m| m.as_str()).to_string();
        Some(Self {
            position: text("position"),
            flags: text("flags"),
            width: text("width"),
            precision: text("precision"),
            length: text("length"),
            conversion,
        })
    }

    /// 1-based argument position, when the specifier is positional.
    pub fn index(&self) -> Option<usize> {
        self.position.strip_suffix('$')?.parse().ok()
    }

    pub fn is_integer(&self) -> bool {
        matches!(self.conversion, 'd' | 'i' | 'o' | 'u' | 'x' | 'X' | 'D' | 'U' | 'O')
    }
}

impl Display for Specifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "%{}{}{}{}{}{}",
            self.position, self.flags, self.width, self.precision, self.length, self.conversion
        )
    }
}

/// A single rewrite: if `applies` holds for a specifier, `apply` edits it.
#[derive(Debug, Clone, Copy)]
pub struct RewriteRule {
    pub name: &'static str,
    pub applies: fn(&Specifier) -> bool,
    pub apply: fn(&mut Specifier),
}

/// `%s` / `%1$s` → `%@` / `%1$@`.
pub const STRING_TO_OBJECT: RewriteRule = RewriteRule {
    name: "string-to-object",
    applies: |spec| matches!(spec.conversion, 's' | 'S'),
    apply: |spec| {
        spec.conversion = '@';
        spec.length.clear();
    },
};

/// `%,d` / `%1$,d` → `%d` / `%1$d`.
pub const GROUPED_INTEGER: RewriteRule = RewriteRule {
    name: "grouped-integer",
    applies: |spec| spec.is_integer() && spec.flags.contains(','),
    apply: |spec| spec.flags.retain(|c| c != ','),
};

/// Rules for values leaving the Android format for Apple files.
pub const APPLE_RULES: &[RewriteRule] = &[STRING_TO_OBJECT, GROUPED_INTEGER];

/// Rules applied to every plural value, whatever format it came from.
pub const PLURAL_RULES: &[RewriteRule] = &[GROUPED_INTEGER];

/// Rewrites every placeholder in `input` with `rules`, in table order.
/// `%%` and text outside placeholders are left untouched.
pub fn rewrite(input: &str, rules: &[RewriteRule]) -> String {
    SPECIFIER
        .replace_all(input, |caps: &Captures<'_>| {
            let whole = caps.get(0).map_or("", |m| m.as_str());
            let Some(mut spec) = Specifier::from_captures(caps) else {
                return whole.to_string();
            };
            let mut changed = false;
            for rule in rules {
                if (rule.applies)(&spec) {
                    (rule.apply)(&mut spec);
                    changed = true;
                }
            }
            if changed {
                spec.to_string()
            } else {
                whole.to_string()
            }
        })
        .into_owned()
}

/// Converts Android-style placeholders to Apple-style ones.
pub fn to_apple_placeholders(input: &str) -> String {
    rewrite(input, APPLE_RULES)
}

/// Drops the grouping flag from integer placeholders only.
pub fn ungroup_integers(input: &str) -> String {
    rewrite(input, PLURAL_RULES)
}

/// Extracts the placeholders of `input` in occurrence order. `%%` is skipped.
pub fn extract_placeholders(input: &str) -> Vec<Specifier> {
    SPECIFIER
        .captures_iter(input)
        .filter_map(|caps| Specifier::from_captures(&caps))
        .collect()
}
