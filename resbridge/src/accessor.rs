//! Accessor surface: the key data code generators need.
//!
//! [`AccessorSurface`] lists every finalized key per kind, with the `Base`
//! value of each string for documentation. It serializes to JSON or renders
//! directly into a Swift `L10n` enum.

use indoc::indoc;
use serde::{Deserialize, Serialize};

use crate::{
    error::Error,
    normalize::Normalizer,
    store::Catalog,
    types::{BASE_LOCALE, ResourceKind},
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessorSurface {
    pub strings: Vec<StringAccessor>,
    pub arrays: Vec<String>,
    pub plurals: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringAccessor {
    pub key: String,
    /// `Base` value with references resolved and Apple placeholders, if
    /// `Base` has the key.
    pub base_value: Option<String>,
}

impl AccessorSurface {
    pub fn from_catalog(normalizer: &Normalizer<'_>) -> Result<Self, Error> {
        let catalog: &Catalog = normalizer.resolver().catalog();
        let base = catalog.bundle(BASE_LOCALE);
        let strings = catalog
            .keys()
            .strings()
            .iter()
            .map(|key| -> Result<StringAccessor, Error> {
                let base_value = base
                    .and_then(|bundle| bundle.strings.get(key))
                    .map(|raw| {
                        let origin = catalog.origin(ResourceKind::Strings, BASE_LOCALE, key);
                        normalizer.for_accessor(BASE_LOCALE, raw, origin)
                    })
                    .transpose()?;
                Ok(StringAccessor {
                    key: key.clone(),
                    base_value,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(AccessorSurface {
            strings,
            arrays: catalog.keys().arrays().to_vec(),
            plurals: catalog.keys().plurals().to_vec(),
        })
    }

    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Renders a Swift source file exposing one accessor per key.
    pub fn to_swift(&self) -> String {
        let mut out = String::from(SWIFT_HEADER);
        for accessor in &self.strings {
            if let Some(value) = &accessor.base_value {
                out.push_str(&format!("    /// {}\n", doc_line(value)));
            }
            out.push_str(&format!(
                "    static var {}: String {{ NSLocalizedString(\"{}\", comment: \"\") }}\n",
                swift_identifier(&accessor.key),
                swift_literal(&accessor.key)
            ));
        }
        for key in &self.arrays {
            out.push_str(&format!(
                "    static var {}: [String] {{ array(\"{}\") }}\n",
                swift_identifier(key),
                swift_literal(key)
            ));
        }
        for key in &self.plurals {
            out.push_str(&format!(
                "    static func {}(_ count: Int) -> String {{\n        String.localizedStringWithFormat(NSLocalizedString(\"{}\", comment: \"\"), count)\n    }}\n",
                swift_identifier(key),
                swift_literal(key)
            ));
        }
        out.push_str(SWIFT_FOOTER);
        out
    }
}

const SWIFT_HEADER: &str = indoc! {"
    // Generated by resbridge. Do not edit.

    import Foundation

    enum L10n {
"};

const SWIFT_FOOTER: &str = indoc! {r#"

        private static func array(_ key: String) -> [String] {
            guard let path = Bundle.main.path(forResource: "LocalizableArrays", ofType: "strings"),
                  let table = NSDictionary(contentsOfFile: path) as? [String: [String]]
            else { return [] }
            return table[key] ?? []
        }
    }
"#};

const SWIFT_KEYWORDS: &[&str] = &[
    "as", "break", "case", "class", "continue", "default", "defer", "do", "else", "enum",
    "extension", "false", "for", "func", "guard", "if", "import", "in", "init", "is", "let",
    "nil", "operator", "private", "protocol", "public", "repeat", "return", "self", "static",
    "struct", "subscript", "super", "switch", "throw", "true", "try", "var", "where", "while",
];

/// `settings_title` → `settingsTitle`, `2fa.code` → `_2faCode`.
fn swift_identifier(key: &str) -> String {
    let mut ident = String::new();
    for (i, word) in key
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .enumerate()
    {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            if i == 0 {
                ident.extend(first.to_lowercase());
            } else {
                ident.extend(first.to_uppercase());
            }
            ident.push_str(chars.as_str());
        }
    }
    if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    if SWIFT_KEYWORDS.contains(&ident.as_str()) {
        format!("`{}`", ident)
    } else {
        ident
    }
}

fn swift_literal(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

fn doc_line(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{resolver::Resolver, store::LocaleStore, types::QuantityClass};

    fn surface() -> AccessorSurface {
        let mut store = LocaleStore::new();
        store.insert_string("Base", "app_name", "Demo");
        store.insert_string("Base", "greeting", "Hello %s,\nwelcome to @string/app_name");
        store.insert_string("Base", "title", "@string/app_name");
        store.insert_string("fr", "only_french", "Bonjour");
        store.insert_array("Base", "planets", vec!["Mercury".into()]);
        store.set_plural_form("Base", "apples", QuantityClass::Other, "%d apples");
        let catalog = store.freeze();
        AccessorSurface::from_catalog(&Normalizer::new(Resolver::new(&catalog))).unwrap()
    }

    #[test]
    fn test_surface_lists_sorted_keys_with_base_values() {
        let surface = surface();
        let keys: Vec<&str> = surface.strings.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["app_name", "greeting", "only_french", "title"]);
        assert_eq!(surface.strings[3].base_value.as_deref(), Some("Demo"));
        assert_eq!(surface.strings[2].base_value, None);
        assert_eq!(
            surface.strings[1].base_value.as_deref(),
            Some("Hello %@,\nwelcome to @string/app_name")
        );
        assert_eq!(surface.arrays, vec!["planets"]);
        assert_eq!(surface.plurals, vec!["apples"]);
    }

    #[test]
    fn test_json_shape() {
        let json: serde_json::Value = serde_json::from_str(&surface().to_json().unwrap()).unwrap();
        assert_eq!(json["strings"][0]["key"], "app_name");
        assert_eq!(json["strings"][0]["base_value"], "Demo");
        assert!(json["strings"][2]["base_value"].is_null());
        assert_eq!(json["arrays"][0], "planets");
    }

    #[test]
    fn test_swift_rendering() {
        let swift = surface().to_swift();
        assert!(swift.starts_with("// Generated by resbridge. Do not edit.\n"));
        assert!(swift.contains("    /// Hello %@, welcome to @string/app_name\n"));
        assert!(swift.contains(
            "    static var appName: String { NSLocalizedString(\"app_name\", comment: \"\") }\n"
        ));
        assert!(swift.contains("    static var planets: [String] { array(\"planets\") }\n"));
        assert!(swift.contains("    static func apples(_ count: Int) -> String {\n"));
        assert!(swift.trim_end().ends_with('}'));
    }

    #[test]
    fn test_swift_identifiers() {
        assert_eq!(swift_identifier("settings_title"), "settingsTitle");
        assert_eq!(swift_identifier("Screen.Header-Text"), "screenHeaderText");
        assert_eq!(swift_identifier("2fa_code"), "_2faCode");
        assert_eq!(swift_identifier("default"), "`default`");
        assert_eq!(swift_identifier("__"), "_");
    }
}
