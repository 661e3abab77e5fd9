use std::collections::{BTreeMap, BTreeSet};

use lazy_static::lazy_static;
use serde::Serialize;
use unic_langid::LanguageIdentifier;

use crate::{
    resolver::Resolver,
    store::Catalog,
    types::{BASE_LOCALE, QuantityClass},
};

lazy_static! {
    /// Static mapping from base language subtag → required plural categories (CLDR‑style, cardinals).
    static ref CATEGORY_TABLE: BTreeMap<&'static str, BTreeSet<QuantityClass>> = {
        use QuantityClass::*;
        let mut m: BTreeMap<&'static str, BTreeSet<QuantityClass>> = BTreeMap::new();

        fn s(items: &[QuantityClass]) -> BTreeSet<QuantityClass> {
            items.iter().cloned().collect()
        }

        // One/Other (most Indo‑European languages without complex plural rules)
        for code in [
            "en","de","nl","sv","da","nb","nn","no","is","fi","et","fa","hi","bn","gu",
            "ta","te","kn","ml","mr","it","es","pt","mk","el","eu","gl","af","sw","ur",
            "fil","tl","tr","fr","hy","kab","bg","ca","hu","ka","kk","az","uz"
        ] {
            m.insert(code, s(&[One, Other]));
        }

        // Only Other
        for code in ["ja","zh","ko","th","vi","km","lo","my","yue","id","ms"] {
            m.insert(code, s(&[Other]));
        }

        // Slavic (Russian group)
        for code in ["ru","uk","be","sr","hr","bs","sh","pl"] {
            m.insert(code, s(&[One, Few, Many, Other]));
        }

        for code in ["cs","sk","lt","ro"] {
            m.insert(code, s(&[One, Few, Other]));
        }

        m.insert("sl", s(&[One, Two, Few, Other]));
        m.insert("lv", s(&[Zero, One, Other]));
        m.insert("ga", s(&[One, Two, Few, Many, Other]));
        m.insert("cy", s(&[Zero, One, Two, Few, Many, Other]));
        m.insert("ar", s(&[Zero, One, Two, Few, Many, Other]));

        // Hebrew (legacy code iw also maps here)
        for code in ["he","iw"] {
            m.insert(code, s(&[One, Two, Other]));
        }

        m
    };
}

/// A plural entry, as resolved for one locale, lacking categories its
/// language needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluralGap {
    pub locale: String,
    pub key: String,
    pub missing: BTreeSet<QuantityClass>,
    pub have: BTreeSet<QuantityClass>,
}

/// Returns the required CLDR plural categories for a given language identifier.
///
/// This is a curated subset of CLDR rules covering common locales. Unknown
/// languages only require `other`.
pub fn required_categories_for(lang: &LanguageIdentifier) -> BTreeSet<QuantityClass> {
    CATEGORY_TABLE
        .get(lang.language.as_str())
        .cloned()
        .unwrap_or_else(|| BTreeSet::from([QuantityClass::Other]))
}

/// Same as [`required_categories_for`] for a locale identifier such as
/// `zh-Hant_HK`. `Base` and unparsable identifiers require only `other`.
pub fn required_categories_for_locale(locale: &str) -> BTreeSet<QuantityClass> {
    if locale == BASE_LOCALE {
        return BTreeSet::from([QuantityClass::Other]);
    }
    match locale.replace('_', "-").parse::<LanguageIdentifier>() {
        Ok(lang) => required_categories_for(&lang),
        Err(_) => BTreeSet::from([QuantityClass::Other]),
    }
}

/// Lists, for every locale and plural key that resolves in it, the required
/// categories the resolved entry lacks. Non-fatal.
pub fn plural_report(catalog: &Catalog) -> Vec<PluralGap> {
    let resolver = Resolver::new(catalog);
    let mut gaps = Vec::new();
    for locale in catalog.locales() {
        let required = required_categories_for_locale(locale);
        for key in catalog.keys().plurals() {
            let Some(forms) = resolver.plural(locale, key) else {
                continue;
            };
            let have: BTreeSet<QuantityClass> = forms.keys().cloned().collect();
            let missing: BTreeSet<QuantityClass> = required.difference(&have).cloned().collect();
            if !missing.is_empty() {
                tracing::warn!(locale, key = key.as_str(), "plural entry lacks required categories");
                gaps.push(PluralGap {
                    locale: locale.to_string(),
                    key: key.clone(),
                    missing,
                    have,
                });
            }
        }
    }
    gaps
}
