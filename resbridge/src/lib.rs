#![forbid(unsafe_code)]
//! Android string resources to Apple localization files, and back.
//!
//! resbridge reads Android `res/values*/` directories (strings, string arrays
//! and plurals), existing Apple `.lproj` trees and CSV reports into one
//! in-memory [`LocaleStore`], then writes:
//!
//! - `Localizable.strings`, `LocalizableArrays.strings` and
//!   `Localizable.stringsdict` per locale,
//! - a multi-locale CSV report that imports back losslessly,
//! - accessor data as JSON or a Swift `L10n` enum.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use resbridge::{Codec, ImportSource, codec};
//!
//! let mut importer = Codec::new();
//! importer.import(&ImportSource::Android("app/src/main/res".into()))?;
//! importer.import(&ImportSource::Csv("translations.csv".into()))?;
//! let catalog = importer.finish_import()?;
//!
//! codec::write_apple_dir(&catalog, "ios/App/Resources")?;
//! codec::write_accessors(&catalog, "ios/App/L10n.swift")?;
//! # Ok::<(), resbridge::Error>(())
//! ```
//!
//! Lookups fall back from `zh-Hant_HK` to `zh-Hant`, `zh` and finally `Base`
//! (see [`Resolver`]); `@string/` references are followed and printf
//! specifiers are rewritten for Apple platforms on the way out (see
//! [`Normalizer`]).

pub mod accessor;
pub mod codec;
pub mod error;
pub mod formats;
pub mod locale;
pub mod normalize;
pub mod placeholder;
pub mod plural_rules;
pub mod registry;
pub mod resolver;
pub mod store;
pub mod traits;
pub mod types;

// Re-export most used types for easy consumption
pub use crate::{
    accessor::AccessorSurface,
    codec::{Codec, ImportSource},
    error::Error,
    locale::LocaleMapping,
    normalize::Normalizer,
    plural_rules::{PluralGap, plural_report},
    registry::{FinalizedKeys, KeyRegistry},
    resolver::{FallbackChain, Resolver},
    store::{Catalog, LocaleStore},
    types::{BASE_LOCALE, LocaleBundle, QuantityClass, ResourceKind, ValueOrigin},
};
