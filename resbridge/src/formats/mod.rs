//! All supported localization file formats for resbridge.
//!
//! This module re-exports the main types for each format and provides the
//! [`AppleFile`] enum naming the files of an `<locale>.lproj` directory.

pub mod android_strings;
pub mod array_strings;
pub mod csv;
pub mod strings;
pub mod stringsdict;

use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

// Reexporting the formats for easier access
pub use android_strings::Format as AndroidStringsFormat;
pub use array_strings::Format as ArrayStringsFormat;
pub use csv::{Format as CsvFormat, RowKey};
pub use strings::Format as StringsFormat;
pub use stringsdict::Format as StringsdictFormat;

use crate::{error::Error, types::ResourceKind};

/// Suffix of Apple per-locale directories.
pub const LPROJ_SUFFIX: &str = ".lproj";

/// The files written into, and read from, one `<locale>.lproj` directory.
///
/// Each file holds exactly one [`ResourceKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppleFile {
    /// `Localizable.strings`, plain strings.
    Strings,
    /// `LocalizableArrays.strings`, ordered lists.
    Arrays,
    /// `Localizable.stringsdict`, plural rules.
    Stringsdict,
}

impl AppleFile {
    pub const ALL: [AppleFile; 3] = [AppleFile::Strings, AppleFile::Arrays, AppleFile::Stringsdict];

    pub fn file_name(&self) -> &'static str {
        match self {
            AppleFile::Strings => "Localizable.strings",
            AppleFile::Arrays => "LocalizableArrays.strings",
            AppleFile::Stringsdict => "Localizable.stringsdict",
        }
    }

    pub fn kind(&self) -> ResourceKind {
        match self {
            AppleFile::Strings => ResourceKind::Strings,
            AppleFile::Arrays => ResourceKind::Arrays,
            AppleFile::Stringsdict => ResourceKind::Plurals,
        }
    }
}

impl Display for AppleFile {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Parses an exact file name, e.g. `"Localizable.stringsdict"`.
impl FromStr for AppleFile {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AppleFile::ALL
            .into_iter()
            .find(|file| file.file_name() == s)
            .ok_or_else(|| Error::DataMismatch(format!("not an Apple localization file: {}", s)))
    }
}

/// Locale of an `<locale>.lproj` directory name.
pub fn lproj_locale(dir_name: &str) -> Option<&str> {
    dir_name
        .strip_suffix(LPROJ_SUFFIX)
        .filter(|locale| !locale.is_empty())
}
