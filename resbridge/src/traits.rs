//! Traits for format-agnostic parsing and serialization in resbridge.

use std::{
    fs::File,
    io::{BufRead, BufWriter, Cursor, Read, Write},
    path::Path,
};

use crate::error::Error;

/// UTF-8 byte-order mark written at the start of every generated file.
pub const BOM: &str = "\u{feff}";

/// A trait for parsing and writing one localization file.
///
/// # Example
///
/// ```rust,no_run
/// use resbridge::traits::Parser;
/// let format = resbridge::formats::StringsFormat::read_from("en.lproj/Localizable.strings")?;
/// format.write_to("en_copy.strings")?;
/// Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait Parser {
    /// Parse from any reader. The input is expected to be UTF-8 without a BOM.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error>
    where
        Self: Sized;

    /// Parse from file path.
    ///
    /// The file is decoded with BOM sniffing, so UTF-16 files (common for
    /// older Apple `.strings`) and BOM-prefixed UTF-8 files both work.
    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error>
    where
        Self: Sized,
    {
        let content = read_to_string_bom_aware(path)?;
        Self::from_str(&content)
    }

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, writer: W) -> Result<(), Error>;

    /// Write to file path.
    fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.to_writer(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Parse from a string. A leading BOM is ignored.
    fn from_str(s: &str) -> Result<Self, Error>
    where
        Self: Sized,
    {
        Self::from_reader(Cursor::new(strip_bom(s)))
    }
}

/// Reads a whole file, transcoding UTF-16 to UTF-8 and dropping any BOM.
pub fn read_to_string_bom_aware<P: AsRef<Path>>(path: P) -> Result<String, Error> {
    let file = File::open(path).map_err(Error::Io)?;
    let mut decoder = encoding_rs_io::DecodeReaderBytesBuilder::new()
        .bom_override(true)
        .build(file);

    let mut decoded = String::new();
    decoder.read_to_string(&mut decoded).map_err(Error::Io)?;
    Ok(strip_bom(&decoded).to_string())
}

pub(crate) fn strip_bom(s: &str) -> &str {
    s.strip_prefix(BOM).unwrap_or(s)
}
