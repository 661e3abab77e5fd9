//! All error types for the resbridge crate.
//!
//! Fatal conditions (bad configuration, missing sources, broken references,
//! malformed input) surface as [`Error`]. Keys that simply have no value for a
//! locale at export time are not errors; writers skip or blank them.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("source not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("unresolved reference `@string/{key}` in locale `{locale}`")]
    UnresolvedReference { locale: String, key: String },

    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("CSV parse error: {0}")]
    CsvParse(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid data: {0}")]
    DataMismatch(String),

    #[error("invalid resource: {0}")]
    InvalidResource(String),
}

impl Error {
    /// Creates a new configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }

    /// Creates an unresolved reference error for `key` looked up from `locale`.
    pub fn unresolved(locale: impl Into<String>, key: impl Into<String>) -> Self {
        Error::UnresolvedReference {
            locale: locale.into(),
            key: key.into(),
        }
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(value: quick_xml::events::attributes::AttrError) -> Self {
        Error::DataMismatch(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_config_error() {
        let error = Error::config("no import source given");
        assert_eq!(
            error.to_string(),
            "configuration error: no import source given"
        );
    }

    #[test]
    fn test_source_not_found_error() {
        let error = Error::SourceNotFound(PathBuf::from("res/missing"));
        assert_eq!(error.to_string(), "source not found: res/missing");
    }

    #[test]
    fn test_unresolved_reference_error() {
        let error = Error::unresolved("zh-Hant", "app_name");
        assert_eq!(
            error.to_string(),
            "unresolved reference `@string/app_name` in locale `zh-Hant`"
        );
    }

    #[test]
    fn test_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = Error::from(io_error);
        assert!(error.to_string().contains("I/O error"));
    }

    #[test]
    fn test_invalid_resource_error() {
        let error = Error::InvalidResource("string tag missing 'name'".to_string());
        assert_eq!(
            error.to_string(),
            "invalid resource: string tag missing 'name'"
        );
    }

    #[test]
    fn test_error_debug() {
        let error = Error::DataMismatch("test".to_string());
        let debug = format!("{:?}", error);
        assert!(debug.contains("DataMismatch"));
        assert!(debug.contains("test"));
    }
}
