use std::{fs, path::Path};

use resbridge::{Error, LocaleMapping};

/// Loads a TOML `[overrides]` table and layers it over the built-in mapping.
///
/// An entry in the file wins over a built-in entry for the same Android
/// qualifier.
pub fn load_locale_mapping(path: &Path) -> Result<LocaleMapping, Error> {
    if !path.is_file() {
        return Err(Error::SourceNotFound(path.to_path_buf()));
    }
    let text = fs::read_to_string(path)?;
    let overrides: LocaleMapping = toml::from_str(&text)
        .map_err(|e| Error::config(format!("invalid locale map {}: {}", path.display(), e)))?;
    tracing::debug!(
        path = %path.display(),
        entries = overrides.overrides.len(),
        "loaded locale map"
    );
    Ok(LocaleMapping::default().merged_with(overrides))
}
