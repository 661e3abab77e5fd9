//! This module provides the [`Codec`] struct, which drives a conversion run:
//! it applies imports in the order they are given, optionally synthesizes a
//! locale from `Base`, and freezes the result into a [`Catalog`]. The free
//! functions at the bottom write a catalog out as an Apple `.lproj` tree, a
//! CSV report or an accessor file.
//!
//! ```rust,no_run
//! use resbridge::{Codec, codec};
//!
//! let mut importer = Codec::new();
//! importer.read_android_dir("app/src/main/res")?;
//! let catalog = importer.finish_import()?;
//! codec::write_apple_dir(&catalog, "ios/Resources")?;
//! codec::write_csv(&catalog, "report.csv")?;
//! # Ok::<(), resbridge::Error>(())
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, info};

use crate::{
    accessor::AccessorSurface,
    error::Error,
    formats::{
        AndroidStringsFormat, AppleFile, ArrayStringsFormat, CsvFormat, StringsFormat,
        StringsdictFormat, array_strings::List, lproj_locale, strings::Pair,
        stringsdict::PluralEntry,
    },
    locale::LocaleMapping,
    normalize::{Normalizer, unescape_quotes},
    resolver::Resolver,
    store::{Catalog, LocaleStore},
    traits::Parser,
    types::{PluralForms, ValueOrigin},
};

/// One import step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportSource {
    /// An Android `res` directory.
    Android(PathBuf),
    /// A directory of `<locale>.lproj` subdirectories.
    Apple(PathBuf),
    /// A CSV report.
    Csv(PathBuf),
}

impl ImportSource {
    pub fn path(&self) -> &Path {
        match self {
            ImportSource::Android(path) | ImportSource::Apple(path) | ImportSource::Csv(path) => {
                path
            }
        }
    }
}

/// Collects locale data from any number of sources, last writer winning
/// per key.
#[derive(Debug, Clone, Default)]
pub struct Codec {
    store: LocaleStore,
    mapping: LocaleMapping,
    synthesized: Option<String>,
}

impl Codec {
    /// Creates an empty codec using the default Android directory mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty codec with a custom directory-to-locale mapping.
    pub fn with_locale_mapping(mapping: LocaleMapping) -> Self {
        Self {
            mapping,
            ..Self::default()
        }
    }

    pub fn store(&self) -> &LocaleStore {
        &self.store
    }

    /// Runs one import step.
    pub fn import(&mut self, source: &ImportSource) -> Result<(), Error> {
        match source {
            ImportSource::Android(path) => self.read_android_dir(path),
            ImportSource::Apple(path) => self.read_apple_dir(path),
            ImportSource::Csv(path) => self.read_csv(path),
        }
    }

    /// Reads every locale directory of an Android `res` directory.
    ///
    /// Directories are visited in name order, and the `*.xml` files inside
    /// each one in name order, so later files win on duplicate keys.
    pub fn read_android_dir<P: AsRef<Path>>(&mut self, res_dir: P) -> Result<(), Error> {
        let res_dir = res_dir.as_ref();
        require_dir(res_dir)?;
        info!(path = %res_dir.display(), "importing Android resources");

        for dir in sorted_entries(res_dir)? {
            if !dir.is_dir() {
                continue;
            }
            let name = file_name(&dir);
            let Some(locale) = self.mapping.locale_for_dir(&name) else {
                debug!(dir = %name, "skipping non-locale resource directory");
                continue;
            };
            for file in sorted_entries(&dir)? {
                if file.extension().and_then(|ext| ext.to_str()) != Some("xml") {
                    continue;
                }
                let bundle = AndroidStringsFormat::read_from(&file)?.into_bundle();
                debug!(
                    file = %file.display(),
                    locale = %locale,
                    strings = bundle.strings.len(),
                    arrays = bundle.arrays.len(),
                    plurals = bundle.plurals.len(),
                    "read Android resource file"
                );
                self.store.merge_bundle(&locale, bundle);
            }
        }
        Ok(())
    }

    /// Reads an existing tree of `<locale>.lproj` directories.
    ///
    /// Entries read here are marked [`ValueOrigin::Apple`], so their
    /// specifiers are exported as they are.
    pub fn read_apple_dir<P: AsRef<Path>>(&mut self, dir: P) -> Result<(), Error> {
        let dir = dir.as_ref();
        require_dir(dir)?;
        info!(path = %dir.display(), "importing Apple localization tree");

        self.store.set_origin(ValueOrigin::Apple);
        let result = self.read_lproj_dirs(dir);
        self.store.set_origin(ValueOrigin::Android);
        result
    }

    fn read_lproj_dirs(&mut self, dir: &Path) -> Result<(), Error> {
        for lproj in sorted_entries(dir)? {
            let name = file_name(&lproj);
            let Some(locale) = lproj.is_dir().then(|| lproj_locale(&name)).flatten() else {
                debug!(entry = %name, "skipping non-lproj entry");
                continue;
            };
            for file in AppleFile::ALL {
                let path = lproj.join(file.file_name());
                if path.is_file() {
                    self.read_apple_file(locale, file, &path)?;
                }
            }
        }
        Ok(())
    }

    fn read_apple_file(&mut self, locale: &str, file: AppleFile, path: &Path) -> Result<(), Error> {
        debug!(file = %path.display(), locale, "reading Apple localization file");
        match file {
            AppleFile::Strings => {
                for pair in StringsFormat::read_from(path)?.pairs {
                    self.store
                        .insert_string(locale, &pair.plain_key(), pair.plain_value());
                }
            }
            AppleFile::Arrays => {
                for list in ArrayStringsFormat::read_from(path)?.lists {
                    let items = list.items.iter().map(|item| unescape_quotes(item)).collect();
                    self.store
                        .insert_array(locale, &unescape_quotes(&list.key), items);
                }
            }
            AppleFile::Stringsdict => {
                for entry in StringsdictFormat::read_from(path)?.entries {
                    self.store.insert_plural(locale, &entry.key, entry.forms);
                }
            }
        }
        Ok(())
    }

    /// Reads a CSV report.
    pub fn read_csv<P: AsRef<Path>>(&mut self, path: P) -> Result<(), Error> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::SourceNotFound(path.to_path_buf()));
        }
        info!(path = %path.display(), "importing CSV");
        let format = CsvFormat::read_from(path)?;
        debug!(locales = ?format.locales, rows = format.rows.len(), "read CSV report");
        format.apply_to(&mut self.store)?;
        Ok(())
    }

    /// Synthesizes `locale` as a copy of `Base`. Allowed once per run.
    pub fn copy_base_to(&mut self, locale: &str) -> Result<(), Error> {
        if let Some(existing) = &self.synthesized {
            return Err(Error::config(format!(
                "a locale was already synthesized from Base (`{}`)",
                existing
            )));
        }
        self.store.copy_base_to(locale)?;
        info!(locale, "synthesized locale from Base");
        self.synthesized = Some(locale.to_string());
        Ok(())
    }

    /// Ends the import phase.
    pub fn finish_import(self) -> Result<Catalog, Error> {
        if self.store.is_empty() {
            return Err(Error::config("no locale data was imported"));
        }
        let catalog = self.store.freeze();
        info!(
            locales = catalog.locales().count(),
            strings = catalog.keys().strings().len(),
            arrays = catalog.keys().arrays().len(),
            plurals = catalog.keys().plurals().len(),
            "import finished"
        );
        Ok(catalog)
    }
}

/// Writes `<dir>/<locale>.lproj/…` for every locale of the catalog.
pub fn write_apple_dir<P: AsRef<Path>>(catalog: &Catalog, dir: P) -> Result<(), Error> {
    let dir = dir.as_ref();
    let normalizer = Normalizer::new(Resolver::new(catalog));
    info!(path = %dir.display(), "exporting Apple localization tree");

    for locale in catalog.locales() {
        let lproj = dir.join(format!("{}{}", locale, crate::formats::LPROJ_SUFFIX));
        fs::create_dir_all(&lproj)?;
        for file in AppleFile::ALL {
            if catalog.keys().of(file.kind()).is_empty() {
                continue;
            }
            let path = lproj.join(file.file_name());
            match file {
                AppleFile::Strings => strings_file(&normalizer, locale)?.write_to(&path)?,
                AppleFile::Arrays => arrays_file(&normalizer, locale)?.write_to(&path)?,
                AppleFile::Stringsdict => stringsdict_file(&normalizer, locale)?.write_to(&path)?,
            }
            debug!(file = %path.display(), "wrote Apple localization file");
        }
    }
    Ok(())
}

fn strings_file(normalizer: &Normalizer<'_>, locale: &str) -> Result<StringsFormat, Error> {
    let resolver = normalizer.resolver();
    let mut pairs = Vec::new();
    for key in resolver.catalog().keys().strings() {
        let Some(found) = resolver.locate_string(locale, key) else {
            debug!(locale, key = key.as_str(), "no string value; skipped");
            continue;
        };
        pairs.push(Pair::new(
            key,
            normalizer.for_strings(locale, found.value, found.origin)?,
        ));
    }
    Ok(StringsFormat { pairs })
}

fn arrays_file(normalizer: &Normalizer<'_>, locale: &str) -> Result<ArrayStringsFormat, Error> {
    let resolver = normalizer.resolver();
    let mut lists = Vec::new();
    for key in resolver.catalog().keys().arrays() {
        let Some(found) = resolver.locate_array(locale, key) else {
            debug!(locale, key = key.as_str(), "no array value; skipped");
            continue;
        };
        let items = found
            .value
            .iter()
            .flatten()
            .map(|raw| normalizer.for_strings(locale, raw, found.origin))
            .collect::<Result<Vec<_>, _>>()?;
        lists.push(List::new(key, items));
    }
    Ok(ArrayStringsFormat { lists })
}

fn stringsdict_file(normalizer: &Normalizer<'_>, locale: &str) -> Result<StringsdictFormat, Error> {
    let resolver = normalizer.resolver();
    let mut entries = Vec::new();
    for key in resolver.catalog().keys().plurals() {
        let Some(found) = resolver.locate_plural(locale, key) else {
            debug!(locale, key = key.as_str(), "no plural value; skipped");
            continue;
        };
        let forms = found
            .value
            .iter()
            .map(|(quantity, raw)| {
                normalizer
                    .for_stringsdict(locale, raw, found.origin)
                    .map(|text| (quantity.clone(), text))
            })
            .collect::<Result<PluralForms, _>>()?;
        entries.push(PluralEntry {
            key: key.clone(),
            forms,
        });
    }
    Ok(StringsdictFormat { entries })
}

/// Writes the CSV report.
pub fn write_csv<P: AsRef<Path>>(catalog: &Catalog, path: P) -> Result<(), Error> {
    let path = path.as_ref();
    info!(path = %path.display(), "exporting CSV");
    let normalizer = Normalizer::new(Resolver::new(catalog));
    let format = CsvFormat::from_catalog(&normalizer)?;
    create_parent(path)?;
    format.write_to(path)
}

/// Builds the accessor surface of the catalog.
pub fn accessor_surface(catalog: &Catalog) -> Result<AccessorSurface, Error> {
    AccessorSurface::from_catalog(&Normalizer::new(Resolver::new(catalog)))
}

/// Writes the accessor surface: Swift source for a `.swift` path, JSON
/// otherwise.
pub fn write_accessors<P: AsRef<Path>>(catalog: &Catalog, path: P) -> Result<(), Error> {
    let path = path.as_ref();
    info!(path = %path.display(), "exporting accessors");
    let surface = accessor_surface(catalog)?;
    let content = match path.extension().and_then(|ext| ext.to_str()) {
        Some("swift") => surface.to_swift(),
        _ => surface.to_json()?,
    };
    create_parent(path)?;
    fs::write(path, content)?;
    Ok(())
}

fn require_dir(path: &Path) -> Result<(), Error> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(Error::SourceNotFound(path.to_path_buf()))
    }
}

fn create_parent(path: &Path) -> Result<(), Error> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => Ok(fs::create_dir_all(parent)?),
        _ => Ok(()),
    }
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, Error> {
    let mut entries = fs::read_dir(dir)?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<Result<Vec<_>, _>>()?;
    entries.sort();
    Ok(entries)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
