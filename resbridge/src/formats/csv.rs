//! Support for the multi-locale CSV report.
//!
//! The first line is `ID` followed by one column per locale. Every following
//! row holds one string, one array element (`key.1`, `key.2`, …) or one
//! plural form (`key.one`, `key.other`, …). All body fields are quoted.
//!
//! Export goes through the [`Normalizer`], so cells carry the value each
//! locale actually resolves to, with references followed. Import classifies
//! each row id with [`RowKey::parse`] and writes non-empty cells back into a
//! [`LocaleStore`].

use std::io::{BufRead, Write};

use csv::{QuoteStyle, ReaderBuilder, Terminator, WriterBuilder};

use crate::{
    error::Error,
    normalize::Normalizer,
    store::{ArrayLookup, LocaleStore, MAX_ARRAY_LEN},
    traits::{BOM, Parser},
    types::QuantityClass,
};

/// Header cell of the key column.
pub const ID_COLUMN: &str = "ID";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Format {
    pub locales: Vec<String>,
    pub rows: Vec<Row>,
}

/// One body row. `cells` align with [`Format::locales`]; an empty cell means
/// no value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: String,
    pub cells: Vec<String>,
}

/// What a row id addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowKey {
    Plain(String),
    /// Zero-based index; the id carries it one-based.
    ArrayItem(String, usize),
    PluralForm(String, QuantityClass),
}

impl RowKey {
    /// `name.<n>` with `1 <= n <= MAX_ARRAY_LEN` is an array element,
    /// `name.<lowercase>` a plural form. Anything else, `name.0` and
    /// oversized indices included, is a plain string.
    pub fn parse(id: &str) -> RowKey {
        let Some((base, suffix)) = id.rsplit_once('.') else {
            return RowKey::Plain(id.to_string());
        };
        if base.is_empty() || suffix.is_empty() {
            return RowKey::Plain(id.to_string());
        }
        if suffix.bytes().all(|b| b.is_ascii_digit()) {
            return match suffix.parse::<usize>() {
                Ok(n) if (1..=MAX_ARRAY_LEN).contains(&n) => {
                    RowKey::ArrayItem(base.to_string(), n - 1)
                }
                _ => RowKey::Plain(id.to_string()),
            };
        }
        if suffix.bytes().all(|b| b.is_ascii_lowercase()) {
            return RowKey::PluralForm(base.to_string(), QuantityClass::from(suffix));
        }
        RowKey::Plain(id.to_string())
    }

    /// The id this key is written under.
    pub fn id(&self) -> String {
        match self {
            RowKey::Plain(key) => key.clone(),
            RowKey::ArrayItem(key, index) => format!("{}.{}", key, index + 1),
            RowKey::PluralForm(key, quantity) => format!("{}.{}", key, quantity),
        }
    }
}

impl Format {
    /// Builds the report for every locale of the catalog behind `normalizer`.
    pub fn from_catalog(normalizer: &Normalizer<'_>) -> Result<Self, Error> {
        let resolver = normalizer.resolver();
        let catalog = resolver.catalog();
        let locales: Vec<String> = catalog
            .report_locales()
            .into_iter()
            .map(str::to_string)
            .collect();

        let cell = |locale: &str, raw: Option<&str>| -> Result<String, Error> {
            raw.map_or_else(|| Ok(String::new()), |raw| normalizer.for_csv(locale, raw))
        };

        let mut rows = Vec::new();
        for key in catalog.keys().strings() {
            let cells = locales
                .iter()
                .map(|locale| cell(locale, resolver.string(locale, key)))
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(Row::new(RowKey::Plain(key.clone()), cells));
        }
        for key in catalog.keys().arrays() {
            for index in 0..catalog.max_array_len(key) {
                let cells = locales
                    .iter()
                    .map(|locale| {
                        let raw = resolver
                            .array(locale, key)
                            .and_then(|items| items.item(index));
                        cell(locale, raw)
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                rows.push(Row::new(RowKey::ArrayItem(key.clone(), index), cells));
            }
        }
        for key in catalog.keys().plurals() {
            for quantity in catalog.plural_classes(key) {
                let cells = locales
                    .iter()
                    .map(|locale| {
                        let raw = resolver
                            .plural(locale, key)
                            .and_then(|forms| forms.get(quantity))
                            .map(String::as_str);
                        cell(locale, raw)
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                rows.push(Row::new(
                    RowKey::PluralForm(key.clone(), quantity.clone()),
                    cells,
                ));
            }
        }
        Ok(Format { locales, rows })
    }

    /// Writes every non-empty cell into `store`.
    pub fn apply_to(&self, store: &mut LocaleStore) -> Result<(), Error> {
        for row in &self.rows {
            let key = RowKey::parse(&row.id);
            for (locale, value) in self.locales.iter().zip(&row.cells) {
                if value.is_empty() {
                    continue;
                }
                match &key {
                    RowKey::Plain(name) => store.insert_string(locale, name, value.as_str()),
                    RowKey::ArrayItem(name, index) => {
                        store.set_array_item(locale, name, *index, value.as_str())?
                    }
                    RowKey::PluralForm(name, quantity) => {
                        store.set_plural_form(locale, name, quantity.clone(), value.as_str())
                    }
                }
            }
        }
        Ok(())
    }
}

impl Row {
    pub fn new(key: RowKey, cells: Vec<String>) -> Self {
        Self { id: key.id(), cells }
    }
}

impl Parser for Format {
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);
        let mut records = rdr.records();

        let Some(header) = records.next() else {
            return Ok(Format::default());
        };
        let header = header?;
        let mut locales: Vec<String> = header
            .iter()
            .skip(1)
            .map(str::to_string)
            .collect();
        if locales.last().is_some_and(String::is_empty) {
            locales.pop();
        }

        let mut rows = Vec::new();
        for record in records {
            let record = record?;
            let Some(id) = record.get(0).filter(|id| !id.is_empty()) else {
                continue;
            };
            let cells = (0..locales.len())
                .map(|i| record.get(i + 1).unwrap_or_default().to_string())
                .collect();
            rows.push(Row {
                id: id.to_string(),
                cells,
            });
        }
        Ok(Format { locales, rows })
    }

    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut header = format!("{}{}", BOM, ID_COLUMN);
        for locale in &self.locales {
            header.push(',');
            header.push_str(locale);
        }
        header.push('\n');
        writer.write_all(header.as_bytes())?;

        let mut wtr = WriterBuilder::new()
            .quote_style(QuoteStyle::Always)
            .terminator(Terminator::Any(b'\n'))
            .flexible(true)
            .from_writer(writer);
        for row in &self.rows {
            wtr.write_field(&row.id)?;
            for cell in &row.cells {
                wtr.write_field(cell)?;
            }
            wtr.write_record(None::<&[u8]>)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{resolver::Resolver, store::LocaleStore, traits::Parser};

    fn write(format: &Format) -> String {
        let mut out = Vec::new();
        format.to_writer(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_row_key_classification() {
        assert_eq!(RowKey::parse("title"), RowKey::Plain("title".into()));
        assert_eq!(RowKey::parse("planets.1"), RowKey::ArrayItem("planets".into(), 0));
        assert_eq!(RowKey::parse("planets.12"), RowKey::ArrayItem("planets".into(), 11));
        assert_eq!(
            RowKey::parse("apples.few"),
            RowKey::PluralForm("apples".into(), QuantityClass::Few)
        );
        assert_eq!(RowKey::parse("planets.0"), RowKey::Plain("planets.0".into()));
        assert_eq!(RowKey::parse(".1"), RowKey::Plain(".1".into()));
        assert_eq!(RowKey::parse("x."), RowKey::Plain("x.".into()));
        assert_eq!(RowKey::parse("x.Other"), RowKey::Plain("x.Other".into()));
        assert_eq!(RowKey::parse("version.2_0"), RowKey::Plain("version.2_0".into()));
    }

    #[test]
    fn test_row_key_id_is_one_based() {
        assert_eq!(RowKey::ArrayItem("a".into(), 0).id(), "a.1");
        assert_eq!(RowKey::PluralForm("p".into(), QuantityClass::Zero).id(), "p.zero");
    }

    #[test]
    fn test_writer_quotes_body_but_not_header() {
        let format = Format {
            locales: vec!["Base".into(), "en".into()],
            rows: vec![Row {
                id: "greeting".into(),
                cells: vec!["Say \"hi\"".into(), String::new()],
            }],
        };
        assert_eq!(
            write(&format),
            "\u{feff}ID,Base,en\n\"greeting\",\"Say \"\"hi\"\"\",\"\"\n"
        );
    }

    #[test]
    fn test_reader_drops_trailing_empty_header_and_skips_empty_cells() {
        let content = "\u{feff}ID,Base,fr,\n\"a\",\"A\",\"\"\n\"b\",\"\",\"Bé\"\n";
        let format = Format::from_str(content).unwrap();
        assert_eq!(format.locales, vec!["Base", "fr"]);

        let mut store = LocaleStore::new();
        format.apply_to(&mut store).unwrap();
        assert_eq!(store.bundle("Base").unwrap().strings.len(), 1);
        assert_eq!(store.bundle("fr").unwrap().strings["b"], "Bé");
    }

    #[test]
    fn test_export_pads_arrays_to_longest() {
        let mut store = LocaleStore::new();
        store.insert_array("Base", "a", vec!["1".into(), "2".into()]);
        store.insert_array(
            "fr",
            "a",
            vec!["un".into(), "deux".into(), "trois".into(), "quatre".into()],
        );
        let catalog = store.freeze();
        let normalizer = Normalizer::new(Resolver::new(&catalog));
        let format = Format::from_catalog(&normalizer).unwrap();

        let ids: Vec<&str> = format.rows.iter().map(|row| row.id.as_str()).collect();
        assert_eq!(ids, vec!["a.1", "a.2", "a.3", "a.4"]);
        assert_eq!(format.rows[2].cells, vec!["", "trois"]);
    }

    #[test]
    fn test_export_plural_rows_in_canonical_order() {
        let mut store = LocaleStore::new();
        store.set_plural_form("Base", "p", QuantityClass::Other, "many");
        store.set_plural_form("Base", "p", QuantityClass::One, "one");
        store.set_plural_form("Base", "p", QuantityClass::Zero, "none");
        let catalog = store.freeze();
        let normalizer = Normalizer::new(Resolver::new(&catalog));
        let format = Format::from_catalog(&normalizer).unwrap();

        let ids: Vec<&str> = format.rows.iter().map(|row| row.id.as_str()).collect();
        assert_eq!(ids, vec!["p.zero", "p.one", "p.other"]);
    }

    #[test]
    fn test_export_resolves_fallback_and_references() {
        let mut store = LocaleStore::new();
        store.insert_string("Base", "app", "Demo");
        store.insert_string("Base", "title", "@string/app");
        store.insert_string("fr", "app", "Démo");
        let catalog = store.freeze();
        let normalizer = Normalizer::new(Resolver::new(&catalog));
        let format = Format::from_catalog(&normalizer).unwrap();

        assert_eq!(format.locales, vec!["Base", "fr"]);
        let title = format.rows.iter().find(|row| row.id == "title").unwrap();
        assert_eq!(title.cells, vec!["Demo", "Démo"]);
    }

    #[test]
    fn test_sparse_array_import() {
        let content = "ID,Base\n\"a.3\",\"third\"\n\"a.1\",\"first\"\n";
        let mut store = LocaleStore::new();
        Format::from_str(content).unwrap().apply_to(&mut store).unwrap();
        assert_eq!(
            store.bundle("Base").unwrap().arrays["a"],
            vec![Some("first".to_string()), None, Some("third".to_string())]
        );
    }

    #[test]
    fn test_oversized_array_index_is_plain_string() {
        assert_eq!(
            RowKey::parse("a.18446744073709551615"),
            RowKey::Plain("a.18446744073709551615".to_string())
        );
        assert_eq!(
            RowKey::parse("a.99999999999999999999999"),
            RowKey::Plain("a.99999999999999999999999".to_string())
        );
        assert_eq!(
            RowKey::parse(&format!("a.{}", MAX_ARRAY_LEN)),
            RowKey::ArrayItem("a".to_string(), MAX_ARRAY_LEN - 1)
        );

        let content = "ID,Base\n\"a.18446744073709551615\",\"x\"\n\"b.100000000\",\"y\"\n";
        let mut store = LocaleStore::new();
        Format::from_str(content).unwrap().apply_to(&mut store).unwrap();
        let bundle = store.bundle("Base").unwrap();
        assert_eq!(bundle.strings["a.18446744073709551615"], "x");
        assert_eq!(bundle.strings["b.100000000"], "y");
        assert!(bundle.arrays.is_empty());
    }

    #[test]
    fn test_quoted_literals_survive_reimport() {
        let mut store = LocaleStore::new();
        store.insert_string("Base", "blank", "\"\"");
        store.insert_string("Base", "dq", "\"\"hi\"\"");
        let catalog = store.freeze();
        let normalizer = Normalizer::new(Resolver::new(&catalog));
        let mut bytes = Vec::new();
        Format::from_catalog(&normalizer)
            .unwrap()
            .to_writer(&mut bytes)
            .unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("\"blank\",\"\"\"\"\"\"\n"));

        let mut reimported = LocaleStore::new();
        Format::from_str(&text).unwrap().apply_to(&mut reimported).unwrap();
        assert_eq!(reimported.bundle("Base"), catalog.bundle("Base"));
    }
}
