//! Support for Android `res/values*/*.xml` resource files.
//!
//! Reads `<string>`, `<string-array>` (and untyped `<array>`) and `<plurals>`
//! elements. Non-translatable and empty resources are dropped while parsing,
//! so a parsed [`Format`] only holds what should reach the locale store.

use std::{collections::BTreeMap, io::BufRead};

use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};

use crate::{
    error::Error,
    traits::Parser,
    types::{LocaleBundle, PluralForms, QuantityClass},
};

/// One parsed Android resource file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Format {
    pub strings: Vec<StringResource>,
    pub arrays: Vec<ArrayResource>,
    pub plurals: Vec<PluralsResource>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringResource {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayResource {
    pub name: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluralsResource {
    pub name: String,
    pub items: Vec<(QuantityClass, String)>,
}

impl Format {
    /// Converts into a bundle. Later entries with the same name win.
    pub fn into_bundle(self) -> LocaleBundle {
        let mut bundle = LocaleBundle::default();
        for sr in self.strings {
            bundle.strings.insert(sr.name, sr.value);
        }
        for array in self.arrays {
            bundle
                .arrays
                .insert(array.name, array.items.into_iter().map(Some).collect());
        }
        for plural in self.plurals {
            let forms: PluralForms = plural.items.into_iter().collect::<BTreeMap<_, _>>();
            bundle.plurals.insert(plural.name, forms);
        }
        bundle
    }
}

impl Parser for Format {
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.config_mut().expand_empty_elements = true;

        let mut buf = Vec::new();
        let mut format = Format::default();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => match e.name().as_ref() {
                    b"string" => {
                        let header = ResourceHeader::parse(e, "string")?;
                        let value = read_text_content(&mut xml_reader, b"string")?;
                        if header.translatable && !value.is_empty() {
                            format.strings.push(StringResource {
                                name: header.name,
                                value,
                            });
                        }
                    }
                    tag @ (b"string-array" | b"array") => {
                        let tag = tag.to_vec();
                        let header = ResourceHeader::parse(e, &String::from_utf8_lossy(&tag))?;
                        let items = read_items(&mut xml_reader, &tag)?;
                        if header.translatable && !items.is_empty() {
                            format.arrays.push(ArrayResource {
                                name: header.name,
                                items: items.into_iter().map(|(_, text)| text).collect(),
                            });
                        }
                    }
                    b"plurals" => {
                        let header = ResourceHeader::parse(e, "plurals")?;
                        let items = read_items(&mut xml_reader, b"plurals")?;
                        let items: Vec<(QuantityClass, String)> = items
                            .into_iter()
                            .filter_map(|(quantity, text)| {
                                quantity.map(|q| (QuantityClass::from(q.as_str()), text))
                            })
                            .collect();
                        if header.translatable && !items.is_empty() {
                            format.plurals.push(PluralsResource {
                                name: header.name,
                                items,
                            });
                        }
                    }
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => return Err(Error::XmlParse(e)),
            }
            buf.clear();
        }
        Ok(format)
    }

    /// Android files are only ever read.
    fn to_writer<W: std::io::Write>(&self, _writer: W) -> Result<(), Error> {
        Err(Error::DataMismatch(
            "writing Android resource files is not supported".to_string(),
        ))
    }
}

struct ResourceHeader {
    name: String,
    translatable: bool,
}

impl ResourceHeader {
    fn parse(e: &BytesStart, tag: &str) -> Result<Self, Error> {
        let mut name = None;
        let mut translatable = true;

        for attr in e.attributes().with_checks(false) {
            let attr = attr?;
            match attr.key.as_ref() {
                b"name" => name = Some(attr.unescape_value()?.to_string()),
                b"translatable" => translatable = attr.unescape_value()? != "false",
                _ => {}
            }
        }
        let name =
            name.ok_or_else(|| Error::InvalidResource(format!("{} tag missing 'name'", tag)))?;
        Ok(Self { name, translatable })
    }
}

/// Collects all text and CDATA inside the current element, descending into
/// nested markup such as `<xliff:g>`, until the matching end tag.
fn read_text_content<R: BufRead>(xml_reader: &mut Reader<R>, end: &[u8]) -> Result<String, Error> {
    let mut buf = Vec::new();
    let mut value = String::new();
    let mut depth = 0usize;

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Text(e)) => value.push_str(&e.unescape()?),
            Ok(Event::CData(e)) => value.push_str(&String::from_utf8_lossy(&e.into_inner())),
            Ok(Event::Start(_)) => depth += 1,
            Ok(Event::End(e)) => {
                if depth == 0 && e.name().as_ref() == end {
                    break;
                }
                depth = depth.saturating_sub(1);
            }
            Ok(Event::Eof) => return Err(Error::InvalidResource("Unexpected EOF".to_string())),
            Ok(_) => {}
            Err(e) => return Err(Error::XmlParse(e)),
        }
        buf.clear();
    }
    Ok(value)
}

/// Reads the `<item>` children of an array or plurals element, returning the
/// optional `quantity` attribute with each item's text. Empty items are kept
/// out of the result.
fn read_items<R: BufRead>(
    xml_reader: &mut Reader<R>,
    end: &[u8],
) -> Result<Vec<(Option<String>, String)>, Error> {
    let mut buf = Vec::new();
    let mut items = Vec::new();

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"item" => {
                let mut quantity = None;
                for attr in e.attributes().with_checks(false) {
                    let attr = attr?;
                    if attr.key.as_ref() == b"quantity" {
                        quantity = Some(attr.unescape_value()?.to_string());
                    }
                }
                let text = read_text_content(xml_reader, b"item")?;
                if !text.is_empty() {
                    items.push((quantity, text));
                }
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == end => break,
            Ok(Event::Eof) => return Err(Error::InvalidResource("Unexpected EOF".to_string())),
            Ok(_) => {}
            Err(e) => return Err(Error::XmlParse(e)),
        }
        buf.clear();
    }
    Ok(items)
}
