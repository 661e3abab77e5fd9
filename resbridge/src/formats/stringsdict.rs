//! Support for Apple `.stringsdict` plural dictionaries.
//!
//! Every entry is written with a single format variable named `value`:
//! `NSStringLocalizedFormatKey` is `%#@value@` and the `value` dictionary
//! carries the plural-rule descriptors followed by one string per quantity
//! class, in canonical order.
//!
//! Reading accepts any variable name. It uses the variable named by the
//! localized format key, or the first nested dictionary when that lookup
//! fails. Every non-descriptor entry of that dictionary is a quantity form.

use std::io::{BufRead, Write};

use indoc::indoc;
use quick_xml::{Reader, escape::escape, events::Event, name::QName};

use crate::{
    error::Error,
    traits::{BOM, Parser},
    types::{PluralForms, QuantityClass},
};

const FORMAT_KEY: &str = "NSStringLocalizedFormatKey";
const DESCRIPTOR_PREFIX: &str = "NSStringFormat";
const VARIABLE: &str = "value";

const HEADER: &str = indoc! {r#"
    <?xml version="1.0" encoding="UTF-8"?>
    <!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
    <plist version="1.0">
    <dict>
"#};

const FOOTER: &str = indoc! {r#"
    </dict>
    </plist>
"#};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Format {
    pub entries: Vec<PluralEntry>,
}

/// One plural key. Text is unescaped; the writer escapes XML itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluralEntry {
    pub key: String,
    pub forms: PluralForms,
}

impl Parser for Format {
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.config_mut().expand_empty_elements = true;

        let mut buf = Vec::new();
        let root = loop {
            match xml_reader.read_event_into(&mut buf)? {
                Event::Start(ref e) if e.name().as_ref() == b"dict" => {
                    break read_dict(&mut xml_reader)?;
                }
                Event::Eof => return Ok(Format::default()),
                _ => {}
            }
            buf.clear();
        };

        let mut entries = Vec::new();
        for (key, node) in root {
            let Node::Dict(fields) = node else {
                return Err(Error::InvalidResource(format!(
                    "stringsdict entry `{}` is not a dictionary",
                    key
                )));
            };
            let forms = plural_forms(&key, &fields)?;
            entries.push(PluralEntry { key, forms });
        }
        Ok(Format { entries })
    }

    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut content = String::from(BOM);
        content.push_str(HEADER);
        for entry in &self.entries {
            content.push_str(&render_entry(entry));
        }
        content.push_str(FOOTER);
        writer.write_all(content.as_bytes()).map_err(Error::Io)
    }
}

fn render_entry(entry: &PluralEntry) -> String {
    let mut out = String::new();
    out.push_str(&format!("\t<key>{}</key>\n\t<dict>\n", escape(entry.key.as_str())));
    out.push_str(&format!(
        "\t\t<key>{FORMAT_KEY}</key>\n\t\t<string>%#@{VARIABLE}@</string>\n"
    ));
    out.push_str(&format!("\t\t<key>{VARIABLE}</key>\n\t\t<dict>\n"));
    out.push_str(
        "\t\t\t<key>NSStringFormatSpecTypeKey</key>\n\t\t\t<string>NSStringPluralRuleType</string>\n",
    );
    out.push_str("\t\t\t<key>NSStringFormatValueTypeKey</key>\n\t\t\t<string>d</string>\n");
    for (quantity, text) in &entry.forms {
        out.push_str(&format!(
            "\t\t\t<key>{}</key>\n\t\t\t<string>{}</string>\n",
            escape(quantity.as_str()),
            escape(text.as_str())
        ));
    }
    out.push_str("\t\t</dict>\n\t</dict>\n");
    out
}

/// Minimal plist tree: only dictionaries and strings carry meaning here.
#[derive(Debug)]
enum Node {
    Dict(Vec<(String, Node)>),
    Text(String),
    Other,
}

fn plural_forms(key: &str, fields: &[(String, Node)]) -> Result<PluralForms, Error> {
    let variable = fields.iter().find_map(|(name, node)| match node {
        Node::Text(format) if name == FORMAT_KEY => format
            .split_once("%#@")
            .and_then(|(_, rest)| rest.split_once('@'))
            .map(|(var, _)| var.to_string()),
        _ => None,
    });

    let dicts = || {
        fields.iter().filter_map(|(name, node)| match node {
            Node::Dict(inner) => Some((name, inner)),
            _ => None,
        })
    };
    let inner = variable
        .and_then(|var| dicts().find(|(name, _)| **name == var))
        .or_else(|| dicts().next())
        .map(|(_, inner)| inner)
        .ok_or_else(|| {
            Error::InvalidResource(format!(
                "stringsdict entry `{}` has no plural variable",
                key
            ))
        })?;

    Ok(inner
        .iter()
        .filter(|(name, _)| !name.starts_with(DESCRIPTOR_PREFIX))
        .filter_map(|(name, node)| match node {
            Node::Text(text) => Some((QuantityClass::from(name.as_str()), text.clone())),
            _ => None,
        })
        .collect())
}

/// Reads `<key>`/value pairs until the `</dict>` closing the current one.
fn read_dict<R: BufRead>(xml_reader: &mut Reader<R>) -> Result<Vec<(String, Node)>, Error> {
    let mut buf = Vec::new();
    let mut entries = Vec::new();
    let mut pending_key: Option<String> = None;

    loop {
        match xml_reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                let name = e.name().as_ref().to_vec();
                if name == b"key" {
                    pending_key = Some(read_text(xml_reader, b"key")?);
                } else {
                    let node = match name.as_slice() {
                        b"dict" => Node::Dict(read_dict(xml_reader)?),
                        b"string" => Node::Text(read_text(xml_reader, b"string")?),
                        _ => {
                            let mut skip = Vec::new();
                            xml_reader.read_to_end_into(QName(&name), &mut skip)?;
                            Node::Other
                        }
                    };
                    let key = pending_key.take().ok_or_else(|| {
                        Error::InvalidResource("plist value without a preceding <key>".to_string())
                    })?;
                    entries.push((key, node));
                }
            }
            Event::End(ref e) if e.name().as_ref() == b"dict" => break,
            Event::Eof => return Err(Error::InvalidResource("Unexpected EOF".to_string())),
            _ => {}
        }
        buf.clear();
    }
    Ok(entries)
}

fn read_text<R: BufRead>(xml_reader: &mut Reader<R>, end: &[u8]) -> Result<String, Error> {
    let mut buf = Vec::new();
    let mut text = String::new();
    loop {
        match xml_reader.read_event_into(&mut buf)? {
            Event::Text(e) => text.push_str(&e.unescape()?),
            Event::CData(e) => text.push_str(&String::from_utf8_lossy(&e.into_inner())),
            Event::End(ref e) if e.name().as_ref() == end => break,
            Event::Eof => return Err(Error::InvalidResource("Unexpected EOF".to_string())),
            _ => {}
        }
        buf.clear();
    }
    Ok(text)
}
