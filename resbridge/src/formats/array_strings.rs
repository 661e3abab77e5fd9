//! Ordered-list files: one parenthesized string list per key.
//!
//! ```text
//! "planets" = (
//!     "Mercury",
//!     "Venus",
//! );
//! ```
//!
//! Written with a UTF-8 BOM. Items hold file-level (escaped) text, like
//! [`super::strings::Pair`] values.

use std::io::{BufRead, Read, Write};

use crate::{
    error::Error,
    formats::strings::{Lexer, eat_punct, expect_punct, expect_text},
    normalize::escape_quotes,
    traits::{BOM, Parser},
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Format {
    pub lists: Vec<List>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct List {
    pub key: String,
    pub items: Vec<String>,
}

impl List {
    /// Builds a list from an unescaped key and already escaped items.
    pub fn new(key: &str, escaped_items: Vec<String>) -> Self {
        Self {
            key: escape_quotes(key),
            items: escaped_items,
        }
    }
}

impl Parser for Format {
    fn from_reader<R: BufRead>(mut reader: R) -> Result<Self, Error> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;

        let mut tokens = Lexer::new(&content).peekable();
        let mut lists = Vec::new();
        while tokens.peek().is_some() {
            let key = expect_text(&mut tokens)?;
            expect_punct(&mut tokens, '=')?;
            expect_punct(&mut tokens, '(')?;
            let mut items = Vec::new();
            while !eat_punct(&mut tokens, ')') {
                items.push(expect_text(&mut tokens)?);
                if !eat_punct(&mut tokens, ',') {
                    expect_punct(&mut tokens, ')')?;
                    break;
                }
            }
            expect_punct(&mut tokens, ';')?;
            lists.push(List { key, items });
        }
        Ok(Format { lists })
    }

    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut content = String::from(BOM);
        for list in &self.lists {
            content.push_str(&format!("\"{}\" = (\n", list.key));
            for item in &list.items {
                content.push_str(&format!("    \"{}\",\n", item));
            }
            content.push_str(");\n");
        }
        writer.write_all(content.as_bytes()).map_err(Error::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Parser;

    #[test]
    fn test_writer_output_is_exact() {
        let format = Format {
            lists: vec![List::new(
                "planets",
                vec!["Mercury".to_string(), "Venus".to_string()],
            )],
        };
        let mut out = Vec::new();
        format.to_writer(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\u{feff}\"planets\" = (\n    \"Mercury\",\n    \"Venus\",\n);\n"
        );
    }

    #[test]
    fn test_parse_with_and_without_trailing_comma() {
        let content = r#"
        "a" = (
            "1",
            "2",
        );
        /* no trailing comma */
        "b" = ("x", "y \"quoted\"");
        "empty" = ();
        "#;
        let parsed = Format::from_str(content).unwrap();
        assert_eq!(parsed.lists.len(), 3);
        assert_eq!(parsed.lists[0].items, vec!["1", "2"]);
        assert_eq!(parsed.lists[1].items, vec!["x", r#"y \"quoted\""#]);
        assert!(parsed.lists[2].items.is_empty());
    }

    #[test]
    fn test_round_trip() {
        let format = Format {
            lists: vec![
                List::new("a", vec!["one".to_string()]),
                List::new("b", vec!["two".to_string(), "three".to_string()]),
            ],
        };
        let mut out = Vec::new();
        format.to_writer(&mut out).unwrap();
        let reparsed = Format::from_str(&String::from_utf8(out).unwrap()).unwrap();
        assert_eq!(format, reparsed);
    }

    #[test]
    fn test_missing_close_paren_is_an_error() {
        let content = r#""a" = ("1" "2");"#;
        assert!(Format::from_str(content).is_err());
    }
}
