//! Support for Apple `.strings` localization files.
//!
//! Files are written as a UTF-8 BOM followed by one `"key" = "value";` line
//! per entry. Reading accepts the wider syntax Xcode produces: comments,
//! unquoted keys, multi-line values and UTF-16 input.
//!
//! [`Pair`] values hold the file-level text, i.e. with `\"` escapes intact.

use std::{
    fmt::{Display, Formatter},
    io::{BufRead, Read, Write},
};

use crate::{
    error::Error,
    normalize::{escape_quotes, unescape_quotes},
    traits::{BOM, Parser},
};

/// Represents an Apple `.strings` localization file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Format {
    /// All key-value pairs in the file, in file order.
    pub pairs: Vec<Pair>,
}

/// A single key-value pair in a `.strings` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
    pub key: String,
    /// Escaped value, exactly as it appears between the quotes.
    pub value: String,
}

impl Pair {
    /// Builds a pair from an unescaped key and an already escaped value.
    pub fn new(key: &str, escaped_value: String) -> Self {
        Self {
            key: escape_quotes(key),
            value: escaped_value,
        }
    }

    /// Key with `\"` escapes undone.
    pub fn plain_key(&self) -> String {
        unescape_quotes(&self.key)
    }

    /// Value with `\"` escapes undone.
    pub fn plain_value(&self) -> String {
        unescape_quotes(&self.value)
    }
}

impl Display for Pair {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\" = \"{}\";", self.key, self.value)
    }
}

impl Parser for Format {
    fn from_reader<R: BufRead>(mut reader: R) -> Result<Self, Error> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;

        let mut tokens = Lexer::new(&content).peekable();
        let mut pairs = Vec::new();
        while tokens.peek().is_some() {
            let key = expect_text(&mut tokens)?;
            expect_punct(&mut tokens, '=')?;
            let value = expect_text(&mut tokens)?;
            expect_punct(&mut tokens, ';')?;
            pairs.push(Pair { key, value });
        }
        Ok(Format { pairs })
    }

    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut content = String::from(BOM);
        for pair in &self.pairs {
            content.push_str(&pair.to_string());
            content.push('\n');
        }
        writer.write_all(content.as_bytes()).map_err(Error::Io)
    }
}

/// Lexical token of the `.strings` family of files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    /// Quoted (escapes kept) or bare text.
    Text(String),
    Punct(char),
}

/// Tokenizer shared by `.strings` and the ordered-list file.
pub(crate) struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    source: &'a str,
}

impl<'a> Lexer<'a> {
    pub(crate) fn new(source: &'a str) -> Self {
        Self {
            chars: source.char_indices().peekable(),
            source,
        }
    }

    fn line_of(&self, offset: usize) -> usize {
        self.source[..offset].matches('\n').count() + 1
    }

    fn skip_trivia(&mut self) -> Result<(), Error> {
        loop {
            match self.chars.peek().copied() {
                Some((_, c)) if c.is_whitespace() => {
                    self.chars.next();
                }
                Some((offset, '/')) => {
                    let rest = &self.source[offset..];
                    if rest.starts_with("//") {
                        while let Some((_, c)) = self.chars.next() {
                            if c == '\n' {
                                break;
                            }
                        }
                    } else if rest.starts_with("/*") {
                        let close = rest[2..].find("*/").ok_or_else(|| {
                            Error::DataMismatch(format!(
                                "unterminated comment at line {}",
                                self.line_of(offset)
                            ))
                        })?;
                        let end = offset + 2 + close + 2;
                        while self.chars.next_if(|(i, _)| *i < end).is_some() {}
                    } else {
                        return Ok(());
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn quoted(&mut self, start: usize) -> Result<String, Error> {
        let mut text = String::new();
        while let Some((_, c)) = self.chars.next() {
            match c {
                '"' => return Ok(text),
                '\\' => {
                    text.push('\\');
                    if let Some((_, escaped)) = self.chars.next() {
                        text.push(escaped);
                    }
                }
                c => text.push(c),
            }
        }
        Err(Error::DataMismatch(format!(
            "unterminated string starting at line {}",
            self.line_of(start)
        )))
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Err(e) = self.skip_trivia() {
            return Some(Err(e));
        }
        let (offset, c) = self.chars.next()?;
        Some(match c {
            '"' => self.quoted(offset).map(Token::Text),
            '=' | ';' | '(' | ')' | ',' => Ok(Token::Punct(c)),
            c if is_bare(c) => {
                let mut text = String::from(c);
                while let Some((_, next)) = self.chars.next_if(|(_, n)| is_bare(*n)) {
                    text.push(next);
                }
                Ok(Token::Text(text))
            }
            other => Err(Error::DataMismatch(format!(
                "unexpected character `{}` at line {}",
                other,
                self.line_of(offset)
            ))),
        })
    }
}

fn is_bare(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '.' | '-')
}

pub(crate) type Tokens<'a> = std::iter::Peekable<Lexer<'a>>;

pub(crate) fn expect_text(tokens: &mut Tokens<'_>) -> Result<String, Error> {
    match tokens.next() {
        Some(Ok(Token::Text(text))) => Ok(text),
        Some(Ok(Token::Punct(p))) => Err(Error::DataMismatch(format!(
            "expected a quoted string, found `{}`",
            p
        ))),
        Some(Err(e)) => Err(e),
        None => Err(Error::DataMismatch(
            "expected a quoted string, found end of file".to_string(),
        )),
    }
}

pub(crate) fn expect_punct(tokens: &mut Tokens<'_>, expected: char) -> Result<(), Error> {
    match tokens.next() {
        Some(Ok(Token::Punct(p))) if p == expected => Ok(()),
        Some(Ok(Token::Punct(p))) => Err(Error::DataMismatch(format!(
            "expected `{}`, found `{}`",
            expected, p
        ))),
        Some(Ok(Token::Text(text))) => Err(Error::DataMismatch(format!(
            "expected `{}`, found \"{}\"",
            expected, text
        ))),
        Some(Err(e)) => Err(e),
        None => Err(Error::DataMismatch(format!(
            "expected `{}`, found end of file",
            expected
        ))),
    }
}

/// Consumes `expected` if it is the next token.
pub(crate) fn eat_punct(tokens: &mut Tokens<'_>, expected: char) -> bool {
    tokens
        .next_if(|token| matches!(token, Ok(Token::Punct(p)) if *p == expected))
        .is_some()
}
