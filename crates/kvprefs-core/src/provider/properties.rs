//! Java `.properties` text format
//!
//! Reads and writes the format produced by `java.util.Properties`, so files
//! written by either side stay interchangeable:
//!
//! - Text is ISO-8859-1; anything outside printable ASCII is written as
//!   `\uXXXX` (UTF-16 code units, so astral characters become a pair).
//! - `#` and `!` start comment lines; blank lines are ignored.
//! - A line ending in an odd number of backslashes continues on the next line.
//! - A key ends at the first unescaped `=`, `:` or whitespace.

use std::collections::BTreeMap;

use super::traits::{ProviderError, ProviderResult};

/// An ordered set of string properties
///
/// Entries are kept sorted by key so that stored files are stable between
/// writes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: BTreeMap<String, String>,
}

impl Properties {
    /// Create an empty property set
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse ISO-8859-1 encoded properties text
    ///
    /// Later definitions of the same key replace earlier ones.
    pub fn load(bytes: &[u8]) -> ProviderResult<Self> {
        // ISO-8859-1 maps every byte to the code point of the same value
        let text: Vec<char> = bytes.iter().map(|&b| char::from(b)).collect();

        let mut properties = Self::new();
        for line in LineReader::new(&text) {
            let (key, value) = split_key_value(&line.chars);
            let key = unescape(key, line.number)?;
            let value = unescape(value, line.number)?;
            properties.entries.insert(key, value);
        }
        Ok(properties)
    }

    /// Serialize to ISO-8859-1 encoded properties text
    ///
    /// `comment`, if given, is written as a `#` header. Embedded line breaks
    /// start new comment lines.
    pub fn store(&self, comment: Option<&str>) -> Vec<u8> {
        let mut out = String::new();
        if let Some(comment) = comment {
            write_comment(&mut out, comment);
        }
        for (key, value) in &self.entries {
            out.push_str(&escape(key, true));
            out.push('=');
            out.push_str(&escape(value, false));
            out.push('\n');
        }
        // Everything above 0xFF was escaped, so each char fits one byte
        out.chars().map(|c| c as u32 as u8).collect()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Insert a property, returning the previous value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    /// Remove a property, returning its value
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over properties in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// A logical line with continuations joined and comments dropped
struct LogicalLine {
    /// 1-based number of the natural line the logical line starts on
    number: usize,
    chars: Vec<char>,
}

/// Splits text into logical lines
struct LineReader<'a> {
    text: &'a [char],
    pos: usize,
    line: usize,
}

impl<'a> LineReader<'a> {
    fn new(text: &'a [char]) -> Self {
        Self { text, pos: 0, line: 1 }
    }
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\u{000C}')
}

impl Iterator for LineReader<'_> {
    type Item = LogicalLine;

    fn next(&mut self) -> Option<LogicalLine> {
        let mut chars = Vec::new();
        let mut start = self.line;
        let mut skip_whitespace = true;
        let mut appended_line_begin = false;
        let mut is_new_line = true;
        let mut is_comment = false;
        let mut preceding_backslash = false;

        while self.pos < self.text.len() {
            let c = self.text[self.pos];
            self.pos += 1;

            if skip_whitespace {
                if is_whitespace(c) {
                    continue;
                }
                if !appended_line_begin && (c == '\r' || c == '\n') {
                    self.consume_terminator(c);
                    start = self.line;
                    continue;
                }
                skip_whitespace = false;
                appended_line_begin = false;
            }

            if is_new_line {
                is_new_line = false;
                if c == '#' || c == '!' {
                    is_comment = true;
                    continue;
                }
            }

            if c != '\n' && c != '\r' {
                if !is_comment {
                    chars.push(c);
                    preceding_backslash = c == '\\' && !preceding_backslash;
                }
                continue;
            }

            self.consume_terminator(c);

            if is_comment || chars.is_empty() {
                is_comment = false;
                is_new_line = true;
                skip_whitespace = true;
                preceding_backslash = false;
                chars.clear();
                start = self.line;
                continue;
            }

            if preceding_backslash {
                chars.pop();
                skip_whitespace = true;
                appended_line_begin = true;
                preceding_backslash = false;
                continue;
            }

            return Some(LogicalLine { number: start, chars });
        }

        if is_comment || chars.is_empty() {
            return None;
        }
        if preceding_backslash {
            chars.pop();
        }
        Some(LogicalLine { number: start, chars })
    }
}

impl LineReader<'_> {
    /// Count a line break, swallowing the `\n` of a `\r\n` pair
    fn consume_terminator(&mut self, c: char) {
        if c == '\r' && self.text.get(self.pos) == Some(&'\n') {
            self.pos += 1;
        }
        self.line += 1;
    }
}

/// Split a logical line into its raw (still escaped) key and value
fn split_key_value(line: &[char]) -> (&[char], &[char]) {
    let limit = line.len();
    let mut key_len = 0;
    let mut value_start = limit;
    let mut has_separator = false;
    let mut preceding_backslash = false;

    while key_len < limit {
        let c = line[key_len];
        if (c == '=' || c == ':') && !preceding_backslash {
            value_start = key_len + 1;
            has_separator = true;
            break;
        } else if is_whitespace(c) && !preceding_backslash {
            value_start = key_len + 1;
            break;
        }
        preceding_backslash = c == '\\' && !preceding_backslash;
        key_len += 1;
    }

    while value_start < limit {
        let c = line[value_start];
        if !is_whitespace(c) {
            if !has_separator && (c == '=' || c == ':') {
                has_separator = true;
            } else {
                break;
            }
        }
        value_start += 1;
    }

    (&line[..key_len], &line[value_start..])
}

/// Decode backslash escapes
fn unescape(raw: &[char], line: usize) -> ProviderResult<String> {
    let mut units: Vec<u16> = Vec::with_capacity(raw.len());
    let mut iter = raw.iter().copied();

    while let Some(c) = iter.next() {
        if c != '\\' {
            units.push(c as u16);
            continue;
        }
        let Some(escaped) = iter.next() else {
            break;
        };
        match escaped {
            'u' => {
                let mut code: u16 = 0;
                for _ in 0..4 {
                    let digit = iter
                        .next()
                        .and_then(|d| d.to_digit(16))
                        .ok_or_else(|| ProviderError::malformed(line, "Malformed \\uxxxx encoding"))?;
                    code = (code << 4) | digit as u16;
                }
                units.push(code);
            }
            't' => units.push('\t' as u16),
            'r' => units.push('\r' as u16),
            'n' => units.push('\n' as u16),
            'f' => units.push(0x0C),
            other => units.push(other as u16),
        }
    }

    Ok(String::from_utf16_lossy(&units))
}

/// Encode a key or value for writing
///
/// Keys escape every space; values only a leading one.
fn escape(text: &str, escape_space: bool) -> String {
    let mut out = String::with_capacity(text.len() * 2);
    for (i, unit) in text.encode_utf16().enumerate() {
        match unit {
            0x5C => out.push_str("\\\\"),
            0x20 if i == 0 || escape_space => out.push_str("\\ "),
            0x09 => out.push_str("\\t"),
            0x0A => out.push_str("\\n"),
            0x0D => out.push_str("\\r"),
            0x0C => out.push_str("\\f"),
            0x3D | 0x3A | 0x23 | 0x21 => {
                out.push('\\');
                out.push(unit as u8 as char);
            }
            0x20..=0x7E => out.push(unit as u8 as char),
            _ => out.push_str(&format!("\\u{:04X}", unit)),
        }
    }
    out
}

/// Write a `#` comment block
fn write_comment(out: &mut String, comment: &str) {
    out.push('#');
    let mut chars = comment.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' | '\n' => {
                if c == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push('\n');
                if !matches!(chars.peek(), Some('#') | Some('!')) {
                    out.push('#');
                }
            }
            c if (c as u32) > 0xFF => {
                let mut buf = [0u16; 2];
                for unit in c.encode_utf16(&mut buf) {
                    out.push_str(&format!("\\u{:04X}", unit));
                }
            }
            c => out.push(c),
        }
    }
    out.push('\n');
}
