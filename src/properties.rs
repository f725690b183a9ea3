//! Final property maps and the normalization rules that produce them.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;

pub const INDENT_STYLE: &str = "indent_style";
pub const INDENT_SIZE: &str = "indent_size";
pub const TAB_WIDTH: &str = "tab_width";
pub const END_OF_LINE: &str = "end_of_line";
pub const CHARSET: &str = "charset";
pub const TRIM_TRAILING_WHITESPACE: &str = "trim_trailing_whitespace";
pub const INSERT_FINAL_NEWLINE: &str = "insert_final_newline";
pub const MAX_LINE_LENGTH: &str = "max_line_length";
pub const ROOT: &str = "root";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentStyle {
    Tab,
    Space,
}

impl FromStr for IndentStyle {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tab" => Ok(Self::Tab),
            "space" => Ok(Self::Space),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentSize {
    Columns(u32),
    /// Use whatever `tab_width` resolves to
    Tab,
}

impl FromStr for IndentSize {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "tab" {
            return Ok(Self::Tab);
        }
        parse_positive(s).map(Self::Columns).ok_or(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndOfLine {
    Lf,
    CrLf,
    Cr,
}

impl EndOfLine {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
            Self::Cr => "\r",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Lf => "lf",
            Self::CrLf => "crlf",
            Self::Cr => "cr",
        }
    }

    /// Line ending of the platform this binary was built for.
    pub fn native() -> Self {
        if cfg!(windows) {
            Self::CrLf
        } else {
            Self::Lf
        }
    }
}

impl FromStr for EndOfLine {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lf" => Ok(Self::Lf),
            "crlf" => Ok(Self::CrLf),
            "cr" => Ok(Self::Cr),
            _ => Err(()),
        }
    }
}

impl fmt::Display for EndOfLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Charset {
    Latin1,
    Utf8,
    Utf8Bom,
    Utf16Be,
    Utf16Le,
}

impl FromStr for Charset {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "latin1" => Ok(Self::Latin1),
            "utf-8" => Ok(Self::Utf8),
            "utf-8-bom" => Ok(Self::Utf8Bom),
            "utf-16be" => Ok(Self::Utf16Be),
            "utf-16le" => Ok(Self::Utf16Le),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxLineLength {
    Columns(u32),
    Off,
}

impl FromStr for MaxLineLength {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "off" {
            return Ok(Self::Off);
        }
        parse_positive(s).map(Self::Columns).ok_or(())
    }
}

fn parse_positive(s: &str) -> Option<u32> {
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok().filter(|&n| n > 0)
}

fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Whether `value` (already lowercased) is acceptable for a known key.
///
/// Returns `None` for keys this crate does not interpret.
fn validate(key: &str, value: &str) -> Option<bool> {
    let valid = match key {
        INDENT_STYLE => value.parse::<IndentStyle>().is_ok(),
        INDENT_SIZE => value.parse::<IndentSize>().is_ok(),
        TAB_WIDTH => parse_positive(value).is_some(),
        END_OF_LINE => value.parse::<EndOfLine>().is_ok(),
        CHARSET => value.parse::<Charset>().is_ok(),
        MAX_LINE_LENGTH => value.parse::<MaxLineLength>().is_ok(),
        TRIM_TRAILING_WHITESPACE | INSERT_FINAL_NEWLINE | ROOT => parse_bool(value).is_some(),
        _ => return None,
    };
    Some(valid)
}

/// Resolved properties for one file.
///
/// Keys are lowercase. Absence of a key means "no opinion".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyMap {
    entries: IndexMap<String, String>,
}

impl PropertyMap {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn indent_style(&self) -> Option<IndentStyle> {
        self.get(INDENT_STYLE)?.parse().ok()
    }

    pub fn indent_size(&self) -> Option<IndentSize> {
        self.get(INDENT_SIZE)?.parse().ok()
    }

    pub fn tab_width(&self) -> Option<u32> {
        parse_positive(self.get(TAB_WIDTH)?)
    }

    pub fn end_of_line(&self) -> Option<EndOfLine> {
        self.get(END_OF_LINE)?.parse().ok()
    }

    pub fn charset(&self) -> Option<Charset> {
        self.get(CHARSET)?.parse().ok()
    }

    pub fn trim_trailing_whitespace(&self) -> Option<bool> {
        parse_bool(self.get(TRIM_TRAILING_WHITESPACE)?)
    }

    pub fn insert_final_newline(&self) -> Option<bool> {
        parse_bool(self.get(INSERT_FINAL_NEWLINE)?)
    }

    pub fn max_line_length(&self) -> Option<MaxLineLength> {
        self.get(MAX_LINE_LENGTH)?.parse().ok()
    }
}

impl<'a> IntoIterator for &'a PropertyMap {
    type Item = (&'a String, &'a String);
    type IntoIter = indexmap::map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Canonicalize a merged map.
///
/// Known keys get lowercased values and invalid ones are dropped; then
/// `indent_size` and `tab_width` are filled in from each other.
pub fn normalize(raw: IndexMap<String, String>) -> PropertyMap {
    let mut entries = IndexMap::with_capacity(raw.len());

    for (key, value) in raw {
        let key = key.to_lowercase();
        let lowered = value.to_lowercase();
        match validate(&key, &lowered) {
            Some(true) => {
                entries.insert(key, lowered);
            }
            Some(false) => {
                log::debug!("dropping {key} = {value}: unrecognized value");
            }
            None => {
                entries.insert(key, value);
            }
        }
    }

    fill_indentation(&mut entries);
    PropertyMap { entries }
}

fn fill_indentation(entries: &mut IndexMap<String, String>) {
    let indent_style = entries.get(INDENT_STYLE).cloned();
    let indent_size = entries.get(INDENT_SIZE).cloned();
    let tab_width = entries.get(TAB_WIDTH).cloned();

    match (indent_size.as_deref(), tab_width) {
        (None, Some(width)) if indent_style.as_deref() == Some("tab") => {
            entries.insert(INDENT_SIZE.to_string(), width);
        }
        (Some("tab"), Some(width)) => {
            entries.insert(INDENT_SIZE.to_string(), width);
        }
        (Some(size), None) if size != "tab" => {
            entries.insert(TAB_WIDTH.to_string(), size.to_string());
        }
        _ => {}
    }
}
