//! EditorConfig glob patterns.
//!
//! Patterns are translated by hand into an anchored [`regex::Regex`]. Numeric
//! ranges (`{1..10}`) become capture groups whose text is checked against
//! the range after the regex matches.

use std::path::{Component, Path, PathBuf};

use regex::Regex;

/// Regex fragment standing in for one `{n1..n2}` range.
const NUMBER_CAPTURE: &str = "([+-]?[0-9]+)";

/// Inclusive integer range from a `{n1..n2}` brace expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NumericRange {
    low: i64,
    high: i64,
}

impl NumericRange {
    fn parse(text: &str) -> Option<Self> {
        let (start, end) = text.split_once("..")?;
        let start = parse_integer(start)?;
        let end = parse_integer(end)?;
        Some(Self {
            low: start.min(end),
            high: start.max(end),
        })
    }

    fn contains(self, n: i64) -> bool {
        (self.low..=self.high).contains(&n)
    }
}

fn parse_integer(text: &str) -> Option<i64> {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// A compiled glob matched against `/`-separated relative paths.
///
/// Construction never fails: a pattern the translator cannot turn into a
/// valid regex (such as `[z-a]`) produces a glob that matches nothing.
#[derive(Debug, Clone)]
pub struct Glob {
    regex: Option<Regex>,
    ranges: Vec<NumericRange>,
}

impl Glob {
    pub fn new(pattern: &str) -> Self {
        let chars: Vec<char> = pattern.chars().collect();
        let mut translator = Translator::default();
        let body = translator.translate(&chars);

        let regex = match Regex::new(&format!("^{body}$")) {
            Ok(regex) => Some(regex),
            Err(e) => {
                log::debug!("glob `{pattern}` will never match: {e}");
                None
            }
        };

        Self {
            regex,
            ranges: translator.ranges,
        }
    }

    /// False when the pattern degraded to the never-matching glob.
    pub fn is_valid(&self) -> bool {
        self.regex.is_some()
    }

    pub fn is_match(&self, path: &str) -> bool {
        let Some(regex) = &self.regex else {
            return false;
        };

        if self.ranges.is_empty() {
            return regex.is_match(path);
        }

        let Some(captures) = regex.captures(path) else {
            return false;
        };

        // Range captures are the only capturing groups, numbered in pattern order.
        // A range inside an alternative that did not participate has no capture.
        self.ranges
            .iter()
            .enumerate()
            .all(|(idx, range)| match captures.get(idx + 1) {
                Some(m) => m.as_str().parse().is_ok_and(|n| range.contains(n)),
                None => true,
            })
    }
}

#[derive(Default)]
struct Translator {
    ranges: Vec<NumericRange>,
}

impl Translator {
    fn translate(&mut self, chars: &[char]) -> String {
        let mut out = String::new();
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            i += 1;

            match c {
                '\\' => match chars.get(i) {
                    Some(&escaped) => {
                        push_literal(&mut out, escaped);
                        i += 1;
                    }
                    None => push_literal(&mut out, '\\'),
                },
                '*' if chars.get(i) == Some(&'*') => {
                    while chars.get(i) == Some(&'*') {
                        i += 1;
                    }
                    if chars.get(i) == Some(&'/') {
                        // `**/` also matches zero directories
                        out.push_str("(?:.*/)?");
                        i += 1;
                    } else {
                        out.push_str(".*");
                    }
                }
                '*' => out.push_str("[^/]*"),
                '?' => out.push_str("[^/]"),
                '[' => match bracket_end(chars, i) {
                    Some(end) => {
                        out.push_str(&translate_class(&chars[i..end]));
                        i = end + 1;
                    }
                    None => push_literal(&mut out, '['),
                },
                '{' => match brace_end(chars, i) {
                    Some(end) => {
                        self.translate_braces(&chars[i..end], &mut out);
                        i = end + 1;
                    }
                    None => push_literal(&mut out, '{'),
                },
                _ => push_literal(&mut out, c),
            }
        }

        out
    }

    fn translate_braces(&mut self, inner: &[char], out: &mut String) {
        let text: String = inner.iter().collect();
        if let Some(range) = NumericRange::parse(&text) {
            self.ranges.push(range);
            out.push_str(NUMBER_CAPTURE);
            return;
        }

        let alternatives = split_alternatives(inner);
        if alternatives.len() < 2 {
            out.push_str(r"\{");
            out.push_str(&self.translate(inner));
            out.push_str(r"\}");
            return;
        }

        out.push_str("(?:");
        for (n, alternative) in alternatives.iter().enumerate() {
            if n > 0 {
                out.push('|');
            }
            let translated = self.translate(alternative);
            out.push_str(&translated);
        }
        out.push(')');
    }
}

fn push_literal(out: &mut String, c: char) {
    let mut buf = [0u8; 4];
    out.push_str(&regex::escape(c.encode_utf8(&mut buf)));
}

fn push_class_literal(out: &mut String, c: char) {
    if matches!(c, '\\' | '[' | ']' | '^' | '-' | '&' | '~') {
        out.push('\\');
    }
    out.push(c);
}

/// Index of the `]` closing a bracket expression whose body starts at `start`.
///
/// `None` means the `[` is literal: unclosed, empty, or spanning a `/`.
fn bracket_end(chars: &[char], start: usize) -> Option<usize> {
    let body_start = match chars.get(start) {
        Some('!') | Some('^') => start + 1,
        _ => start,
    };

    let mut j = body_start;
    while j < chars.len() {
        match chars[j] {
            '\\' => j += 2,
            '/' => return None,
            ']' if j == body_start => return None,
            ']' => return Some(j),
            _ => j += 1,
        }
    }
    None
}

fn translate_class(body: &[char]) -> String {
    let (negated, rest) = match body.first() {
        Some('!') | Some('^') => (true, &body[1..]),
        _ => (false, body),
    };

    let mut out = String::from(if negated { "[^/" } else { "[" });
    let mut k = 0;
    while k < rest.len() {
        match rest[k] {
            '\\' if k + 1 < rest.len() => {
                push_class_literal(&mut out, rest[k + 1]);
                k += 2;
            }
            '-' if k > 0 && k + 1 < rest.len() => {
                out.push('-');
                k += 1;
            }
            c => {
                push_class_literal(&mut out, c);
                k += 1;
            }
        }
    }
    out.push(']');
    out
}

/// Index of the `}` matching the `{` just before `start`, honouring nesting.
fn brace_end(chars: &[char], start: usize) -> Option<usize> {
    let mut depth = 1;
    let mut j = start;
    while j < chars.len() {
        match chars[j] {
            '\\' => j += 1,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(j);
                }
            }
            _ => {}
        }
        j += 1;
    }
    None
}

/// Split a brace body at top-level commas.
fn split_alternatives(inner: &[char]) -> Vec<&[char]> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut j = 0;

    while j < inner.len() {
        match inner[j] {
            '\\' => j += 1,
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&inner[start..j]);
                start = j + 1;
            }
            _ => {}
        }
        j += 1;
    }
    parts.push(&inner[start.min(inner.len())..]);
    parts
}

/// A section header glob bound to the directory of its config file.
#[derive(Debug, Clone)]
pub struct SectionMatcher {
    base: PathBuf,
    glob: Glob,
}

impl SectionMatcher {
    /// Patterns without a `/` match a file name at any depth below `base_dir`;
    /// patterns with one are anchored at `base_dir`.
    pub fn new(pattern: &str, base_dir: impl Into<PathBuf>) -> Self {
        let anchored = if pattern.contains('/') {
            pattern.strip_prefix('/').unwrap_or(pattern).to_string()
        } else {
            format!("**/{pattern}")
        };

        Self {
            base: base_dir.into(),
            glob: Glob::new(&anchored),
        }
    }

    pub fn matches(&self, target: &Path) -> bool {
        relative_path(&self.base, target).is_some_and(|rel| self.glob.is_match(&rel))
    }
}

/// `target` relative to `base`, joined with `/`. `None` if outside `base`.
pub fn relative_path(base: &Path, target: &Path) -> Option<String> {
    let rest = target.strip_prefix(base).ok()?;
    let mut parts = Vec::new();
    for component in rest.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy()),
            Component::CurDir => {}
            // `..` may leave `base` entirely
            _ => return None,
        }
    }

    if parts.is_empty() {
        return None;
    }
    Some(parts.join("/"))
}
