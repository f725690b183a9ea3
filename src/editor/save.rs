//! What an editor integration writes on save under resolved properties.
//!
//! Nothing here touches the disk: [`preview_save`] maps document text to the
//! text a save would produce and lists what it changed.

use crate::properties::{EndOfLine, PropertyMap};

/// Save-time rules derived from a [`PropertyMap`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveRules {
    /// Rewrite every line terminator (None = preserve)
    pub end_of_line: Option<EndOfLine>,
    /// Strip spaces and tabs at line ends
    pub trim_trailing_whitespace: bool,
    /// Some(true) = ensure one final newline, Some(false) = strip them
    pub insert_final_newline: Option<bool>,
    /// Newline to insert when neither `end_of_line` nor the content decides
    pub default_newline: EndOfLine,
}

impl Default for SaveRules {
    fn default() -> Self {
        Self {
            end_of_line: None,
            trim_trailing_whitespace: false,
            insert_final_newline: None,
            default_newline: EndOfLine::native(),
        }
    }
}

impl SaveRules {
    pub fn from_properties(properties: &PropertyMap, default_newline: EndOfLine) -> Self {
        Self {
            end_of_line: properties.end_of_line(),
            trim_trailing_whitespace: properties.trim_trailing_whitespace().unwrap_or(false),
            insert_final_newline: properties.insert_final_newline(),
            default_newline,
        }
    }

    /// True when saving can never change content.
    pub fn is_noop(&self) -> bool {
        self.end_of_line.is_none()
            && !self.trim_trailing_whitespace
            && self.insert_final_newline.is_none()
    }
}

/// Compute the text a save would write
pub fn preview_save(content: &str, rules: &SaveRules) -> SaveResult {
    let mut result = content.to_string();
    let mut problems = vec![];

    if rules.trim_trailing_whitespace {
        let (fixed, trailing_problems) = trim_trailing_whitespace(&result);
        result = fixed;
        problems.extend(trailing_problems);
    }

    if let Some(eol) = rules.end_of_line {
        let (fixed, eol_problems) = convert_line_endings(&result, eol);
        result = fixed;
        problems.extend(eol_problems);
    }

    match rules.insert_final_newline {
        Some(true) => {
            let newline = rules
                .end_of_line
                .or_else(|| detect_line_ending(&result))
                .unwrap_or(rules.default_newline);
            let (fixed, newline_problems) = ensure_final_newline(&result, newline);
            result = fixed;
            problems.extend(newline_problems);
        }
        Some(false) => {
            let (fixed, newline_problems) = remove_final_newlines(&result);
            result = fixed;
            problems.extend(newline_problems);
        }
        None => {}
    }

    SaveResult {
        original: content.to_string(),
        content: result,
        problems,
    }
}

/// Split into `(line, terminator)` pairs; the last terminator may be empty.
fn lines_with_endings(content: &str) -> Vec<(&str, &str)> {
    let bytes = content.as_bytes();
    let mut lines = vec![];
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push((&content[start..i], "\n"));
                i += 1;
                start = i;
            }
            b'\r' => {
                let len = if bytes.get(i + 1) == Some(&b'\n') { 2 } else { 1 };
                lines.push((&content[start..i], &content[i..i + len]));
                i += len;
                start = i;
            }
            _ => i += 1,
        }
    }

    if start < content.len() {
        lines.push((&content[start..], ""));
    }
    lines
}

/// First line terminator in `content`, if any.
pub fn detect_line_ending(content: &str) -> Option<EndOfLine> {
    lines_with_endings(content)
        .into_iter()
        .find_map(|(_, ending)| match ending {
            "\n" => Some(EndOfLine::Lf),
            "\r\n" => Some(EndOfLine::CrLf),
            "\r" => Some(EndOfLine::Cr),
            _ => None,
        })
}

fn trim_trailing_whitespace(content: &str) -> (String, Vec<Problem>) {
    let mut problems = vec![];
    let mut result = String::with_capacity(content.len());

    for (line_idx, (line, ending)) in lines_with_endings(content).into_iter().enumerate() {
        let trimmed = line.trim_end_matches([' ', '\t']);
        if trimmed.len() != line.len() {
            problems.push(Problem {
                line: line_idx + 1,
                kind: ProblemKind::TrailingWhitespace,
            });
        }
        result.push_str(trimmed);
        result.push_str(ending);
    }

    (result, problems)
}

fn convert_line_endings(content: &str, eol: EndOfLine) -> (String, Vec<Problem>) {
    let mut problems = vec![];
    let mut result = String::with_capacity(content.len());

    for (line_idx, (line, ending)) in lines_with_endings(content).into_iter().enumerate() {
        result.push_str(line);
        if ending.is_empty() {
            continue;
        }
        if ending != eol.as_str() {
            problems.push(Problem {
                line: line_idx + 1,
                kind: ProblemKind::LineEnding { expected: eol },
            });
        }
        result.push_str(eol.as_str());
    }

    (result, problems)
}

fn ensure_final_newline(content: &str, newline: EndOfLine) -> (String, Vec<Problem>) {
    if content.is_empty() || content.ends_with(['\n', '\r']) {
        return (content.to_string(), vec![]);
    }

    let problem = Problem {
        line: lines_with_endings(content).len(),
        kind: ProblemKind::MissingFinalNewline,
    };
    (format!("{content}{}", newline.as_str()), vec![problem])
}

fn remove_final_newlines(content: &str) -> (String, Vec<Problem>) {
    let trimmed = content.trim_end_matches(['\n', '\r']);
    if trimmed.len() == content.len() {
        return (content.to_string(), vec![]);
    }

    let problem = Problem {
        line: lines_with_endings(trimmed).len().max(1),
        kind: ProblemKind::ExtraFinalNewline,
    };
    (trimmed.to_string(), vec![problem])
}

#[derive(Debug, Clone)]
pub struct SaveResult {
    pub original: String,
    pub content: String,
    pub problems: Vec<Problem>,
}

impl SaveResult {
    pub fn has_changes(&self) -> bool {
        self.original != self.content
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    pub line: usize,
    pub kind: ProblemKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProblemKind {
    TrailingWhitespace,
    MissingFinalNewline,
    ExtraFinalNewline,
    LineEnding { expected: EndOfLine },
}
