//! `.editorconfig` file parsing.
//!
//! Parsing is lenient: [`parse`] never fails and records the lines it had to
//! skip. Only reading the file can fail, see [`ConfigFile::load`].

use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::fs::FileSystem;
use crate::glob::SectionMatcher;
use crate::ReadError;

/// Why a line did not contribute to the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// `[]` or a header whose pattern is blank
    EmptySectionHeader,
    /// Property line below a header that was skipped
    InsideSkippedSection,
    /// Neither `=` nor `:` on the line
    MissingDelimiter,
    EmptyKey,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number
    pub line: usize,
    pub reason: SkipReason,
}

/// A section exactly as written: header pattern plus ordered properties.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSection {
    pub pattern: String,
    pub properties: IndexMap<String, String>,
}

/// Result of parsing config text, not yet tied to a file on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDocument {
    /// Properties before the first section header
    pub preamble: IndexMap<String, String>,
    pub sections: Vec<RawSection>,
    pub skipped: Vec<SkippedLine>,
}

impl ParsedDocument {
    pub fn is_root(&self) -> bool {
        self.preamble
            .get("root")
            .is_some_and(|v| v.eq_ignore_ascii_case("true"))
    }
}

enum Target {
    Preamble,
    Section,
    Skipped,
}

/// Parse config text. Malformed lines are recorded and skipped.
pub fn parse(text: &str) -> ParsedDocument {
    let text = text.strip_prefix('\u{FEFF}').unwrap_or(text);
    let mut doc = ParsedDocument::default();
    let mut target = Target::Preamble;

    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        let skip = |reason| SkippedLine {
            line: idx + 1,
            reason,
        };

        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(pattern) = section_header(line) {
            if pattern.trim().is_empty() {
                doc.skipped.push(skip(SkipReason::EmptySectionHeader));
                target = Target::Skipped;
            } else {
                doc.sections.push(RawSection {
                    pattern: pattern.to_string(),
                    properties: IndexMap::new(),
                });
                target = Target::Section;
            }
            continue;
        }

        let Some((key, value)) = split_property(line) else {
            doc.skipped.push(skip(SkipReason::MissingDelimiter));
            continue;
        };
        if key.is_empty() {
            doc.skipped.push(skip(SkipReason::EmptyKey));
            continue;
        }

        let properties = match target {
            Target::Preamble => &mut doc.preamble,
            Target::Section => match doc.sections.last_mut() {
                Some(section) => &mut section.properties,
                None => &mut doc.preamble,
            },
            Target::Skipped => {
                doc.skipped.push(skip(SkipReason::InsideSkippedSection));
                continue;
            }
        };
        properties.insert(key, value);
    }

    doc
}

fn section_header(line: &str) -> Option<&str> {
    line.strip_prefix('[')?.strip_suffix(']')
}

/// Split at the first `=` or `:`; the key is lowercased and the value unquoted.
fn split_property(line: &str) -> Option<(String, String)> {
    let at = line.find(['=', ':'])?;
    let key = line[..at].trim().to_lowercase();
    let value = unquote(line[at + 1..].trim()).to_string();
    Some((key, value))
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// One section of a loaded config file, with its pattern compiled.
#[derive(Debug, Clone)]
pub struct Section {
    pattern: String,
    properties: IndexMap<String, String>,
    matcher: SectionMatcher,
}

impl Section {
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn properties(&self) -> &IndexMap<String, String> {
        &self.properties
    }

    pub fn matches(&self, target: &Path) -> bool {
        self.matcher.matches(target)
    }
}

/// A parsed `.editorconfig` file. Immutable once built.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    path: PathBuf,
    is_root: bool,
    preamble: IndexMap<String, String>,
    sections: Vec<Section>,
    skipped: Vec<SkippedLine>,
}

impl ConfigFile {
    /// Bind a parsed document to the file it came from.
    pub fn from_document(path: impl Into<PathBuf>, doc: ParsedDocument) -> Self {
        let path = path.into();
        let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let is_root = doc.is_root();

        let sections = doc
            .sections
            .into_iter()
            .map(|raw| Section {
                matcher: SectionMatcher::new(&raw.pattern, base.clone()),
                pattern: raw.pattern,
                properties: raw.properties,
            })
            .collect();

        Self {
            path,
            is_root,
            preamble: doc.preamble,
            sections,
            skipped: doc.skipped,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, text: &str) -> Self {
        Self::from_document(path, parse(text))
    }

    /// Read and parse the file at `path`.
    pub fn load<F: FileSystem + ?Sized>(fs: &F, path: &Path) -> Result<Self, ReadError> {
        let text = fs.read_to_string(path).map_err(|source| ReadError {
            path: path.to_path_buf(),
            source,
        })?;

        let file = Self::parse(path, &text);
        for skipped in &file.skipped {
            log::debug!(
                "{}:{}: skipped line ({:?})",
                path.display(),
                skipped.line,
                skipped.reason
            );
        }
        Ok(file)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory the section patterns are relative to.
    pub fn directory(&self) -> &Path {
        self.path.parent().unwrap_or(&self.path)
    }

    pub fn is_root(&self) -> bool {
        self.is_root
    }

    pub fn preamble(&self) -> &IndexMap<String, String> {
        &self.preamble
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn skipped_lines(&self) -> &[SkippedLine] {
        &self.skipped
    }
}
