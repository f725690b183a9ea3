//! Indentation settings an editor should apply to a document.

use std::cmp::Reverse;

use crate::properties::{IndentSize, IndentStyle, PropertyMap};

/// Tab width used when no config file supplies one.
pub const DEFAULT_TAB_WIDTH: u32 = 8;

/// Largest indentation step considered when detecting from content
const MAX_DETECTED_STEP: usize = 8;

/// Host defaults applied where the resolved properties have no opinion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorDefaults {
    pub tab_width: u32,
    pub insert_spaces: bool,
}

impl Default for EditorDefaults {
    fn default() -> Self {
        Self {
            tab_width: DEFAULT_TAB_WIDTH,
            insert_spaces: true,
        }
    }
}

/// Indentation guessed from existing document content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectedIndent {
    pub insert_spaces: bool,
    /// Indentation step; unknown for tab-indented content
    pub size: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorOptions {
    pub insert_spaces: bool,
    /// Display width of a tab character
    pub tab_size: u32,
    /// Columns per indentation level
    pub indent_size: u32,
}

impl EditorOptions {
    pub fn from_properties(properties: &PropertyMap, defaults: &EditorDefaults) -> Self {
        Self::with_detected(properties, None, defaults)
    }

    /// Resolved properties win over detected indentation, which wins over defaults.
    pub fn with_detected(
        properties: &PropertyMap,
        detected: Option<DetectedIndent>,
        defaults: &EditorDefaults,
    ) -> Self {
        let insert_spaces = match properties.indent_style() {
            Some(IndentStyle::Space) => true,
            Some(IndentStyle::Tab) => false,
            None => detected.map_or(defaults.insert_spaces, |d| d.insert_spaces),
        };

        let indent_columns = match properties.indent_size() {
            Some(IndentSize::Columns(n)) => Some(n),
            Some(IndentSize::Tab) | None => None,
        };

        let tab_size = properties
            .tab_width()
            .or(indent_columns)
            .or_else(|| detected.and_then(|d| d.size))
            .unwrap_or(defaults.tab_width);

        Self {
            insert_spaces,
            tab_size,
            indent_size: indent_columns.unwrap_or(tab_size),
        }
    }
}

/// Guess indentation from leading whitespace.
///
/// Returns `None` when no line is indented.
pub fn detect_indentation(content: &str) -> Option<DetectedIndent> {
    let mut tab_lines = 0usize;
    let mut space_lines = 0usize;
    let mut steps = [0usize; MAX_DETECTED_STEP + 1];
    let mut previous = 0usize;

    for line in content.lines().filter(|l| !l.trim().is_empty()) {
        if line.starts_with('\t') {
            tab_lines += 1;
            previous = 0;
            continue;
        }

        let width = line.len() - line.trim_start_matches(' ').len();
        if width > 0 {
            space_lines += 1;
        }
        let step = width.abs_diff(previous);
        if (1..=MAX_DETECTED_STEP).contains(&step) {
            steps[step] += 1;
        }
        previous = width;
    }

    if tab_lines == 0 && space_lines == 0 {
        return None;
    }
    if tab_lines > space_lines {
        return Some(DetectedIndent {
            insert_spaces: false,
            size: None,
        });
    }

    // most frequent step; the smaller step on ties
    let size = (1..=MAX_DETECTED_STEP)
        .filter(|&step| steps[step] > 0)
        .max_by_key(|&step| (steps[step], Reverse(step)))
        .map(|step| step as u32);

    Some(DetectedIndent {
        insert_spaces: true,
        size,
    })
}
