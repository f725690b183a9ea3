//! Configuration merging logic
//!
//! Priority: CLI args > ecres.toml > defaults

use crate::editor::EditorDefaults;
use crate::properties::EndOfLine;
use crate::resolver::ResolveOptions;

use super::toml_schema::{EcresToml, NewlineSetting};

/// CLI options that can override config file settings.
///
/// Uses `Option<T>` to distinguish "not specified" from "explicitly set".
#[derive(Debug, Default)]
pub struct CliOptions {
    pub file_name: Option<String>,
    pub default_tab_width: Option<u32>,
    pub default_end_of_line: Option<NewlineSetting>,
}

/// Effective settings for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub resolve: ResolveOptions,
    pub editor: EditorDefaults,
    /// Newline for an inserted final newline when nothing else decides
    pub default_newline: EndOfLine,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            resolve: ResolveOptions::default(),
            editor: EditorDefaults::default(),
            default_newline: EndOfLine::native(),
        }
    }
}

/// Merge configurations from CLI, TOML, and defaults.
///
/// Priority: CLI > TOML > defaults
pub fn merge_settings(cli: &CliOptions, toml: Option<&EcresToml>) -> Settings {
    let defaults = Settings::default();

    let file_name = cli
        .file_name
        .clone()
        .or_else(|| toml.and_then(|t| t.resolve.file_name.clone()))
        .filter(|name| !name.trim().is_empty())
        .unwrap_or(defaults.resolve.file_name);

    let tab_width = cli
        .default_tab_width
        .or_else(|| toml.and_then(|t| t.editor.default_tab_width))
        .filter(|&width| {
            if width == 0 {
                log::warn!("ignoring default tab width of 0");
            }
            width > 0
        })
        .unwrap_or(defaults.editor.tab_width);

    let insert_spaces = toml
        .and_then(|t| t.editor.default_insert_spaces)
        .unwrap_or(defaults.editor.insert_spaces);

    let default_newline = cli
        .default_end_of_line
        .or_else(|| toml.and_then(|t| t.editor.default_end_of_line))
        .map_or(defaults.default_newline, NewlineSetting::to_end_of_line);

    Settings {
        resolve: ResolveOptions { file_name },
        editor: EditorDefaults {
            tab_width,
            insert_spaces,
        },
        default_newline,
    }
}
