//! TOML schema definitions for ecres.toml

use serde::Deserialize;

use crate::properties::EndOfLine;

/// Root structure for ecres.toml
#[derive(Debug, Default, Clone, Deserialize)]
pub struct EcresToml {
    /// Config discovery settings
    #[serde(default)]
    pub resolve: ResolveSection,

    /// Editor-side defaults
    #[serde(default)]
    pub editor: EditorSection,
}

/// `[resolve]` section in ecres.toml
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ResolveSection {
    /// Per-directory config file name (default: .editorconfig)
    pub file_name: Option<String>,
}

/// `[editor]` section in ecres.toml
#[derive(Debug, Default, Clone, Deserialize)]
pub struct EditorSection {
    /// Tab width when no config supplies one (default: 8)
    pub default_tab_width: Option<u32>,

    /// Indent with spaces when no config says otherwise (default: true)
    pub default_insert_spaces: Option<bool>,

    /// Newline used for an inserted final newline (default: native)
    pub default_end_of_line: Option<NewlineSetting>,
}

/// Newline choice for settings that may defer to the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum NewlineSetting {
    Lf,
    Crlf,
    Cr,
    Native,
}

impl NewlineSetting {
    pub fn to_end_of_line(self) -> EndOfLine {
        match self {
            NewlineSetting::Lf => EndOfLine::Lf,
            NewlineSetting::Crlf => EndOfLine::CrLf,
            NewlineSetting::Cr => EndOfLine::Cr,
            NewlineSetting::Native => EndOfLine::native(),
        }
    }
}
