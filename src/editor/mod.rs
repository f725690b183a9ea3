//! Consumers of resolved properties on the editor side.
//!
//! - [`options`]: indentation settings (`insert_spaces`, `tab_size`)
//! - [`save`]: what a save would write, as a pure text transformation

pub mod options;
pub mod save;

pub use options::{
    detect_indentation, DetectedIndent, EditorDefaults, EditorOptions, DEFAULT_TAB_WIDTH,
};
pub use save::{detect_line_ending, preview_save, Problem, ProblemKind, SaveResult, SaveRules};
