//! Template generation for `--init` command

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::file::CONFIG_FILE_NAME;

/// Template ecres.toml with documentation
pub const ECRES_TOML_TEMPLATE: &str = r#"# ecres.toml - Configuration for the ecres EditorConfig resolver
#
# ecres resolves the EditorConfig properties that apply to a file by
# reading every config file from the file's directory up to the nearest
# one marked `root = true`.
#
# Nothing below changes how properties are resolved. These settings only
# fill in what an editor needs when the resolved properties are silent.
# Uncomment and modify as needed.

[resolve]
# Name of the per-directory config file.
# Default: ".editorconfig"
# file_name = ".editorconfig"

[editor]
# Tab width used when no tab_width or indent_size is resolved.
# Default: 8
# default_tab_width = 8

# Indent with spaces when no indent_style is resolved.
# Default: true
# default_insert_spaces = true

# Newline written when a final newline is inserted and neither end_of_line
# nor the file's existing line endings decide. One of: lf, crlf, cr, native.
# Default: "native"
# default_end_of_line = "native"
"#;

/// Generate ecres.toml in the specified directory (or current directory if None).
///
/// Returns an error if ecres.toml already exists.
pub fn generate_init_file_in(dir: Option<&Path>) -> io::Result<PathBuf> {
    let path = dir.map_or_else(|| PathBuf::from(CONFIG_FILE_NAME), |d| d.join(CONFIG_FILE_NAME));

    if path.exists() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{CONFIG_FILE_NAME} already exists"),
        ));
    }

    fs::write(&path, ECRES_TOML_TEMPLATE)?;
    Ok(path)
}

/// Generate ecres.toml in the current directory.
pub fn generate_init_file() -> io::Result<PathBuf> {
    generate_init_file_in(None)
}
