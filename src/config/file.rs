//! Config file discovery and loading

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::toml_schema::EcresToml;

pub const CONFIG_FILE_NAME: &str = "ecres.toml";

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading the file
    #[error("failed to read config file: {0}")]
    Io(#[from] io::Error),
    /// TOML parsing error
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Search upward from `start_dir` for a file with the given name.
///
/// If `stop_at_git_root` is true, stops searching when a `.git` directory is found.
/// Returns `None` if the file is not found.
pub fn find_file_upward(
    start_dir: &Path,
    filename: &str,
    stop_at_git_root: bool,
) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let file_path = current.join(filename);
        if file_path.is_file() {
            return Some(file_path);
        }

        if stop_at_git_root && current.join(".git").exists() {
            return None;
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Find ecres.toml by searching upward from the given directory.
///
/// Stops at the first `ecres.toml` found, or at the git repository root
/// (directory containing `.git`), whichever comes first.
pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    find_file_upward(start_dir, CONFIG_FILE_NAME, true)
}

/// Load and parse ecres.toml from the given path.
pub fn load_config(path: &Path) -> Result<EcresToml, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: EcresToml = toml::from_str(&content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NewlineSetting;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_in_current_dir() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "[resolve]\n").unwrap();

        let found = find_config_file(dir.path());
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_in_parent_dir() {
        let parent = TempDir::new().unwrap();
        let config_path = parent.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "[resolve]\n").unwrap();

        let child = parent.path().join("subdir");
        fs::create_dir(&child).unwrap();

        let found = find_config_file(&child);
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_stops_at_git_root() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();

        let subdir = dir.path().join("subdir");
        fs::create_dir(&subdir).unwrap();

        let found = find_config_file(&subdir);
        assert_eq!(found, None);
    }

    #[test]
    fn test_find_config_prefers_closer() {
        let parent = TempDir::new().unwrap();
        fs::write(parent.path().join(CONFIG_FILE_NAME), "[editor]\n").unwrap();

        let child = parent.path().join("subdir");
        fs::create_dir(&child).unwrap();
        let child_config = child.join(CONFIG_FILE_NAME);
        fs::write(&child_config, "[editor]\ndefault_tab_width = 4\n").unwrap();

        let found = find_config_file(&child);
        assert_eq!(found, Some(child_config));
    }

    #[test]
    fn test_load_config_full() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(
            &config_path,
            r#"
[resolve]
file_name = ".ecrc"

[editor]
default_tab_width = 4
default_insert_spaces = false
default_end_of_line = "crlf"
"#,
        )
        .unwrap();

        let config = load_config(&config_path).unwrap();
        assert_eq!(config.resolve.file_name.as_deref(), Some(".ecrc"));
        assert_eq!(config.editor.default_tab_width, Some(4));
        assert_eq!(config.editor.default_insert_spaces, Some(false));
        assert_eq!(
            config.editor.default_end_of_line,
            Some(NewlineSetting::Crlf)
        );
    }

    #[test]
    fn test_load_config_empty() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "").unwrap();

        let config = load_config(&config_path).unwrap();
        assert_eq!(config.resolve.file_name, None);
        assert_eq!(config.editor.default_tab_width, None);
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "invalid toml {{{\n").unwrap();

        let result = load_config(&config_path);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_unknown_newline() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "[editor]\ndefault_end_of_line = \"nel\"\n").unwrap();

        assert!(matches!(load_config(&config_path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = load_config(&dir.path().join(CONFIG_FILE_NAME));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
