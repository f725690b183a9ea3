//! Discovery of the config files that apply to a directory.

use std::path::Path;
use std::sync::Arc;

use crate::cancel::CancelToken;
use crate::fs::FileSystem;
use crate::ini::ConfigFile;
use crate::{ReadError, ResolveError};

pub const DEFAULT_FILE_NAME: &str = ".editorconfig";

/// Config files for one directory, root-most first.
#[derive(Debug, Default)]
pub struct ConfigChain {
    pub files: Vec<Arc<ConfigFile>>,
    /// Files that exist but could not be read; they were treated as absent.
    pub diagnostics: Vec<ReadError>,
}

impl ConfigChain {
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(|f| f.path())
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Walk upward from `start_dir` collecting every `file_name`.
///
/// Stops after the first file declaring `root = true`, or at the filesystem
/// root. `load` turns a discovered path into a parsed file, which lets a
/// cache sit between discovery and parsing.
pub fn collect<F, L>(
    fs: &F,
    start_dir: &Path,
    file_name: &str,
    mut load: L,
    cancel: Option<&CancelToken>,
) -> Result<ConfigChain, ResolveError>
where
    F: FileSystem + ?Sized,
    L: FnMut(&Path) -> Result<Arc<ConfigFile>, ReadError>,
{
    let mut nearest_first = Vec::new();
    let mut diagnostics = Vec::new();
    let mut dir = Some(start_dir);

    while let Some(current) = dir {
        if cancel.is_some_and(CancelToken::is_cancelled) {
            return Err(ResolveError::Cancelled);
        }

        let candidate = current.join(file_name);
        if fs.exists(&candidate) {
            match load(&candidate) {
                Ok(file) => {
                    let is_root = file.is_root();
                    nearest_first.push(file);
                    if is_root {
                        log::debug!("{} is a root config", candidate.display());
                        break;
                    }
                }
                Err(e) => {
                    log::warn!("{e}; continuing without it");
                    diagnostics.push(e);
                }
            }
        }

        dir = fs.parent_of(current);
    }

    nearest_first.reverse();
    Ok(ConfigChain {
        files: nearest_first,
        diagnostics,
    })
}

/// [`collect`] with plain, uncached loading and no cancellation.
pub fn discover<F: FileSystem + ?Sized>(fs: &F, start_dir: &Path, file_name: &str) -> ConfigChain {
    let load = |path: &Path| ConfigFile::load(fs, path).map(Arc::new);
    match collect(fs, start_dir, file_name, load, None) {
        Ok(chain) => chain,
        // only reachable through a cancel token, and none was given
        Err(_) => ConfigChain::default(),
    }
}
