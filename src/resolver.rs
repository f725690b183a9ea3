//! `resolve(path) -> PropertyMap`, tying discovery, merging and normalization together.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use crate::cache::ConfigCache;
use crate::cancel::CancelToken;
use crate::chain::{self, DEFAULT_FILE_NAME};
use crate::fs::{FileSystem, OsFs};
use crate::ini::ConfigFile;
use crate::merge::merge;
use crate::properties::{normalize, PropertyMap};
use crate::{ReadError, ResolveError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Name of the per-directory config file
    pub file_name: String,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_FILE_NAME.to_string(),
        }
    }
}

/// Outcome of resolving one path.
#[derive(Debug)]
pub struct Resolution {
    pub properties: PropertyMap,
    /// Config files that were consulted, root-most first
    pub files: Vec<PathBuf>,
    /// Config files that were found but could not be read
    pub diagnostics: Vec<ReadError>,
}

/// Resolves properties against a filesystem.
///
/// Holds no mutable state of its own; share it freely between threads when
/// `F` allows it. The optional [`ConfigCache`] is the only shared state.
#[derive(Debug)]
pub struct Resolver<F> {
    fs: F,
    options: ResolveOptions,
    cache: Option<Arc<ConfigCache>>,
}

impl<F: FileSystem> Resolver<F> {
    pub fn new(fs: F) -> Self {
        Self {
            fs,
            options: ResolveOptions::default(),
            cache: None,
        }
    }

    pub fn with_options(mut self, options: ResolveOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_cache(mut self, cache: Arc<ConfigCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn resolve(&self, path: &Path) -> Result<Resolution, ResolveError> {
        self.resolve_inner(path, None)
    }

    /// Like [`Resolver::resolve`], abandoning the walk once `cancel` fires.
    pub fn resolve_cancellable(
        &self,
        path: &Path,
        cancel: &CancelToken,
    ) -> Result<Resolution, ResolveError> {
        self.resolve_inner(path, Some(cancel))
    }

    fn resolve_inner(
        &self,
        path: &Path,
        cancel: Option<&CancelToken>,
    ) -> Result<Resolution, ResolveError> {
        if !path.is_absolute() {
            return Err(ResolveError::RelativePath(path.to_path_buf()));
        }
        let path = &normalize_lexically(path);

        let Some(start_dir) = self.fs.parent_of(path) else {
            // the filesystem root itself has no directory to search
            return Ok(Resolution {
                properties: PropertyMap::default(),
                files: Vec::new(),
                diagnostics: Vec::new(),
            });
        };

        let load = |candidate: &Path| match &self.cache {
            Some(cache) => cache.load(&self.fs, candidate),
            None => ConfigFile::load(&self.fs, candidate).map(Arc::new),
        };
        let chain = chain::collect(&self.fs, start_dir, &self.options.file_name, load, cancel)?;

        let raw = merge(path, chain.files.iter().map(Arc::as_ref));
        let properties = normalize(raw);
        log::debug!(
            "{}: {} properties from {} config file(s)",
            path.display(),
            properties.len(),
            chain.files.len()
        );

        Ok(Resolution {
            properties,
            files: chain.paths().map(Path::to_path_buf).collect(),
            diagnostics: chain.diagnostics,
        })
    }
}

/// Collapse `.` and `..` without consulting the filesystem.
///
/// The upward walk is lexical, so `/p/q/../r` must become `/p/r` before its
/// ancestors are listed.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normal = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normal.pop();
            }
            other => normal.push(other),
        }
    }
    normal
}

/// Resolve `path` against the real filesystem with default options.
pub fn resolve(path: &Path) -> Result<Resolution, ResolveError> {
    Resolver::new(OsFs).resolve(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryFs;
    use std::io;

    #[test]
    fn test_no_config_anywhere_is_empty_and_ok() {
        let resolver = Resolver::new(MemoryFs::new());
        let resolution = resolver.resolve(Path::new("/a/b/file.txt")).unwrap();

        assert!(resolution.properties.is_empty());
        assert!(resolution.files.is_empty());
        assert!(resolution.diagnostics.is_empty());
    }

    #[test]
    fn test_relative_path_rejected() {
        let resolver = Resolver::new(MemoryFs::new());
        let result = resolver.resolve(Path::new("a/file.txt"));
        assert!(matches!(result, Err(ResolveError::RelativePath(_))));
    }

    #[test]
    fn test_parent_components_collapse_before_walking() {
        let fs = MemoryFs::new()
            .with_file("/p/.editorconfig", "root = true\n[*]\nindent_size = 2\n")
            .with_file("/p/q/.editorconfig", "[*]\nindent_size = 7\n");

        let resolution = Resolver::new(fs)
            .resolve(Path::new("/p/q/../r/./a.txt"))
            .unwrap();

        assert_eq!(resolution.properties.get("indent_size"), Some("2"));
        assert_eq!(resolution.files, vec![PathBuf::from("/p/.editorconfig")]);
    }

    #[test]
    fn test_normalize_lexically() {
        assert_eq!(
            normalize_lexically(Path::new("/a/b/../c/./d.txt")),
            PathBuf::from("/a/c/d.txt")
        );
        assert_eq!(normalize_lexically(Path::new("/../a")), PathBuf::from("/a"));
    }

    #[test]
    fn test_removed_config_no_longer_applies() {
        let mut fs = MemoryFs::new()
            .with_file("/p/.editorconfig", "root = true\n[*]\nindent_size = 2\n")
            .with_file("/p/q/.editorconfig", "[*]\nindent_size = 4\n");
        let cache = Arc::new(ConfigCache::new());

        let before = Resolver::new(&fs)
            .with_cache(Arc::clone(&cache))
            .resolve(Path::new("/p/q/a.txt"))
            .unwrap();
        fs.remove(Path::new("/p/q/.editorconfig"));
        let after = Resolver::new(&fs)
            .with_cache(Arc::clone(&cache))
            .resolve(Path::new("/p/q/a.txt"))
            .unwrap();

        assert_eq!(before.properties.get("indent_size"), Some("4"));
        assert_eq!(after.properties.get("indent_size"), Some("2"));
        assert_eq!(after.files, vec![PathBuf::from("/p/.editorconfig")]);
    }

    #[test]
    fn test_root_above_is_never_consulted() {
        let fs = MemoryFs::new()
            .with_file("/.editorconfig", "[*]\ncharset = latin1\nindent_size = 8\n")
            .with_file("/p/.editorconfig", "root = true\n[*]\nindent_size = 2\n");

        let resolution = Resolver::new(fs).resolve(Path::new("/p/a.txt")).unwrap();

        assert_eq!(resolution.properties.get("indent_size"), Some("2"));
        assert_eq!(resolution.properties.get("charset"), None);
        assert_eq!(resolution.files, vec![PathBuf::from("/p/.editorconfig")]);
    }

    #[test]
    fn test_descendant_beats_ancestor_and_normalizes() {
        let fs = MemoryFs::new()
            .with_file(
                "/p/.editorconfig",
                "root = true\n[*]\nindent_style = space\nindent_size = 4\n",
            )
            .with_file("/p/sub/.editorconfig", "[*.js]\nindent_size = 2\n");

        let resolver = Resolver::new(fs);
        let js = resolver.resolve(Path::new("/p/sub/app.js")).unwrap();
        let txt = resolver.resolve(Path::new("/p/sub/notes.txt")).unwrap();

        assert_eq!(js.properties.get("indent_size"), Some("2"));
        assert_eq!(js.properties.get("tab_width"), Some("2"));
        assert_eq!(txt.properties.get("indent_size"), Some("4"));
    }

    #[test]
    fn test_unreadable_file_reported_not_fatal() {
        let mut fs = MemoryFs::new().with_file("/.editorconfig", "[*]\nend_of_line = lf\n");
        fs.insert_unreadable("/p/.editorconfig", io::ErrorKind::PermissionDenied);

        let resolution = Resolver::new(fs).resolve(Path::new("/p/a.txt")).unwrap();

        assert_eq!(resolution.properties.get("end_of_line"), Some("lf"));
        assert_eq!(resolution.diagnostics.len(), 1);
        assert_eq!(resolution.diagnostics[0].path, Path::new("/p/.editorconfig"));
    }

    #[test]
    fn test_custom_file_name_option() {
        let fs = MemoryFs::new()
            .with_file("/p/.editorconfig", "[*]\nindent_size = 2\n")
            .with_file("/p/.ecrc", "[*]\nindent_size = 3\n");

        let resolver = Resolver::new(fs).with_options(ResolveOptions {
            file_name: ".ecrc".to_string(),
        });
        let resolution = resolver.resolve(Path::new("/p/a.txt")).unwrap();
        assert_eq!(resolution.properties.get("indent_size"), Some("3"));
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let fs = MemoryFs::new().with_file(
            "/p/.editorconfig",
            "[*]\nindent_style = tab\ntab_width = 4\n[*.md]\ntrim_trailing_whitespace = false\n",
        );
        let resolver = Resolver::new(fs);

        let first = resolver.resolve(Path::new("/p/README.md")).unwrap();
        let second = resolver.resolve(Path::new("/p/README.md")).unwrap();
        assert_eq!(first.properties, second.properties);
    }

    #[test]
    fn test_cached_resolution_matches_uncached() {
        let fs = MemoryFs::new()
            .with_file("/p/.editorconfig", "root = true\n[*]\nindent_size = 2\n")
            .with_file("/p/q/.editorconfig", "[*.rs]\nindent_size = 4\n");
        let cache = Arc::new(ConfigCache::new());

        let plain = Resolver::new(&fs).resolve(Path::new("/p/q/lib.rs")).unwrap();
        let cached_resolver = Resolver::new(&fs).with_cache(Arc::clone(&cache));
        let first = cached_resolver.resolve(Path::new("/p/q/lib.rs")).unwrap();
        let second = cached_resolver.resolve(Path::new("/p/q/lib.rs")).unwrap();

        assert_eq!(plain.properties, first.properties);
        assert_eq!(first.properties, second.properties);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_cache_sees_rewritten_file() {
        let mut fs = MemoryFs::new().with_file("/p/.editorconfig", "[*]\nindent_size = 2\n");
        let cache = Arc::new(ConfigCache::new());

        let before = Resolver::new(&fs)
            .with_cache(Arc::clone(&cache))
            .resolve(Path::new("/p/a.txt"))
            .unwrap();
        fs.insert("/p/.editorconfig", "[*]\nindent_size = 6\n");
        let after = Resolver::new(&fs)
            .with_cache(Arc::clone(&cache))
            .resolve(Path::new("/p/a.txt"))
            .unwrap();

        assert_eq!(before.properties.get("indent_size"), Some("2"));
        assert_eq!(after.properties.get("indent_size"), Some("6"));
    }

    #[test]
    fn test_cancelled_resolution() {
        let fs = MemoryFs::new().with_file("/p/.editorconfig", "[*]\nindent_size = 2\n");
        let token = CancelToken::new();
        token.cancel();

        let result = Resolver::new(fs).resolve_cancellable(Path::new("/p/a.txt"), &token);
        assert!(matches!(result, Err(ResolveError::Cancelled)));
    }

    #[test]
    fn test_concurrent_resolutions_agree() {
        let fs = MemoryFs::new().with_file(
            "/p/.editorconfig",
            "[*]\nindent_style = space\nindent_size = 2\n",
        );
        let resolver = Resolver::new(fs).with_cache(Arc::new(ConfigCache::new()));

        let results: Vec<PropertyMap> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| resolver.resolve(Path::new("/p/a.txt")).unwrap().properties))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert!(results.windows(2).all(|pair| pair[0] == pair[1]));
    }
}
