//! Filesystem capability used by the resolver.
//!
//! Everything the resolver learns about the disk goes through [`FileSystem`],
//! so resolution can run against [`OsFs`] or an in-memory [`MemoryFs`].

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Read-only filesystem probes needed to resolve a config chain.
pub trait FileSystem {
    /// Returns true if a file exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Read the whole file at `path` as UTF-8 text.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Parent directory of `path`, or `None` at the filesystem root.
    fn parent_of<'a>(&self, path: &'a Path) -> Option<&'a Path> {
        path.parent()
    }

    /// Last modification time, used to validate cached config files.
    fn modified(&self, _path: &Path) -> Option<SystemTime> {
        None
    }
}

impl<T: FileSystem + ?Sized> FileSystem for &T {
    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        (**self).read_to_string(path)
    }

    fn parent_of<'a>(&self, path: &'a Path) -> Option<&'a Path> {
        (**self).parent_of(path)
    }

    fn modified(&self, path: &Path) -> Option<SystemTime> {
        (**self).modified(path)
    }
}

/// The real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFs;

impl FileSystem for OsFs {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn modified(&self, path: &Path) -> Option<SystemTime> {
        fs::metadata(path).and_then(|m| m.modified()).ok()
    }
}

#[derive(Debug, Clone)]
enum MemoryEntry {
    File { contents: String, revision: u64 },
    Unreadable(io::ErrorKind),
}

/// In-memory file tree. Directories exist implicitly.
///
/// Every write bumps a revision counter which is reported as the file's
/// modification time, so cache invalidation can be exercised without a disk.
#[derive(Debug, Default, Clone)]
pub struct MemoryFs {
    entries: BTreeMap<PathBuf, MemoryEntry>,
    revision: u64,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`MemoryFs::insert`].
    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        self.insert(path, contents);
        self
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, contents: impl Into<String>) {
        self.revision += 1;
        self.entries.insert(
            path.into(),
            MemoryEntry::File {
                contents: contents.into(),
                revision: self.revision,
            },
        );
    }

    /// Register a file that exists but fails to read with `kind`.
    pub fn insert_unreadable(&mut self, path: impl Into<PathBuf>, kind: io::ErrorKind) {
        self.entries.insert(path.into(), MemoryEntry::Unreadable(kind));
    }

    pub fn remove(&mut self, path: &Path) {
        self.entries.remove(path);
    }
}

impl FileSystem for MemoryFs {
    fn exists(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        match self.entries.get(path) {
            Some(MemoryEntry::File { contents, .. }) => Ok(contents.clone()),
            Some(MemoryEntry::Unreadable(kind)) => Err(io::Error::new(
                *kind,
                format!("cannot read {}", path.display()),
            )),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} not found", path.display()),
            )),
        }
    }

    fn modified(&self, path: &Path) -> Option<SystemTime> {
        match self.entries.get(path) {
            Some(MemoryEntry::File { revision, .. }) => {
                Some(SystemTime::UNIX_EPOCH + Duration::from_secs(*revision))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_fs_read_and_exists() {
        let fs = MemoryFs::new().with_file("/a/.editorconfig", "root = true\n");

        assert!(fs.exists(Path::new("/a/.editorconfig")));
        assert!(!fs.exists(Path::new("/a/b/.editorconfig")));
        assert_eq!(
            fs.read_to_string(Path::new("/a/.editorconfig")).unwrap(),
            "root = true\n"
        );
    }

    #[test]
    fn test_memory_fs_unreadable_file() {
        let mut fs = MemoryFs::new();
        fs.insert_unreadable("/a/.editorconfig", io::ErrorKind::PermissionDenied);

        assert!(fs.exists(Path::new("/a/.editorconfig")));
        let err = fs.read_to_string(Path::new("/a/.editorconfig")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
        assert_eq!(fs.modified(Path::new("/a/.editorconfig")), None);
    }

    #[test]
    fn test_memory_fs_rewrite_changes_modified_time() {
        let mut fs = MemoryFs::new();
        fs.insert("/a/.editorconfig", "one");
        let first = fs.modified(Path::new("/a/.editorconfig"));
        fs.insert("/a/.editorconfig", "two");
        let second = fs.modified(Path::new("/a/.editorconfig"));

        assert!(first.is_some());
        assert_ne!(first, second);
    }

    #[test]
    fn test_parent_of_stops_at_root() {
        let fs = MemoryFs::new();
        assert_eq!(fs.parent_of(Path::new("/a/b")), Some(Path::new("/a")));
        assert_eq!(fs.parent_of(Path::new("/a")), Some(Path::new("/")));
        assert_eq!(fs.parent_of(Path::new("/")), None);
    }

    #[test]
    fn test_os_fs_directories_are_not_files() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join(".editorconfig");
        std::fs::create_dir(&sub).unwrap();

        assert!(!OsFs.exists(&sub));
    }

    #[test]
    fn test_os_fs_reads_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".editorconfig");
        std::fs::write(&path, "[*]\n").unwrap();

        assert!(OsFs.exists(&path));
        assert_eq!(OsFs.read_to_string(&path).unwrap(), "[*]\n");
        assert!(OsFs.modified(&path).is_some());
    }
}
