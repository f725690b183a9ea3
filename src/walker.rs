use ignore::WalkBuilder;
use std::io;
use std::path::{Path, PathBuf};

/// Expand `paths` into the files to resolve.
///
/// Files are yielded as given. Directories are walked in name order,
/// skipping hidden entries and anything excluded by git ignore rules.
pub fn walk_paths<P: AsRef<Path>>(paths: &[P]) -> Vec<io::Result<PathBuf>> {
    let mut files = vec![];

    for path in paths {
        let path = path.as_ref();
        if !path.is_dir() {
            files.push(Ok(path.to_path_buf()));
            continue;
        }

        let walker = WalkBuilder::new(path)
            .hidden(true)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        for entry in walker {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_some_and(|ft| ft.is_file()) {
                        files.push(Ok(entry.into_path()));
                    }
                }
                Err(e) => files.push(Err(io::Error::other(e.to_string()))),
            }
        }
    }

    files
}
