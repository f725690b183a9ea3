//! Folding matching sections into one raw property map.

use std::path::Path;

use indexmap::IndexMap;

use crate::ini::ConfigFile;

/// Value that removes a key instead of setting it.
pub const UNSET: &str = "unset";

/// Merge every section matching `target`.
///
/// `files` must be root-most first. Sections are applied in document order,
/// so later files and later sections win.
pub fn merge<'a, I>(target: &Path, files: I) -> IndexMap<String, String>
where
    I: IntoIterator<Item = &'a ConfigFile>,
{
    files
        .into_iter()
        .flat_map(|file| file.sections())
        .filter(|section| section.matches(target))
        .fold(IndexMap::new(), |acc, section| {
            section
                .properties()
                .iter()
                .fold(acc, |acc, (key, value)| overlay(acc, key, value))
        })
}

fn overlay(mut acc: IndexMap<String, String>, key: &str, value: &str) -> IndexMap<String, String> {
    if value.eq_ignore_ascii_case(UNSET) {
        acc.shift_remove(key);
    } else {
        acc.insert(key.to_string(), value.to_string());
    }
    acc
}
