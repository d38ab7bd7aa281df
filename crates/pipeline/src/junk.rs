//! Junk-file filtering.
//!
//! Drops OS and editor artifact files from a candidate list. Matching
//! happens on the final name segment of the candidate's relative path,
//! plus `__MACOSX` archive directories anywhere in the path; the
//! assembler applies the segment rule to final relative paths only, so
//! an ancestor directory above the deploy root never counts. The filter
//! is stable: the same input set always yields the same output set,
//! regardless of order.

use crate::paths::file_name;

const JUNK_NAMES: &[&str] = &[
    ".DS_Store",
    ".AppleDouble",
    ".LSOverride",
    ".Spotlight-V100",
    ".Trashes",
    "Thumbs.db",
    "ehthumbs.db",
    "desktop.ini",
    ".directory",
    "npm-debug.log",
];

/// Whether `name` is an OS/editor artifact file name.
pub fn is_junk(name: &str) -> bool {
    if JUNK_NAMES.contains(&name) {
        return true;
    }
    // AppleDouble resource forks and editor backup files.
    name.starts_with("._") || name.ends_with('~')
}

/// Whether any part of `path` marks it as junk.
pub fn is_junk_path(path: &str) -> bool {
    if path.split('/').any(|segment| segment == "__MACOSX") {
        return true;
    }
    is_junk(file_name(path))
}

/// Filters junk entries out of a relative-path list, preserving order.
pub fn filter_junk<S: AsRef<str>>(paths: &[S]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.as_ref())
        .filter(|p| !is_junk_path(p))
        .map(str::to_string)
        .collect()
}
