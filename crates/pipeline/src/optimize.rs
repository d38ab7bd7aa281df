//! Deployment path optimization.
//!
//! Strips the longest common leading directory chain from a batch of
//! paths to produce clean root-relative URLs. Pure: the result depends
//! only on the input path set and the flatten flag.

use crate::paths::{common_prefix_len, file_name, normalize_separators};

/// An optimized deployment path plus its bare file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimizedPath {
    pub path: String,
    pub name: String,
}

/// Computes clean deployment-relative paths for a batch.
///
/// With `flatten` off, each path is returned with separators normalized
/// and nothing stripped. With `flatten` on, the shared leading directory
/// segments (never a filename) are removed from every path; an entry
/// left empty by stripping falls back to its bare file name. Output
/// order matches input order.
pub fn optimize_paths<S: AsRef<str>>(paths: &[S], flatten: bool) -> Vec<OptimizedPath> {
    let normalized: Vec<String> = paths
        .iter()
        .map(|p| normalize_separators(p.as_ref()))
        .collect();

    let shared = if flatten {
        common_prefix_len(&normalized)
    } else {
        0
    };

    normalized
        .into_iter()
        .map(|path| {
            let name = file_name(&path).to_string();
            let path = if shared == 0 {
                path
            } else {
                let rest: Vec<&str> = path.split('/').skip(shared).collect();
                let stripped = rest.join("/");
                if stripped.is_empty() { name.clone() } else { stripped }
            };
            OptimizedPath { path, name }
        })
        .collect()
}
