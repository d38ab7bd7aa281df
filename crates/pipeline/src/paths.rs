//! Path and file-name utilities shared by the pipeline stages.
//!
//! Two distinct safety rules live here. *Filename* validity is strict:
//! it rejects any `..` occurrence, reserved device names and unsafe
//! punctuation, and applies to the final name segment. *Path* safety is
//! deliberately narrower: it only rejects `..` appearing as a whole
//! segment, so a file named `a..b.txt` is a safe path.

/// Punctuation that never belongs in a deployable file name.
const UNSAFE_NAME_CHARS: &[char] = &['<', '>', ':', '"', '|', '?', '*', '\\', '/', '\0'];

/// Windows reserved device names, matched case-insensitively with or
/// without an extension.
const RESERVED_NAMES: &[&str] = &[
    "con", "prn", "aux", "nul", "com1", "com2", "com3", "com4", "com5", "com6", "com7", "com8",
    "com9", "lpt1", "lpt2", "lpt3", "lpt4", "lpt5", "lpt6", "lpt7", "lpt8", "lpt9",
];

/// Extensions a static host refuses to serve as content: server-side
/// executable sources.
const BLOCKED_EXTENSIONS: &[&str] = &[
    "php", "php3", "php4", "php5", "phtml", "asp", "aspx", "jsp", "cgi",
];

/// Converts backslash separators to forward slashes.
pub fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

/// Last segment of a forward-slash path.
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Number of leading path segments shared by every path.
///
/// The final segment of the shortest path never counts: only directory
/// segments may be part of the common prefix. A single path therefore
/// shares its entire directory chain.
pub fn common_prefix_len<S: AsRef<str>>(paths: &[S]) -> usize {
    let Some(first) = paths.first() else {
        return 0;
    };
    let first: Vec<&str> = first.as_ref().split('/').collect();
    let mut shared = first.len().saturating_sub(1);

    for path in &paths[1..] {
        let segments: Vec<&str> = path.as_ref().split('/').collect();
        let bound = shared.min(segments.len().saturating_sub(1));
        let mut n = 0;
        while n < bound && segments[n] == first[n] {
            n += 1;
        }
        shared = n;
        if shared == 0 {
            break;
        }
    }

    shared
}

/// Whether `name` is acceptable as a deployable file name.
pub fn is_safe_filename(name: &str) -> bool {
    if name.is_empty() || name != name.trim() {
        return false;
    }
    if name.ends_with('.') || name.contains("..") {
        return false;
    }
    if name
        .chars()
        .any(|c| UNSAFE_NAME_CHARS.contains(&c) || c.is_control())
    {
        return false;
    }
    let stem = name.split('.').next().unwrap_or(name);
    let stem_lower = stem.to_ascii_lowercase();
    !RESERVED_NAMES.contains(&stem_lower.as_str())
}

/// Whether `path` is safe as a deployment-relative path.
///
/// Rejects null bytes, backslashes, and traversal appearing as a whole
/// segment. Narrower than [`is_safe_filename`]: `a..b.txt` passes.
pub fn is_safe_path(path: &str) -> bool {
    if path.contains('\0') || path.contains('\\') {
        return false;
    }
    !path.split('/').any(|segment| segment == "..")
}

/// Whether the file name carries a blocked (server-executable) extension.
pub fn has_blocked_extension(name: &str) -> bool {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => {
            let ext_lower = ext.to_ascii_lowercase();
            BLOCKED_EXTENSIONS.contains(&ext_lower.as_str())
        }
        _ => false,
    }
}
