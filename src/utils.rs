//! Case-insensitive name helpers
//!
//! Project names and file names are compared ignoring case everywhere:
//! uniqueness checks, discovery ordering, and extension matching.

use std::cmp::Ordering;
use std::path::{self, Component, Path};

/// Whether two names are equal ignoring case
pub fn names_match(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

/// Case-insensitive ordering with an exact-bytes tie break
///
/// `A.json` and `a.json` compare equal ignoring case; the tie break keeps
/// the order total so a fixed directory snapshot always sorts the same way.
pub fn compare_ignore_case(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Whether `path`'s file name ends with `extension`, ignoring case
///
/// `extension` includes the leading dot.
pub fn has_extension_ignore_case(path: &Path, extension: &str) -> bool {
    let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if file_name.len() < extension.len() {
        return false;
    }
    let split = file_name.len() - extension.len();
    file_name.is_char_boundary(split) && file_name[split..].eq_ignore_ascii_case(extension)
}

/// Whether `name` can be used as a single file or directory name
///
/// Rejects names with path separators or NUL bytes, and names such as `..`
/// that are not a plain path component.
pub fn is_plain_name(name: &str) -> bool {
    if name.contains(|c: char| path::is_separator(c) || c == '\0') {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
