//! Slash-separated relative path helpers.
//!
//! Mount paths never carry a leading slash and the root is the empty string.
//! `"."`, `"/"` and `""` all denote the root.

/// Canonical form of a path: no leading or trailing slashes, no empty or `.`
/// segments.
pub fn normalize(path: &str) -> String {
    path.split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<&str>>()
        .join("/")
}

/// Split off the first segment.
///
/// # Returns
/// `(head, tail)`; `tail` is empty when the path has a single segment.
pub fn split_head(path: &str) -> (&str, &str) {
    match path.split_once('/') {
        Some((head, tail)) => (head, tail),
        None => (path, ""),
    }
}

/// Parent of a normalized path; `""` for top-level entries and for the root.
pub fn parent(path: &str) -> &str {
    match path.rfind('/') {
        Some(index) => &path[..index],
        None => "",
    }
}

/// Last segment of a normalized path.
pub fn base_name(path: &str) -> &str {
    match path.rfind('/') {
        Some(index) => &path[index + 1..],
        None => path,
    }
}

/// Join two normalized paths, either of which may be the root.
pub fn join(base: &str, name: &str) -> String {
    match (base.is_empty(), name.is_empty()) {
        (true, _) => name.to_string(),
        (false, true) => base.to_string(),
        (false, false) => format!("{}/{}", base, name),
    }
}

/// Ancestors of a normalized path from nearest to farthest, excluding the root.
///
/// `"a/b/c"` yields `"a/b/c"`, `"a/b"`, `"a"`.
pub fn self_and_ancestors(path: &str) -> impl Iterator<Item = &str> {
    let mut current: Option<&str> = (!path.is_empty()).then_some(path);
    std::iter::from_fn(move || {
        let here: &str = current?;
        let up: &str = parent(here);
        current = (!up.is_empty()).then_some(up);
        Some(here)
    })
}
