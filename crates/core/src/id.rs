//! Path-identity helpers used only to keep log lines readable.
//!
//! Mirrors `oj_core::id::ShortId`'s truncate-for-display role, applied to
//! filesystem paths instead of opaque string identifiers.

use std::path::Path;

/// Render the last `max_components` path segments, eliding the rest with a
/// leading `...`. Short paths are returned unchanged.
pub fn short_path(path: &Path, max_components: usize) -> String {
    let components: Vec<_> = path.components().collect();
    if components.len() <= max_components || max_components == 0 {
        return path.display().to_string();
    }
    let tail = &components[components.len() - max_components..];
    let mut rendered = String::from("...");
    for component in tail {
        rendered.push('/');
        rendered.push_str(&component.as_os_str().to_string_lossy());
    }
    rendered
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
