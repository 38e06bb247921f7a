//! Glob expansion, exclusion filtering, and known-files claiming shared by
//! both launchers (`spec.md` §4.2).

use crate::known_files::KnownFiles;
use multitrack_core::MultitrackError;
use std::collections::HashSet;
use std::path::PathBuf;

/// Anything a launcher can expand a glob pattern from. Implemented for both
/// trackable kinds so discovery is written once.
pub(crate) trait GlobSource {
    fn glob(&self) -> &str;
}

impl GlobSource for multitrack_core::FullFileTrackable {
    fn glob(&self) -> &str {
        &self.glob
    }
}

impl GlobSource for multitrack_core::TailTrackable {
    fn glob(&self) -> &str {
        &self.glob
    }
}

/// Validate that a glob pattern is at least syntactically expandable
/// (`spec.md` §4.1: "validate every glob pattern by attempting expansion").
pub(crate) fn validate_pattern(pattern: &str) -> Result<(), MultitrackError> {
    glob::glob(pattern)
        .map(|_| ())
        .map_err(|e| MultitrackError::configuration(format!("invalid glob pattern {pattern:?}: {e}")))
}

fn expand(pattern: &str) -> Vec<PathBuf> {
    match glob::glob(pattern) {
        Ok(paths) => paths.filter_map(Result::ok).collect(),
        Err(_) => Vec::new(),
    }
}

fn is_excluded(path: &std::path::Path, excluded: &[glob::Pattern]) -> bool {
    excluded.iter().any(|pattern| pattern.matches_path(path))
}

/// Expand every trackable's glob pattern and return `(trackable_index, path)`
/// pairs for newly discovered, non-excluded files, claiming each path in
/// `known` so no other caller can spawn a second worker for it.
///
/// When a path matches more than one trackable in this launcher, the first
/// trackable in declaration order wins and the path is returned exactly
/// once (`spec.md` §4.2's dispatch rule).
pub(crate) fn discover_new_paths<T: GlobSource>(
    trackables: &[T],
    excluded: &[glob::Pattern],
    known: &KnownFiles,
) -> Vec<(usize, PathBuf)> {
    let mut discovered = Vec::new();
    let mut claimed_this_round: HashSet<PathBuf> = HashSet::new();

    for (index, trackable) in trackables.iter().enumerate() {
        for path in expand(trackable.glob()) {
            if is_excluded(&path, excluded) || claimed_this_round.contains(&path) {
                continue;
            }
            if known.claim(&path) {
                claimed_this_round.insert(path.clone());
                discovered.push((index, path));
            }
        }
    }

    discovered
}

#[cfg(test)]
#[path = "discovery_tests.rs"]
mod tests;
