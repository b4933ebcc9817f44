//! Study discovery for `drill sync` and `drill preview`.
//!
//! Directories are walked with the `ignore` crate (so `.gitignore` rules and
//! hidden directories such as `.drill/` are skipped) and filtered to `*.pgn`.
//! Anything else is passed through as given; the sync engine reports paths it
//! cannot read.

use std::path::{Path, PathBuf};

use anyhow::Context;
use globset::{GlobBuilder, GlobMatcher};
use ignore::WalkBuilder;

fn study_matcher() -> anyhow::Result<GlobMatcher> {
    GlobBuilder::new("*.pgn")
        .case_insensitive(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .context("invalid study glob")
}

/// Expand `paths` into a sorted, deduplicated list of study files.
pub fn discover_studies(paths: &[PathBuf]) -> anyhow::Result<Vec<PathBuf>> {
    let matcher = study_matcher()?;
    let mut studies = Vec::new();

    for path in paths {
        if path.is_dir() {
            walk_dir(path, &matcher, &mut studies)?;
        } else {
            studies.push(path.clone());
        }
    }

    studies.sort();
    studies.dedup();
    tracing::debug!(count = studies.len(), "discovered studies");
    Ok(studies)
}

fn walk_dir(root: &Path, matcher: &GlobMatcher, out: &mut Vec<PathBuf>) -> anyhow::Result<()> {
    for entry in WalkBuilder::new(root).build() {
        let entry =
            entry.with_context(|| format!("failed to walk directory {}", root.display()))?;
        if !entry.file_type().is_some_and(|kind| kind.is_file()) {
            continue;
        }
        let is_study = entry
            .path()
            .file_name()
            .is_some_and(|name| matcher.is_match(name));
        if is_study {
            out.push(entry.into_path());
        }
    }
    Ok(())
}
