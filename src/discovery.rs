//! Test-group discovery
//!
//! The rendering harness writes one directory per repeated iteration, named
//! `{group}_{index}` with indices starting at 1. Discovery scans the results
//! root once and counts iterations per group; the resulting map is never
//! mutated afterwards.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::Result;

/// Suffix marking a directory as a finalized aggregate (this tool's own
/// output). Such directories are never treated as iterations.
pub const FINAL_DIR_SUFFIX: &str = "-final";

/// Map from test-group name to the number of iteration directories found.
///
/// Ordered, so passes over groups are deterministic.
pub type TestGroups = BTreeMap<String, usize>;

/// Scan `results_root` and group iteration directories by name prefix.
///
/// The group name is the text before the first underscore; a directory
/// without an underscore forms a single-iteration group of its own name.
/// Aggregate directories (`*-final`) and non-directory entries are skipped.
///
/// # Errors
///
/// Returns an IO error if the results root cannot be read.
pub fn discover_test_groups(results_root: &Path) -> Result<TestGroups> {
    let mut groups = TestGroups::new();

    for entry in fs::read_dir(results_root)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            tracing::debug!(?name, "skipping non-UTF-8 directory name");
            continue;
        };
        if name.ends_with(FINAL_DIR_SUFFIX) {
            continue;
        }
        let group = name.split('_').next().unwrap_or(name);
        *groups.entry(group.to_owned()).or_insert(0) += 1;
    }

    Ok(groups)
}
