//! Batched image-quality comparison
//!
//! Each result directory holds a reference render per frame under `ray/`
//! and the candidate render under `rast/`. An external perceptual-quality
//! tool scores each pair; the scores land in a `com_res.txt` marker file,
//! one per line, which also makes the pass resumable: directories that
//! already carry the marker are skipped.
//!
//! The tool itself is an opaque collaborator behind [`ImageComparer`], so
//! tests (and future tools) can swap in their own scorer.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::discovery::FINAL_DIR_SUFFIX;
use crate::{Error, Result};

/// File name marking a result directory as already compared.
pub const COMPARISON_MARKER: &str = "com_res.txt";

/// Subdirectory holding the reference (ray-traced) frames.
pub const REFERENCE_DIR: &str = "ray";

/// Subdirectory holding the candidate (rasterized) frames.
pub const CANDIDATE_DIR: &str = "rast";

const DEFAULT_PIEAPP_EXECUTABLE: &str = "pieapp/pieappv0.1.exe";

/// Scores the perceptual difference between a reference image and a
/// candidate image.
pub trait ImageComparer {
    /// Compare one image pair and return its quality score.
    ///
    /// # Errors
    ///
    /// Returns an error when the comparison cannot be run or produces no
    /// usable score.
    fn compare(&self, reference: &Path, candidate: &Path) -> Result<f64>;
}

/// [`ImageComparer`] backed by the pieAPP executable.
///
/// Invokes `<exe> --ref_path R --a_path C --sampling_mode sparse` and
/// takes the final whitespace-separated token of stdout as the score.
#[derive(Debug, Clone)]
pub struct PieAppComparer {
    executable: PathBuf,
}

impl Default for PieAppComparer {
    fn default() -> Self {
        Self::new(DEFAULT_PIEAPP_EXECUTABLE)
    }
}

impl PieAppComparer {
    /// Create a comparer invoking the given executable.
    #[must_use]
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }
}

impl ImageComparer for PieAppComparer {
    fn compare(&self, reference: &Path, candidate: &Path) -> Result<f64> {
        let output = Command::new(&self.executable)
            .arg("--ref_path")
            .arg(reference)
            .arg("--a_path")
            .arg(candidate)
            .arg("--sampling_mode")
            .arg("sparse")
            .output()?;

        if !output.status.success() {
            return Err(Error::ComparerFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        parse_score(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Extract the score from the comparison tool's stdout: the final
/// whitespace-separated token, parsed as a float.
fn parse_score(stdout: &str) -> Result<f64> {
    let token = stdout.split_whitespace().last().ok_or_else(|| Error::MalformedScore {
        output: stdout.trim().to_owned(),
    })?;
    token.parse().map_err(|_| Error::MalformedScore {
        output: token.to_owned(),
    })
}

/// Compare every unprocessed result directory under `results_root`.
///
/// For each directory without a [`COMPARISON_MARKER`], every file in its
/// `ray/` subdirectory is scored against the same-named file in `rast/`
/// (in sorted name order, so output order is deterministic) and the scores
/// are written to the marker file, one per line. Finalized aggregate
/// directories (`*-final`) are skipped.
///
/// Returns the number of directories processed in this run.
///
/// # Errors
///
/// Returns an error when a directory cannot be read, a comparison fails,
/// or the marker file cannot be written. A partially-written marker from a
/// failed run should be deleted before rerunning.
pub fn run_comparisons(results_root: &Path, comparer: &dyn ImageComparer) -> Result<usize> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(results_root)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        if entry.file_name().to_string_lossy().ends_with(FINAL_DIR_SUFFIX) {
            continue;
        }
        dirs.push(entry.path());
    }
    dirs.sort();

    let mut processed = 0;
    for dir in dirs {
        let marker = dir.join(COMPARISON_MARKER);
        if marker.exists() {
            tracing::debug!(dir = %dir.display(), "already compared, skipping");
            continue;
        }
        compare_directory(&dir, &marker, comparer)?;
        processed += 1;
    }
    Ok(processed)
}

/// Score every frame pair of one result directory into its marker file.
fn compare_directory(dir: &Path, marker: &Path, comparer: &dyn ImageComparer) -> Result<()> {
    let reference_dir = dir.join(REFERENCE_DIR);
    let candidate_dir = dir.join(CANDIDATE_DIR);

    let mut names = Vec::new();
    for entry in fs::read_dir(&reference_dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            names.push(entry.file_name());
        }
    }
    names.sort();

    tracing::info!(dir = %dir.display(), frames = names.len(), "comparing");

    let mut out = BufWriter::new(File::create(marker)?);
    for name in names {
        let score = comparer.compare(&reference_dir.join(&name), &candidate_dir.join(&name))?;
        writeln!(out, "{score}")?;
    }
    out.flush()?;
    Ok(())
}
