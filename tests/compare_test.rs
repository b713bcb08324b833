//! Integration tests for the comparison pass
//!
//! The external scorer is replaced with a stub so the tests exercise the
//! directory walk, pairing, marker handling, and output format.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use benchpost::compare::{run_comparisons, ImageComparer, COMPARISON_MARKER};
use benchpost::Result;

/// Returns a fixed score and records every pair it was asked about.
struct StubComparer {
    score: f64,
    pairs: RefCell<Vec<(PathBuf, PathBuf)>>,
}

impl StubComparer {
    fn new(score: f64) -> Self {
        Self {
            score,
            pairs: RefCell::new(Vec::new()),
        }
    }
}

impl ImageComparer for StubComparer {
    fn compare(&self, reference: &Path, candidate: &Path) -> Result<f64> {
        self.pairs
            .borrow_mut()
            .push((reference.to_path_buf(), candidate.to_path_buf()));
        Ok(self.score)
    }
}

fn make_result_dir(root: &Path, name: &str, frames: &[&str]) {
    let dir = root.join(name);
    fs::create_dir_all(dir.join("ray")).unwrap();
    fs::create_dir_all(dir.join("rast")).unwrap();
    for frame in frames {
        fs::write(dir.join("ray").join(frame), b"ref").unwrap();
        fs::write(dir.join("rast").join(frame), b"cand").unwrap();
    }
}

#[test]
fn test_scores_every_frame_pair() {
    let tmp = tempfile::tempdir().unwrap();
    make_result_dir(tmp.path(), "terrain_1", &["f0.png", "f1.png"]);

    let comparer = StubComparer::new(0.5);
    let processed = run_comparisons(tmp.path(), &comparer).unwrap();

    assert_eq!(processed, 1);
    let contents =
        fs::read_to_string(tmp.path().join("terrain_1").join(COMPARISON_MARKER)).unwrap();
    assert_eq!(contents, "0.5\n0.5\n");

    // Pairs are reference-vs-candidate of the same frame name, in sorted order.
    let pairs = comparer.pairs.borrow();
    assert_eq!(pairs.len(), 2);
    assert!(pairs[0].0.ends_with("terrain_1/ray/f0.png"));
    assert!(pairs[0].1.ends_with("terrain_1/rast/f0.png"));
    assert!(pairs[1].0.ends_with("terrain_1/ray/f1.png"));
}

#[test]
fn test_marker_makes_pass_resumable() {
    let tmp = tempfile::tempdir().unwrap();
    make_result_dir(tmp.path(), "terrain_1", &["f0.png"]);

    let comparer = StubComparer::new(1.0);
    assert_eq!(run_comparisons(tmp.path(), &comparer).unwrap(), 1);
    let first = fs::read(tmp.path().join("terrain_1").join(COMPARISON_MARKER)).unwrap();

    // Second run finds the marker and touches nothing.
    assert_eq!(run_comparisons(tmp.path(), &comparer).unwrap(), 0);
    let second = fs::read(tmp.path().join("terrain_1").join(COMPARISON_MARKER)).unwrap();
    assert_eq!(first, second);
    assert_eq!(comparer.pairs.borrow().len(), 1);
}

#[test]
fn test_final_directories_skipped() {
    let tmp = tempfile::tempdir().unwrap();
    make_result_dir(tmp.path(), "terrain_1", &["f0.png"]);
    // An aggregate dir has no ray/rast subdirectories; it must be ignored
    // rather than treated as an unprocessed result directory.
    fs::create_dir_all(tmp.path().join("terrain-final")).unwrap();

    let comparer = StubComparer::new(1.0);
    assert_eq!(run_comparisons(tmp.path(), &comparer).unwrap(), 1);
    assert!(!tmp.path().join("terrain-final").join(COMPARISON_MARKER).exists());
}

#[test]
fn test_comparer_failure_aborts_pass() {
    struct FailingComparer;
    impl ImageComparer for FailingComparer {
        fn compare(&self, _reference: &Path, _candidate: &Path) -> Result<f64> {
            Err(benchpost::Error::ComparerFailed {
                status: "exit status: 1".to_string(),
                stderr: "cuda out of memory".to_string(),
            })
        }
    }

    let tmp = tempfile::tempdir().unwrap();
    make_result_dir(tmp.path(), "terrain_1", &["f0.png"]);

    let err = run_comparisons(tmp.path(), &FailingComparer).unwrap_err();
    assert!(err.to_string().contains("cuda out of memory"));
}

#[test]
fn test_directory_without_frames_writes_empty_marker() {
    let tmp = tempfile::tempdir().unwrap();
    make_result_dir(tmp.path(), "terrain_1", &[]);

    let comparer = StubComparer::new(1.0);
    assert_eq!(run_comparisons(tmp.path(), &comparer).unwrap(), 1);
    let contents =
        fs::read_to_string(tmp.path().join("terrain_1").join(COMPARISON_MARKER)).unwrap();
    assert!(contents.is_empty());
}
