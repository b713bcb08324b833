//! Error types for benchpost

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Benchpost error types
#[derive(Error, Debug)]
pub enum Error {
    /// An iteration directory is missing one of the expected metric files.
    /// Fatal for the whole pass; rerun the job after fixing the results tree.
    #[error("missing input file: {}", path.display())]
    MissingInputFile {
        /// Path of the metric file that could not be opened
        path: PathBuf,
    },

    /// A data row failed numeric parsing or disagreed with the field count
    /// established earlier in the same pass.
    #[error("malformed row in {} at line {line}: {reason}", path.display())]
    MalformedRow {
        /// File containing the offending row
        path: PathBuf,
        /// 1-based line number of the offending row
        line: usize,
        /// What was wrong with the row
        reason: String,
    },

    /// The external image-comparison tool exited unsuccessfully.
    #[error("image comparison failed ({status}): {stderr}")]
    ComparerFailed {
        /// Exit status reported by the tool
        status: String,
        /// Captured standard error output
        stderr: String,
    },

    /// The image-comparison tool's output did not end in a numeric score.
    #[error("comparison tool produced no parsable score: {output:?}")]
    MalformedScore {
        /// The output (or final token) that failed to parse
        output: String,
    },

    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error (config files)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
