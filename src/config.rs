//! Averaging configuration

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Default width of one averaging bucket, in harness time units.
pub const DEFAULT_BUCKET_WIDTH: f64 = 0.25;

/// Default time beyond which an empty bucket terminates the scan.
pub const DEFAULT_STOP_THRESHOLD: f64 = 17.0;

const DEFAULT_RESULTS_ROOT: &str = "testresults";

/// Metric files the rendering harness writes into every iteration directory.
const DEFAULT_METRIC_FILES: [&str; 3] = ["alg_its", "fps", "draw"];

/// Configuration for one averaging pass.
///
/// All options have defaults matching the harness layout, so
/// `AveragerConfig::default()` is a complete, runnable configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AveragerConfig {
    results_root: PathBuf,
    metric_file_names: Vec<String>,
    bucket_width: f64,
    stop_threshold: f64,
}

impl Default for AveragerConfig {
    fn default() -> Self {
        Self {
            results_root: PathBuf::from(DEFAULT_RESULTS_ROOT),
            metric_file_names: DEFAULT_METRIC_FILES.iter().map(ToString::to_string).collect(),
            bucket_width: DEFAULT_BUCKET_WIDTH,
            stop_threshold: DEFAULT_STOP_THRESHOLD,
        }
    }
}

impl AveragerConfig {
    /// Create a builder for constructing a configuration with custom options.
    #[must_use]
    pub fn builder() -> AveragerConfigBuilder {
        AveragerConfigBuilder::default()
    }

    /// Load and validate a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// fails [`validate`](Self::validate).
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants the averaging loop relies on.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` when the bucket width is not a positive finite
    /// number, the stop threshold does not exceed the bucket width, or no
    /// metric file names are configured.
    pub fn validate(&self) -> Result<()> {
        if !(self.bucket_width.is_finite() && self.bucket_width > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "bucket_width must be a positive finite number, got {}",
                self.bucket_width
            )));
        }
        if !(self.stop_threshold.is_finite() && self.stop_threshold > self.bucket_width) {
            return Err(Error::InvalidConfig(format!(
                "stop_threshold ({}) must exceed bucket_width ({})",
                self.stop_threshold, self.bucket_width
            )));
        }
        if self.metric_file_names.is_empty() {
            return Err(Error::InvalidConfig(
                "at least one metric file name is required".to_string(),
            ));
        }
        Ok(())
    }

    /// Root directory holding the iteration directories.
    #[must_use]
    pub fn results_root(&self) -> &Path {
        &self.results_root
    }

    /// Metric file names expected inside every iteration directory
    /// (without the `.txt` extension).
    #[must_use]
    pub fn metric_file_names(&self) -> &[String] {
        &self.metric_file_names
    }

    /// Width of one averaging bucket.
    #[must_use]
    pub const fn bucket_width(&self) -> f64 {
        self.bucket_width
    }

    /// Time beyond which an empty bucket terminates the scan.
    #[must_use]
    pub const fn stop_threshold(&self) -> f64 {
        self.stop_threshold
    }
}

/// Builder for `AveragerConfig`.
#[derive(Debug, Default)]
pub struct AveragerConfigBuilder {
    config: AveragerConfig,
}

impl AveragerConfigBuilder {
    /// Set the results root directory.
    #[must_use]
    pub fn results_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.results_root = root.into();
        self
    }

    /// Replace the set of metric file names.
    #[must_use]
    pub fn metric_file_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.metric_file_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Set the bucket width.
    #[must_use]
    pub const fn bucket_width(mut self, width: f64) -> Self {
        self.config.bucket_width = width;
        self
    }

    /// Set the stop threshold.
    #[must_use]
    pub const fn stop_threshold(mut self, threshold: f64) -> Self {
        self.config.stop_threshold = threshold;
        self
    }

    /// Validate and build the configuration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` when the options violate the invariants
    /// documented on [`AveragerConfig::validate`].
    pub fn build(self) -> Result<AveragerConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
