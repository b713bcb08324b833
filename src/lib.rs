//! # Benchpost: rendering-benchmark post-processing
//!
//! Benchpost post-processes the output of a rendering test harness. The
//! harness runs each test configuration ("test group") several times and
//! writes one directory per iteration, named `{group}_{index}`, holding a
//! fixed set of metric files with `timestamp value ...` rows. Two batch
//! passes turn that raw tree into results:
//!
//! - **Averaging**: partition every metric's rows into fixed-width time
//!   buckets and write one `{group}-final/{metric}.txt` aggregate per
//!   group with the column-wise mean of each bucket across iterations.
//! - **Comparison**: score each result directory's reference frames
//!   (`ray/`) against its candidate frames (`rast/`) with an external
//!   perceptual-quality tool, collecting one score per frame pair.
//!
//! Both passes are one-shot batch jobs: any failure is fatal and the fix
//! is to rerun the whole job.
//!
//! ## Example
//!
//! ```rust,no_run
//! use benchpost::average::run_averaging;
//! use benchpost::config::AveragerConfig;
//!
//! let config = AveragerConfig::builder()
//!     .results_root("testresults")
//!     .metric_file_names(["fps"])
//!     .build()?;
//! run_averaging(&config)?;
//! # Ok::<(), benchpost::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod average;
pub mod bucket;
pub mod compare;
pub mod config;
pub mod discovery;
pub mod error;

pub use error::{Error, Result};
