//! Bucketed time-series averaging
//!
//! The harness records each repeated iteration of a test group as a
//! directory of metric files with rows of `timestamp value value ...`.
//! This module partitions those rows into fixed-width time buckets and
//! writes, per (group, metric file) pair, one aggregate file with the
//! column-wise mean of every bucket across all iterations.
//!
//! The scan is single-threaded and strictly sequential; input files are
//! re-opened for each bucket's read pass and released when the pass ends.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::bucket::BucketAccumulator;
use crate::config::AveragerConfig;
use crate::discovery::{discover_test_groups, FINAL_DIR_SUFFIX};
use crate::{Error, Result};

/// Run one full averaging pass over the configured results root.
///
/// Discovers test groups, then produces `{group}-final/{metric}.txt` for
/// every (group, metric file) pair. Any failure aborts the whole pass;
/// rerunning the job regenerates every output from scratch.
///
/// # Errors
///
/// Returns an error when the configuration is invalid, an iteration is
/// missing a metric file, or a data row cannot be parsed.
pub fn run_averaging(config: &AveragerConfig) -> Result<()> {
    config.validate()?;
    let groups = discover_test_groups(config.results_root())?;
    tracing::info!(groups = groups.len(), "discovered test groups");

    for metric in config.metric_file_names() {
        for (group, &count) in &groups {
            tracing::info!(group, metric, iterations = count, "averaging");
            average_group_metric(config, group, count, metric)?;
        }
    }
    Ok(())
}

/// Average one metric file across all iterations of one test group.
fn average_group_metric(
    config: &AveragerConfig,
    group: &str,
    count: usize,
    metric: &str,
) -> Result<()> {
    let root = config.results_root();
    let out_dir = root.join(format!("{group}{FINAL_DIR_SUFFIX}"));
    // Idempotent: the aggregate directory may exist from an earlier run.
    fs::create_dir_all(&out_dir)?;
    let out_path = out_dir.join(format!("{metric}.txt"));
    let mut out = BufWriter::new(File::create(&out_path)?);

    let width = config.bucket_width();
    let mut last_time = 0.0_f64;
    let mut time = width;
    // Field count established by the first contributing row of this pass;
    // every later row must agree.
    let mut field_count: Option<usize> = None;

    loop {
        let mut bucket = BucketAccumulator::new();
        for i in 1..=count {
            let path = root.join(format!("{group}_{i}")).join(format!("{metric}.txt"));
            accumulate_file(&path, last_time, time, &mut bucket, &mut field_count)?;
        }

        write_bucket_line(&mut out, time, &bucket)?;
        tracing::trace!(group, metric, time, rows = bucket.rows(), "bucket flushed");

        last_time = time;
        time += width;
        // Write-then-check: the terminating empty bucket is already on disk.
        if bucket.is_empty() && time > config.stop_threshold() {
            break;
        }
    }

    out.flush()?;
    Ok(())
}

/// Feed one iteration file's rows inside `(last_time, time)` into `bucket`.
///
/// Both interval bounds are exclusive. Only the timestamp is parsed for
/// rows outside the bucket; contributing rows are parsed fully and checked
/// against the pass's established field count.
fn accumulate_file(
    path: &Path,
    last_time: f64,
    time: f64,
    bucket: &mut BucketAccumulator,
    field_count: &mut Option<usize>,
) -> Result<()> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::MissingInputFile {
                path: path.to_path_buf(),
            }
        } else {
            Error::Io(e)
        }
    })?;

    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        let line_number = index + 1;
        let mut fields = line.split_whitespace();

        let Some(first) = fields.next() else {
            return Err(malformed(path, line_number, "row has no fields"));
        };
        let timestamp: f64 = first.parse().map_err(|_| {
            malformed(path, line_number, format!("unparsable timestamp {first:?}"))
        })?;

        if !(last_time < timestamp && timestamp < time) {
            continue;
        }

        let values = fields
            .map(|field| {
                field.parse::<f64>().map_err(|_| {
                    malformed(path, line_number, format!("unparsable value {field:?}"))
                })
            })
            .collect::<Result<Vec<f64>>>()?;

        match *field_count {
            None => *field_count = Some(values.len()),
            Some(expected) if expected != values.len() => {
                return Err(malformed(
                    path,
                    line_number,
                    format!("expected {expected} metric fields, found {}", values.len()),
                ));
            }
            Some(_) => {}
        }

        bucket.observe(&values);
    }
    Ok(())
}

fn malformed(path: &Path, line: usize, reason: impl Into<String>) -> Error {
    Error::MalformedRow {
        path: path.to_path_buf(),
        line,
        reason: reason.into(),
    }
}

/// Write one aggregate line: bucket upper bound, then the per-field means,
/// tab-separated. An empty bucket emits the literal `0.0`.
fn write_bucket_line<W: Write>(out: &mut W, time: f64, bucket: &BucketAccumulator) -> Result<()> {
    write!(out, "{}", format_value(time))?;
    if bucket.is_empty() {
        out.write_all(b"\t0.0")?;
    } else {
        for mean in bucket.means() {
            write!(out, "\t{}", format_value(mean))?;
        }
    }
    out.write_all(b"\n")?;
    Ok(())
}

/// Render a float keeping a trailing `.0` on integral values, so a mean of
/// exactly 6 prints as `6.0`. The `{:?}` form of `f64` is the shortest
/// representation that round-trips, with that property.
pub(crate) fn format_value(value: f64) -> String {
    format!("{value:?}")
}
