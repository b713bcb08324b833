//! Per-bucket accumulation
//!
//! One `BucketAccumulator` lives for exactly one bucket of one averaging
//! pass: it is created fresh, fed every contributing row across all
//! iteration files, flushed, and dropped. No state crosses buckets.

/// Running column-wise sums and row count for a single time bucket.
#[derive(Debug, Default)]
pub struct BucketAccumulator {
    sums: Vec<f64>,
    rows: usize,
}

impl BucketAccumulator {
    /// Create an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one row's metric values (the fields after the timestamp).
    ///
    /// The first observed row fixes the field count; callers validate that
    /// later rows agree before handing them in.
    pub fn observe(&mut self, values: &[f64]) {
        if self.rows == 0 {
            self.sums = vec![0.0; values.len()];
        }
        debug_assert_eq!(values.len(), self.sums.len());
        for (sum, value) in self.sums.iter_mut().zip(values) {
            *sum += value;
        }
        self.rows += 1;
    }

    /// Whether no rows fell inside this bucket.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Number of contributing rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Per-field means in field-index order.
    ///
    /// Empty when no rows contributed, so flushing an empty bucket never
    /// divides by zero.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn means(&self) -> Vec<f64> {
        if self.rows == 0 {
            return Vec::new();
        }
        let count = self.rows as f64;
        self.sums.iter().map(|sum| sum / count).collect()
    }
}
