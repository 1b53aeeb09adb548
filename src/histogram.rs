use crate::error::{ChartError, Result};
use crate::ir::HistogramBucket;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Width used when the caller does not pick one.
pub const DEFAULT_BUCKET_WIDTH: f64 = 10.0;

/// A bucket width known to be finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct BucketWidth(f64);

impl BucketWidth {
    pub fn new(width: f64) -> Result<Self> {
        if width.is_finite() && width > 0.0 {
            Ok(Self(width))
        } else {
            Err(ChartError::InvalidConfiguration(format!(
                "bucket width must be a positive number, got {}",
                width
            )))
        }
    }

    pub fn get(&self) -> f64 {
        self.0
    }
}

impl Default for BucketWidth {
    fn default() -> Self {
        Self(DEFAULT_BUCKET_WIDTH)
    }
}

impl TryFrom<f64> for BucketWidth {
    type Error = ChartError;

    fn try_from(value: f64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<BucketWidth> for f64 {
    fn from(width: BucketWidth) -> f64 {
        width.0
    }
}

/// Count `values` into fixed-width buckets, rejecting a non-positive width.
pub fn bucketize(values: &[Option<f64>], bucket_width: f64) -> Result<Vec<HistogramBucket>> {
    Ok(bucketize_with(values, BucketWidth::new(bucket_width)?))
}

/// Count `values` into buckets of `width`.
///
/// Nulls and non-finite values are skipped, as are values whose bucket bounds overflow
/// to infinity (e.g. `1e308` with a width of `0.01`). A value `v` lands in the bucket
/// starting at `floor(v / width) * width`. Only populated buckets are returned, in the
/// order their first member appeared; use [`sort_buckets`] for numeric order.
pub fn bucketize_with(values: &[Option<f64>], width: BucketWidth) -> Vec<HistogramBucket> {
    let width = width.get();
    let mut buckets: IndexMap<String, HistogramBucket> = IndexMap::new();

    for v in values.iter().flatten().copied().filter(|v| v.is_finite()) {
        // + 0.0 turns -0.0 into 0.0 so both land under the "0 - w" label
        let start = (v / width).floor() * width + 0.0;
        let end = start + width;
        if !start.is_finite() || !end.is_finite() {
            continue;
        }
        let label = format!("{} - {}", start, end);

        buckets
            .entry(label.clone())
            .or_insert_with(|| HistogramBucket {
                range_label: label,
                start,
                end,
                frequency: 0,
            })
            .frequency += 1;
    }

    buckets.into_values().collect()
}

/// Order buckets by range start.
pub fn sort_buckets(buckets: &mut [HistogramBucket]) {
    buckets.sort_by(|a, b| a.start.partial_cmp(&b.start).unwrap_or(Ordering::Equal));
}
