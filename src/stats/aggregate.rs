//! Order statistics and equal-width bucketing over arbitrary samples

use serde::Serialize;

/// Nearest-rank percentile of `values`
///
/// `p` is clamped into `[0, 100]` (NaN counts as 0). The caller's slice is
/// left untouched; an empty slice yields 0. No interpolation happens between
/// ranks: the result is always one of the samples.
#[must_use]
pub fn percentile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 100.0) };
    let last = sorted.len() - 1;
    let index = ((p / 100.0) * last as f64).floor() as usize;
    sorted[index.min(last)]
}

/// Equal-width histogram
///
/// `boundaries` has one more entry than `counts`; bucket `i` spans
/// `boundaries[i]..boundaries[i + 1]` with the last bucket closed at the top.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Histogram {
    pub boundaries: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Number of samples counted across all buckets
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Width of each bucket (0 for a degenerate single-value range)
    #[must_use]
    pub fn bucket_width(&self) -> f64 {
        match self.boundaries.as_slice() {
            [first, second, ..] => second - first,
            _ => 0.0,
        }
    }
}

/// Bucket `values` into `bucket_count` equal-width buckets between min and max
///
/// Empty input or zero buckets give an empty histogram. When every sample has
/// the same value the range has no width: all boundaries equal that value and
/// every sample is counted in bucket 0.
#[must_use]
pub fn histogram(values: &[f64], bucket_count: usize) -> Histogram {
    if values.is_empty() || bucket_count == 0 {
        return Histogram::default();
    }

    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });

    let mut counts = vec![0; bucket_count];

    if min == max {
        counts[0] = values.len();
        return Histogram {
            boundaries: vec![min; bucket_count + 1],
            counts,
        };
    }

    // Work at half scale when the span overflows (samples near ±f64::MAX)
    let scale = if (max - min).is_finite() { 1.0 } else { 0.5 };
    let low = min * scale;
    let width = (max * scale - low) / bucket_count as f64;

    let boundaries = (0..=bucket_count)
        .map(|i| match i {
            0 => min,
            i if i == bucket_count => max,
            i => (low + i as f64 * width) / scale,
        })
        .collect();

    // Float-to-usize casts saturate, so NaN and negatives land in bucket 0
    for &v in values {
        let index = ((v * scale - low) / width).floor() as usize;
        counts[index.min(bucket_count - 1)] += 1;
    }

    Histogram { boundaries, counts }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentile_nearest_rank() {
        let values = [10.0, 20.0, 30.0, 40.0, 50.0];
        assert_eq!(percentile(&values, 95.0), 40.0);
        assert_eq!(percentile(&values, 100.0), 50.0);
        assert_eq!(percentile(&values, 0.0), 10.0);
        assert_eq!(percentile(&values, 50.0), 30.0);
    }

    #[test]
    fn test_percentile_empty_is_zero() {
        assert_eq!(percentile(&[], 0.0), 0.0);
        assert_eq!(percentile(&[], 99.0), 0.0);
    }

    #[test]
    fn test_percentile_does_not_mutate_input() {
        let values = vec![3.0, 1.0, 2.0];
        let _ = percentile(&values, 50.0);
        assert_eq!(values, vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn test_percentile_clamps_out_of_range() {
        let values = [1.0, 2.0, 3.0];
        assert_eq!(percentile(&values, 250.0), 3.0);
        assert_eq!(percentile(&values, -5.0), 1.0);
        assert_eq!(percentile(&values, f64::NAN), 1.0);
    }

    #[test]
    fn test_histogram_basic() {
        let values = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
        let hist = histogram(&values, 5);
        assert_eq!(hist.boundaries, vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_eq!(hist.counts, vec![2, 2, 2, 2, 3]);
        assert_eq!(hist.total(), values.len());
        assert_eq!(hist.bucket_width(), 2.0);
    }

    #[test]
    fn test_histogram_max_in_last_bucket() {
        let hist = histogram(&[1.0, 100.0], 4);
        assert_eq!(hist.counts, vec![1, 0, 0, 1]);
    }

    #[test]
    fn test_histogram_degenerate_range() {
        let hist = histogram(&[7.0, 7.0, 7.0], 3);
        assert_eq!(hist.counts, vec![3, 0, 0]);
        assert_eq!(hist.boundaries, vec![7.0; 4]);
        assert_eq!(hist.bucket_width(), 0.0);
    }

    #[test]
    fn test_histogram_empty_inputs() {
        assert!(histogram(&[], 5).is_empty());
        assert!(histogram(&[1.0, 2.0], 0).is_empty());
        assert!(histogram(&[], 5).boundaries.is_empty());
    }

    #[test]
    fn test_histogram_span_beyond_f64_range() {
        let hist = histogram(&[-1e308, 0.0, 1e308], 4);
        assert_eq!(hist.counts, vec![1, 0, 1, 1]);
        assert_eq!(hist.boundaries.first(), Some(&-1e308));
        assert_eq!(hist.boundaries.last(), Some(&1e308));
        assert!(hist.boundaries.iter().all(|b| b.is_finite()));

        let hist = histogram(&[f64::MAX, -f64::MAX], 2);
        assert_eq!(hist.counts, vec![1, 1]);
        assert_eq!(hist.boundaries, vec![-f64::MAX, 0.0, f64::MAX]);
    }

    #[test]
    fn test_histogram_single_bucket() {
        let hist = histogram(&[1.0, 5.0, 9.0], 1);
        assert_eq!(hist.counts, vec![3]);
        assert_eq!(hist.boundaries, vec![1.0, 9.0]);
    }
}
