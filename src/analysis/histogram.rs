//! Logarithmic bucketing of processing delays.
//!
//! Delays from a throughput benchmark spread across several orders of
//! magnitude, so the distribution is charted on a log10 delay axis: a count
//! curve and a max-minus-min spread curve per bucket.

use super::{Point, NS_PER_MS, NS_PER_US};

/// Delay distribution curves on a logarithmic delay axis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DelayHistogram {
    /// `(mean_delay_ms, samples_in_bucket)`; buckets holding fewer than two
    /// samples appear as `(threshold_ms, 0)` markers.
    pub counts: Vec<Point>,
    /// `(mean_delay_ms, (max - min) in µs)` for buckets with at least two
    /// samples. Spread is undefined for a single sample.
    pub spreads: Vec<Point>,
}

/// Bucket `delays` (ns) into `bucket_count` equal-width log10 bins.
///
/// Thresholds are `10^(left + i * width)` with `left = floor(log10(min))`,
/// `right = ceil(log10(max))` and `width = (right - left) / bucket_count`.
/// Each sorted delay goes to the first bucket whose threshold it does not
/// exceed, in a single forward sweep. Leading and trailing empty buckets
/// are trimmed; interior empties stay as zero markers so gaps remain
/// visible. No samples means both curves come back empty.
pub fn delay_histogram(delays: &[u64], bucket_count: usize) -> DelayHistogram {
    let mut delays: Vec<u64> = delays.iter().copied().filter(|&d| d > 0).collect();
    delays.sort_unstable();

    let (Some(&min), Some(&max)) = (delays.first(), delays.last()) else {
        return DelayHistogram::default();
    };
    if bucket_count == 0 {
        return DelayHistogram::default();
    }

    let left = (min as f64).log10().floor();
    let right = (max as f64).log10().ceil();
    let width = (right - left) / bucket_count as f64;

    let mut buckets: Vec<(f64, Vec<u64>)> = (1..=bucket_count)
        .map(|i| (10f64.powf(left + i as f64 * width), Vec::new()))
        .collect();

    let mut index = 0;
    for &delay in &delays {
        while delay as f64 > buckets[index].0 && index + 1 < buckets.len() {
            index += 1;
        }
        buckets[index].1.push(delay);
    }

    let first = buckets
        .iter()
        .position(|(_, samples)| !samples.is_empty())
        .unwrap_or(buckets.len());
    let last = buckets
        .iter()
        .rposition(|(_, samples)| !samples.is_empty())
        .map_or(0, |i| i + 1);

    let mut histogram = DelayHistogram::default();
    for (threshold, samples) in &buckets[first..last] {
        let count = samples.len();
        if count > 1 {
            let mean_ms = samples.iter().sum::<u64>() as f64 / count as f64 / NS_PER_MS;
            histogram.counts.push((mean_ms, count as f64));
            // Samples arrive sorted, so spread is last minus first.
            let spread_ns = samples[count - 1] - samples[0];
            histogram
                .spreads
                .push((mean_ms, spread_ns as f64 / NS_PER_US));
        } else {
            histogram.counts.push((threshold / NS_PER_MS, 0.0));
        }
    }

    histogram
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_yields_empty_curves() {
        let histogram = delay_histogram(&[], 500);
        assert!(histogram.counts.is_empty());
        assert!(histogram.spreads.is_empty());
    }

    #[test]
    fn test_counts_match_assigned_samples() {
        // Two tight clusters three decades apart.
        let delays = [1_000, 1_100, 1_200, 900_000, 950_000, 1_000_000];
        let histogram = delay_histogram(&delays, 10);

        let total: f64 = histogram.counts.iter().map(|&(_, count)| count).sum();
        assert_eq!(total, 6.0);
        // Two populated buckets, each with three samples.
        let populated: Vec<f64> = histogram
            .counts
            .iter()
            .map(|&(_, count)| count)
            .filter(|&count| count > 0.0)
            .collect();
        assert_eq!(populated, vec![3.0, 3.0]);
    }

    #[test]
    fn test_no_leading_or_trailing_empty_buckets() {
        let delays = [5_000, 5_100, 7_000_000, 7_050_000];
        let histogram = delay_histogram(&delays, 100);

        let (_, first_count) = histogram.counts[0];
        let &(_, last_count) = histogram.counts.last().unwrap();
        assert!(first_count > 0.0);
        assert!(last_count > 0.0);
    }

    #[test]
    fn test_interior_gaps_stay_as_zero_markers() {
        let delays = [1_000, 1_001, 9_000_000, 9_100_000];
        let histogram = delay_histogram(&delays, 20);

        assert!(histogram.counts.len() > 2, "gap markers were dropped");
        let zeros = histogram
            .counts
            .iter()
            .filter(|&&(_, count)| count == 0.0)
            .count();
        assert_eq!(zeros, histogram.counts.len() - 2);
    }

    #[test]
    fn test_multi_sample_bucket_reports_mean_and_spread() {
        // One bucket: all delays within a decade of each other.
        let delays = [1_000_000, 2_000_000, 3_000_000];
        let histogram = delay_histogram(&delays, 1);

        assert_eq!(histogram.counts.len(), 1);
        let (mean_ms, count) = histogram.counts[0];
        assert_eq!(count, 3.0);
        assert!((mean_ms - 2.0).abs() < 1e-9);

        assert_eq!(histogram.spreads.len(), 1);
        let (_, spread_us) = histogram.spreads[0];
        assert!((spread_us - 2_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_sample_bucket_has_no_spread() {
        let histogram = delay_histogram(&[123_456], 10);
        assert_eq!(histogram.counts.len(), 1);
        let (_, count) = histogram.counts[0];
        assert_eq!(count, 0.0);
        assert!(histogram.spreads.is_empty());
    }

    #[test]
    fn test_zero_delays_are_dropped() {
        // A zero delay cannot sit on a log axis.
        let histogram = delay_histogram(&[0, 0, 2_000_000, 3_000_000], 1);
        let (_, count) = histogram.counts[0];
        assert_eq!(count, 2.0);
    }
}
