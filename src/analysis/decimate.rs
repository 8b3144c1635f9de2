//! Bounded-size decimation of timestamp sequences into chart series.
//!
//! Raw benchmark runs carry millions of timestamps; a chart needs a few
//! hundred points. Decimation samples the interior at a fixed stride while
//! keeping the true first and terminal values, so a series always starts
//! and ends where the data does.

use super::{Point, NS_PER_MS, NS_PER_SEC};

/// Sampling stride for a sequence of `len` points under `budget`.
///
/// Two budget slots are reserved for the explicit first and terminal
/// points, which keeps the emitted series within `budget`.
fn stride(len: usize, budget: usize) -> usize {
    if budget <= 2 || len <= budget {
        return 1;
    }
    len.div_ceil(budget - 2)
}

/// Cumulative message count over elapsed time, decimated to `budget` points.
///
/// Points are `(elapsed_ms, messages_so_far)`. Sampled points carry the
/// true cumulative count at their index, and the series ends at the true
/// final `(elapsed, count)` even when the stride does not land there.
pub fn count_series(timestamps: &[u64], start: u64, budget: usize) -> Vec<Point> {
    let elapsed = |ts: u64| (ts as f64 - start as f64) / NS_PER_MS;
    let step = stride(timestamps.len(), budget);

    if step <= 1 {
        return timestamps
            .iter()
            .enumerate()
            .map(|(i, &ts)| (elapsed(ts), (i + 1) as f64))
            .collect();
    }

    let mut data = Vec::with_capacity(budget);
    data.push((elapsed(timestamps[0]), 1.0));

    let mut covered = 0;
    for (k, &ts) in timestamps.iter().skip(step - 1).step_by(step).enumerate() {
        covered = (k + 1) * step;
        data.push((elapsed(ts), covered as f64));
    }

    if timestamps.len() > covered {
        data.push((
            elapsed(timestamps[timestamps.len() - 1]),
            timestamps.len() as f64,
        ));
    }

    data
}

/// Accumulator for a run of "simultaneous" timestamps.
///
/// Timestamps at or before `previous` extend the run; the first later one
/// closes it, yielding a rate point at the midpoint of the closing gap.
/// `scale` is the number of messages each pushed timestamp stands for
/// (1 undecimated, the stride when decimated).
#[derive(Debug)]
struct RateRun {
    start: f64,
    scale: f64,
    previous: u64,
    pending: f64,
}

impl RateRun {
    fn new(start: u64, first: u64, scale: f64) -> Self {
        Self {
            start: start as f64,
            scale,
            previous: first,
            pending: 1.0,
        }
    }

    /// Push the next timestamp; returns a rate point when the run closes.
    fn push(&mut self, ts: u64) -> Option<Point> {
        if ts <= self.previous {
            self.pending += 1.0;
            return None;
        }
        let point = self.emit(ts, self.pending * self.scale);
        self.previous = ts;
        self.pending = 1.0;
        Some(point)
    }

    /// Close a trailing partial run against `last`, covering `messages`
    /// messages. Yields nothing unless `last` lies strictly beyond the run.
    fn flush(&self, last: u64, messages: f64) -> Option<Point> {
        (last > self.previous).then(|| self.emit(last, messages))
    }

    fn emit(&self, ts: u64, messages: f64) -> Point {
        let midpoint = (ts as f64 + self.previous as f64 - 2.0 * self.start) / NS_PER_MS / 2.0;
        (midpoint, NS_PER_SEC * messages / (ts as f64 - self.previous as f64))
    }
}

/// Instantaneous throughput over elapsed time, decimated to `budget` points.
///
/// Points are `(midpoint_elapsed_ms, rate_qps)`. Under decimation the sweep
/// visits every `step`-th timestamp and each stands for `step` messages; a
/// trailing partial run is flushed against the true final timestamp when
/// data extends past the last sample.
pub fn rate_series(timestamps: &[u64], start: u64, budget: usize) -> Vec<Point> {
    if timestamps.len() < 2 {
        return Vec::new();
    }

    let step = stride(timestamps.len(), budget);
    let mut data = Vec::new();

    if step <= 1 {
        let mut run = RateRun::new(start, timestamps[0], 1.0);
        for &ts in &timestamps[1..] {
            data.extend(run.push(ts));
        }
    } else {
        let mut run = RateRun::new(start, timestamps[0], step as f64);
        let mut covered = 0;
        for (k, &ts) in timestamps.iter().skip(step - 1).step_by(step).enumerate() {
            covered = (k + 1) * step;
            data.extend(run.push(ts));
        }
        if timestamps.len() > covered {
            let remainder = (timestamps.len() - covered) as f64;
            data.extend(run.flush(timestamps[timestamps.len() - 1], remainder));
        }
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(delta: u64, count: usize) -> Vec<u64> {
        (0..count as u64).map(|k| k * delta).collect()
    }

    #[test]
    fn test_count_short_sequence_is_untouched() {
        let data = count_series(&ramp(1_000_000, 10), 0, 500);
        assert_eq!(data.len(), 10);
        assert_eq!(data[0], (0.0, 1.0));
        assert_eq!(data[9], (9.0, 10.0));
    }

    #[test]
    fn test_count_respects_budget() {
        for len in [26, 100, 999, 1000, 1013, 10_000] {
            let data = count_series(&ramp(1_000_000, len), 0, 25);
            assert!(data.len() <= 25, "len {len} gave {} points", data.len());
        }
    }

    #[test]
    fn test_count_keeps_true_endpoints() {
        let timestamps = ramp(1_000_000, 1013);
        let data = count_series(&timestamps, 0, 25);

        assert_eq!(data[0], (0.0, 1.0));
        let &(last_x, last_y) = data.last().unwrap();
        assert_eq!(last_x, 1012.0);
        assert_eq!(last_y, 1013.0);
    }

    #[test]
    fn test_count_sampled_points_carry_true_counts() {
        let timestamps = ramp(1_000_000, 1000);
        let data = count_series(&timestamps, 0, 25);

        // Interior samples sit on the ramp: count = elapsed_ms + 1.
        for &(x, y) in &data {
            assert_eq!(y, x + 1.0, "point ({x}, {y}) off the ramp");
        }
    }

    #[test]
    fn test_count_empty_sequence() {
        assert!(count_series(&[], 0, 500).is_empty());
    }

    #[test]
    fn test_count_elapsed_is_relative_to_start() {
        let data = count_series(&[5_000_000, 7_000_000], 5_000_000, 500);
        assert_eq!(data, vec![(0.0, 1.0), (2.0, 2.0)]);
    }

    #[test]
    fn test_rate_uniform_ramp() {
        // One message per millisecond: every gap closes at 1000 QPS.
        let data = rate_series(&ramp(1_000_000, 100), 0, 500);
        assert_eq!(data.len(), 99);
        for &(_, qps) in &data {
            assert!((qps - 1000.0).abs() < 1e-9);
        }
        // First point sits at the midpoint of the first gap.
        assert!((data[0].0 - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_rate_simultaneous_burst() {
        // Three messages at t=0, one at t=2ms: a single point covering the
        // burst at 3 messages / 2 ms = 1500 QPS.
        let data = rate_series(&[0, 0, 0, 2_000_000], 0, 500);
        assert_eq!(data.len(), 1);
        let (x, qps) = data[0];
        assert!((x - 1.0).abs() < 1e-9);
        assert!((qps - 1500.0).abs() < 1e-9);
    }

    #[test]
    fn test_rate_respects_budget() {
        let data = rate_series(&ramp(1_000_000, 10_000), 0, 25);
        assert!(data.len() <= 25, "{} points", data.len());
    }

    #[test]
    fn test_rate_decimated_ramp_recovers_rate() {
        let data = rate_series(&ramp(1_000_000, 10_000), 0, 25);
        assert!(!data.is_empty());
        // step messages per step milliseconds: 1000 QPS, with the first
        // interval slightly high because it spans step - 1 gaps.
        for &(_, qps) in &data {
            assert!((qps - 1000.0).abs() < 5.0, "qps = {qps}");
        }
    }

    #[test]
    fn test_rate_trailing_remainder_is_flushed() {
        // 10 messages, budget forces step 3; the last message falls past
        // the final sample and is flushed as a remainder point.
        let mut timestamps = ramp(1_000_000, 9);
        timestamps.push(20_000_000);
        let data = rate_series(&timestamps, 0, 6);
        let &(last_x, last_qps) = data.last().unwrap();
        // Remainder: one message over the 12 ms tail gap.
        assert!((last_x - 14.0).abs() < 1e-9);
        assert!((last_qps - 1e9 / 12_000_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_rate_degenerate_inputs() {
        assert!(rate_series(&[], 0, 500).is_empty());
        assert!(rate_series(&[42], 0, 500).is_empty());
        // All simultaneous: no gap ever closes.
        assert!(rate_series(&[7, 7, 7], 7, 500).is_empty());
    }

    #[test]
    fn test_stride_reserves_endpoint_slots() {
        assert_eq!(stride(10, 500), 1);
        assert_eq!(stride(1000, 25), 44);
        assert_eq!(stride(10_000, 500), 21);
    }
}
