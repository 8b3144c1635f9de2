//! Queue-depth reconstruction from paired enter/leave events.
//!
//! Each pair contributes a `+1` delta at its enter timestamp and, when a
//! leave timestamp was recorded, a `-1` delta at the leave. Integrating the
//! sorted delta stream gives occupancy over time.

use crate::record::PairRecord;

use super::{Point, NS_PER_MS};

/// Averaging window for decimated queue output.
///
/// Accumulates `(timestamp, depth)` observations and yields one averaged
/// point per `capacity` pushes; [`DepthWindow::flush`] drains a partial
/// window using the true observation count as divisor. Averaging (rather
/// than sampling instantaneous depth) smooths bursts in the chart.
#[derive(Debug)]
struct DepthWindow {
    capacity: usize,
    start: f64,
    timestamps: f64,
    depths: f64,
    pending: usize,
}

impl DepthWindow {
    fn new(capacity: usize, start: u64) -> Self {
        Self {
            capacity,
            start: start as f64,
            timestamps: 0.0,
            depths: 0.0,
            pending: 0,
        }
    }

    fn push(&mut self, ts: u64, depth: i64) -> Option<Point> {
        self.timestamps += ts as f64;
        self.depths += depth as f64;
        self.pending += 1;
        if self.pending == self.capacity {
            return self.drain();
        }
        None
    }

    fn flush(&mut self) -> Option<Point> {
        if self.pending == 0 {
            return None;
        }
        self.drain()
    }

    fn drain(&mut self) -> Option<Point> {
        let n = self.pending as f64;
        let point = (
            (self.timestamps / n - self.start) / NS_PER_MS,
            self.depths / n,
        );
        self.timestamps = 0.0;
        self.depths = 0.0;
        self.pending = 0;
        Some(point)
    }
}

/// Queue depth over elapsed time, decimated to `budget` points.
///
/// Undecimated output carries one `(elapsed_ms, depth)` point per delta
/// event; under decimation each point averages a window of consecutive
/// events. The delta sort is stable on ties, so simultaneous events keep
/// their input order and the depth trace stays deterministic.
pub fn queue_series(pairs: &[PairRecord], start: u64, budget: usize) -> Vec<Point> {
    let mut events: Vec<(u64, i64)> = Vec::with_capacity(pairs.len() * 2);
    for pair in pairs {
        events.push((pair.enter_ns, 1));
        if let Some(leave) = pair.leave_ns {
            events.push((leave, -1));
        }
    }
    events.sort_by_key(|&(ts, _)| ts);

    let step = if budget == 0 || events.len() <= budget {
        1
    } else {
        events.len().div_ceil(budget)
    };

    let mut data = Vec::new();
    let mut depth = 0i64;

    if step <= 1 {
        for &(ts, delta) in &events {
            depth += delta;
            data.push(((ts as f64 - start as f64) / NS_PER_MS, depth as f64));
        }
    } else {
        let mut window = DepthWindow::new(step, start);
        for &(ts, delta) in &events {
            depth += delta;
            data.extend(window.push(ts, depth));
        }
        data.extend(window.flush());
    }

    data
}
