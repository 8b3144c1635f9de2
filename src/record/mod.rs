//! Benchmark record loading and normalization.
//!
//! A record comes from either a JSON document ([`json`]) or the probe's
//! legacy line-oriented log ([`linelog`]); both loaders funnel into
//! [`Record::new`], which applies the same normalization and ordering
//! validation regardless of source.

mod inputs;
mod json;
mod linelog;

pub use inputs::{enumerate_inputs, speed_label, InputFile};

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde_json::Value;

use crate::analysis::fit::{FitSeed, FitWindow};
use crate::error::{AnalysisError, Direction};

/// One processed message: enter/leave timestamps around processing, and the
/// recorded end-to-end delay when the probe logged a third field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairRecord {
    pub enter_ns: u64,
    pub leave_ns: Option<u64>,
    pub delay_ns: Option<u64>,
}

/// A regression hint from the input's `fits` section.
///
/// An empty hint requests a fit over the full sequence with the default
/// seed.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FitHint {
    pub window: Option<FitWindow>,
    pub seed: Option<FitSeed>,
}

impl FitHint {
    /// Whether this hint constrains neither window nor seed.
    pub fn is_default(&self) -> bool {
        self.window.is_none() && self.seed.is_none()
    }
}

/// Fit hints keyed by the sequence they apply to.
#[derive(Debug, Clone, Default)]
pub struct FitHints {
    pub sends: Vec<FitHint>,
    pub receives: Vec<FitHint>,
}

impl FitHints {
    /// Drop every hint (the `--no-fit` switch).
    pub fn clear(&mut self) {
        self.sends.clear();
        self.receives.clear();
    }
}

/// A fully loaded and validated benchmark record.
#[derive(Debug, Clone, Default)]
pub struct Record {
    pub sends: Vec<u64>,
    pub receives: Vec<u64>,
    pub pairs: Vec<PairRecord>,
    pub fits: FitHints,
}

impl Record {
    /// Normalize and validate raw loader output.
    ///
    /// Zero receive timestamps are the probe's lost-message sentinel and
    /// are dropped; both remaining sequences must be non-decreasing.
    pub fn new(
        sends: Vec<u64>,
        receives: Vec<u64>,
        pairs: Vec<PairRecord>,
        fits: FitHints,
    ) -> Result<Self, AnalysisError> {
        let receives: Vec<u64> = receives.into_iter().filter(|&ts| ts > 0).collect();
        validate_monotonic(&sends, Direction::Sent)?;
        validate_monotonic(&receives, Direction::Received)?;
        Ok(Self {
            sends,
            receives,
            pairs,
            fits,
        })
    }

    /// Load a record from a file, choosing the loader by content: JSON
    /// documents open with `{`, anything else is the legacy line log.
    pub fn load(path: &Path) -> anyhow::Result<Record> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        let record = if content.trim_start().starts_with('{') {
            json::parse(&content)?
        } else {
            linelog::parse(&content)?
        };
        Ok(record)
    }

    /// Restrict sends, receives and pairs to the inclusive index range
    /// `[from, to]`. Out-of-range bounds clamp to the data.
    pub fn slice(&mut self, from: Option<usize>, to: Option<usize>) {
        fn cut<T>(items: &mut Vec<T>, from: Option<usize>, to: Option<usize>) {
            if let Some(to) = to {
                items.truncate(to.saturating_add(1));
            }
            if let Some(from) = from {
                if from >= items.len() {
                    items.clear();
                } else {
                    items.drain(..from);
                }
            }
        }
        cut(&mut self.sends, from, to);
        cut(&mut self.receives, from, to);
        cut(&mut self.pairs, from, to);
    }

    /// Messages sent but never received.
    pub fn lost_messages(&self) -> usize {
        self.sends.len().saturating_sub(self.receives.len())
    }

    /// Reference timestamp for elapsed-time axes: the first send, falling
    /// back to the first receive, then the first pair enter.
    pub fn start(&self) -> Option<u64> {
        self.sends
            .first()
            .copied()
            .or_else(|| self.receives.first().copied())
            .or_else(|| self.pairs.first().map(|pair| pair.enter_ns))
    }

    /// Delays recorded by pairs that carried a third field.
    pub fn delays(&self) -> Vec<u64> {
        self.pairs.iter().filter_map(|pair| pair.delay_ns).collect()
    }
}

fn validate_monotonic(timestamps: &[u64], direction: Direction) -> Result<(), AnalysisError> {
    for (i, window) in timestamps.windows(2).enumerate() {
        if window[1] < window[0] {
            return Err(AnalysisError::ordering(
                direction,
                i + 2,
                window[0],
                window[1],
            ));
        }
    }
    Ok(())
}

/// Build a [`PairRecord`] from a row of one to three numeric fields.
pub(crate) fn pair_from_row(row: &[u64]) -> Result<PairRecord, AnalysisError> {
    match row {
        &[enter] => Ok(PairRecord {
            enter_ns: enter,
            leave_ns: None,
            delay_ns: None,
        }),
        &[enter, leave] => Ok(PairRecord {
            enter_ns: enter,
            leave_ns: Some(leave),
            delay_ns: None,
        }),
        &[enter, leave, delay] => Ok(PairRecord {
            enter_ns: enter,
            leave_ns: Some(leave),
            delay_ns: Some(delay),
        }),
        _ => Err(AnalysisError::MalformedRecord(format!(
            "pair row has {} fields, expected 1 to 3",
            row.len()
        ))),
    }
}

/// Parse one fit hint: `[]`, `[[left, right]]` or
/// `[[left, right], [intercept, slope]]`.
pub(crate) fn parse_fit_hint(value: &Value) -> Result<FitHint, AnalysisError> {
    let parts = value
        .as_array()
        .ok_or_else(|| AnalysisError::MalformedRecord("fit hint is not an array".into()))?;
    if parts.len() > 2 {
        return Err(AnalysisError::MalformedRecord(format!(
            "fit hint has {} elements, expected at most 2 (window, seed)",
            parts.len()
        )));
    }

    let window = parts
        .first()
        .map(|part| {
            let (left, right) = number_pair(part, "fit window")?;
            Ok(FitWindow {
                left_ns: left as i64,
                right_ns: right as i64,
            })
        })
        .transpose()?;
    let seed = parts
        .get(1)
        .map(|part| {
            let (intercept, slope) = number_pair(part, "fit seed")?;
            Ok(FitSeed { intercept, slope })
        })
        .transpose()?;

    Ok(FitHint { window, seed })
}

fn number_pair(value: &Value, what: &str) -> Result<(f64, f64), AnalysisError> {
    let malformed = || AnalysisError::MalformedRecord(format!("{what} must be a pair of numbers"));
    let parts = value.as_array().ok_or_else(malformed)?;
    match parts.as_slice() {
        [a, b] => {
            let a = a.as_f64().ok_or_else(malformed)?;
            let b = b.as_f64().ok_or_else(malformed)?;
            Ok((a, b))
        }
        _ => Err(malformed()),
    }
}
