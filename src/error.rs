//! Error types for record loading and analysis.

use thiserror::Error;

/// Which timestamp sequence an ordering violation was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Sent,
    Received,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Direction::Sent => "sent",
            Direction::Received => "received",
        })
    }
}

/// Errors that can occur while loading or analyzing benchmark records.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Timestamps in a loaded sequence went backwards.
    ///
    /// Indices are 1-based message numbers, matching how the probe counts
    /// messages in its own logs.
    #[error("message {later_index} has been {direction} earlier than message {earlier_index} ({later_value} < {earlier_value})")]
    Validation {
        direction: Direction,
        earlier_index: usize,
        later_index: usize,
        earlier_value: u64,
        later_value: u64,
    },

    /// A regression was requested with zero training points.
    #[error("cannot fit a rate to an empty timestamp sequence")]
    EmptyInput,

    /// Structurally invalid input data.
    #[error("malformed record: {0}")]
    MalformedRecord(String),
}

impl AnalysisError {
    /// Ordering violation at `later_index` (1-based), which compared below
    /// the previous message's timestamp.
    pub(crate) fn ordering(
        direction: Direction,
        later_index: usize,
        earlier_value: u64,
        later_value: u64,
    ) -> Self {
        AnalysisError::Validation {
            direction,
            earlier_index: later_index - 1,
            later_index,
            earlier_value,
            later_value,
        }
    }
}
