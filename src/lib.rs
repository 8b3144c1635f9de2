//! # mig-grinder
//!
//! Batch analyzer for MIG message-throughput benchmark logs.
//!
//! MIG's probe records, for every message, a send timestamp, a receive
//! timestamp, and an enter/leave/delay triple around processing. This crate
//! turns those logs into throughput estimates and bounded-size chart
//! series, rendered as a self-contained Highcharts HTML page.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  record/   - JSON + legacy line-log loaders, input scanning  │
//! │  analysis/ - regression, decimation, histograms, queue depth │
//! │  chart/    - series assembly and the Highcharts HTML shell   │
//! │  report    - per-file driver gluing the layers together      │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything runs single-threaded and batch: one file is loaded,
//! validated, transformed and folded into the report before the next
//! begins. All transforms are pure functions over immutable inputs, so
//! identical inputs always produce identical output.
//!
//! ## Usage
//!
//! ```
//! use mig_grinder::{AnalysisConfig, Record, ReportBuilder};
//!
//! let record = Record::default(); // normally Record::load(path)
//! let mut builder = ReportBuilder::new("my run", AnalysisConfig::default(), false);
//! builder.add_record(&record, "12k").unwrap();
//! let html = builder.finish().render_html().unwrap();
//! assert!(html.contains("my run"));
//! ```

pub mod analysis;
pub mod chart;
pub mod error;
pub mod record;
pub mod report;

// Re-export the main types for convenience
pub use chart::{ChartDocument, Palette, Series};
pub use error::AnalysisError;
pub use record::{PairRecord, Record};
pub use report::{summarize, AnalysisConfig, RecordSummary, ReportBuilder};
