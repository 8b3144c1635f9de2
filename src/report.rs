//! Per-file analysis driver and report accumulation.
//!
//! [`ReportBuilder`] consumes one validated [`Record`] per input file and
//! accumulates the derived series into a [`ChartDocument`]; the binary
//! drives it once per run and renders the result.

use anyhow::Result;
use serde::Serialize;
use tracing::{info, warn};

use crate::analysis::{
    decimate,
    fit::{self, RateFit},
    histogram, queue, Point, SeriesBudget, NS_PER_MS,
};
use crate::chart::{ChartDocument, Palette, RateChart, Series};
use crate::error::AnalysisError;
use crate::record::{FitHint, Record};

/// Report-wide analysis knobs.
///
/// Components take these explicitly so tests can vary resolution without
/// touching shared state.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub budget: SeriesBudget,
    pub histogram_buckets: usize,
    pub palette: Palette,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            budget: SeriesBudget::default(),
            histogram_buckets: 500,
            palette: Palette::default(),
        }
    }
}

/// Accumulates per-file series into one chart document.
#[derive(Debug)]
pub struct ReportBuilder {
    config: AnalysisConfig,
    build_rates: bool,
    document: ChartDocument,
    rate_chart: RateChart,
    file_index: usize,
}

impl ReportBuilder {
    pub fn new(title: &str, config: AnalysisConfig, build_rates: bool) -> Self {
        Self {
            config,
            build_rates,
            document: ChartDocument::new(title),
            rate_chart: RateChart::default(),
            file_index: 0,
        }
    }

    /// Analyze one record and fold its series into the report.
    ///
    /// `label` distinguishes the file in series names and logs; empty means
    /// unlabeled.
    pub fn add_record(&mut self, record: &Record, label: &str) -> Result<()> {
        let index = self.file_index;
        self.file_index += 1;

        let Some(start) = record.start() else {
            warn!("skipping input with no recorded events");
            return Ok(());
        };

        let disp_name = if label.is_empty() { "input" } else { label };
        info!(
            "{disp_name}: {} sent, {} received, {} lost",
            record.sends.len(),
            record.receives.len(),
            record.lost_messages()
        );

        let suffix = if label.is_empty() {
            String::new()
        } else {
            format!(" ({label})")
        };

        let send_color = self.config.palette.send_color(index).to_string();
        let receive_color = self.config.palette.receive_color(index).to_string();

        let mut sending_rate = self.add_sequence(
            &record.sends,
            &record.fits.sends,
            start,
            "Sent",
            "Sending",
            &suffix,
            &send_color,
        )?;
        let mut receiving_rate = self.add_sequence(
            &record.receives,
            &record.fits.receives,
            start,
            "Received",
            "Receiving",
            &suffix,
            &receive_color,
        )?;

        if self.build_rates {
            if sending_rate.is_none() && !record.sends.is_empty() {
                let rate = fit::fit(&record.sends, start, None, None)?.qps();
                info!("{disp_name}: {rate:.3} QpS sending");
                sending_rate = Some(rate);
            }
            if receiving_rate.is_none() && !record.receives.is_empty() {
                receiving_rate = Some(fit::fit(&record.receives, start, None, None)?.qps());
            }

            match (sending_rate, receiving_rate) {
                (Some(send_qps), receiving) => {
                    self.rate_chart.reference.push((send_qps, send_qps));
                    if let Some(recv_qps) = receiving {
                        info!("{disp_name}: {recv_qps:.3} QpS receiving");
                        self.rate_chart.receiving.push((send_qps, recv_qps));
                    }
                }
                (None, _) => warn!("{disp_name}: no sends, skipped in the rates chart"),
            }
        }

        let file_color = self.config.palette.color(index).to_string();

        let delays = record.delays();
        let histogram = histogram::delay_histogram(&delays, self.config.histogram_buckets);
        let mut delay_counts = Series::plain(format!("Delay{suffix}"), histogram.counts, &file_color);
        let mut delay_spreads =
            Series::plain(format!("Delay{suffix}"), histogram.spreads, &file_color);
        if index > 0 {
            // Later files start hidden so the first file's distribution
            // stays readable.
            delay_counts = delay_counts.hidden();
            delay_spreads = delay_spreads.hidden();
        }
        self.document.processing.push(delay_counts);
        self.document.processing_spreads.push(delay_spreads);

        self.document.queue.push(Series::plain(
            format!("Queue{suffix}"),
            queue::queue_series(&record.pairs, start, self.config.budget.raw_points),
            &file_color,
        ));

        Ok(())
    }

    /// Count and rate series for one timestamp sequence, plus one overlay
    /// pair per fit hint. Returns the slope of the first default-hint fit,
    /// which the rates chart reuses as the sequence's nominal rate.
    #[allow(clippy::too_many_arguments)]
    fn add_sequence(
        &mut self,
        timestamps: &[u64],
        hints: &[FitHint],
        start: u64,
        data_name: &str,
        rate_name: &str,
        suffix: &str,
        color: &str,
    ) -> Result<Option<f64>> {
        let fitted = !hints.is_empty();
        let budget = self.config.budget.for_context(fitted);

        self.document.counts.push(Series::data_series(
            format!("{data_name}{suffix}"),
            decimate::count_series(timestamps, start, budget),
            color,
            fitted,
        ));
        self.document.rates.push(Series::data_series(
            format!("{rate_name}{suffix}"),
            decimate::rate_series(timestamps, start, budget),
            color,
            fitted,
        ));

        let mut nominal_rate = None;
        for hint in hints {
            let rate_fit = fit::fit(timestamps, start, hint.window, hint.seed)?;
            info!(
                "{rate_name} Fit{suffix}: {:.3} QpS, delay: {:.3} ms",
                rate_fit.qps(),
                rate_fit.startup_delay_ms()
            );

            let (count_points, rate_points) =
                overlay_points(&rate_fit, self.config.budget.fit_points);
            self.document.counts.push(Series::overlay(
                format!("{data_name} Fit{suffix}"),
                count_points,
                color,
            ));
            self.document.rates.push(Series::overlay(
                format!("{rate_name} Fit{suffix}"),
                rate_points,
                color,
            ));

            if hint.is_default() && nominal_rate.is_none() {
                nominal_rate = Some(rate_fit.qps());
            }
        }

        Ok(nominal_rate)
    }

    /// Final document; the rates chart is attached only when requested.
    pub fn finish(self) -> ChartDocument {
        let mut document = self.document;
        if self.build_rates {
            document.rate_chart = Some(self.rate_chart);
        }
        document
    }
}

/// Sample a fitted line across its training window: `(x_ms, count)` points
/// for the counts chart and the constant slope for the rates chart.
fn overlay_points(rate_fit: &RateFit, points: usize) -> (Vec<Point>, Vec<Point>) {
    let left_ms = rate_fit.window.left_ns as f64 / NS_PER_MS;
    let right_ms = rate_fit.window.right_ns as f64 / NS_PER_MS;
    let step = (right_ms - left_ms) / points as f64;

    let mut counts = Vec::with_capacity(points);
    let mut rates = Vec::with_capacity(points);
    for k in 0..points {
        let x = left_ms + step * k as f64;
        counts.push((x, rate_fit.count_at_ms(x)));
        rates.push((x, rate_fit.slope));
    }
    (counts, rates)
}

/// Machine-readable per-input summary: estimated send/receive throughput
/// and the lost-message count.
#[derive(Debug, Clone, Serialize)]
pub struct RecordSummary {
    pub send: f64,
    pub recv: f64,
    pub lost: usize,
}

/// Summarize one record with default full-span fits.
pub fn summarize(record: &Record) -> Result<RecordSummary, AnalysisError> {
    let start = record
        .sends
        .first()
        .copied()
        .ok_or(AnalysisError::EmptyInput)?;
    let send = fit::fit(&record.sends, start, None, None)?.qps();
    let recv = if record.receives.is_empty() {
        0.0
    } else {
        fit::fit(&record.receives, start, None, None)?.qps()
    };
    Ok(RecordSummary {
        send,
        recv,
        lost: record.lost_messages(),
    })
}
