//! Chart assembly: series collections and the rendered HTML document.

mod html;
mod series;

pub use series::{Marker, Palette, Series, SeriesKind};

use crate::analysis::Point;

/// The cross-file "receiving vs sending" aggregate built under `--rates`.
///
/// Reference points sit on the diagonal (sending against itself); the
/// receiving points show where the receiver falls off it.
#[derive(Debug, Clone, Default)]
pub struct RateChart {
    pub reference: Vec<Point>,
    pub receiving: Vec<Point>,
}

impl RateChart {
    /// Sort both point sets by sending rate, making the aggregate
    /// independent of input order, and wrap them as series.
    pub fn into_series(mut self, title: &str) -> (Series, Series) {
        self.reference.sort_by(|a, b| a.0.total_cmp(&b.0));
        self.receiving.sort_by(|a, b| a.0.total_cmp(&b.0));
        (
            Series::unstyled("Reference", self.reference),
            Series::unstyled(title, self.receiving),
        )
    }
}

/// All series collections for one report, ready for rendering.
#[derive(Debug, Default)]
pub struct ChartDocument {
    pub title: String,
    pub counts: Vec<Series>,
    pub rates: Vec<Series>,
    pub processing: Vec<Series>,
    pub processing_spreads: Vec<Series>,
    pub queue: Vec<Series>,
    pub rate_chart: Option<RateChart>,
}

impl ChartDocument {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Render the document into a self-contained HTML page.
    pub fn render_html(&self) -> anyhow::Result<String> {
        html::render(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_chart_sorts_by_sending_rate() {
        let chart = RateChart {
            reference: vec![(3.0, 3.0), (1.0, 1.0), (2.0, 2.0)],
            receiving: vec![(3.0, 2.5), (1.0, 0.9)],
        };
        let (reference, receiving) = chart.into_series("Run");
        assert_eq!(reference.data, vec![(1.0, 1.0), (2.0, 2.0), (3.0, 3.0)]);
        assert_eq!(receiving.data, vec![(1.0, 0.9), (3.0, 2.5)]);
        assert_eq!(receiving.name, "Run");
    }

    #[test]
    fn test_render_embeds_series_json() {
        let mut document = ChartDocument::new("Smoke");
        document.counts.push(Series::data_series(
            "Sent",
            vec![(0.0, 1.0)],
            "#7cb5ec",
            false,
        ));

        let html = document.render_html().unwrap();
        assert!(html.contains("<title>MIG - Smoke</title>"));
        assert!(html.contains(r#""name":"Sent""#));
        assert!(html.contains(r#""type":"line""#));
        // No rates scatter unless requested.
        assert!(!html.contains("id=\"rate\""));
    }

    #[test]
    fn test_render_includes_rate_chart_when_built() {
        let mut document = ChartDocument::new("Smoke");
        document.rate_chart = Some(RateChart {
            reference: vec![(1.0, 1.0)],
            receiving: vec![(1.0, 0.8)],
        });

        let html = document.render_html().unwrap();
        assert!(html.contains("id=\"rate\""));
        assert!(html.contains("Receiving vs Sending"));
        assert!(html.contains(r#""name":"Reference""#));
    }
}
