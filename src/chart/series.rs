//! Renderable chart series and the color palette.

use serde::Serialize;

use crate::analysis::Point;

/// How a series is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    Line,
    Scatter,
}

/// Marker settings; fit overlays disable markers so the line reads as a
/// guide rather than data.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Marker {
    pub enabled: bool,
}

/// One renderable chart series.
///
/// Serializes to `{"type", "data", "name", "color"}` with `data` as
/// `[[x, y], ...]`; `type`, `color`, `marker` and `visible` are omitted
/// when unset (histogram and queue series carry no `type`).
#[derive(Debug, Clone, Serialize)]
pub struct Series {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<SeriesKind>,
    pub data: Vec<Point>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
}

impl Series {
    /// A typed data series: a line normally, scatter when drawn under a
    /// fit overlay.
    pub fn data_series(
        name: impl Into<String>,
        data: Vec<Point>,
        color: &str,
        fitted: bool,
    ) -> Self {
        Self {
            kind: Some(if fitted {
                SeriesKind::Scatter
            } else {
                SeriesKind::Line
            }),
            data,
            name: name.into(),
            color: Some(color.to_string()),
            marker: None,
            visible: None,
        }
    }

    /// An untyped series (histogram and queue charts).
    pub fn plain(name: impl Into<String>, data: Vec<Point>, color: &str) -> Self {
        Self {
            kind: None,
            data,
            name: name.into(),
            color: Some(color.to_string()),
            marker: None,
            visible: None,
        }
    }

    /// A fit overlay with markers disabled.
    pub fn overlay(name: impl Into<String>, data: Vec<Point>, color: &str) -> Self {
        Self {
            kind: None,
            data,
            name: name.into(),
            color: Some(color.to_string()),
            marker: Some(Marker { enabled: false }),
            visible: None,
        }
    }

    /// An uncolored series (the cross-file rate aggregates).
    pub fn unstyled(name: impl Into<String>, data: Vec<Point>) -> Self {
        Self {
            kind: None,
            data,
            name: name.into(),
            color: None,
            marker: None,
            visible: None,
        }
    }

    /// Hide this series in the initial chart render.
    pub fn hidden(mut self) -> Self {
        self.visible = Some(false);
        self
    }
}

/// Cyclic chart color palette.
///
/// Send/receive series for file `i` take the `2i` / `2i + 1` entries so
/// the pair stays visually related; single-series charts cycle by file
/// index.
#[derive(Debug, Clone)]
pub struct Palette {
    colors: Vec<String>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: [
                "#7cb5ec", "#434348", "#90ed7d", "#f7a35c", "#8085e9", "#f15c80", "#e4d354",
                "#8085e8", "#8d4653", "#91e8e1",
            ]
            .iter()
            .map(|color| color.to_string())
            .collect(),
        }
    }
}

impl Palette {
    /// A palette with custom colors; empty input falls back to the default.
    pub fn new(colors: Vec<String>) -> Self {
        if colors.is_empty() {
            Self::default()
        } else {
            Self { colors }
        }
    }

    pub fn color(&self, index: usize) -> &str {
        &self.colors[index % self.colors.len()]
    }

    pub fn send_color(&self, file_index: usize) -> &str {
        self.color(2 * file_index)
    }

    pub fn receive_color(&self, file_index: usize) -> &str {
        self.color(2 * file_index + 1)
    }
}
