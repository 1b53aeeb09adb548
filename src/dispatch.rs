//! Chart Dataset Dispatch
//!
//! Turns one immutable [`ChartDataset`] into the data view a given chart type draws.
//! Each type declares how many plottable series it needs:
//!
//! ```text
//! bar, line       >= 1   every numeric series, palette color by series index
//! pie, donut      >= 1   first series as slices, palette color by label index
//! histogram       >= 1   first series bucketed into frequency ranges
//! bubble          >= 3   first three series as x, y and bubble size
//! ```
//!
//! Too few series yields [`Dispatch::Unsupported`]: the user can still switch to
//! another type with the same dataset. Views borrow the dataset, so re-dispatching
//! is cheap and never copies series values.

use crate::error::Result;
use crate::histogram::bucketize_with;
use crate::ir::{ChartDataset, ChartType, HistogramBucket};
use crate::ChartConfig;
use serde::Serialize;
use tracing::debug;

// =============================================================================
// Views
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum Dispatch<'a> {
    Renderable {
        view: ChartView<'a>,
    },
    Unsupported {
        chart_type: ChartType,
        required: usize,
        available: usize,
    },
}

impl<'a> Dispatch<'a> {
    pub fn is_renderable(&self) -> bool {
        matches!(self, Dispatch::Renderable { .. })
    }

    pub fn view(&self) -> Option<&ChartView<'a>> {
        match self {
            Dispatch::Renderable { view } => Some(view),
            Dispatch::Unsupported { .. } => None,
        }
    }

    /// Text to show the user in place of an unrenderable chart.
    pub fn unsupported_message(&self) -> Option<String> {
        match self {
            Dispatch::Renderable { .. } => None,
            Dispatch::Unsupported { chart_type, required, available } => Some(format!(
                "Chart type not supported. A {} chart needs at least {} numeric series, this data has {}.",
                chart_type, required, available
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ChartView<'a> {
    Cartesian(CartesianView<'a>),
    Proportion(ProportionView<'a>),
    Histogram(HistogramView<'a>),
    Bubble(BubbleView<'a>),
}

/// Bar or line chart: labels along x, one bar group / line per series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartesianView<'a> {
    pub chart_type: ChartType,
    pub categories: &'a [String],
    pub series: Vec<PlottedSeries<'a>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlottedSeries<'a> {
    pub name: &'a str,
    pub color: String,
    pub values: &'a [Option<f64>],
}

/// Pie or donut chart; the two differ only in `inner_radius`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProportionView<'a> {
    pub chart_type: ChartType,
    pub series: &'a str,
    pub outer_radius: f64,
    pub inner_radius: f64,
    pub slices: Vec<Slice<'a>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Slice<'a> {
    pub label: &'a str,
    pub value: Option<f64>,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramView<'a> {
    pub series: &'a str,
    pub x_label: String,
    pub y_label: String,
    pub color: String,
    pub buckets: Vec<HistogramBucket>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BubbleView<'a> {
    pub labels: &'a [String],
    pub x: AxisSeries<'a>,
    pub y: AxisSeries<'a>,
    pub size: AxisSeries<'a>,
    pub size_range: (f64, f64),
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisSeries<'a> {
    pub name: &'a str,
    pub values: &'a [Option<f64>],
}

// =============================================================================
// Dispatcher
// =============================================================================

/// Dispatches datasets under a validated [`ChartConfig`].
#[derive(Debug, Clone, Default)]
pub struct ChartDispatcher {
    config: ChartConfig,
}

impl ChartDispatcher {
    pub fn new(config: ChartConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    /// Produce the view `chart_type` draws from `dataset`, or `Unsupported` when the
    /// dataset has too few numeric series. Never mutates the dataset.
    pub fn dispatch<'a>(&self, chart_type: ChartType, dataset: &'a ChartDataset) -> Dispatch<'a> {
        let numeric: Vec<(&'a str, &'a [Option<f64>])> = dataset.numeric_series().collect();
        let required = chart_type.min_numeric_series();

        if numeric.len() < required {
            debug!(
                chart_type = %chart_type,
                required,
                available = numeric.len(),
                "chart type unsupported for dataset"
            );
            return Dispatch::Unsupported {
                chart_type,
                required,
                available: numeric.len(),
            };
        }

        let view = match chart_type {
            ChartType::Bar | ChartType::Line => self.cartesian(chart_type, dataset, &numeric),
            ChartType::Pie | ChartType::Donut => self.proportion(chart_type, dataset, numeric[0]),
            ChartType::Histogram => self.histogram(numeric[0]),
            ChartType::Bubble => self.bubble(dataset, numeric[0], numeric[1], numeric[2]),
        };

        debug!(chart_type = %chart_type, observations = dataset.len(), "dispatched chart view");
        Dispatch::Renderable { view }
    }

    fn color(&self, index: usize) -> String {
        self.config
            .palette
            .color_at(index)
            .map(str::to_string)
            .unwrap_or_default()
    }

    fn primary_color(&self) -> String {
        self.config.palette.primary().map(str::to_string).unwrap_or_default()
    }

    fn cartesian<'a>(
        &self,
        chart_type: ChartType,
        dataset: &'a ChartDataset,
        numeric: &[(&'a str, &'a [Option<f64>])],
    ) -> ChartView<'a> {
        let series = numeric
            .iter()
            .enumerate()
            .map(|(i, &(name, values))| PlottedSeries {
                name,
                color: self.color(i),
                values,
            })
            .collect();

        ChartView::Cartesian(CartesianView {
            chart_type,
            categories: dataset.labels(),
            series,
        })
    }

    fn proportion<'a>(
        &self,
        chart_type: ChartType,
        dataset: &'a ChartDataset,
        (name, values): (&'a str, &'a [Option<f64>]),
    ) -> ChartView<'a> {
        let slices = dataset
            .labels()
            .iter()
            .zip(values)
            .enumerate()
            .map(|(i, (label, value))| Slice {
                label: label.as_str(),
                value: *value,
                color: self.color(i),
            })
            .collect();

        let inner_radius = if chart_type == ChartType::Donut {
            self.config.donut_inner_radius
        } else {
            0.0
        };

        ChartView::Proportion(ProportionView {
            chart_type,
            series: name,
            outer_radius: self.config.pie_outer_radius,
            inner_radius,
            slices,
        })
    }

    fn histogram<'a>(&self, (name, values): (&'a str, &'a [Option<f64>])) -> ChartView<'a> {
        let buckets = bucketize_with(values, self.config.bucket_width);
        debug!(series = name, buckets = buckets.len(), "bucketized histogram series");

        ChartView::Histogram(HistogramView {
            series: name,
            x_label: format!("{} Range", name),
            y_label: "Frequency".to_string(),
            color: self.primary_color(),
            buckets,
        })
    }

    fn bubble<'a>(
        &self,
        dataset: &'a ChartDataset,
        x: (&'a str, &'a [Option<f64>]),
        y: (&'a str, &'a [Option<f64>]),
        size: (&'a str, &'a [Option<f64>]),
    ) -> ChartView<'a> {
        let axis = |(name, values): (&'a str, &'a [Option<f64>])| AxisSeries { name, values };

        ChartView::Bubble(BubbleView {
            labels: dataset.labels(),
            x: axis(x),
            y: axis(y),
            size: axis(size),
            size_range: self.config.bubble_size_range,
            color: self.primary_color(),
        })
    }
}

/// Dispatch with the default configuration.
pub fn dispatch(chart_type: ChartType, dataset: &ChartDataset) -> Dispatch<'_> {
    ChartDispatcher::default().dispatch(chart_type, dataset)
}
