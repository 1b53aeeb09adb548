// Library exports for chatchart

pub mod csv_reader;
pub mod data;
pub mod dispatch;
pub mod error;
pub mod histogram;
pub mod ir;
pub mod palette;
pub mod resolve;
pub mod tooltip;
pub mod transform;

pub use dispatch::{dispatch, ChartDispatcher, ChartView, Dispatch};
pub use error::{ChartError, Result};
pub use ir::{CellValue, ChartDataset, ChartType, DataPoint, HistogramBucket, RawRow};
pub use resolve::resolve_chart_type;
pub use transform::{normalize, normalize_analysis};

use histogram::BucketWidth;
use palette::ColorPalette;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tooltip::Tooltip;

/// Presentation parameters shared by every chart type.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ChartConfig {
    #[serde(default)]
    pub bucket_width: BucketWidth,
    #[serde(default)]
    pub palette: ColorPalette,
    #[serde(default = "default_outer_radius")]
    pub pie_outer_radius: f64,
    #[serde(default = "default_donut_inner_radius")]
    pub donut_inner_radius: f64,
    #[serde(default = "default_bubble_size_range")]
    pub bubble_size_range: (f64, f64),
    #[serde(default = "default_excluded_keys")]
    pub tooltip_excluded_keys: Vec<String>,
}

fn default_outer_radius() -> f64 { 80.0 }
fn default_donut_inner_radius() -> f64 { 40.0 }
fn default_bubble_size_range() -> (f64, f64) { (100.0, 1000.0) }
fn default_excluded_keys() -> Vec<String> {
    tooltip::CHART_INTERNAL_KEYS.iter().map(|k| k.to_string()).collect()
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            bucket_width: BucketWidth::default(),
            palette: ColorPalette::standard(),
            pie_outer_radius: default_outer_radius(),
            donut_inner_radius: default_donut_inner_radius(),
            bubble_size_range: default_bubble_size_range(),
            tooltip_excluded_keys: default_excluded_keys(),
        }
    }
}

impl ChartConfig {
    /// Parse a config from JSON; omitted fields keep their defaults.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let config: ChartConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.palette.is_empty() {
            return Err(ChartError::InvalidConfiguration(
                "palette must contain at least one color".to_string(),
            ));
        }
        let (outer, inner) = (self.pie_outer_radius, self.donut_inner_radius);
        if !outer.is_finite() || outer <= 0.0 {
            return Err(ChartError::InvalidConfiguration(format!(
                "pie outer radius must be positive, got {}",
                outer
            )));
        }
        if !inner.is_finite() || inner < 0.0 || inner >= outer {
            return Err(ChartError::InvalidConfiguration(format!(
                "donut inner radius must be in [0, {}), got {}",
                outer, inner
            )));
        }
        let (min, max) = self.bubble_size_range;
        if !min.is_finite() || !max.is_finite() || min < 0.0 || min > max {
            return Err(ChartError::InvalidConfiguration(format!(
                "bubble size range [{}, {}] is not a valid range",
                min, max
            )));
        }
        Ok(())
    }

    pub fn excluded_tooltip_keys(&self) -> HashSet<String> {
        self.tooltip_excluded_keys.iter().cloned().collect()
    }
}

/// Everything the rendering layer needs for one chat answer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartResponse<'a> {
    pub chart_type: ChartType,
    pub explanation: &'a str,
    pub dataset: &'a ChartDataset,
    pub dispatch: Dispatch<'a>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tooltips: Vec<Tooltip>,
}

impl<'a> ChartResponse<'a> {
    /// Dispatch `dataset` as `chart_type` and precompute one tooltip per rendered mark.
    pub fn build(
        dispatcher: &ChartDispatcher,
        chart_type: ChartType,
        explanation: &'a str,
        dataset: &'a ChartDataset,
    ) -> Self {
        let dispatch = dispatcher.dispatch(chart_type, dataset);
        let excluded = dispatcher.config().excluded_tooltip_keys();

        let tooltips = match dispatch.view() {
            Some(ChartView::Histogram(view)) => view
                .buckets
                .iter()
                .map(|bucket| Tooltip {
                    title: None,
                    fields: bucket.tooltip_fields(),
                })
                .collect(),
            Some(_) => dataset
                .data_points()
                .iter()
                .map(|point| tooltip::build_tooltip(point, &excluded))
                .collect(),
            None => Vec::new(),
        };

        Self {
            chart_type,
            explanation,
            dataset,
            dispatch,
            tooltips,
        }
    }
}
