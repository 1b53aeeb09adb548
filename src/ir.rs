use crate::error::UnknownChartType;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Chart Types
// =============================================================================

/// The closed set of chart kinds the renderer can draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Bar,
    Line,
    Pie,
    Donut,
    Histogram,
    Bubble,
}

impl ChartType {
    pub const ALL: [ChartType; 6] = [
        ChartType::Bar,
        ChartType::Line,
        ChartType::Pie,
        ChartType::Donut,
        ChartType::Histogram,
        ChartType::Bubble,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartType::Bar => "bar",
            ChartType::Line => "line",
            ChartType::Pie => "pie",
            ChartType::Donut => "donut",
            ChartType::Histogram => "histogram",
            ChartType::Bubble => "bubble",
        }
    }

    /// How many plottable series a dataset needs before this type can be drawn.
    pub fn min_numeric_series(&self) -> usize {
        match self {
            ChartType::Bubble => 3,
            _ => 1,
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartType {
    type Err = UnknownChartType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ChartType::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| UnknownChartType(s.to_string()))
    }
}

// =============================================================================
// Cells, Rows and Points
// =============================================================================

/// A single table cell: text, a number, or nothing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Null,
}

impl CellValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<Option<f64>> for CellValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(CellValue::Null, CellValue::Number)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<Value> for CellValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => CellValue::Null,
            Value::Number(n) => match n.as_f64() {
                Some(f) => CellValue::Number(f),
                None => CellValue::Text(n.to_string()),
            },
            Value::String(s) => CellValue::Text(s),
            Value::Bool(b) => CellValue::Text(b.to_string()),
            other => CellValue::Text(other.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for CellValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(CellValue::from)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Null => f.write_str("null"),
        }
    }
}

/// One table row keyed by column name, in column order.
pub type RawRow = IndexMap<String, CellValue>;

/// One flattened observation as the chart layer sees it (label, series values, extra columns).
/// Key order is the order tooltips list fields in.
pub type DataPoint = IndexMap<String, CellValue>;

/// Key under which a data point carries its label.
pub const LABEL_KEY: &str = "name";

// =============================================================================
// Canonical Dataset
// =============================================================================

/// Normalized chart input: N labels, named series of N optional values each, and
/// optionally N row attachments.
///
/// Only [`crate::transform::normalize`] builds one, so every sequence is guaranteed to be
/// index-aligned with `labels`. There are no mutators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDataset {
    labels: Vec<String>,
    series: IndexMap<String, Vec<Option<f64>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rows: Option<Vec<RawRow>>,
}

impl ChartDataset {
    pub(crate) fn from_parts(
        labels: Vec<String>,
        series: IndexMap<String, Vec<Option<f64>>>,
        rows: Option<Vec<RawRow>>,
    ) -> Self {
        Self { labels, series, rows }
    }

    /// Number of observations (N).
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Every series, including all-null ones, in insertion order.
    pub fn series(&self) -> &IndexMap<String, Vec<Option<f64>>> {
        &self.series
    }

    pub fn series_values(&self, name: &str) -> Option<&[Option<f64>]> {
        self.series.get(name).map(Vec::as_slice)
    }

    /// Row attachments; columns shadowed by a numeric series are already removed.
    pub fn rows(&self) -> Option<&[RawRow]> {
        self.rows.as_deref()
    }

    /// Series with at least one non-null value, in insertion order.
    pub fn numeric_series(&self) -> impl Iterator<Item = (&str, &[Option<f64>])> + '_ {
        self.series
            .iter()
            .filter(|(_, values)| values.iter().any(Option::is_some))
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    pub fn numeric_series_count(&self) -> usize {
        self.numeric_series().count()
    }

    /// Flatten observation `index`: label first, then numeric series, then attachment
    /// columns not already present.
    pub fn data_point(&self, index: usize) -> Option<DataPoint> {
        let label = self.labels.get(index)?;

        let mut point = DataPoint::new();
        point.insert(LABEL_KEY.to_string(), CellValue::Text(label.clone()));
        for (name, values) in self.numeric_series() {
            point.insert(name.to_string(), CellValue::from(values[index]));
        }

        if let Some(row) = self.rows.as_ref().and_then(|rows| rows.get(index)) {
            for (key, value) in row {
                if !point.contains_key(key) {
                    point.insert(key.clone(), value.clone());
                }
            }
        }

        Some(point)
    }

    pub fn data_points(&self) -> Vec<DataPoint> {
        (0..self.len()).filter_map(|i| self.data_point(i)).collect()
    }
}

// =============================================================================
// Histogram
// =============================================================================

/// One populated histogram range. Buckets with no observations are never produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramBucket {
    pub range_label: String,
    pub start: f64,
    pub end: f64,
    pub frequency: usize,
}

impl HistogramBucket {
    /// The pairs the histogram tooltip shows.
    pub fn tooltip_fields(&self) -> Vec<(String, String)> {
        vec![
            ("Range".to_string(), self.range_label.clone()),
            ("Frequency".to_string(), self.frequency.to_string()),
        ]
    }
}
