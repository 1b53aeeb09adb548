use crate::ir::{DataPoint, LABEL_KEY};
use serde::Serialize;
use std::collections::HashSet;

/// Fields the chart layer adds to a hovered point for its own geometry and styling.
pub const CHART_INTERNAL_KEYS: [&str; 11] = [
    "fill",
    "cx",
    "cy",
    "innerRadius",
    "outerRadius",
    "startAngle",
    "endAngle",
    "midAngle",
    LABEL_KEY,
    "stroke",
    "payload",
];

/// Hover box content: the observation label and its displayable fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub fields: Vec<(String, String)>,
}

/// Keys of `point` not in `excluded`, in the point's own order, with values as display strings.
pub fn filter_fields(point: &DataPoint, excluded: &HashSet<String>) -> Vec<(String, String)> {
    point
        .iter()
        .filter(|(key, _)| !excluded.contains(key.as_str()))
        .map(|(key, value)| (key.clone(), value.to_string()))
        .collect()
}

pub fn build_tooltip(point: &DataPoint, excluded: &HashSet<String>) -> Tooltip {
    Tooltip {
        title: point.get(LABEL_KEY).map(|v| v.to_string()),
        fields: filter_fields(point, excluded),
    }
}
