use thiserror::Error;

/// Errors raised by the chart core.
///
/// An unrenderable chart type is not an error: see [`crate::dispatch::Dispatch::Unsupported`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    #[error("Shape mismatch in {field}: expected {expected} entries (one per label), got {actual}")]
    ShapeMismatch {
        field: String,
        expected: usize,
        actual: usize,
    },
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Analysis backend reported a failure: {0}")]
    BackendFailure(String),
}

pub type Result<T> = std::result::Result<T, ChartError>;

/// A chart type name outside the closed set.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Unknown chart type '{0}' (expected one of bar, line, pie, donut, histogram, bubble)")]
pub struct UnknownChartType(pub String);

impl ChartError {
    pub(crate) fn shape(field: impl Into<String>, expected: usize, actual: usize) -> Self {
        ChartError::ShapeMismatch {
            field: field.into(),
            expected,
            actual,
        }
    }
}
