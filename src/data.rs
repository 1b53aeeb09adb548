use crate::error::ChartError;
use crate::ir::{CellValue, RawRow};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Envelope the analysis backend answers a chat prompt with.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiResponse {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub result: Option<AnalysisResult>,
    #[serde(default)]
    pub error: Option<String>,
}

fn default_success() -> bool { true }

impl ApiResponse {
    /// Unwrap the analysis result, surfacing a backend-reported failure.
    pub fn into_result(self) -> crate::error::Result<AnalysisResult> {
        if !self.success {
            let message = self.error.unwrap_or_else(|| "unknown error".to_string());
            return Err(ChartError::BackendFailure(message));
        }
        self.result
            .ok_or_else(|| ChartError::BackendFailure("response carried no result".to_string()))
    }
}

/// The analysis itself: a prose explanation, which columns to plot, and the result table.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AnalysisResult {
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub table: Vec<RawRow>,

    // Passed through by the backend; not used for charting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_plan: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pandas_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assumptions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_status: Option<String>,
}

/// Column roles: the first `x_axis` entry labels observations, each `y_axis` entry is a series.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Metadata {
    #[serde(default)]
    pub x_axis: Vec<String>,
    #[serde(default)]
    pub y_axis: Vec<String>,
}

/// Parse the backend's JSON envelope and return its analysis result.
pub fn parse_analysis_response(json: &str) -> Result<AnalysisResult> {
    let response: ApiResponse =
        serde_json::from_str(json).context("Analysis response is not valid JSON")?;
    Ok(response.into_result()?)
}

/// Rows from a JSON array of objects.
pub fn rows_from_json(value: &Value) -> Result<Vec<RawRow>> {
    let array = value.as_array().ok_or_else(||
        anyhow!("Row data must be a JSON array of objects")
    )?;

    let mut rows = Vec::with_capacity(array.len());
    for (idx, item) in array.iter().enumerate() {
        let obj = item.as_object().ok_or_else(||
            anyhow!("Row {} is not a JSON object", idx)
        )?;

        let row: RawRow = obj
            .iter()
            .map(|(key, val)| (key.clone(), CellValue::from(val.clone())))
            .collect();
        rows.push(row);
    }

    Ok(rows)
}

/// Load a row payload from disk; `.csv` files go through the CSV reader, anything else is JSON.
pub fn read_rows_file(path: &Path) -> Result<Vec<RawRow>> {
    let is_csv = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);

    if is_csv {
        let file = fs::File::open(path)
            .with_context(|| format!("Failed to open row file '{}'", path.display()))?;
        return crate::csv_reader::read_rows(file)
            .with_context(|| format!("Failed to read CSV rows from '{}'", path.display()));
    }

    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read row file '{}'", path.display()))?;
    let value: Value = serde_json::from_str(&text)
        .with_context(|| format!("Row file '{}' is not valid JSON", path.display()))?;
    rows_from_json(&value)
}
