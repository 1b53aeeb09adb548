use crate::data::AnalysisResult;
use crate::error::{ChartError, Result};
use crate::ir::{ChartDataset, RawRow};
use indexmap::IndexMap;
use tracing::{debug, warn};

/// Label used for an observation whose x-axis column is missing.
pub const MISSING_LABEL: &str = "undefined";

/// Build a canonical dataset from labels, named series and optional row attachments.
///
/// Every series and the row list must hold exactly one entry per label; anything else
/// is a [`ChartError::ShapeMismatch`]. Row columns that share a name with a numeric
/// series are dropped so computed values are never shadowed by raw passthrough data.
/// An all-null series computes nothing, so its same-named column stays attached.
pub fn normalize(
    labels: Vec<String>,
    series: IndexMap<String, Vec<Option<f64>>>,
    rows: Option<Vec<RawRow>>,
) -> Result<ChartDataset> {
    let n = labels.len();

    for (name, values) in &series {
        if values.len() != n {
            return Err(ChartError::shape(format!("series '{}'", name), n, values.len()));
        }
    }

    let rows = match rows {
        Some(rows) => {
            if rows.len() != n {
                return Err(ChartError::shape("rows", n, rows.len()));
            }
            let numeric: Vec<&str> = series
                .iter()
                .filter(|(_, values)| values.iter().any(Option::is_some))
                .map(|(name, _)| name.as_str())
                .collect();
            Some(
                rows.into_iter()
                    .map(|row| strip_series_columns(row, &numeric))
                    .collect(),
            )
        }
        None => None,
    };

    let dataset = ChartDataset::from_parts(labels, series, rows);
    debug!(
        observations = n,
        series = dataset.series().len(),
        numeric_series = dataset.numeric_series_count(),
        has_rows = dataset.rows().is_some(),
        "normalized chart dataset"
    );
    Ok(dataset)
}

fn strip_series_columns(mut row: RawRow, numeric: &[&str]) -> RawRow {
    row.retain(|column, _| !numeric.contains(&column.as_str()));
    row
}

/// Build a dataset from a backend analysis result.
///
/// Labels come from the first `x_axis` column of the result table and one series is
/// extracted per `y_axis` column (non-numeric cells become nulls). `rows`, when given,
/// is the separately fetched table used for tooltip attachments; otherwise the result
/// table itself is attached.
pub fn normalize_analysis(
    result: &AnalysisResult,
    rows: Option<&[RawRow]>,
) -> Result<ChartDataset> {
    let table = &result.table;
    let x_col = result.metadata.x_axis.first();

    match x_col {
        Some(col) if !table.is_empty() && !table.iter().any(|row| row.contains_key(col)) => {
            warn!(
                column = %col,
                "x-axis column not found in result table, labels will be '{}'",
                MISSING_LABEL
            );
        }
        None => warn!(
            "analysis metadata names no x-axis column, labels will be '{}'",
            MISSING_LABEL
        ),
        _ => {}
    }

    let labels: Vec<String> = table
        .iter()
        .map(|row| match x_col.and_then(|col| row.get(col)) {
            Some(value) => value.to_string(),
            None => MISSING_LABEL.to_string(),
        })
        .collect();

    let mut series = IndexMap::new();
    for y_col in &result.metadata.y_axis {
        let values: Vec<Option<f64>> = table
            .iter()
            .map(|row| row.get(y_col).and_then(|v| v.as_number()))
            .collect();
        series.insert(y_col.clone(), values);
    }

    let attachments = match rows {
        Some(rows) => rows.to_vec(),
        None => table.clone(),
    };

    normalize(labels, series, Some(attachments))
}
