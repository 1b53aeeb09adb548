use crate::ir::{CellValue, RawRow};
use anyhow::{Context, Result};
use std::io::Read;

/// Read rows from CSV with a header line.
///
/// Cells that parse as numbers become numbers and empty cells become null, so a CSV
/// export carries the same value kinds as the backend's JSON rows.
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<RawRow>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()
        .context("Failed to read CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (idx, record) in csv_reader.records().enumerate() {
        let record = record.with_context(|| format!("Failed to read CSV record {}", idx + 1))?;
        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .map(|(header, field)| (header.clone(), parse_cell(field)))
            .collect();
        rows.push(row);
    }

    Ok(rows)
}

fn parse_cell(field: &str) -> CellValue {
    if field.is_empty() {
        return CellValue::Null;
    }
    match field.parse::<f64>() {
        Ok(n) if n.is_finite() => CellValue::Number(n),
        _ => CellValue::Text(field.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_rows() {
        let csv = "region, q1 ,note\nNorth,10,ok\nSouth,-2.5,\n";
        let rows = read_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["region"], CellValue::from("North"));
        assert_eq!(rows[0]["q1"], CellValue::Number(10.0));
        assert_eq!(rows[1]["q1"], CellValue::Number(-2.5));
        assert_eq!(rows[1]["note"], CellValue::Null);
        let keys: Vec<&str> = rows[0].keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["region", "q1", "note"]);
    }

    #[test]
    fn test_read_rows_header_only() {
        let rows = read_rows("a,b\n".as_bytes()).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_non_finite_text_stays_text() {
        assert_eq!(parse_cell("NaN"), CellValue::from("NaN"));
        assert_eq!(parse_cell("inf"), CellValue::from("inf"));
    }

    #[test]
    fn test_ragged_record_is_error() {
        let csv = "a,b\n1,2,3\n";
        assert!(read_rows(csv.as_bytes()).is_err());
    }
}
