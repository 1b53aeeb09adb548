use serde_json::Value;
use std::fs;
use std::io::Write;
use std::process::{Command, Stdio};

/// Helper function to run chatchart with CLI args and an analysis response on stdin
fn run_chatchart(args: &[&str], stdin_content: &str) -> Result<Value, String> {
    let mut child = Command::new(env!("CARGO_BIN_EXE_chatchart"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| format!("Failed to spawn process: {}", e))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(stdin_content.as_bytes())
            .map_err(|e| format!("Failed to write to stdin: {}", e))?;
    }

    let output = child
        .wait_with_output()
        .map_err(|e| format!("Failed to wait for process: {}", e))?;

    if output.status.success() {
        serde_json::from_slice(&output.stdout)
            .map_err(|e| format!("Output is not valid JSON: {}", e))
    } else {
        Err(String::from_utf8_lossy(&output.stderr).to_string())
    }
}

fn retailer_response() -> String {
    fs::read_to_string("test/analysis_response.json").expect("Failed to read test response")
}

fn sales_response() -> String {
    fs::read_to_string("test/single_series_response.json").expect("Failed to read test response")
}

fn field_names(tooltip: &Value) -> Vec<String> {
    tooltip["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|pair| pair[0].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn test_end_to_end_pie_from_prompt() {
    let result = run_chatchart(
        &["--prompt", "Show value share as a pie chart"],
        &retailer_response(),
    );
    let out = result.expect("pie chart should render");

    assert_eq!(out["chartType"], "pie");
    assert_eq!(out["dispatch"]["status"], "renderable");
    let view = &out["dispatch"]["view"];
    assert_eq!(view["kind"], "proportion");
    assert_eq!(view["series"], "Value_Share_Current");
    assert_eq!(view["innerRadius"], 0.0);
    let slices = view["slices"].as_array().unwrap();
    assert_eq!(slices.len(), 3);
    assert_eq!(slices[2]["label"], "Retailer C");
    assert_eq!(slices[2]["value"], 45.0);
    assert_eq!(slices[2]["color"], "#ffc658");
}

#[test]
fn test_end_to_end_default_bar() {
    let out = run_chatchart(&[], &retailer_response()).expect("bar chart should render");

    assert_eq!(out["chartType"], "bar");
    assert_eq!(
        out["explanation"],
        "Market share by retailer, with basis point changes in value and volume share."
    );
    let series = out["dispatch"]["view"]["series"].as_array().unwrap();
    // "Performance" is text only, so it is not plotted
    assert_eq!(series.len(), 4);
    assert_eq!(series[0]["name"], "Value_Share_Current");
    assert_eq!(series[3]["name"], "Volume_Share_Change_bps");
    assert_eq!(series[3]["values"][1], -30.0);

    let labels = out["dataset"]["labels"].as_array().unwrap();
    assert_eq!(labels.len(), 3);
    assert_eq!(labels[0], "Retailer A");
    assert!(out["dataset"]["series"]["Performance"][0].is_null());

    // the text column still reaches the tooltip through the row attachment
    let tooltips = out["tooltips"].as_array().unwrap();
    assert_eq!(
        field_names(&tooltips[0]),
        vec![
            "Value_Share_Current",
            "Value_Share_Change_bps",
            "Volume_Share_Current",
            "Volume_Share_Change_bps",
            "Brand/Retailer",
            "Performance",
        ]
    );
    assert_eq!(tooltips[0]["fields"][5][1], "Winning");
    assert_eq!(tooltips[2]["fields"][5][1], "Losing");
}

#[test]
fn test_end_to_end_type_override() {
    let out = run_chatchart(
        &["--prompt", "pie chart please", "--type", "line"],
        &retailer_response(),
    )
    .expect("line chart should render");
    assert_eq!(out["chartType"], "line");
    assert_eq!(out["dispatch"]["view"]["chartType"], "line");
}

#[test]
fn test_end_to_end_invalid_type() {
    let result = run_chatchart(&["--type", "scatter"], &retailer_response());
    assert!(result.is_err(), "Should have rejected an unknown chart type");
}

#[test]
fn test_end_to_end_bubble() {
    let out = run_chatchart(&["--prompt", "bubble chart of share"], &retailer_response())
        .expect("bubble chart should render");
    let view = &out["dispatch"]["view"];
    assert_eq!(view["kind"], "bubble");
    assert_eq!(view["x"]["name"], "Value_Share_Current");
    assert_eq!(view["y"]["name"], "Value_Share_Change_bps");
    assert_eq!(view["size"]["name"], "Volume_Share_Current");
    assert_eq!(view["sizeRange"][1], 1000.0);
}

#[test]
fn test_end_to_end_bubble_unsupported() {
    let out = run_chatchart(&["--prompt", "bubble chart"], &sales_response())
        .expect("unsupported is not a failure");
    assert_eq!(out["chartType"], "bubble");
    assert_eq!(out["dispatch"]["status"], "unsupported");
    assert_eq!(out["dispatch"]["chartType"], "bubble");
    assert_eq!(out["dispatch"]["required"], 3);
    assert_eq!(out["dispatch"]["available"], 1);
    assert!(out.get("tooltips").is_none());
}

#[test]
fn test_end_to_end_histogram() {
    let out = run_chatchart(&["--prompt", "histogram of sales"], &sales_response())
        .expect("histogram should render");
    let view = &out["dispatch"]["view"];
    assert_eq!(view["kind"], "histogram");
    assert_eq!(view["xLabel"], "sales Range");

    let buckets: Vec<(String, u64)> = view["buckets"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| (b["rangeLabel"].as_str().unwrap().to_string(), b["frequency"].as_u64().unwrap()))
        .collect();
    assert_eq!(
        buckets,
        vec![
            ("0 - 10".to_string(), 1),
            ("10 - 20".to_string(), 2),
            ("20 - 30".to_string(), 1),
        ]
    );

    let tooltips = out["tooltips"].as_array().unwrap();
    assert_eq!(tooltips.len(), 3);
    assert_eq!(tooltips[1]["fields"][0][0], "Range");
    assert_eq!(tooltips[1]["fields"][1][1], "2");
}

#[test]
fn test_end_to_end_config_file() {
    let out = run_chatchart(
        &["--prompt", "histogram", "--config", "test/config.json"],
        &sales_response(),
    )
    .expect("histogram should render");
    let buckets = out["dispatch"]["view"]["buckets"].as_array().unwrap();
    assert_eq!(buckets.len(), 2);
    assert_eq!(buckets[0]["rangeLabel"], "0 - 20");
    assert_eq!(buckets[0]["frequency"], 3);
    assert_eq!(out["dispatch"]["view"]["color"], "#111111");
}

#[test]
fn test_end_to_end_tooltips_from_result_table() {
    let out = run_chatchart(&["--prompt", "line"], &sales_response()).expect("line should render");
    let tooltips = out["tooltips"].as_array().unwrap();
    assert_eq!(tooltips.len(), 4);
    assert_eq!(tooltips[0]["title"], "January");
    // series value first, then the remaining row column
    assert_eq!(field_names(&tooltips[0]), vec!["sales", "month"]);
    assert_eq!(tooltips[0]["fields"][0][1], "5");
}

#[test]
fn test_end_to_end_csv_rows() {
    let out = run_chatchart(
        &["--prompt", "bar", "--rows", "test/rows.csv", "--input", "test/analysis_response.json"],
        "",
    )
    .expect("bar chart with CSV rows should render");

    let tooltips = out["tooltips"].as_array().unwrap();
    assert_eq!(tooltips.len(), 3);
    assert_eq!(
        field_names(&tooltips[0]),
        vec![
            "Value_Share_Current",
            "Value_Share_Change_bps",
            "Volume_Share_Current",
            "Volume_Share_Change_bps",
            "Brand/Retailer",
            "Owner",
            "Stores",
        ]
    );
    assert_eq!(tooltips[0]["fields"][5][1], "HUL");
    assert_eq!(tooltips[2]["fields"][6][1], "null");
}

#[test]
fn test_end_to_end_row_count_mismatch() {
    let result = run_chatchart(&["--rows", "test/rows.json"], &retailer_response());
    assert!(result.is_err(), "Should have failed with a shape mismatch");
    assert!(result.unwrap_err().contains("Shape mismatch"));
}

#[test]
fn test_end_to_end_backend_failure() {
    let response =
        fs::read_to_string("test/failure_response.json").expect("Failed to read test response");
    let result = run_chatchart(&[], &response);
    assert!(result.is_err(), "Should have surfaced the backend failure");
    assert!(result.unwrap_err().contains("pandas execution failed"));
}

#[test]
fn test_end_to_end_invalid_json() {
    let result = run_chatchart(&[], "definitely not json");
    assert!(result.is_err(), "Should have failed on invalid JSON");
}
