use anyhow::{Context, Result};
use chatchart::{data, resolve, transform, ChartConfig, ChartDispatcher, ChartResponse, ChartType};
use clap::Parser;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "chatchart")]
#[command(about = "Turn an analysis response into chart-ready JSON", long_about = None)]
struct Args {
    /// The user's question; picks the chart type (e.g. 'show value share as a pie chart')
    #[arg(short, long, default_value = "")]
    prompt: String,

    /// Chart type to use instead of the one inferred from the prompt
    #[arg(short = 't', long = "type")]
    chart_type: Option<ChartType>,

    /// Analysis response JSON file (read from stdin when omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Separately fetched table rows, as a JSON array or a .csv file
    #[arg(short, long)]
    rows: Option<PathBuf>,

    /// Chart config JSON (bucket_width, palette, radii, tooltip_excluded_keys)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pretty-print the output JSON
    #[arg(long)]
    pretty: bool,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("chatchart=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config '{}'", path.display()))?;
            ChartConfig::from_json(&text)
                .with_context(|| format!("Invalid config '{}'", path.display()))?
        }
        None => ChartConfig::default(),
    };
    let dispatcher = ChartDispatcher::new(config)?;

    let response_json = match &args.input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read analysis response '{}'", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read analysis response from stdin")?;
            buf
        }
    };
    let analysis = data::parse_analysis_response(&response_json)?;

    let rows = match &args.rows {
        Some(path) => Some(data::read_rows_file(path)?),
        None => None,
    };

    let dataset = transform::normalize_analysis(&analysis, rows.as_deref())
        .context("Failed to normalize analysis result")?;

    let chart_type = args
        .chart_type
        .unwrap_or_else(|| resolve::resolve_chart_type(&args.prompt));
    info!(chart_type = %chart_type, observations = dataset.len(), "building chart response");

    let response = ChartResponse::build(&dispatcher, chart_type, &analysis.explanation, &dataset);
    if let Some(message) = response.dispatch.unsupported_message() {
        warn!("{}", message);
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let written = if args.pretty {
        serde_json::to_writer_pretty(&mut handle, &response)
    } else {
        serde_json::to_writer(&mut handle, &response)
    };
    written.context("Failed to write chart response")?;
    writeln!(handle).context("Failed to write chart response")?;
    handle.flush().context("Failed to flush stdout")?;

    Ok(())
}
