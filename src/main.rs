use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use dealflow_harvester::logging::init_logging;
use dealflow_harvester::{run_workflow, HttpFetcher, SinkOptions, SourceRegistry};
use tracing::error;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Harvest startup dealflow data from multiple sources."
)]
struct Cli {
    /// Names of the sources to harvest (default: every registered source, in
    /// registration order).
    #[arg(long, num_args = 0..)]
    sources: Option<Vec<String>>,

    /// TOML file declaring additional sources.
    #[arg(long)]
    sources_file: Option<PathBuf>,

    /// HTTP request timeout (seconds).
    #[arg(long, default_value_t = 10)]
    timeout: u64,

    /// Path to write the collected dealflow JSON payload.
    #[arg(long, default_value = "dealflow.json")]
    output: PathBuf,

    /// Collect data without writing it anywhere.
    #[arg(long)]
    dry_run: bool,

    /// Destination Google Sheets document ID (from the sheet URL).
    #[arg(long)]
    google_sheet_id: Option<String>,

    /// Destination worksheet gid within the Google Sheet.
    #[arg(long)]
    worksheet_id: Option<i64>,

    /// Path to a Google service account JSON file for sheet access.
    #[arg(long)]
    google_credentials: Option<PathBuf>,

    /// Console logging verbosity.
    #[arg(long, value_enum, ignore_case = true, default_value_t = LogLevel::Info)]
    log_level: LogLevel,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Critical,
    Error,
    Warning,
    Info,
    Debug,
}

impl LogLevel {
    fn directive(self) -> &'static str {
        match self {
            LogLevel::Critical | LogLevel::Error => "error",
            LogLevel::Warning => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level.directive());

    let mut registry = SourceRegistry::with_defaults();
    if let Some(path) = &cli.sources_file {
        if let Err(e) = registry.load_file(path) {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    }

    let requested: Vec<String> = match &cli.sources {
        Some(names) => names.clone(),
        None => registry.ordered_keys().into_iter().map(str::to_string).collect(),
    };
    let sources = match registry.select(&requested) {
        Ok(sources) => sources,
        Err(_) => return ExitCode::FAILURE,
    };

    let options = SinkOptions {
        output: Some(cli.output),
        dry_run: cli.dry_run,
        google_sheet_id: cli.google_sheet_id,
        worksheet_id: cli.worksheet_id,
        google_credentials: cli.google_credentials,
    };

    match run_workflow(
        &sources,
        Arc::new(HttpFetcher::new()),
        Duration::from_secs(cli.timeout),
        &options,
    )
    .await
    {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
