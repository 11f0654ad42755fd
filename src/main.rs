//! CLI entry point for the sales averaging tool.
//!
//! Provides subcommands for summarizing one sales file, comparing two of
//! them, and writing an example input workbook.

use abverkauf::analyzers::analyzer::{compare_files, summarize};
use abverkauf::analyzers::types::ResultSummary;
use abverkauf::config::{ExportFormat, InputFormat, PipelineOptions, SheetSelector};
use abverkauf::output::{export, print_json, print_table, write_export};
use abverkauf::sample::{SAMPLE_FILE_NAME, sample_workbook};
use abverkauf::PipelineResult;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "abverkauf")]
#[command(about = "Average sold quantity per product from a sales file", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Average the quantity per product of one CSV or XLSX file
    Summarize {
        /// Sales file with columns Artikel, Name, Woche and Menge
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[command(flatten)]
        read: ReadArgs,

        /// Encoding of the result file
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Spreadsheet)]
        export: ExportFormat,

        /// Result file (defaults to ergebnisse.xlsx or ergebnisse.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also print the result as JSON on stdout
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Summarize two files and keep the products present in both
    Compare {
        #[arg(value_name = "ORIGINAL")]
        original: PathBuf,

        #[arg(value_name = "COMPARISON")]
        comparison: PathBuf,

        #[command(flatten)]
        read: ReadArgs,

        /// Encoding of the result file
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Spreadsheet)]
        export: ExportFormat,

        /// Result file (defaults to ergebnisse.xlsx or ergebnisse.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Write an example input workbook
    Sample {
        #[arg(short, long, default_value = SAMPLE_FILE_NAME)]
        output: PathBuf,
    },
}

#[derive(Args)]
struct ReadArgs {
    /// Input format (inferred from the file extension when omitted)
    #[arg(short, long, value_enum)]
    format: Option<InputFormat>,

    /// Worksheet to read, by position or name
    #[arg(short, long, default_value = "0")]
    sheet: SheetSelector,

    /// Reject files with empty cells
    #[arg(long, default_value_t = false)]
    strict: bool,

    /// Do not require the Woche column
    #[arg(long, default_value_t = false)]
    no_week: bool,
}

impl ReadArgs {
    fn options_for(&self, path: &Path) -> PipelineOptions {
        PipelineOptions {
            input: self.format.unwrap_or_else(|| InputFormat::from_path(path)),
            sheet: self.sheet.clone(),
            weekly: !self.no_week,
            strict: self.strict,
        }
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/abverkauf.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("abverkauf.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Summarize {
            file,
            read,
            export: format,
            output,
            json,
        } => {
            let bytes = read_input(&file)?;
            let rows = at_boundary(file.display(), summarize(&bytes, &read.options_for(&file)))?;

            print_table(&rows);
            if json {
                let source = file.display().to_string();
                print_json(&ResultSummary::new(&source, &rows))?;
            }

            let encoded = export(&rows, format)?;
            let path = output.unwrap_or_else(|| PathBuf::from(encoded.file_name()));
            write_export(&path, &encoded)?;
        }
        Commands::Compare {
            original,
            comparison,
            read,
            export: format,
            output,
        } => {
            let original_bytes = read_input(&original)?;
            let comparison_bytes = read_input(&comparison)?;
            let rows = at_boundary(
                format!("{} vs {}", original.display(), comparison.display()),
                compare_files(
                    &original_bytes,
                    &read.options_for(&original),
                    &comparison_bytes,
                    &read.options_for(&comparison),
                ),
            )?;

            print_table(&rows);

            let encoded = export(&rows, format)?;
            let path = output.unwrap_or_else(|| PathBuf::from(encoded.file_name()));
            write_export(&path, &encoded)?;
        }
        Commands::Sample { output } => {
            let bytes = sample_workbook()?;
            std::fs::write(&output, bytes)
                .with_context(|| format!("writing {}", output.display()))?;
            info!(path = %output.display(), "Example file written");
        }
    }

    Ok(())
}

/// Reads an uploaded file from disk.
#[tracing::instrument(fields(source = %path.display()))]
fn read_input(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("reading {}", path.display()))
}

/// Logs a failed run with its source before handing the error to the caller.
fn at_boundary<T>(source: impl std::fmt::Display, result: PipelineResult<T>) -> Result<T> {
    result.map_err(|e| {
        error!(source = %source, error = %e, "Processing failed");
        e.into()
    })
}
