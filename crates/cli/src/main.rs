// # -----------------------------
// # crates/cli/src/main.rs
// # -----------------------------
//! Command line wrapper around [`texcaller::convert`].
//!
//! Reads the source document from standard input and writes the result
//! document to standard output. No temporary files are left behind.
//! Information and error messages are reported to standard error.
//! The exit code is 0 on success and 1 on failure.

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use std::io::{self, Read, Write};
use std::process::ExitCode;
use tracing_subscriber::{fmt, EnvFilter};

use texcaller::{convert, ConversionOutcome, ConversionRequest, ResultFormat, SourceFormat};

#[derive(Parser, Debug)]
#[command(
    name = "texcaller",
    version,
    about = "Convert a TeX or LaTeX document from stdin to DVI or PDF on stdout"
)]
struct Cli {
    /// Source format: TeX, LaTeX, XeTeX, XeLaTeX, LuaTeX or LuaLaTeX
    #[arg(value_name = "SRC_FORMAT", value_parser = parse_source_format)]
    source_format: SourceFormat,
    /// Result format: DVI or PDF
    #[arg(value_name = "DEST_FORMAT", value_parser = parse_result_format)]
    result_format: ResultFormat,
    /// Maximum number of engine runs before giving up
    #[arg(value_name = "MAX_RUNS")]
    max_runs: u32,
    /// Log level (trace, debug, info, warn, error, off). Overrides RUST_LOG if set.
    #[arg(long = "log-level", value_name = "LEVEL")]
    log_level: Option<String>,
}

fn parse_source_format(s: &str) -> Result<SourceFormat, String> {
    s.parse()
        .map_err(|err: texcaller::UnknownFormat| err.to_string())
}

fn parse_result_format(s: &str) -> Result<ResultFormat, String> {
    s.parse()
        .map_err(|err: texcaller::UnknownFormat| err.to_string())
}

fn init_logging(log_level: Option<&str>) {
    let filter = match log_level {
        Some(level) => EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn")),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    // Stdout carries the result document; all logging goes to stderr.
    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = err.print();
            return ExitCode::from(code);
        }
    };
    init_logging(cli.log_level.as_deref());

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<bool> {
    let mut source = Vec::new();
    io::stdin()
        .read_to_end(&mut source)
        .context("unable to read source document from stdin")?;

    let request = ConversionRequest::new(
        &source,
        cli.source_format,
        cli.result_format,
        cli.max_runs,
    );
    let outcome = convert(&request);

    eprintln!("{}", outcome.info().unwrap_or("Out of memory."));

    match outcome {
        ConversionOutcome::Converted { result, .. } => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(&result)
                .context("unable to write result document to stdout")?;
            stdout
                .flush()
                .context("unable to write result document to stdout")?;
            Ok(true)
        }
        ConversionOutcome::Failed { .. } | ConversionOutcome::OutOfMemory => Ok(false),
    }
}
