//! ocp-logpages - decode OCP / vendor NVMe log page dumps
//!
//! # Usage
//!
//! ```bash
//! ocp-logpages smart-add-log c0.bin
//! ocp-logpages latency-monitor-log c3.bin -o json
//! ocp-logpages decode --log-id 0x00 lid0.bin
//! ocp-logpages list
//! ```

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use ocp_logpages::command::{FileSource, Options, Report, fetch_and_render};
use ocp_logpages::config::Config;
use ocp_logpages::schema;
use ocp_logpages::types::{
    LID_LATENCY_MONITOR, LID_SMART_CLOUD_ATTRIBUTES, LID_SUPPORTED_LOG_PAGES, described_log_ids,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Decode OCP / vendor NVMe log page dumps
#[derive(Parser, Debug)]
#[command(name = "ocp-logpages")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error). Overrides config file.
    #[arg(short, long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Retrieve SMART Cloud Log Page
    SmartAddLog(PageArgs),

    /// Retrieve Latency Monitor Log Page
    LatencyMonitorLog(PageArgs),

    /// Retrieve the Supported Log Pages directory
    LogPageDirectory(PageArgs),

    /// Decode any registered log page
    Decode(DecodeArgs),

    /// List decodable log pages and known log identifiers
    List,
}

#[derive(Args, Debug)]
struct PageArgs {
    /// Raw log page dump
    input: PathBuf,

    /// Output format: normal|json
    #[arg(short, long)]
    output_format: Option<String>,

    /// UUID index to read the page with
    #[arg(short, long)]
    uuid_index: Option<u8>,
}

#[derive(Args, Debug)]
struct DecodeArgs {
    /// Log identifier, decimal or 0x-prefixed hex
    #[arg(long, value_parser = parse_log_id)]
    log_id: u8,

    #[command(flatten)]
    page: PageArgs,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    let log_level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.log.level.as_str().to_string());
    init_logging(&log_level)?;

    let report = match cli.command {
        Command::SmartAddLog(args) => run_page(LID_SMART_CLOUD_ATTRIBUTES, args, &config),
        Command::LatencyMonitorLog(args) => run_page(LID_LATENCY_MONITOR, args, &config),
        Command::LogPageDirectory(args) => run_page(LID_SUPPORTED_LOG_PAGES, args, &config),
        Command::Decode(args) => run_page(args.log_id, args.page, &config),
        Command::List => Report::success(list()),
    };

    emit(&report)?;
    Ok(ExitCode::from(clamp_status(report.status)))
}

/// Config file if given, defaults otherwise.
fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::from_file(path).with_context(|| format!("loading {}", path.display())),
        None => Ok(Config::default()),
    }
}

/// Initialize the tracing subscriber on stderr; stdout carries the report.
fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(level)
        .or_else(|_| EnvFilter::try_new("warn"))
        .map_err(|e| anyhow::anyhow!("invalid log level: {}", e))?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .with(filter)
        .init();

    Ok(())
}

fn run_page(log_id: u8, args: PageArgs, config: &Config) -> Report {
    let format = args
        .output_format
        .as_deref()
        .unwrap_or(&config.output.format);
    let options = Options {
        render_on_mismatch: config.output.render_on_mismatch,
        uuid_index: args.uuid_index.or(config.output.uuid_index),
    };
    debug!(log_id, format, input = %args.input.display(), "decoding log page");

    let mut source = FileSource::new(args.input);
    fetch_and_render(&mut source, log_id, format, &options)
}

fn list() -> String {
    let mut out = String::from("Decodable log pages:\n");
    for s in schema::all() {
        out.push_str(&format!("  0x{:02x}  {:<22}{}\n", s.log_id, s.name, s.title));
    }
    out.push_str("\nKnown log identifiers:\n");
    for (lid, description) in described_log_ids() {
        out.push_str(&format!("  0x{lid:02x}  {description}\n"));
    }
    out
}

fn emit(report: &Report) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(report.output.as_bytes())?;
    stdout.flush()?;

    let mut stderr = std::io::stderr().lock();
    for line in &report.diagnostics {
        writeln!(stderr, "{line}")?;
    }
    Ok(())
}

/// Process exit codes are one byte.
fn clamp_status(status: i32) -> u8 {
    u8::try_from(status).unwrap_or(1)
}

fn parse_log_id(s: &str) -> std::result::Result<u8, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse::<u8>(),
    };
    parsed.map_err(|e| format!("invalid log id '{s}': {e}"))
}
