//! CLI argument definitions for idxscreen.
//!
//! The CLI has two commands: `scan` runs the momentum screen over an IDX
//! universe, `universe` prints the resolved universe without fetching any
//! prices.
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `table` | Output format (table, json, csv) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--timeout-ms` | `10000` | Per-request timeout in ms |
//!
//! # Examples
//!
//! ```bash
//! # Run the screen with the default thresholds
//! idxscreen scan
//!
//! # Looser thresholds, technical indicators attached
//! idxscreen scan --gain-pct 1.5 --min-value-bn 5 --indicators
//!
//! # A three-session streak over a custom universe file
//! idxscreen scan --days 3 --universe my_universe.json
//!
//! # Machine-readable output
//! idxscreen scan --format json --pretty
//! idxscreen scan --format csv > picks.csv
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Momentum screener for Indonesia Stock Exchange (IDX) equities.
///
/// Flags stocks whose closing price gained at least a threshold percentage
/// on each of N consecutive sessions while clearing a minimum traded-value
/// bar, using Yahoo Finance daily data.
#[derive(Debug, Parser)]
#[command(
    name = "idxscreen",
    author,
    version,
    about = "IDX consecutive-gain momentum screener"
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Per-request timeout budget in milliseconds.
    #[arg(long, global = true, default_value_t = 10_000)]
    pub timeout_ms: u64,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned text table for terminal display.
    Table,
    /// Single JSON object output.
    Json,
    /// Comma-separated values, one row per qualifying instrument.
    Csv,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the momentum screen over the universe.
    ///
    /// # Examples
    ///
    ///   idxscreen scan
    ///   idxscreen scan --gain-pct 3 --days 3 --indicators
    ///   idxscreen scan --universe my_universe.json --format csv
    Scan(ScanArgs),

    /// Print the resolved ticker universe.
    ///
    /// # Examples
    ///
    ///   idxscreen universe
    ///   idxscreen universe --offline --format json
    Universe(UniverseArgs),
}

/// Arguments for the `scan` command.
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Minimum traded value of the latest session, in billions of rupiah.
    #[arg(long, default_value_t = 15.0, value_parser = parse_value_bn)]
    pub min_value_bn: f64,

    /// Minimum day-over-day close gain in percent, required every session
    /// of the streak.
    #[arg(long, default_value_t = 2.0, value_parser = parse_gain_pct)]
    pub gain_pct: f64,

    /// Number of consecutive gaining sessions required.
    #[arg(long, default_value_t = 2, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(2..=5))]
    pub days: usize,

    /// Calendar days of history to request per instrument.
    #[arg(long, default_value_t = 5)]
    pub lookback: u32,

    /// Attach RSI, SMA, EMA and volume-trend indicators to each result.
    ///
    /// Widens the per-instrument lookback to cover the indicator periods.
    #[arg(long, default_value_t = false)]
    pub indicators: bool,

    /// Maximum concurrent fetches.
    #[arg(long, default_value_t = 1)]
    pub concurrency: usize,

    /// Path to a JSON universe file. Bundled IDX universe when omitted.
    #[arg(long)]
    pub universe: Option<String>,

    /// Serve deterministic synthetic data instead of calling upstream.
    #[arg(long, default_value_t = false)]
    pub offline: bool,
}

/// Arguments for the `universe` command.
#[derive(Debug, Args)]
pub struct UniverseArgs {
    /// Path to a JSON universe file. Bundled IDX universe when omitted.
    #[arg(long)]
    pub universe: Option<String>,

    /// Skip the remote IDX listing and use the bundled universe.
    #[arg(long, default_value_t = false)]
    pub offline: bool,
}

fn parse_value_bn(raw: &str) -> Result<f64, String> {
    let value: f64 = raw.parse().map_err(|_| format!("invalid number: {raw}"))?;
    if !(1.0..=100.0).contains(&value) {
        return Err(format!(
            "traded-value threshold must be between 1 and 100 billion rupiah, got {value}"
        ));
    }
    Ok(value)
}

fn parse_gain_pct(raw: &str) -> Result<f64, String> {
    let value: f64 = raw.parse().map_err(|_| format!("invalid number: {raw}"))?;
    if !(0.5..=10.0).contains(&value) {
        return Err(format!(
            "gain threshold must be between 0.5 and 10 percent, got {value}"
        ));
    }
    Ok(value)
}
