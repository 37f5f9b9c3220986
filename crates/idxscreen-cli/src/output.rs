//! Result rendering.
//!
//! Three shapes of the same report: an aligned text table for terminals,
//! a JSON object for pipelines, and CSV rows for spreadsheet handoff.
//! Skipped instruments appear in every shape; they are part of the run's
//! outcome, not an error condition.

use idxscreen_core::runner::RunReport;
use idxscreen_core::{ScreeningResult, TickerRegistry};

use crate::cli::OutputFormat;
use crate::error::CliError;

pub fn render_report(
    report: &RunReport,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(report)?
            } else {
                serde_json::to_string(report)?
            };
            println!("{payload}");
        }
        OutputFormat::Csv => print!("{}", report_csv(report)),
        OutputFormat::Table => print!("{}", report_table(report)),
    }
    Ok(())
}

pub fn render_universe(
    registry: &TickerRegistry,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(registry.instruments())?
            } else {
                serde_json::to_string(registry.instruments())?
            };
            println!("{payload}");
        }
        OutputFormat::Csv => {
            println!("symbol,name,sector");
            for instrument in registry.iter() {
                println!(
                    "{},{},{}",
                    instrument.symbol,
                    csv_field(&instrument.name),
                    csv_field(instrument.sector.as_deref().unwrap_or(""))
                );
            }
        }
        OutputFormat::Table => {
            println!("{:<10}  {:<32}  {}", "SYMBOL", "NAME", "SECTOR");
            for instrument in registry.iter() {
                println!(
                    "{:<10}  {:<32}  {}",
                    instrument.symbol.as_str(),
                    instrument.name,
                    instrument.sector.as_deref().unwrap_or("-")
                );
            }
            println!("{} instruments", registry.len());
        }
    }
    Ok(())
}

fn report_table(report: &RunReport) -> String {
    let mut out = String::new();
    if report.results.is_empty() {
        out.push_str("No instruments matched the screen.\n");
    } else {
        out.push_str(&format!(
            "{:<10}  {:<28}  {:>10}  {:<18}  {}\n",
            "SYMBOL", "NAME", "CLOSE", "CHANGES", "TRADED VALUE"
        ));
        for result in &report.results {
            out.push_str(&format!(
                "{:<10}  {:<28}  {:>10.2}  {:<18}  {}\n",
                result.symbol.as_str(),
                truncate(&result.name, 28),
                result.latest_close,
                changes_column(result),
                result.traded_value_display
            ));
            if let Some(indicators) = &result.indicators {
                out.push_str(&format!(
                    "{:<10}  rsi14={} sma20={} ema20={} vol_trend={}\n",
                    "",
                    opt_column(indicators.rsi_14),
                    opt_column(indicators.sma_20),
                    opt_column(indicators.ema_20),
                    indicators
                        .volume_trend_pct
                        .map(|v| format!("{v:+.1}%"))
                        .unwrap_or_else(|| "-".into())
                ));
            }
        }
    }
    out.push_str(&format!(
        "{} matched, {} skipped, {} attempted\n",
        report.results.len(),
        report.skipped.len(),
        report.attempted
    ));
    for skipped in &report.skipped {
        out.push_str(&format!(
            "skipped {}: {} ({})\n",
            skipped.symbol, skipped.message, skipped.code
        ));
    }
    out
}

fn report_csv(report: &RunReport) -> String {
    let with_indicators = report
        .results
        .iter()
        .any(|result| result.indicators.is_some());

    let mut out = String::from(
        "symbol,name,latest_close,daily_changes_pct,traded_value,traded_value_display",
    );
    if with_indicators {
        out.push_str(",rsi_14,sma_20,ema_20,volume_trend_pct");
    }
    out.push('\n');

    for result in &report.results {
        out.push_str(&format!(
            "{},{},{:.2},{},{:.0},{}",
            result.symbol,
            csv_field(&result.name),
            result.latest_close,
            csv_field(&changes_column(result)),
            result.traded_value,
            csv_field(&result.traded_value_display)
        ));
        if with_indicators {
            let indicators = result.indicators.unwrap_or_default();
            out.push_str(&format!(
                ",{},{},{},{}",
                opt_column(indicators.rsi_14),
                opt_column(indicators.sma_20),
                opt_column(indicators.ema_20),
                opt_column(indicators.volume_trend_pct)
            ));
        }
        out.push('\n');
    }
    out
}

fn changes_column(result: &ScreeningResult) -> String {
    result
        .daily_changes_pct
        .iter()
        .map(|change| format!("{change:+.2}%"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn opt_column(value: Option<f64>) -> String {
    value
        .map(|v| format!("{v:.2}"))
        .unwrap_or_else(|| "-".into())
}

fn csv_field(raw: &str) -> String {
    if raw.contains(',') || raw.contains('"') || raw.contains('\n') {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_owned()
    }
}

fn truncate(raw: &str, max: usize) -> String {
    if raw.chars().count() <= max {
        raw.to_owned()
    } else {
        let cut: String = raw.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}
