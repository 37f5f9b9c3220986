use std::sync::Arc;

use tracing::info;

use idxscreen_core::{
    FetchPacer, RunOptions, ScreenParams, ScreenRunner, YahooChartAdapter, INDICATOR_LOOKBACK_DAYS,
};

use crate::cli::{Cli, ScanArgs};
use crate::error::CliError;
use crate::output;

use super::{http_client, resolve_registry};

pub async fn run(cli: &Cli, args: &ScanArgs) -> Result<(), CliError> {
    let params = ScreenParams::new(
        args.gain_pct,
        args.min_value_bn * 1_000_000_000.0,
        args.days,
    )?;

    let client = http_client(args.offline);
    let registry = resolve_registry(
        &client,
        args.universe.as_deref(),
        args.offline,
        cli.timeout_ms,
    )
    .await?;

    // Indicators need months of history, not the screening window.
    let lookback_days = if args.indicators {
        args.lookback.max(INDICATOR_LOOKBACK_DAYS)
    } else {
        args.lookback
    };
    let opts = RunOptions {
        lookback_days,
        with_indicators: args.indicators,
        concurrency: args.concurrency,
    };

    let adapter = YahooChartAdapter::new(client).with_timeout_ms(cli.timeout_ms);
    let pacer = if args.offline {
        FetchPacer::unlimited()
    } else {
        FetchPacer::default()
    };
    let runner = ScreenRunner::new(Arc::new(adapter)).with_pacer(pacer);

    info!(
        universe = registry.len(),
        consecutive_days = params.consecutive_days,
        "running momentum screen"
    );
    let report = runner.run_screen(&registry, &params, &opts).await;

    output::render_report(&report, cli.format, cli.pretty)
}
