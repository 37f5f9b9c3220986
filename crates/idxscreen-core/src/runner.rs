//! Run orchestrator.
//!
//! Walks the universe, fetches each instrument's series, evaluates the
//! momentum filter and collects the survivors. Every instrument is
//! attempted independently: a fetch failure is recorded and skipped, never
//! fatal. A run that qualifies nothing is a normal outcome.

use std::sync::Arc;

use futures_util::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{debug, warn};

use crate::data_source::{FetchError, MarketData, SeriesRequest, DEFAULT_LOOKBACK_DAYS};
use crate::indicators::IndicatorSet;
use crate::registry::TickerRegistry;
use crate::retry::RetryPolicy;
use crate::screen::{evaluate, ScreenParams, ScreeningResult};
use crate::throttle::FetchPacer;
use crate::{Instrument, Symbol};

/// Per-run execution knobs, distinct from the screening thresholds.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    pub lookback_days: u32,
    pub with_indicators: bool,
    /// Maximum in-flight fetch+evaluate pipelines. 1 is the reference
    /// single-pass behavior.
    pub concurrency: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            with_indicators: false,
            concurrency: 1,
        }
    }
}

/// One instrument the run could not evaluate, with the fetch error that
/// caused the skip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedInstrument {
    pub symbol: Symbol,
    pub code: &'static str,
    pub message: String,
}

/// Final artifact of one screening pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    /// Qualifying instruments, traded value descending then symbol.
    pub results: Vec<ScreeningResult>,
    /// Instruments whose fetch failed, symbol ascending.
    pub skipped: Vec<SkippedInstrument>,
    pub attempted: usize,
}

/// Drives one screening pass over a registry.
pub struct ScreenRunner {
    source: Arc<dyn MarketData>,
    pacer: FetchPacer,
    retry: RetryPolicy,
}

impl ScreenRunner {
    pub fn new(source: Arc<dyn MarketData>) -> Self {
        Self {
            source,
            pacer: FetchPacer::unlimited(),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_pacer(mut self, pacer: FetchPacer) -> Self {
        self.pacer = pacer;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Screen every instrument in the registry.
    ///
    /// Infallible by construction: fetch failures land in
    /// [`RunReport::skipped`] and the rest of the universe still runs.
    pub async fn run_screen(
        &self,
        registry: &TickerRegistry,
        params: &ScreenParams,
        opts: &RunOptions,
    ) -> RunReport {
        let attempted = registry.len();
        let concurrency = opts.concurrency.max(1);

        let outcomes: Vec<(Symbol, Result<Option<ScreeningResult>, FetchError>)> =
            stream::iter(registry.iter().cloned())
                .map(|instrument| async move {
                    let symbol = instrument.symbol.clone();
                    let outcome = self.screen_one(instrument, params, opts).await;
                    (symbol, outcome)
                })
                .buffer_unordered(concurrency)
                .collect()
                .await;

        let mut results = Vec::new();
        let mut skipped = Vec::new();
        for (symbol, outcome) in outcomes {
            match outcome {
                Ok(Some(result)) => results.push(result),
                Ok(None) => {}
                Err(error) => {
                    warn!(
                        symbol = %symbol,
                        code = error.code(),
                        "skipping instrument: {}",
                        error.message()
                    );
                    skipped.push(SkippedInstrument {
                        symbol,
                        code: error.code(),
                        message: error.message().to_owned(),
                    });
                }
            }
        }

        // Deterministic presentation order regardless of completion order.
        results.sort_by(|a, b| {
            b.traded_value
                .total_cmp(&a.traded_value)
                .then_with(|| a.symbol.cmp(&b.symbol))
        });
        skipped.sort_by(|a, b| a.symbol.cmp(&b.symbol));

        RunReport {
            results,
            skipped,
            attempted,
        }
    }

    /// Fetch and evaluate a single instrument, retrying transient fetch
    /// failures per the policy.
    async fn screen_one(
        &self,
        instrument: Instrument,
        params: &ScreenParams,
        opts: &RunOptions,
    ) -> Result<Option<ScreeningResult>, FetchError> {
        let request = SeriesRequest::new(instrument, opts.lookback_days)?;

        let mut attempt = 0u32;
        let series = loop {
            self.pacer.acquire().await;
            debug!(symbol = %request.instrument.symbol, attempt, "fetching daily series");

            match self.source.daily_series(request.clone()).await {
                Ok(series) => break series,
                Err(error) if self.retry.should_retry(attempt, &error) => {
                    let delay = self.retry.delay(attempt);
                    debug!(
                        symbol = %request.instrument.symbol,
                        code = error.code(),
                        delay_ms = delay.as_millis() as u64,
                        "transient fetch failure, backing off"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(error) => return Err(error),
            }
        };

        let mut result = match evaluate(&series, params) {
            Some(result) => result,
            None => return Ok(None),
        };

        if opts.with_indicators {
            result = result.with_indicators(IndicatorSet::from_series(&series));
        }

        Ok(Some(result))
    }
}
