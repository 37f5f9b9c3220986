//! Yahoo Finance chart adapter.
//!
//! Fetches daily OHLCV series from the public v8 chart endpoint, the same
//! upstream the IDX tickers are quoted on (`<code>.JK`). Over a mock
//! transport the adapter serves deterministic seeded series so the whole
//! pipeline can run offline.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;
use time::macros::date;
use time::{Date, Weekday};

use crate::data_source::{FetchError, MarketData, SeriesRequest};
use crate::http_client::{HttpClient, HttpRequest, NoopHttpClient};
use crate::{Instrument, PriceBar, PriceSeries, Symbol, TradeDate};

const CHART_BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Market data adapter backed by the Yahoo chart API.
#[derive(Clone)]
pub struct YahooChartAdapter {
    http_client: Arc<dyn HttpClient>,
    timeout_ms: u64,
}

impl Default for YahooChartAdapter {
    fn default() -> Self {
        Self {
            http_client: Arc::new(NoopHttpClient),
            timeout_ms: 10_000,
        }
    }
}

impl YahooChartAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            timeout_ms: 10_000,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    fn is_real_client(&self) -> bool {
        !self.http_client.is_mock()
    }

    async fn fetch_real_series(&self, req: &SeriesRequest) -> Result<PriceSeries, FetchError> {
        let endpoint = format!(
            "{}/{}?interval=1d&range={}d",
            CHART_BASE_URL,
            urlencoding::encode(req.instrument.symbol.as_str()),
            req.lookback_days
        );

        let request = HttpRequest::get(&endpoint)
            .with_header("accept", "application/json")
            .with_timeout_ms(self.timeout_ms);

        let response = self.http_client.execute(request).await.map_err(|error| {
            FetchError::transient(format!("yahoo transport error: {}", error.message()))
        })?;

        if response.status == 404 {
            return Err(FetchError::data_unavailable(format!(
                "yahoo has no chart data for '{}'",
                req.instrument.symbol
            )));
        }
        if !response.is_success() {
            return Err(FetchError::transient(format!(
                "yahoo returned status {}",
                response.status
            )));
        }

        parse_chart_body(&response.body, &req.instrument)
    }

    /// Deterministic seeded series for offline runs: weekday sessions
    /// ending at a fixed anchor date, priced from a per-symbol seed.
    fn fake_series(&self, req: &SeriesRequest) -> Result<PriceSeries, FetchError> {
        const ANCHOR: Date = date!(2024 - 06 - 28);

        let seed = symbol_seed(&req.instrument.symbol);
        let session_count = req.lookback_days.min(120) as usize;

        let mut dates = Vec::with_capacity(session_count);
        let mut cursor = ANCHOR;
        while dates.len() < session_count {
            if !matches!(cursor.weekday(), Weekday::Saturday | Weekday::Sunday) {
                dates.push(cursor);
            }
            cursor = cursor.previous_day().ok_or_else(|| {
                FetchError::data_unavailable("fake calendar exhausted")
            })?;
        }
        dates.reverse();

        let base = 500.0 + (seed % 9_500) as f64;
        let mut close = base;
        let mut bars = Vec::with_capacity(session_count);
        for (index, day) in dates.iter().enumerate() {
            // Drift in [-1.5%, +1.5%], deterministic per symbol and day.
            let step = ((seed.wrapping_mul(31).wrapping_add(index as u64 * 17)) % 31) as f64;
            let drift_pct = (step - 15.0) / 10.0;
            let open = close;
            close = (open * (1.0 + drift_pct / 100.0)).max(1.0);
            let high = open.max(close) * 1.004;
            let low = open.min(close) * 0.996;
            let volume = 1_000_000 + (seed.wrapping_add(index as u64 * 97) % 40_000_000);

            let bar = PriceBar::new(TradeDate::from_date(*day), open, high, low, close, volume)
                .map_err(|error| {
                    FetchError::data_unavailable(format!("fake bar invalid: {error}"))
                })?;
            bars.push(bar);
        }

        PriceSeries::new(req.instrument.clone(), bars)
            .map_err(|error| FetchError::data_unavailable(format!("fake series invalid: {error}")))
    }
}

impl MarketData for YahooChartAdapter {
    fn daily_series<'a>(
        &'a self,
        req: SeriesRequest,
    ) -> Pin<Box<dyn Future<Output = Result<PriceSeries, FetchError>> + Send + 'a>> {
        Box::pin(async move {
            if self.is_real_client() {
                self.fetch_real_series(&req).await
            } else {
                self.fake_series(&req)
            }
        })
    }
}

/// Parse the chart JSON envelope into a validated series.
fn parse_chart_body(body: &str, instrument: &Instrument) -> Result<PriceSeries, FetchError> {
    let chart_response: YahooChartResponse = serde_json::from_str(body)
        .map_err(|e| FetchError::transient(format!("failed to parse yahoo chart: {e}")))?;

    if let Some(error) = &chart_response.chart.error {
        // "Not Found" / "No data found, symbol may be delisted"
        return Err(FetchError::data_unavailable(format!(
            "yahoo chart error for '{}': {} ({})",
            instrument.symbol, error.description, error.code
        )));
    }

    let result = chart_response
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| {
            FetchError::data_unavailable(format!(
                "yahoo chart returned no result for '{}'",
                instrument.symbol
            ))
        })?;

    let timestamps = result.timestamp.unwrap_or_default();
    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| FetchError::data_unavailable("yahoo chart carried no quote block"))?;

    let mut bars: Vec<PriceBar> = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        let date = match TradeDate::from_unix_timestamp(ts) {
            Ok(date) => date,
            Err(_) => continue,
        };

        // Null slots happen on half-days and suspended sessions; skip them.
        if let (Some(Some(open)), Some(Some(high)), Some(Some(low)), Some(Some(close))) = (
            quote.open.get(i),
            quote.high.get(i),
            quote.low.get(i),
            quote.close.get(i),
        ) {
            let volume = quote
                .volume
                .get(i)
                .copied()
                .flatten()
                .and_then(|v| u64::try_from(v).ok())
                .unwrap_or(0);

            if let Ok(bar) = PriceBar::new(date, *open, *high, *low, *close, volume) {
                bars.push(bar);
            }
        }
    }

    bars.sort_by_key(|bar| bar.date);
    // Same-date duplicates collapse to the first observation of the session.
    bars.dedup_by_key(|bar| bar.date);

    if bars.len() < 2 {
        return Err(FetchError::data_unavailable(format!(
            "yahoo returned fewer than 2 usable bars for '{}'",
            instrument.symbol
        )));
    }

    PriceSeries::new(instrument.clone(), bars).map_err(|error| {
        FetchError::data_unavailable(format!(
            "yahoo series for '{}' failed validation: {error}",
            instrument.symbol
        ))
    })
}

fn symbol_seed(symbol: &Symbol) -> u64 {
    symbol
        .as_str()
        .bytes()
        .fold(0u64, |acc, byte| acc.wrapping_mul(131).wrapping_add(u64::from(byte)))
}

// ============================================================================
// Chart API response structures
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResponse {
    chart: YahooChartData,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartData {
    #[serde(default)]
    result: Option<Vec<YahooChartResult>>,
    #[serde(default)]
    error: Option<YahooChartError>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: YahooChartIndicators,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartIndicators {
    quote: Vec<YahooChartQuote>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartQuote {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<i64>>,
}
