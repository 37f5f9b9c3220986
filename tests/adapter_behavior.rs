//! Behavior-driven tests for the Yahoo chart adapter over a scripted
//! transport.
//!
//! The scripted client reports `is_mock() == false`, so the adapter takes
//! its real fetch-and-parse path against canned HTTP responses.

use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

use idxscreen_core::data_source::FetchErrorKind;
use idxscreen_core::{
    HttpClient, HttpError, HttpRequest, HttpResponse, MarketData, SeriesRequest,
    YahooChartAdapter,
};
use idxscreen_tests::{instrument, Arc};

/// Transport stub replaying a fixed response (or transport error) and
/// recording the URLs it was asked for.
struct ScriptedHttpClient {
    response: Result<HttpResponse, HttpError>,
    requested_urls: Mutex<Vec<String>>,
}

impl ScriptedHttpClient {
    fn replying(response: HttpResponse) -> Self {
        Self {
            response: Ok(response),
            requested_urls: Mutex::new(Vec::new()),
        }
    }

    fn failing(error: HttpError) -> Self {
        Self {
            response: Err(error),
            requested_urls: Mutex::new(Vec::new()),
        }
    }

    fn requested_urls(&self) -> Vec<String> {
        self.requested_urls
            .lock()
            .expect("url log lock poisoned")
            .clone()
    }
}

impl HttpClient for ScriptedHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        Box::pin(async move {
            self.requested_urls
                .lock()
                .expect("url log lock poisoned")
                .push(request.url.clone());
            self.response.clone()
        })
    }
}

fn chart_body() -> &'static str {
    // Three weekday sessions ending 2024-06-28, closes stepping +2%.
    r#"{
        "chart": {
            "result": [{
                "timestamp": [1719360000, 1719446400, 1719532800],
                "indicators": {
                    "quote": [{
                        "open":   [1000.0, 1000.0, 1020.0],
                        "high":   [1012.0, 1030.0, 1050.0],
                        "low":    [995.0,  998.0,  1018.0],
                        "close":  [1000.0, 1020.0, 1040.4],
                        "volume": [25000000, 30000000, 35000000]
                    }]
                }
            }],
            "error": null
        }
    }"#
}

fn request(symbol: &str) -> SeriesRequest {
    SeriesRequest::new(instrument(symbol), 5).expect("valid request")
}

// =============================================================================
// Adapter: Real Transport Path
// =============================================================================

#[tokio::test]
async fn when_upstream_serves_a_chart_the_adapter_returns_a_validated_series() {
    // Given: a non-mock transport replaying a healthy chart payload
    let client = Arc::new(ScriptedHttpClient::replying(HttpResponse::ok_json(
        chart_body(),
    )));
    let adapter = YahooChartAdapter::new(Arc::clone(&client) as _);

    // When: a daily series is fetched
    let series = adapter
        .daily_series(request("BBCA.JK"))
        .await
        .expect("healthy payload must parse");

    // Then: the series is ordered and carries the upstream closes
    assert_eq!(series.len(), 3);
    assert_eq!(series.latest().close, 1040.4);
    assert_eq!(series.latest().volume, 35_000_000);
    for window in series.bars().windows(2) {
        assert!(window[0].date < window[1].date);
    }
}

#[tokio::test]
async fn the_adapter_requests_the_chart_endpoint_with_symbol_and_range() {
    let client = Arc::new(ScriptedHttpClient::replying(HttpResponse::ok_json(
        chart_body(),
    )));
    let adapter = YahooChartAdapter::new(Arc::clone(&client) as _);

    adapter
        .daily_series(request("BBCA.JK"))
        .await
        .expect("healthy payload must parse");

    let urls = client.requested_urls();
    assert_eq!(urls.len(), 1);
    assert!(urls[0].contains("/v8/finance/chart/BBCA.JK"));
    assert!(urls[0].contains("interval=1d"));
    assert!(urls[0].contains("range=5d"));
}

// =============================================================================
// Adapter: Failure Classification
// =============================================================================

#[tokio::test]
async fn a_404_means_the_symbol_has_no_data() {
    let client = Arc::new(ScriptedHttpClient::replying(HttpResponse {
        status: 404,
        body: String::new(),
    }));
    let adapter = YahooChartAdapter::new(client as _);

    let err = adapter
        .daily_series(request("XXXX.JK"))
        .await
        .expect_err("404 must fail");
    assert_eq!(err.kind(), FetchErrorKind::DataUnavailable);
    assert!(!err.retryable());
}

#[tokio::test]
async fn an_upstream_500_is_transient_and_retryable() {
    let client = Arc::new(ScriptedHttpClient::replying(HttpResponse {
        status: 500,
        body: String::new(),
    }));
    let adapter = YahooChartAdapter::new(client as _);

    let err = adapter
        .daily_series(request("BBCA.JK"))
        .await
        .expect_err("500 must fail");
    assert_eq!(err.kind(), FetchErrorKind::Transient);
    assert!(err.retryable());
}

#[tokio::test]
async fn a_transport_timeout_is_transient_and_retryable() {
    let client = Arc::new(ScriptedHttpClient::failing(HttpError::new(
        "request timed out",
    )));
    let adapter = YahooChartAdapter::new(client as _);

    let err = adapter
        .daily_series(request("BBCA.JK"))
        .await
        .expect_err("timeout must fail");
    assert_eq!(err.kind(), FetchErrorKind::Transient);
    assert!(err.message().contains("timed out"));
}

#[tokio::test]
async fn a_delisted_symbol_error_body_is_data_unavailable() {
    let body = r#"{
        "chart": {
            "result": null,
            "error": {
                "code": "Not Found",
                "description": "No data found, symbol may be delisted"
            }
        }
    }"#;
    let client = Arc::new(ScriptedHttpClient::replying(HttpResponse::ok_json(body)));
    let adapter = YahooChartAdapter::new(client as _);

    let err = adapter
        .daily_series(request("XXXX.JK"))
        .await
        .expect_err("delisted must fail");
    assert_eq!(err.kind(), FetchErrorKind::DataUnavailable);
}
