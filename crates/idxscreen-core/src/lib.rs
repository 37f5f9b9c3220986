//! Core contracts for idxscreen.
//!
//! This crate contains:
//! - Canonical domain models and validation
//! - The market data fetch contract and its Yahoo chart adapter
//! - The momentum screening filter and technical indicators
//! - The run orchestrator with retry and pacing around fetches
//! - The IDX ticker registry with a bundled universe

pub mod adapters;
pub mod data_source;
pub mod domain;
pub mod error;
pub mod format;
pub mod http_client;
pub mod indicators;
pub mod registry;
pub mod retry;
pub mod runner;
pub mod screen;
pub mod throttle;

pub use adapters::YahooChartAdapter;
pub use data_source::{
    FetchError, FetchErrorKind, MarketData, SeriesRequest, DEFAULT_LOOKBACK_DAYS,
    INDICATOR_LOOKBACK_DAYS,
};
pub use domain::{Instrument, PriceBar, PriceSeries, Symbol, TradeDate, IDX_SUFFIX};
pub use error::{CoreError, ValidationError};
pub use format::format_rupiah;
pub use http_client::{
    HttpClient, HttpError, HttpRequest, HttpResponse, NoopHttpClient, ReqwestHttpClient,
};
pub use indicators::IndicatorSet;
pub use registry::TickerRegistry;
pub use retry::RetryPolicy;
pub use runner::{RunOptions, RunReport, ScreenRunner, SkippedInstrument};
pub use screen::{
    evaluate, ScreenParams, ScreeningResult, DEFAULT_CONSECUTIVE_DAYS, DEFAULT_MIN_DAILY_GAIN_PCT,
    DEFAULT_MIN_TRADED_VALUE,
};
pub use throttle::FetchPacer;
