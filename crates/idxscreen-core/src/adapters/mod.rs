//! Upstream market data adapters.

mod yahoo;

pub use yahoo::YahooChartAdapter;
