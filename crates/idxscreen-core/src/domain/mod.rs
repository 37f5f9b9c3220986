//! Canonical domain types for the screening run.
//!
//! All models follow the validated-constructor idiom: construction returns
//! `Result<_, ValidationError>` and invalid states are unrepresentable
//! afterwards.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Exchange-qualified ticker (`BBCA.JK`) |
//! | [`TradeDate`] | Calendar date of one session |
//! | [`Instrument`] | Registry metadata (symbol, name, sector) |
//! | [`PriceBar`] | One session's OHLCV record |
//! | [`PriceSeries`] | Date-ascending bars for one instrument |

mod date;
mod models;
mod symbol;

pub use date::TradeDate;
pub use models::{Instrument, PriceBar, PriceSeries};
pub use symbol::{Symbol, IDX_SUFFIX};
