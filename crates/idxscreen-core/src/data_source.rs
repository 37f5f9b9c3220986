//! Market data fetch contract.
//!
//! [`MarketData`] is the external-collaborator boundary of the screener: an
//! adapter takes an instrument plus a lookback window and returns its daily
//! [`PriceSeries`]. Failures are classified so the orchestrator can decide
//! to retry or to skip the instrument; no fetch failure ever aborts a run.

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use crate::{Instrument, PriceSeries};

/// Default lookback window in calendar days. Five tolerates weekends and
/// holidays while still covering the two-session momentum check.
pub const DEFAULT_LOOKBACK_DAYS: u32 = 5;

/// Lookback the CLI requests when technical indicators are enabled,
/// covering the 20-period indicators comfortably.
pub const INDICATOR_LOOKBACK_DAYS: u32 = 90;

/// Fetch failure classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// Upstream has no usable series for the identifier (unknown or
    /// delisted symbol, empty payload, fewer than 2 usable bars).
    DataUnavailable,
    /// Network failure, rate limit, upstream 5xx or a fired timeout.
    Transient,
    /// Malformed request. Unreachable from the validating constructors.
    InvalidRequest,
}

/// Structured fetch error carried back to the run orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    kind: FetchErrorKind,
    message: String,
    retryable: bool,
}

impl FetchError {
    pub fn data_unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::DataUnavailable,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn transient(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::Transient,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::InvalidRequest,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> FetchErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            FetchErrorKind::DataUnavailable => "fetch.data_unavailable",
            FetchErrorKind::Transient => "fetch.transient",
            FetchErrorKind::InvalidRequest => "fetch.invalid_request",
        }
    }
}

impl Display for FetchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for FetchError {}

/// Request payload for the daily series endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesRequest {
    pub instrument: Instrument,
    pub lookback_days: u32,
}

impl SeriesRequest {
    /// At least two full sessions are needed for any day-over-day check.
    pub fn new(instrument: Instrument, lookback_days: u32) -> Result<Self, FetchError> {
        if lookback_days < 2 {
            return Err(FetchError::invalid_request(
                "series request lookback must cover at least 2 days",
            ));
        }
        Ok(Self {
            instrument,
            lookback_days,
        })
    }
}

/// Market data adapter contract.
///
/// Result guarantee: bars ordered oldest to newest, one bar per date, each
/// bar carrying close and volume. The guarantee is structural: adapters
/// return [`PriceSeries`], whose constructor enforces it.
pub trait MarketData: Send + Sync {
    /// Fetch the daily series for one instrument.
    ///
    /// # Errors
    ///
    /// [`FetchError::data_unavailable`] when the upstream has no usable
    /// series, [`FetchError::transient`] on network, rate limit or timeout
    /// failures. Both mean "skip this instrument", never "abort the run".
    fn daily_series<'a>(
        &'a self,
        req: SeriesRequest,
    ) -> Pin<Box<dyn Future<Output = Result<PriceSeries, FetchError>> + Send + 'a>>;
}
