//! Momentum filter.
//!
//! The decision logic of the whole system: a pure, stateless evaluation of
//! one instrument's daily series against the consecutive-gain and
//! traded-value thresholds. A series that cannot be evaluated (too short,
//! malformed closes) fails the filter; it never raises an error.

use serde::Serialize;

use crate::format::format_rupiah;
use crate::indicators::IndicatorSet;
use crate::{PriceSeries, Symbol, ValidationError};

pub const DEFAULT_MIN_DAILY_GAIN_PCT: f64 = 2.0;
pub const DEFAULT_MIN_TRADED_VALUE: f64 = 15_000_000_000.0;
pub const DEFAULT_CONSECUTIVE_DAYS: usize = 2;

const MIN_CONSECUTIVE_DAYS: usize = 2;
const MAX_CONSECUTIVE_DAYS: usize = 5;

/// Screening thresholds. Both thresholds are inclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenParams {
    pub min_daily_gain_pct: f64,
    pub min_traded_value: f64,
    pub consecutive_days: usize,
}

impl Default for ScreenParams {
    fn default() -> Self {
        Self {
            min_daily_gain_pct: DEFAULT_MIN_DAILY_GAIN_PCT,
            min_traded_value: DEFAULT_MIN_TRADED_VALUE,
            consecutive_days: DEFAULT_CONSECUTIVE_DAYS,
        }
    }
}

impl ScreenParams {
    pub fn new(
        min_daily_gain_pct: f64,
        min_traded_value: f64,
        consecutive_days: usize,
    ) -> Result<Self, ValidationError> {
        if !min_daily_gain_pct.is_finite() || min_daily_gain_pct <= 0.0 {
            return Err(ValidationError::InvalidGainThreshold {
                value: min_daily_gain_pct,
            });
        }
        if !min_traded_value.is_finite() || min_traded_value < 0.0 {
            return Err(ValidationError::InvalidValueThreshold {
                value: min_traded_value,
            });
        }
        if !(MIN_CONSECUTIVE_DAYS..=MAX_CONSECUTIVE_DAYS).contains(&consecutive_days) {
            return Err(ValidationError::InvalidConsecutiveDays {
                value: consecutive_days,
                min: MIN_CONSECUTIVE_DAYS,
                max: MAX_CONSECUTIVE_DAYS,
            });
        }
        Ok(Self {
            min_daily_gain_pct,
            min_traded_value,
            consecutive_days,
        })
    }

    /// Bars needed to compute `consecutive_days` day-over-day changes.
    pub const fn required_bars(&self) -> usize {
        self.consecutive_days + 1
    }
}

/// Read-only record emitted for each qualifying instrument.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreeningResult {
    pub symbol: Symbol,
    pub name: String,
    pub latest_close: f64,
    /// Day-over-day percentage changes, oldest to newest.
    pub daily_changes_pct: Vec<f64>,
    pub traded_value: f64,
    pub traded_value_display: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indicators: Option<IndicatorSet>,
}

impl ScreeningResult {
    pub fn with_indicators(mut self, indicators: IndicatorSet) -> Self {
        self.indicators = Some(indicators);
        self
    }
}

/// Evaluate one series against the thresholds.
///
/// Returns `Some(ScreeningResult)` only when every one of the most recent
/// `consecutive_days` day-over-day changes is at least
/// `min_daily_gain_pct` and the latest session's traded value is at least
/// `min_traded_value`. Everything else, including series too short to
/// evaluate and malformed prior closes, returns `None`.
pub fn evaluate(series: &PriceSeries, params: &ScreenParams) -> Option<ScreeningResult> {
    let bars = series.bars();
    if bars.len() < params.required_bars() {
        return None;
    }

    let recent = &bars[bars.len() - params.required_bars()..];
    let mut changes = Vec::with_capacity(params.consecutive_days);
    for window in recent.windows(2) {
        let prev = window[0].close;
        let next = window[1].close;
        // Non-positive prior close makes the change undefined.
        if !prev.is_finite() || prev <= 0.0 || !next.is_finite() {
            return None;
        }
        changes.push((next - prev) / prev * 100.0);
    }

    if changes.iter().any(|pct| *pct < params.min_daily_gain_pct) {
        return None;
    }

    let latest = series.latest();
    let traded_value = latest.traded_value();
    if traded_value < params.min_traded_value {
        return None;
    }

    let instrument = series.instrument();
    Some(ScreeningResult {
        symbol: instrument.symbol.clone(),
        name: instrument.name.clone(),
        latest_close: latest.close,
        daily_changes_pct: changes,
        traded_value,
        traded_value_display: format_rupiah(traded_value),
        indicators: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Instrument, PriceBar, TradeDate};

    fn series(closes: &[f64], last_volume: u64) -> PriceSeries {
        let mut bars = Vec::with_capacity(closes.len());
        for (i, &close) in closes.iter().enumerate() {
            let date = TradeDate::from_unix_timestamp(1_717_200_000 + i as i64 * 86_400)
                .expect("valid date");
            let volume = if i == closes.len() - 1 { last_volume } else { 1_000 };
            bars.push(
                PriceBar::new(date, close, close * 1.01, close * 0.99, close, volume)
                    .expect("valid bar"),
            );
        }
        let instrument = Instrument::new(
            Symbol::parse("BBCA.JK").expect("valid"),
            "Bank Central Asia",
            None,
        )
        .expect("valid instrument");
        PriceSeries::new(instrument, bars).expect("valid series")
    }

    #[test]
    fn two_consecutive_gains_with_liquidity_pass() {
        // Scenario A: 2.0% then 2.0%, traded value 20.808B.
        let series = series(&[100.0, 100.0, 102.0, 104.04], 200_000_000);
        let result = evaluate(&series, &ScreenParams::default()).expect("must pass");

        assert_eq!(result.daily_changes_pct.len(), 2);
        assert!((result.daily_changes_pct[0] - 2.0).abs() < 1e-9);
        assert!((result.daily_changes_pct[1] - 2.0).abs() < 1e-9);
        assert!((result.traded_value - 20_808_000_000.0).abs() < 1.0);
        assert_eq!(result.traded_value_display, "Rp 20.81 M");
        assert_eq!(result.latest_close, 104.04);
    }

    #[test]
    fn sub_threshold_day_fails_regardless_of_volume() {
        // Scenario B: day2 change is 1.5%.
        let series = series(&[100.0, 100.0, 101.5, 103.0], u64::MAX / 2);
        assert_eq!(evaluate(&series, &ScreenParams::default()), None);
    }

    #[test]
    fn momentum_without_liquidity_fails() {
        // Scenario C: both gains pass, traded value 52.02M < 15B.
        let series = series(&[50.0, 51.0, 52.02], 1_000_000);
        assert_eq!(evaluate(&series, &ScreenParams::default()), None);
    }

    #[test]
    fn gain_threshold_is_inclusive() {
        // Both changes are exactly 2.0%.
        let series = series(&[100.0, 102.0, 104.04], 1_000_000_000);
        assert!(evaluate(&series, &ScreenParams::default()).is_some());
    }

    #[test]
    fn traded_value_threshold_is_inclusive() {
        // Traded value is exactly 15,000,000,000 (150.0 x 100,000,000).
        let params = ScreenParams::default();
        let series = series(&[100.0, 120.0, 150.0], 100_000_000);
        let result = evaluate(&series, &params).expect("inclusive threshold must pass");
        assert_eq!(result.traded_value, params.min_traded_value);
    }

    #[test]
    fn gain_just_below_threshold_fails() {
        let series = series(&[100.0, 101.99, 104.0299], 1_000_000_000);
        assert_eq!(evaluate(&series, &ScreenParams::default()), None);
    }

    #[test]
    fn short_series_cannot_be_evaluated() {
        let series = series(&[100.0, 102.0], 1_000_000_000);
        assert_eq!(evaluate(&series, &ScreenParams::default()), None);
    }

    #[test]
    fn evaluation_is_idempotent() {
        let series = series(&[100.0, 102.5, 105.1], 500_000_000);
        let params = ScreenParams::default();
        assert_eq!(evaluate(&series, &params), evaluate(&series, &params));
    }

    #[test]
    fn longer_streak_requires_more_bars() {
        let params = ScreenParams::new(2.0, 1_000.0, 3).expect("valid params");
        // Three bars only support two changes.
        let series = series(&[100.0, 102.5, 105.1], 500_000_000);
        assert_eq!(evaluate(&series, &params), None);

        let series = self::series(&[97.0, 100.0, 102.5, 105.1], 500_000_000);
        assert!(evaluate(&series, &params).is_some());
    }

    #[test]
    fn params_validation_rejects_out_of_range() {
        assert!(matches!(
            ScreenParams::new(0.0, 1.0, 2),
            Err(ValidationError::InvalidGainThreshold { .. })
        ));
        assert!(matches!(
            ScreenParams::new(2.0, -1.0, 2),
            Err(ValidationError::InvalidValueThreshold { .. })
        ));
        assert!(matches!(
            ScreenParams::new(2.0, 1.0, 1),
            Err(ValidationError::InvalidConsecutiveDays { .. })
        ));
        assert!(matches!(
            ScreenParams::new(2.0, 1.0, 6),
            Err(ValidationError::InvalidConsecutiveDays { .. })
        ));
    }
}
