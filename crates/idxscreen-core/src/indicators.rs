//! Technical indicator computations.
//!
//! Optional per-result enrichment over the longer indicator lookback.
//! Every function is a pure computation over slices and returns `None`
//! when the series is too short to support it.

use serde::Serialize;

use crate::PriceSeries;

pub const RSI_PERIOD: usize = 14;
pub const MOVING_AVERAGE_PERIOD: usize = 20;
pub const VOLUME_TREND_PERIOD: usize = 5;

/// Indicator snapshot attached to a screening result when requested.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct IndicatorSet {
    pub rsi_14: Option<f64>,
    pub sma_20: Option<f64>,
    pub ema_20: Option<f64>,
    pub volume_trend_pct: Option<f64>,
}

impl IndicatorSet {
    pub fn from_series(series: &PriceSeries) -> Self {
        let closes = series.closes();
        let volumes = series.volumes();
        Self {
            rsi_14: rsi(&closes, RSI_PERIOD),
            sma_20: sma(&closes, MOVING_AVERAGE_PERIOD),
            ema_20: ema(&closes, MOVING_AVERAGE_PERIOD),
            volume_trend_pct: volume_trend(&volumes, VOLUME_TREND_PERIOD),
        }
    }
}

/// Simple moving average of the trailing `period` closes.
pub fn sma(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || closes.len() < period {
        return None;
    }
    let window = &closes[closes.len() - period..];
    Some(window.iter().sum::<f64>() / period as f64)
}

/// Exponential moving average with span smoothing
/// (`alpha = 2 / (period + 1)`), seeded from the first close.
pub fn ema(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || closes.len() < period {
        return None;
    }
    let alpha = 2.0 / (period as f64 + 1.0);
    Some(ewm_last(closes, alpha))
}

/// Relative strength index with Wilder smoothing (`alpha = 1 / period`).
///
/// All-gain series pin at 100, all-loss at 0, a flat series at 50.
pub fn rsi(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || closes.len() < period + 1 {
        return None;
    }

    let deltas: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();
    let gains: Vec<f64> = deltas.iter().map(|d| d.max(0.0)).collect();
    let losses: Vec<f64> = deltas.iter().map(|d| (-d).max(0.0)).collect();

    let alpha = 1.0 / period as f64;
    let avg_gain = ewm_last(&gains, alpha);
    let avg_loss = ewm_last(&losses, alpha);

    if avg_loss == 0.0 {
        return Some(if avg_gain > 0.0 { 100.0 } else { 50.0 });
    }
    if avg_gain == 0.0 {
        return Some(0.0);
    }

    let rs = avg_gain / avg_loss;
    let value = 100.0 - 100.0 / (1.0 + rs);
    value.is_finite().then_some(value)
}

/// Percentage change of the recent `period`-bar average volume versus the
/// preceding `period`-bar average.
pub fn volume_trend(volumes: &[u64], period: usize) -> Option<f64> {
    if period == 0 || volumes.len() < period * 2 {
        return None;
    }

    let recent = &volumes[volumes.len() - period..];
    let previous = &volumes[volumes.len() - period * 2..volumes.len() - period];

    let recent_avg = recent.iter().sum::<u64>() as f64 / period as f64;
    let previous_avg = previous.iter().sum::<u64>() as f64 / period as f64;

    if previous_avg == 0.0 {
        return None;
    }
    Some((recent_avg - previous_avg) / previous_avg * 100.0)
}

/// Last value of an exponentially weighted mean seeded from the first
/// element (`adjust = false` recurrence).
fn ewm_last(values: &[f64], alpha: f64) -> f64 {
    let mut iter = values.iter();
    let mut mean = match iter.next() {
        Some(first) => *first,
        None => return 0.0,
    };
    for value in iter {
        mean += alpha * (value - mean);
    }
    mean
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sma_needs_full_window() {
        assert_eq!(sma(&[1.0, 2.0], 3), None);
        assert_eq!(sma(&[1.0, 2.0, 3.0], 3), Some(2.0));
        assert_eq!(sma(&[0.0, 10.0, 20.0, 30.0], 3), Some(20.0));
    }

    #[test]
    fn ema_weights_recent_values_more() {
        let rising: Vec<f64> = (1..=20).map(f64::from).collect();
        let ema20 = ema(&rising, 20).expect("enough data");
        let sma20 = sma(&rising, 20).expect("enough data");
        assert!(ema20 > sma20, "ema {ema20} should exceed sma {sma20} on a rising series");
    }

    #[test]
    fn rsi_pins_at_extremes() {
        let rising: Vec<f64> = (1..=20).map(f64::from).collect();
        assert_eq!(rsi(&rising, 14), Some(100.0));

        let falling: Vec<f64> = (1..=20).rev().map(f64::from).collect();
        assert_eq!(rsi(&falling, 14), Some(0.0));

        let flat = vec![5.0; 20];
        assert_eq!(rsi(&flat, 14), Some(50.0));
    }

    #[test]
    fn rsi_needs_period_plus_one_closes() {
        let closes = vec![1.0; 14];
        assert_eq!(rsi(&closes, 14), None);
    }

    #[test]
    fn rsi_of_mixed_series_is_between_bounds() {
        let closes = vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08, 45.89, 46.03,
            45.61, 46.28, 46.28,
        ];
        let value = rsi(&closes, 14).expect("enough data");
        assert!(value > 0.0 && value < 100.0);
    }

    #[test]
    fn volume_trend_compares_adjacent_windows() {
        let volumes = vec![100, 100, 100, 100, 100, 200, 200, 200, 200, 200];
        assert_eq!(volume_trend(&volumes, 5), Some(100.0));
    }

    #[test]
    fn volume_trend_guards_short_or_silent_series() {
        assert_eq!(volume_trend(&[100; 9], 5), None);
        assert_eq!(volume_trend(&[0, 0, 0, 0, 0, 10, 10, 10, 10, 10], 5), None);
    }
}
