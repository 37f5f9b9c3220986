use serde::{Deserialize, Serialize};

use crate::{Symbol, TradeDate, ValidationError};

/// Immutable instrument metadata sourced from the ticker registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    pub symbol: Symbol,
    pub name: String,
    pub sector: Option<String>,
}

impl Instrument {
    pub fn new(
        symbol: Symbol,
        name: impl Into<String>,
        sector: Option<String>,
    ) -> Result<Self, ValidationError> {
        let name = name.into().trim().to_owned();
        if name.is_empty() {
            return Err(ValidationError::EmptyInstrumentName);
        }
        Ok(Self {
            symbol,
            name,
            sector: sector
                .map(|s| s.trim().to_owned())
                .filter(|s| !s.is_empty()),
        })
    }

    /// Instrument whose display name falls back to the bare issuer code.
    pub fn unnamed(symbol: Symbol) -> Self {
        let name = symbol.code().to_owned();
        Self {
            symbol,
            name,
            sector: None,
        }
    }
}

/// One trading session's OHLCV record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: TradeDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl PriceBar {
    pub fn new(
        date: TradeDate,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: u64,
    ) -> Result<Self, ValidationError> {
        validate_price("open", open)?;
        validate_price("high", high)?;
        validate_price("low", low)?;
        validate_price("close", close)?;

        if high < low {
            return Err(ValidationError::InvalidBarRange);
        }

        if open < low || open > high || close < low || close > high {
            return Err(ValidationError::InvalidBarBounds);
        }

        Ok(Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        })
    }

    /// Close multiplied by session volume, in rupiah.
    pub fn traded_value(&self) -> f64 {
        self.close * self.volume as f64
    }
}

/// Ordered daily series for one instrument, created fresh per screening run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    instrument: Instrument,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Bars must be strictly ascending by date, which also rules out
    /// duplicate sessions.
    pub fn new(instrument: Instrument, bars: Vec<PriceBar>) -> Result<Self, ValidationError> {
        if bars.is_empty() {
            return Err(ValidationError::EmptySeries);
        }

        for (index, window) in bars.windows(2).enumerate() {
            if window[1].date <= window[0].date {
                return Err(ValidationError::UnorderedSeries { index: index + 1 });
            }
        }

        Ok(Self { instrument, bars })
    }

    pub fn instrument(&self) -> &Instrument {
        &self.instrument
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Most recent completed session. The series is never empty.
    pub fn latest(&self) -> &PriceBar {
        self.bars
            .last()
            .expect("price series holds at least one bar")
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|bar| bar.close).collect()
    }

    pub fn volumes(&self) -> Vec<u64> {
        self.bars.iter().map(|bar| bar.volume).collect()
    }
}

fn validate_price(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value <= 0.0 {
        return Err(ValidationError::NonPositivePrice { field });
    }
    Ok(())
}
