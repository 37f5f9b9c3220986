//! Screening universe registry.
//!
//! The registry is an explicitly passed configuration value, never a
//! global: `run_screen` takes whichever universe the caller resolved. A
//! bundled list of liquid IDX names ships with the crate, a JSON file can
//! replace it, and [`idx_listing`] restores the exchange's own
//! listed-company feed as a remote source.

use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::{CoreError, Instrument, Symbol};

/// Wire shape of one registry row.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RegistryEntry {
    symbol: String,
    name: String,
    #[serde(default)]
    sector: Option<String>,
}

/// Ordered, deduplicated set of instruments screened in one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerRegistry {
    instruments: Vec<Instrument>,
}

impl TickerRegistry {
    /// Sorts by symbol and drops duplicate identifiers, keeping the first.
    pub fn from_instruments(mut instruments: Vec<Instrument>) -> Self {
        instruments.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        instruments.dedup_by(|b, a| a.symbol == b.symbol);
        Self { instruments }
    }

    /// Load a universe from a JSON array of `{symbol, name, sector?}` rows.
    pub fn from_json_reader(reader: impl Read) -> Result<Self, CoreError> {
        let entries: Vec<RegistryEntry> = serde_json::from_reader(reader)?;
        let mut instruments = Vec::with_capacity(entries.len());
        for entry in entries {
            let symbol = Symbol::parse(&entry.symbol)?;
            instruments.push(Instrument::new(symbol, entry.name, entry.sector)?);
        }
        Ok(Self::from_instruments(instruments))
    }

    /// Default universe of liquid IDX names embedded in the crate.
    pub fn bundled() -> Self {
        static UNIVERSE_JSON: &str = include_str!("../assets/idx_universe.json");
        Self::from_json_reader(UNIVERSE_JSON.as_bytes())
            .expect("bundled universe must be valid JSON")
    }

    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    pub fn iter(&self) -> impl Iterator<Item = &Instrument> {
        self.instruments.iter()
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }
}

pub mod idx_listing {
    //! Remote universe source backed by the IDX listed-company feed.

    use std::sync::Arc;

    use serde::Deserialize;

    use crate::data_source::FetchError;
    use crate::http_client::{HttpClient, HttpRequest};
    use crate::{Instrument, Symbol};

    use super::TickerRegistry;

    const LISTING_URL: &str =
        "https://www.idx.co.id/umbraco/Surface/ListedCompany/GetListedCompany?emitenType=s";

    /// A full exchange listing holds hundreds of issuers; anything smaller
    /// is a truncated or throttled payload and the caller should fall back
    /// to its static universe.
    pub const MIN_PLAUSIBLE_LISTING: usize = 200;

    #[derive(Debug, Clone, Deserialize)]
    struct ListedCompanyRow {
        #[serde(rename = "KodeEmiten", default)]
        code: String,
        #[serde(rename = "NamaEmiten", default)]
        name: Option<String>,
        #[serde(rename = "NamaPerusahaan", default)]
        company_name: Option<String>,
    }

    /// Fetches the exchange's own list of equity issuers.
    pub struct IdxListingSource {
        http_client: Arc<dyn HttpClient>,
        timeout_ms: u64,
    }

    impl IdxListingSource {
        pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
            Self {
                http_client,
                timeout_ms: 15_000,
            }
        }

        pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
            self.timeout_ms = timeout_ms;
            self
        }

        /// Fetch and normalize the listing into a registry.
        ///
        /// # Errors
        ///
        /// `FetchError::transient` on transport failures,
        /// `FetchError::data_unavailable` when the payload is empty or
        /// implausibly small.
        pub async fn fetch(&self) -> Result<TickerRegistry, FetchError> {
            let request = HttpRequest::get(LISTING_URL)
                .with_header("referer", "https://www.idx.co.id/")
                .with_timeout_ms(self.timeout_ms);

            let response = self.http_client.execute(request).await.map_err(|error| {
                FetchError::transient(format!("idx listing transport error: {}", error.message()))
            })?;

            if !response.is_success() {
                return Err(FetchError::transient(format!(
                    "idx listing returned status {}",
                    response.status
                )));
            }

            let rows: Vec<ListedCompanyRow> =
                serde_json::from_str(&response.body).map_err(|e| {
                    FetchError::transient(format!("failed to parse idx listing: {e}"))
                })?;

            let mut instruments = Vec::with_capacity(rows.len());
            for row in rows {
                let code = row.code.trim();
                if code.is_empty() {
                    continue;
                }
                let Ok(symbol) = Symbol::from_idx_code(code) else {
                    continue;
                };
                let name = row
                    .name
                    .or(row.company_name)
                    .map(|n| n.trim().to_owned())
                    .filter(|n| !n.is_empty())
                    .unwrap_or_else(|| symbol.code().to_owned());
                if let Ok(instrument) = Instrument::new(symbol, name, None) {
                    instruments.push(instrument);
                }
            }

            if instruments.len() < MIN_PLAUSIBLE_LISTING {
                return Err(FetchError::data_unavailable(format!(
                    "idx listing returned only {} issuers",
                    instruments.len()
                )));
            }

            Ok(TickerRegistry::from_instruments(instruments))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instrument(symbol: &str, name: &str) -> Instrument {
        Instrument::new(Symbol::parse(symbol).expect("valid"), name, None).expect("valid")
    }

    #[test]
    fn bundled_universe_loads_sorted_and_unique() {
        let registry = TickerRegistry::bundled();
        assert!(registry.len() >= 30);

        let symbols: Vec<&str> = registry.iter().map(|i| i.symbol.as_str()).collect();
        let mut sorted = symbols.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(symbols, sorted);
        assert!(symbols.contains(&"BBCA.JK"));
    }

    #[test]
    fn from_instruments_sorts_and_dedupes() {
        let registry = TickerRegistry::from_instruments(vec![
            instrument("TLKM.JK", "Telkom Indonesia"),
            instrument("BBCA.JK", "Bank Central Asia"),
            instrument("TLKM.JK", "Telkom duplicate"),
        ]);

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.instruments()[0].symbol.as_str(), "BBCA.JK");
        assert_eq!(registry.instruments()[1].name, "Telkom Indonesia");
    }

    #[test]
    fn json_reader_accepts_missing_sector() {
        let json = r#"[
            { "symbol": "bbca.jk", "name": "Bank Central Asia", "sector": "Financials" },
            { "symbol": "GOTO.JK", "name": "GoTo Gojek Tokopedia" }
        ]"#;

        let registry =
            TickerRegistry::from_json_reader(json.as_bytes()).expect("must parse");
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.instruments()[0].symbol.as_str(), "BBCA.JK");
        assert_eq!(registry.instruments()[1].sector, None);
    }

    #[test]
    fn json_reader_rejects_invalid_symbol() {
        let json = r#"[{ "symbol": "123", "name": "Broken" }]"#;
        let err = TickerRegistry::from_json_reader(json.as_bytes()).expect_err("must fail");
        assert!(matches!(err, CoreError::Validation(_)));
    }
}
