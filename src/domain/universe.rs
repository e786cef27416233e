//! Ticker universe validation.
//!
//! Loads every ticker the data port knows about and separates usable price
//! series from tickers that must be skipped. A missing price file, missing
//! required columns or a file without data rows cause a skip; any other load
//! failure aborts.

use crate::domain::error::SectorboardError;
use crate::domain::price::PriceSeries;
use crate::ports::data_port::DataPort;

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    NoPriceFile,
    MissingColumns { missing: Vec<String> },
    NoRows,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::NoPriceFile => write!(f, "no price file"),
            SkipReason::MissingColumns { missing } => {
                write!(f, "missing column(s): {}", missing.join(", "))
            }
            SkipReason::NoRows => write!(f, "no price rows"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SkippedTicker {
    pub ticker: String,
    pub reason: SkipReason,
}

#[derive(Debug)]
pub struct UniverseValidationResult {
    pub series: Vec<PriceSeries>,
    pub skipped: Vec<SkippedTicker>,
}

impl UniverseValidationResult {
    pub fn tickers(&self) -> Vec<&str> {
        self.series.iter().map(|s| s.ticker.as_str()).collect()
    }
}

pub fn validate_universe(
    data_port: &dyn DataPort,
) -> Result<UniverseValidationResult, SectorboardError> {
    let tickers = data_port.list_tickers()?;
    let mut series = Vec::with_capacity(tickers.len());
    let mut skipped = Vec::new();

    for ticker in tickers {
        match data_port.fetch_prices(&ticker) {
            Ok(bars) if bars.is_empty() => {
                tracing::warn!(ticker = %ticker, "skipping ticker: no price rows");
                skipped.push(SkippedTicker {
                    ticker,
                    reason: SkipReason::NoRows,
                });
            }
            Ok(bars) => {
                tracing::debug!(ticker = %ticker, bars = bars.len(), "loaded price series");
                series.push(PriceSeries::new(ticker, bars));
            }
            Err(SectorboardError::NoPriceFile { .. }) => {
                tracing::warn!(ticker = %ticker, "skipping ticker: no price file");
                skipped.push(SkippedTicker {
                    ticker,
                    reason: SkipReason::NoPriceFile,
                });
            }
            Err(SectorboardError::MissingPriceColumns { missing, .. }) => {
                tracing::warn!(
                    ticker = %ticker,
                    missing = %missing.join(", "),
                    "skipping ticker: missing required columns"
                );
                skipped.push(SkippedTicker {
                    ticker,
                    reason: SkipReason::MissingColumns { missing },
                });
            }
            Err(e) => return Err(e),
        }
    }

    if !skipped.is_empty() {
        tracing::info!(
            "analysing {} of {} tickers",
            series.len(),
            series.len() + skipped.len()
        );
    }

    Ok(UniverseValidationResult { series, skipped })
}
