//! End-to-end dashboard computation.
//!
//! Stages run in order, each fully materialized before the next: sector map,
//! universe validation, per-ticker metrics, aggregation, correlation. Every
//! panel covers the same set of tickers.

use crate::domain::aggregate::Summary;
use crate::domain::correlation::CorrelationMatrix;
use crate::domain::error::SectorboardError;
use crate::domain::price::PriceSeries;
use crate::domain::returns::TickerMetrics;
use crate::domain::universe::{validate_universe, SkippedTicker};
use crate::ports::data_port::DataPort;

#[derive(Debug, Clone)]
pub struct Dashboard {
    pub metrics: Vec<TickerMetrics>,
    pub summary: Summary,
    pub correlation: CorrelationMatrix,
    pub skipped: Vec<SkippedTicker>,
}

impl Dashboard {
    pub fn build(data_port: &dyn DataPort) -> Result<Self, SectorboardError> {
        let sectors = data_port.fetch_sector_map()?;
        tracing::info!(mapped = sectors.len(), "loaded sector map");

        let validation = validate_universe(data_port)?;

        let metrics: Vec<TickerMetrics> = validation
            .series
            .iter()
            .filter_map(|s| TickerMetrics::compute(s, sectors.sector_of(&s.ticker)))
            .collect();
        tracing::info!(tickers = metrics.len(), "computed per-ticker metrics");

        let summary = Summary::compute(&metrics);
        let analysed: Vec<PriceSeries> = validation
            .series
            .into_iter()
            .filter(|s| metrics.iter().any(|m| m.ticker == s.ticker))
            .collect();
        let correlation = CorrelationMatrix::compute(&analysed);
        tracing::debug!(size = correlation.len(), "computed correlation matrix");

        Ok(Self {
            metrics,
            summary,
            correlation,
            skipped: validation.skipped,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}
