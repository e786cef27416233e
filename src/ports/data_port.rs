//! Data access port trait.

use crate::domain::error::SectorboardError;
use crate::domain::price::PriceBar;
use crate::domain::sector::SectorMap;

pub trait DataPort {
    /// Tickers available under the data source, sorted.
    fn list_tickers(&self) -> Result<Vec<String>, SectorboardError>;

    /// Price bars for one ticker, in any order.
    ///
    /// Fails with `NoPriceFile` or `MissingPriceColumns` for tickers that
    /// should be skipped; any other error is fatal to the run.
    fn fetch_prices(&self, ticker: &str) -> Result<Vec<PriceBar>, SectorboardError>;

    fn fetch_sector_map(&self) -> Result<SectorMap, SectorboardError>;
}
