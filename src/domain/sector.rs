//! Ticker to sector lookup table.
//!
//! Loaded once from a CSV with `Ticker` and `sector` columns. Tickers without
//! a mapping resolve to [`UNKNOWN_SECTOR`].

use crate::domain::error::SectorboardError;
use std::collections::HashMap;
use std::io::Read;

pub const UNKNOWN_SECTOR: &str = "Unknown";
pub const TICKER_COLUMN: &str = "Ticker";
pub const SECTOR_COLUMN: &str = "sector";

#[derive(Debug, Clone, Default)]
pub struct SectorMap {
    sectors: HashMap<String, String>,
}

impl SectorMap {
    /// Parses a mapping table. `source` names the input in error messages.
    pub fn from_reader<R: Read>(reader: R, source: &str) -> Result<Self, SectorboardError> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers().map_err(|e| SectorboardError::Data {
            reason: format!("failed to read header of {}: {}", source, e),
        })?;

        let ticker_idx = headers.iter().position(|h| h == TICKER_COLUMN);
        let sector_idx = headers.iter().position(|h| h == SECTOR_COLUMN);

        let (ticker_idx, sector_idx) = match (ticker_idx, sector_idx) {
            (Some(t), Some(s)) => (t, s),
            (t, s) => {
                let mut missing = Vec::new();
                if t.is_none() {
                    missing.push(TICKER_COLUMN.to_string());
                }
                if s.is_none() {
                    missing.push(SECTOR_COLUMN.to_string());
                }
                return Err(SectorboardError::MissingMappingColumns {
                    file: source.to_string(),
                    missing,
                });
            }
        };

        let mut sectors = HashMap::new();
        for result in rdr.records() {
            let record = result.map_err(|e| SectorboardError::Data {
                reason: format!("CSV parse error in {}: {}", source, e),
            })?;
            let ticker = record.get(ticker_idx).unwrap_or_default();
            let sector = record.get(sector_idx).unwrap_or_default();
            // A blank sector cell is an absent mapping.
            if ticker.is_empty() || sector.is_empty() {
                continue;
            }
            sectors.insert(ticker.to_string(), sector.to_string());
        }

        Ok(Self { sectors })
    }

    pub fn insert(&mut self, ticker: impl Into<String>, sector: impl Into<String>) {
        self.sectors.insert(ticker.into(), sector.into());
    }

    pub fn sector_of(&self, ticker: &str) -> &str {
        self.sectors
            .get(ticker)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_SECTOR)
    }

    pub fn len(&self) -> usize {
        self.sectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mapping() {
        let csv = "Ticker,sector\nAAPL,Technology\nXOM,Energy\n";
        let map = SectorMap::from_reader(csv.as_bytes(), "test").unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.sector_of("AAPL"), "Technology");
        assert_eq!(map.sector_of("XOM"), "Energy");
    }

    #[test]
    fn unmapped_ticker_is_unknown() {
        let map = SectorMap::from_reader("Ticker,sector\n".as_bytes(), "test").unwrap();
        assert_eq!(map.sector_of("MSFT"), UNKNOWN_SECTOR);
    }

    #[test]
    fn ignores_extra_columns_and_whitespace() {
        let csv = "name, Ticker , sector,industry\nApple, AAPL , Technology ,Hardware\n";
        let map = SectorMap::from_reader(csv.as_bytes(), "test").unwrap();
        assert_eq!(map.sector_of("AAPL"), "Technology");
    }

    #[test]
    fn blank_sector_is_unknown() {
        let csv = "Ticker,sector\nAAA,\nBBB,  \nCCC,Energy\n";
        let map = SectorMap::from_reader(csv.as_bytes(), "test").unwrap();
        assert_eq!(map.sector_of("AAA"), UNKNOWN_SECTOR);
        assert_eq!(map.sector_of("BBB"), UNKNOWN_SECTOR);
        assert_eq!(map.sector_of("CCC"), "Energy");
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn later_rows_overwrite_earlier() {
        let csv = "Ticker,sector\nAAPL,Hardware\nAAPL,Technology\n";
        let map = SectorMap::from_reader(csv.as_bytes(), "test").unwrap();
        assert_eq!(map.sector_of("AAPL"), "Technology");
    }

    #[test]
    fn missing_sector_column_is_rejected() {
        let csv = "Ticker,industry\nAAPL,Hardware\n";
        let err = SectorMap::from_reader(csv.as_bytes(), "sectors.csv").unwrap_err();
        match err {
            SectorboardError::MissingMappingColumns { file, missing } => {
                assert_eq!(file, "sectors.csv");
                assert_eq!(missing, vec!["sector"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_both_columns_reports_both() {
        let csv = "symbol,industry\n";
        let err = SectorMap::from_reader(csv.as_bytes(), "s.csv").unwrap_err();
        assert!(
            matches!(err, SectorboardError::MissingMappingColumns { missing, .. } if missing == vec!["Ticker", "sector"])
        );
    }

    #[test]
    fn column_names_are_case_sensitive() {
        let csv = "ticker,Sector\nAAPL,Technology\n";
        let err = SectorMap::from_reader(csv.as_bytes(), "s.csv").unwrap_err();
        assert!(matches!(err, SectorboardError::MissingMappingColumns { .. }));
    }
}
