//! CSV file data adapter.
//!
//! Layout: one sub-directory per ticker under `data_root`, each holding
//! `<TICKER>.csv`, plus a separate sector mapping CSV.

use crate::domain::error::SectorboardError;
use crate::domain::price::{PriceBar, REQUIRED_PRICE_COLUMNS};
use crate::domain::sector::SectorMap;
use crate::ports::data_port::DataPort;
use chrono::{NaiveDate, NaiveDateTime};
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    data_root: PathBuf,
    sector_map: PathBuf,
}

impl CsvAdapter {
    pub fn new(data_root: impl Into<PathBuf>, sector_map: impl Into<PathBuf>) -> Self {
        Self {
            data_root: data_root.into(),
            sector_map: sector_map.into(),
        }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.data_root.join(ticker).join(format!("{}.csv", ticker))
    }
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time of day.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}

/// Rejects `NaN` and infinities along with unparseable text.
fn parse_number(ticker: &str, column: &str, value: &str) -> Result<f64, SectorboardError> {
    let number: f64 = value
        .trim()
        .parse()
        .map_err(|e| SectorboardError::Data {
            reason: format!("{}: invalid {} value '{}': {}", ticker, column, value, e),
        })?;
    if !number.is_finite() {
        return Err(SectorboardError::Data {
            reason: format!("{}: non-finite {} value '{}'", ticker, column, value),
        });
    }
    Ok(number)
}

impl DataPort for CsvAdapter {
    fn list_tickers(&self) -> Result<Vec<String>, SectorboardError> {
        let entries = fs::read_dir(&self.data_root).map_err(|e| SectorboardError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.data_root.display(),
                e
            ),
        })?;

        let mut tickers = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| SectorboardError::Data {
                reason: format!("directory entry error: {}", e),
            })?;
            if !entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                continue;
            }
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with('.') {
                continue;
            }
            tickers.push(name.into_owned());
        }

        tickers.sort();
        Ok(tickers)
    }

    fn fetch_prices(&self, ticker: &str) -> Result<Vec<PriceBar>, SectorboardError> {
        let path = self.csv_path(ticker);
        if !path.is_file() {
            return Err(SectorboardError::NoPriceFile {
                ticker: ticker.to_string(),
            });
        }
        let content = fs::read_to_string(&path).map_err(|e| SectorboardError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .from_reader(content.as_bytes());

        let headers = rdr.headers().map_err(|e| SectorboardError::Data {
            reason: format!("CSV header error in {}: {}", path.display(), e),
        })?;
        let positions: Vec<Option<usize>> = REQUIRED_PRICE_COLUMNS
            .iter()
            .map(|col| headers.iter().position(|h| h == *col))
            .collect();
        let (date_idx, close_idx, volume_idx) = match positions[..] {
            [Some(d), Some(c), Some(v)] => (d, c, v),
            _ => {
                let missing = REQUIRED_PRICE_COLUMNS
                    .iter()
                    .zip(&positions)
                    .filter(|(_, p)| p.is_none())
                    .map(|(col, _)| col.to_string())
                    .collect();
                return Err(SectorboardError::MissingPriceColumns {
                    ticker: ticker.to_string(),
                    missing,
                });
            }
        };

        let mut bars = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| SectorboardError::Data {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;

            let date_str = record.get(date_idx).unwrap_or_default();
            let date = parse_date(date_str).ok_or_else(|| SectorboardError::Data {
                reason: format!("{}: invalid date '{}'", ticker, date_str),
            })?;
            let close = parse_number(ticker, "close", record.get(close_idx).unwrap_or_default())?;
            let volume =
                parse_number(ticker, "volume", record.get(volume_idx).unwrap_or_default())?;

            bars.push(PriceBar {
                date,
                close,
                volume,
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }

    fn fetch_sector_map(&self) -> Result<SectorMap, SectorboardError> {
        let file = fs::File::open(&self.sector_map).map_err(|e| SectorboardError::Data {
            reason: format!("failed to open {}: {}", self.sector_map.display(), e),
        })?;
        SectorMap::from_reader(file, &self.sector_map.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_ticker(root: &std::path::Path, ticker: &str, content: &str) {
        let dir = root.join(ticker);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(format!("{}.csv", ticker)), content).unwrap();
    }

    fn setup_test_data() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("prices");
        fs::create_dir_all(&root).unwrap();

        write_ticker(
            &root,
            "MSFT",
            "date,open,close,volume\n\
             2024-01-17,1,115.0,55000\n\
             2024-01-15,1,105.0,50000\n\
             2024-01-16,1,110.0,60000\n",
        );
        write_ticker(&root, "BAD", "date,close\n2024-01-15,1.0\n");
        fs::create_dir_all(root.join("EMPTY")).unwrap();
        fs::write(root.join("notes.txt"), "not a ticker").unwrap();
        fs::write(
            dir.path().join("sectors.csv"),
            "Ticker,sector\nMSFT,Technology\n",
        )
        .unwrap();

        let path = dir.path().to_path_buf();
        (dir, path)
    }

    fn adapter(path: &std::path::Path) -> CsvAdapter {
        CsvAdapter::new(path.join("prices"), path.join("sectors.csv"))
    }

    #[test]
    fn list_tickers_returns_sorted_directories() {
        let (_dir, path) = setup_test_data();
        let tickers = adapter(&path).list_tickers().unwrap();
        assert_eq!(tickers, vec!["BAD", "EMPTY", "MSFT"]);
    }

    #[test]
    fn fetch_prices_sorts_by_date() {
        let (_dir, path) = setup_test_data();
        let bars = adapter(&path).fetch_prices("MSFT").unwrap();

        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(bars[0].close, 105.0);
        assert_eq!(bars[0].volume, 50000.0);
        assert_eq!(bars[2].close, 115.0);
    }

    #[test]
    fn fetch_prices_reports_missing_columns() {
        let (_dir, path) = setup_test_data();
        let err = adapter(&path).fetch_prices("BAD").unwrap_err();
        assert!(
            matches!(err, SectorboardError::MissingPriceColumns { missing, .. } if missing == vec!["volume"])
        );
    }

    #[test]
    fn fetch_prices_reports_missing_file() {
        let (_dir, path) = setup_test_data();
        let err = adapter(&path).fetch_prices("EMPTY").unwrap_err();
        assert!(matches!(err, SectorboardError::NoPriceFile { .. }));
    }

    #[test]
    fn fetch_prices_rejects_bad_date() {
        let (_dir, path) = setup_test_data();
        write_ticker(
            &path.join("prices"),
            "ODD",
            "date,close,volume\n15/01/2024,1.0,10\n",
        );
        let err = adapter(&path).fetch_prices("ODD").unwrap_err();
        assert!(matches!(err, SectorboardError::Data { .. }));
    }

    #[test]
    fn fetch_prices_rejects_non_finite_numbers() {
        let (_dir, path) = setup_test_data();
        for (ticker, row) in [
            ("NANC", "2024-01-02,NaN,10"),
            ("INFC", "2024-01-02,inf,10"),
            ("NANV", "2024-01-02,1.0,nan"),
        ] {
            write_ticker(
                &path.join("prices"),
                ticker,
                &format!("date,close,volume\n{}\n", row),
            );
            let err = adapter(&path).fetch_prices(ticker).unwrap_err();
            assert!(
                matches!(err, SectorboardError::Data { ref reason } if reason.contains("non-finite")),
                "{ticker}: {err}"
            );
        }
    }

    #[test]
    fn fetch_sector_map_reads_file() {
        let (_dir, path) = setup_test_data();
        let map = adapter(&path).fetch_sector_map().unwrap();
        assert_eq!(map.sector_of("MSFT"), "Technology");
        assert_eq!(map.sector_of("BAD"), "Unknown");
    }

    #[test]
    fn parse_date_accepts_timestamps() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1);
        assert_eq!(parse_date("2024-03-01"), expected);
        assert_eq!(parse_date("2024-03-01 00:00:00"), expected);
        assert_eq!(parse_date("2024-03-01T09:30:00"), expected);
        assert_eq!(parse_date("March 1"), None);
    }
}
