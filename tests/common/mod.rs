#![allow(dead_code)]

use chrono::NaiveDate;
use sectorboard::domain::error::SectorboardError;
pub use sectorboard::domain::price::PriceBar;
use sectorboard::domain::sector::SectorMap;
use sectorboard::ports::data_port::DataPort;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub struct MockDataPort {
    pub data: BTreeMap<String, Vec<PriceBar>>,
    pub missing_columns: BTreeMap<String, Vec<String>>,
    pub sectors: Vec<(String, String)>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: BTreeMap::new(),
            missing_columns: BTreeMap::new(),
            sectors: Vec::new(),
        }
    }

    pub fn with_bars(mut self, ticker: &str, bars: Vec<PriceBar>) -> Self {
        self.data.insert(ticker.to_string(), bars);
        self
    }

    pub fn with_missing_columns(mut self, ticker: &str, missing: &[&str]) -> Self {
        self.missing_columns.insert(
            ticker.to_string(),
            missing.iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    pub fn with_sector(mut self, ticker: &str, sector: &str) -> Self {
        self.sectors.push((ticker.to_string(), sector.to_string()));
        self
    }
}

impl DataPort for MockDataPort {
    fn list_tickers(&self) -> Result<Vec<String>, SectorboardError> {
        let mut tickers: Vec<String> = self
            .data
            .keys()
            .chain(self.missing_columns.keys())
            .cloned()
            .collect();
        tickers.sort();
        Ok(tickers)
    }

    fn fetch_prices(&self, ticker: &str) -> Result<Vec<PriceBar>, SectorboardError> {
        if let Some(missing) = self.missing_columns.get(ticker) {
            return Err(SectorboardError::MissingPriceColumns {
                ticker: ticker.to_string(),
                missing: missing.clone(),
            });
        }
        self.data
            .get(ticker)
            .cloned()
            .ok_or_else(|| SectorboardError::NoPriceFile {
                ticker: ticker.to_string(),
            })
    }

    fn fetch_sector_map(&self) -> Result<SectorMap, SectorboardError> {
        let mut map = SectorMap::default();
        for (ticker, sector) in &self.sectors {
            map.insert(ticker.clone(), sector.clone());
        }
        Ok(map)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// One bar per calendar day starting at `start_date`.
pub fn bars_from_closes(start_date: &str, closes: &[f64]) -> Vec<PriceBar> {
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PriceBar {
            date: start + chrono::Duration::days(i as i64),
            close,
            volume: 1000.0 * (i + 1) as f64,
        })
        .collect()
}

/// Linear walk from `start_price` by `step` per day.
pub fn generate_bars(start_date: &str, count: usize, start_price: f64, step: f64) -> Vec<PriceBar> {
    let closes: Vec<f64> = (0..count).map(|i| start_price + step * i as f64).collect();
    bars_from_closes(start_date, &closes)
}

pub fn write_price_csv(root: &Path, ticker: &str, header: &str, bars: &[PriceBar]) {
    let dir = root.join(ticker);
    fs::create_dir_all(&dir).unwrap();
    let mut content = format!("{}\n", header);
    for bar in bars {
        content.push_str(&format!("{},{},{}\n", bar.date, bar.close, bar.volume));
    }
    fs::write(dir.join(format!("{}.csv", ticker)), content).unwrap();
}
