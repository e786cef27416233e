//! Daily price records and per-ticker series.

use chrono::NaiveDate;

/// Columns a price file must carry to be analysed.
pub const REQUIRED_PRICE_COLUMNS: [&str; 3] = ["date", "close", "volume"];

#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub close: f64,
    pub volume: f64,
}

/// Date-ordered price history for one ticker.
#[derive(Debug, Clone)]
pub struct PriceSeries {
    pub ticker: String,
    pub bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Builds a series, sorting the bars by date ascending.
    pub fn new(ticker: impl Into<String>, mut bars: Vec<PriceBar>) -> Self {
        bars.sort_by_key(|b| b.date);
        Self {
            ticker: ticker.into(),
            bars,
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    pub fn latest_close(&self) -> Option<f64> {
        self.bars.last().map(|b| b.close)
    }

    pub fn mean_volume(&self) -> Option<f64> {
        if self.bars.is_empty() {
            return None;
        }
        Some(self.bars.iter().map(|b| b.volume).sum::<f64>() / self.bars.len() as f64)
    }
}
