//! Per-ticker return statistics.
//!
//! Daily returns are fractional close-to-close changes. The first bar has no
//! predecessor, so its return is `None`; every aggregate below skips
//! undefined returns.

use crate::domain::price::PriceSeries;
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

/// Calendar month key, `(year, month)`.
pub type YearMonth = (i32, u32);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnPoint {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyReturn {
    pub ticker: String,
    pub month: YearMonth,
    pub value: f64,
}

/// Everything derived from one ticker's price history.
#[derive(Debug, Clone)]
pub struct TickerMetrics {
    pub ticker: String,
    pub sector: String,
    /// Mean of per-year summed daily returns, in percent.
    pub yearly_return: f64,
    pub volatility: Option<f64>,
    pub latest_close: f64,
    pub mean_volume: f64,
    pub cumulative: Vec<ReturnPoint>,
    pub monthly: Vec<MonthlyReturn>,
}

impl TickerMetrics {
    /// Returns `None` for an empty series.
    pub fn compute(series: &PriceSeries, sector: &str) -> Option<Self> {
        let latest_close = series.latest_close()?;
        let mean_volume = series.mean_volume()?;
        let daily = daily_returns(&series.closes());
        let dates = series.dates();

        Some(Self {
            ticker: series.ticker.clone(),
            sector: sector.to_string(),
            yearly_return: yearly_return(&dates, &daily),
            volatility: volatility(&daily),
            latest_close,
            mean_volume,
            cumulative: cumulative_returns(&dates, &daily),
            monthly: monthly_returns(&series.ticker, &dates, &daily),
        })
    }

    pub fn is_green(&self) -> bool {
        self.yearly_return > 0.0
    }

    pub fn is_red(&self) -> bool {
        self.yearly_return < 0.0
    }
}

/// `r[i] = close[i] / close[i-1] - 1`, with `r[0] = None`.
///
/// A zero previous close yields `None` rather than an infinite return.
pub fn daily_returns(closes: &[f64]) -> Vec<Option<f64>> {
    let mut returns = Vec::with_capacity(closes.len());
    if closes.is_empty() {
        return returns;
    }
    returns.push(None);
    for w in closes.windows(2) {
        let (prev, curr) = (w[0], w[1]);
        returns.push(if prev != 0.0 {
            Some(curr / prev - 1.0)
        } else {
            None
        });
    }
    returns
}

/// Sums defined daily returns per calendar year, averages across years and
/// scales to percent. Years containing only undefined returns count as 0.
pub fn yearly_return(dates: &[NaiveDate], daily: &[Option<f64>]) -> f64 {
    let mut by_year: BTreeMap<i32, f64> = BTreeMap::new();
    for (date, r) in dates.iter().zip(daily) {
        *by_year.entry(date.year()).or_insert(0.0) += r.unwrap_or(0.0);
    }
    if by_year.is_empty() {
        return 0.0;
    }
    by_year.values().sum::<f64>() / by_year.len() as f64 * 100.0
}

/// Sample standard deviation (n - 1) of the defined daily returns.
pub fn volatility(daily: &[Option<f64>]) -> Option<f64> {
    let values: Vec<f64> = daily.iter().flatten().copied().collect();
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some(variance.sqrt())
}

/// Running product of `(1 + r)` minus 1; the first date is 0.
pub fn cumulative_returns(dates: &[NaiveDate], daily: &[Option<f64>]) -> Vec<ReturnPoint> {
    let mut growth = 1.0;
    dates
        .iter()
        .zip(daily)
        .map(|(&date, r)| {
            growth *= 1.0 + r.unwrap_or(0.0);
            ReturnPoint {
                date,
                value: growth - 1.0,
            }
        })
        .collect()
}

/// Sum of defined daily returns per calendar month, in date order.
pub fn monthly_returns(
    ticker: &str,
    dates: &[NaiveDate],
    daily: &[Option<f64>],
) -> Vec<MonthlyReturn> {
    let mut by_month: BTreeMap<YearMonth, f64> = BTreeMap::new();
    for (date, r) in dates.iter().zip(daily) {
        *by_month.entry((date.year(), date.month())).or_insert(0.0) += r.unwrap_or(0.0);
    }
    by_month
        .into_iter()
        .map(|(month, value)| MonthlyReturn {
            ticker: ticker.to_string(),
            month,
            value,
        })
        .collect()
}

pub fn format_month(month: YearMonth) -> String {
    format!("{:04}-{:02}", month.0, month.1)
}

/// Parses `YYYY-MM`.
pub fn parse_month(s: &str) -> Option<YearMonth> {
    let (year, month) = s.split_once('-')?;
    let year: i32 = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    (1..=12).contains(&month).then_some((year, month))
}
