//! Cross-ticker aggregation over per-ticker metrics.

use crate::domain::returns::{MonthlyReturn, ReturnPoint, TickerMetrics, YearMonth};
use std::cmp::Ordering;
use std::collections::BTreeMap;

pub const TOP_MOVERS: usize = 10;
pub const TOP_VOLATILITY: usize = 10;
pub const TOP_PERFORMERS: usize = 5;
pub const MONTHLY_MOVERS: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct RankedTicker {
    pub ticker: String,
    pub value: f64,
}

#[derive(Debug, Clone)]
pub struct CumulativeSeries {
    pub ticker: String,
    pub points: Vec<ReturnPoint>,
}

#[derive(Debug, Clone)]
pub struct SectorReturn {
    pub sector: String,
    pub mean_yearly_return: f64,
    pub tickers: usize,
}

/// Best and worst tickers of one calendar month.
#[derive(Debug, Clone)]
pub struct MonthlyMovers {
    pub month: YearMonth,
    pub gainers: Vec<RankedTicker>,
    pub losers: Vec<RankedTicker>,
}

#[derive(Debug, Clone)]
pub struct Summary {
    pub ticker_count: usize,
    pub green: usize,
    pub red: usize,
    pub avg_price: f64,
    pub avg_volume: f64,
    pub top_gainers: Vec<RankedTicker>,
    pub top_losers: Vec<RankedTicker>,
    pub top_volatility: Vec<RankedTicker>,
    pub top_performers: Vec<CumulativeSeries>,
    pub sector_returns: Vec<SectorReturn>,
    pub monthly_movers: Vec<MonthlyMovers>,
}

impl Summary {
    pub fn compute(metrics: &[TickerMetrics]) -> Self {
        let (green, red) = green_red_counts(metrics);
        let monthly: Vec<&MonthlyReturn> = metrics.iter().flat_map(|m| &m.monthly).collect();

        Self {
            ticker_count: metrics.len(),
            green,
            red,
            avg_price: mean(metrics.iter().map(|m| m.latest_close)),
            avg_volume: mean(metrics.iter().map(|m| m.mean_volume)),
            top_gainers: top_gainers(metrics, TOP_MOVERS),
            top_losers: top_losers(metrics, TOP_MOVERS),
            top_volatility: top_volatility(metrics, TOP_VOLATILITY),
            top_performers: top_performers(metrics, TOP_PERFORMERS),
            sector_returns: sector_returns(metrics),
            monthly_movers: monthly_movers(&monthly, MONTHLY_MOVERS),
        }
    }

    pub fn movers_for(&self, month: YearMonth) -> Option<&MonthlyMovers> {
        self.monthly_movers.iter().find(|m| m.month == month)
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}

fn by_value_desc(a: &RankedTicker, b: &RankedTicker) -> Ordering {
    b.value
        .partial_cmp(&a.value)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.ticker.cmp(&b.ticker))
}

fn by_value_asc(a: &RankedTicker, b: &RankedTicker) -> Ordering {
    a.value
        .partial_cmp(&b.value)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.ticker.cmp(&b.ticker))
}

fn ranked<F>(mut items: Vec<RankedTicker>, n: usize, cmp: F) -> Vec<RankedTicker>
where
    F: FnMut(&RankedTicker, &RankedTicker) -> Ordering,
{
    items.sort_by(cmp);
    items.truncate(n);
    items
}

fn yearly(metrics: &[TickerMetrics]) -> Vec<RankedTicker> {
    metrics
        .iter()
        .map(|m| RankedTicker {
            ticker: m.ticker.clone(),
            value: m.yearly_return,
        })
        .collect()
}

pub fn green_red_counts(metrics: &[TickerMetrics]) -> (usize, usize) {
    let green = metrics.iter().filter(|m| m.is_green()).count();
    let red = metrics.iter().filter(|m| m.is_red()).count();
    (green, red)
}

/// Highest yearly returns first.
pub fn top_gainers(metrics: &[TickerMetrics], n: usize) -> Vec<RankedTicker> {
    ranked(yearly(metrics), n, by_value_desc)
}

/// Lowest yearly returns first.
pub fn top_losers(metrics: &[TickerMetrics], n: usize) -> Vec<RankedTicker> {
    ranked(yearly(metrics), n, by_value_asc)
}

/// Tickers with undefined volatility are left out.
pub fn top_volatility(metrics: &[TickerMetrics], n: usize) -> Vec<RankedTicker> {
    let items = metrics
        .iter()
        .filter_map(|m| {
            m.volatility.map(|v| RankedTicker {
                ticker: m.ticker.clone(),
                value: v,
            })
        })
        .collect();
    ranked(items, n, by_value_desc)
}

pub fn top_performers(metrics: &[TickerMetrics], n: usize) -> Vec<CumulativeSeries> {
    top_gainers(metrics, n)
        .into_iter()
        .filter_map(|r| {
            metrics
                .iter()
                .find(|m| m.ticker == r.ticker)
                .map(|m| CumulativeSeries {
                    ticker: m.ticker.clone(),
                    points: m.cumulative.clone(),
                })
        })
        .collect()
}

/// Mean yearly return per sector, in sector-name order.
pub fn sector_returns(metrics: &[TickerMetrics]) -> Vec<SectorReturn> {
    let mut by_sector: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for m in metrics {
        let entry = by_sector.entry(m.sector.as_str()).or_insert((0.0, 0));
        entry.0 += m.yearly_return;
        entry.1 += 1;
    }
    by_sector
        .into_iter()
        .map(|(sector, (sum, count))| SectorReturn {
            sector: sector.to_string(),
            mean_yearly_return: sum / count as f64,
            tickers: count,
        })
        .collect()
}

/// Top and bottom `n` tickers for every month present, in month order.
pub fn monthly_movers(monthly: &[&MonthlyReturn], n: usize) -> Vec<MonthlyMovers> {
    let mut by_month: BTreeMap<YearMonth, Vec<RankedTicker>> = BTreeMap::new();
    for r in monthly {
        by_month.entry(r.month).or_default().push(RankedTicker {
            ticker: r.ticker.clone(),
            value: r.value,
        });
    }
    by_month
        .into_iter()
        .map(|(month, items)| MonthlyMovers {
            month,
            gainers: ranked(items.clone(), n, by_value_desc),
            losers: ranked(items, n, by_value_asc),
        })
        .collect()
}
