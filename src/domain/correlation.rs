//! Cross-ticker correlation of daily returns.
//!
//! Closes are aligned on the union of all dates. A ticker's daily return on a
//! date is defined only when it has a close on that date and on the previous
//! date of the unified timeline. Each pair is correlated over the dates where
//! both returns are defined.

use crate::domain::price::PriceSeries;
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub tickers: Vec<String>,
    /// Row-major, `tickers.len()` squared. `None` where a pair has fewer than
    /// two shared observations or zero variance.
    values: Vec<Option<f64>>,
}

impl CorrelationMatrix {
    /// Interior date gaps are not forward-filled: the missing date and the
    /// one after it both have undefined returns, unlike pandas `pct_change()`.
    pub fn compute(series: &[PriceSeries]) -> Self {
        let timeline = build_unified_timeline(series);
        let returns: Vec<Vec<Option<f64>>> = series
            .iter()
            .map(|s| aligned_returns(s, &timeline))
            .collect();

        let n = series.len();
        let mut values = vec![None; n * n];
        for i in 0..n {
            values[i * n + i] = Some(1.0);
            for j in (i + 1)..n {
                let r = pearson(&returns[i], &returns[j]);
                values[i * n + j] = r;
                values[j * n + i] = r;
            }
        }

        Self {
            tickers: series.iter().map(|s| s.ticker.clone()).collect(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.tickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        let n = self.tickers.len();
        if row >= n || col >= n {
            return None;
        }
        self.values[row * n + col]
    }

    pub fn get_by_ticker(&self, a: &str, b: &str) -> Option<f64> {
        let row = self.tickers.iter().position(|t| t == a)?;
        let col = self.tickers.iter().position(|t| t == b)?;
        self.get(row, col)
    }
}

pub fn build_unified_timeline(series: &[PriceSeries]) -> Vec<NaiveDate> {
    let unique_dates: BTreeSet<NaiveDate> = series
        .iter()
        .flat_map(|s| s.bars.iter().map(|b| b.date))
        .collect();
    unique_dates.into_iter().collect()
}

fn aligned_returns(series: &PriceSeries, timeline: &[NaiveDate]) -> Vec<Option<f64>> {
    let closes: HashMap<NaiveDate, f64> = series.bars.iter().map(|b| (b.date, b.close)).collect();
    let mut out = Vec::with_capacity(timeline.len());
    let mut prev: Option<f64> = None;
    for date in timeline {
        let curr = closes.get(date).copied();
        out.push(match (prev, curr) {
            (Some(p), Some(c)) if p != 0.0 => Some(c / p - 1.0),
            _ => None,
        });
        prev = curr;
    }
    out
}

fn pearson(a: &[Option<f64>], b: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x <= 0.0 || var_y <= 0.0 {
        return None;
    }
    Some((cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::price::PriceBar;
    use approx::assert_relative_eq;

    fn make_series(ticker: &str, start: &str, closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::parse_from_str(start, "%Y-%m-%d").unwrap();
        PriceSeries::new(
            ticker,
            closes
                .iter()
                .enumerate()
                .map(|(i, &close)| PriceBar {
                    date: start + chrono::Duration::days(i as i64),
                    close,
                    volume: 1.0,
                })
                .collect(),
        )
    }

    #[test]
    fn identical_moves_correlate_perfectly() {
        let a = make_series("A", "2024-01-01", &[10.0, 11.0, 10.5, 12.0, 11.0]);
        let b = make_series("B", "2024-01-01", &[20.0, 22.0, 21.0, 24.0, 22.0]);
        let m = CorrelationMatrix::compute(&[a, b]);
        assert_relative_eq!(m.get_by_ticker("A", "B").unwrap(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn opposite_moves_correlate_negatively() {
        let a = make_series("A", "2024-01-01", &[10.0, 11.0, 10.0, 11.0]);
        let b = make_series("B", "2024-01-01", &[10.0, 9.0, 10.0, 9.0]);
        let m = CorrelationMatrix::compute(&[a, b]);
        assert!(m.get_by_ticker("A", "B").unwrap() < -0.9);
    }

    #[test]
    fn diagonal_is_one_and_matrix_symmetric() {
        let a = make_series("A", "2024-01-01", &[10.0, 11.0, 10.5, 12.0]);
        let b = make_series("B", "2024-01-01", &[5.0, 5.5, 5.2, 5.1]);
        let c = make_series("C", "2024-01-01", &[1.0, 1.0, 1.0, 1.0]);
        let m = CorrelationMatrix::compute(&[a, b, c]);
        for i in 0..m.len() {
            assert_eq!(m.get(i, i), Some(1.0));
            for j in 0..m.len() {
                assert_eq!(m.get(i, j), m.get(j, i));
            }
        }
    }

    #[test]
    fn constant_series_has_undefined_off_diagonal() {
        let a = make_series("A", "2024-01-01", &[10.0, 11.0, 10.5]);
        let c = make_series("C", "2024-01-01", &[1.0, 1.0, 1.0]);
        let m = CorrelationMatrix::compute(&[a, c]);
        assert_eq!(m.get_by_ticker("A", "C"), None);
    }

    #[test]
    fn non_overlapping_dates_are_undefined() {
        let a = make_series("A", "2024-01-01", &[10.0, 11.0, 12.0]);
        let b = make_series("B", "2024-02-01", &[10.0, 11.0, 12.0]);
        let m = CorrelationMatrix::compute(&[a, b]);
        assert_eq!(m.get_by_ticker("A", "B"), None);
    }

    #[test]
    fn gap_breaks_return_chain() {
        let timeline = vec![
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
        ];
        let s = PriceSeries::new(
            "A",
            vec![
                PriceBar {
                    date: timeline[0],
                    close: 10.0,
                    volume: 1.0,
                },
                PriceBar {
                    date: timeline[2],
                    close: 12.0,
                    volume: 1.0,
                },
            ],
        );
        assert_eq!(aligned_returns(&s, &timeline), vec![None, None, None]);
    }

    #[test]
    fn empty_input() {
        let m = CorrelationMatrix::compute(&[]);
        assert!(m.is_empty());
        assert_eq!(m.get(0, 0), None);
    }
}
