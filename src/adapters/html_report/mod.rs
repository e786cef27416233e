//! HTML dashboard rendering.
//!
//! Builds the six dashboard panels as inline SVG and lays them out with
//! Askama templates. [`HtmlReportAdapter`] writes the page to disk; the web
//! adapter serves the same markup.

pub mod chart_svg;

use std::fs;
use std::path::Path;

use askama::Template;

use crate::domain::dashboard::Dashboard;
use crate::domain::error::SectorboardError;
use crate::domain::returns::format_month;
use crate::ports::report_port::ReportPort;

use chart_svg::Bar;

struct MonthPanel {
    label: String,
    svg: String,
}

struct SkippedRow<'a> {
    ticker: &'a str,
    reason: String,
}

#[derive(Template)]
#[template(path = "panels.html")]
struct PanelsTemplate<'a> {
    title: &'a str,
    ticker_count: usize,
    green: usize,
    red: usize,
    avg_price: String,
    avg_volume: String,
    volatility_svg: String,
    cumulative_svg: String,
    sector_svg: String,
    heatmap_svg: String,
    months: Vec<MonthPanel>,
    skipped: Vec<SkippedRow<'a>>,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
struct PageTemplate<'a> {
    title: &'a str,
    body: &'a str,
}

/// Thousands separators for the headline volume figure.
fn group_thousands(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if rounded < 0 {
        out.insert(0, '-');
    }
    out
}

fn render_error(e: askama::Error) -> SectorboardError {
    SectorboardError::Io(std::io::Error::other(e.to_string()))
}

pub fn render_month_svg(dashboard: &Dashboard, month: (i32, u32)) -> Option<String> {
    dashboard
        .summary
        .movers_for(month)
        .map(chart_svg::generate_movers_svg)
}

/// The dashboard body, without the surrounding page.
pub fn render_panels(dashboard: &Dashboard, title: &str) -> Result<String, SectorboardError> {
    let summary = &dashboard.summary;

    let sector_bars: Vec<Bar> = summary
        .sector_returns
        .iter()
        .map(|s| Bar {
            label: &s.sector,
            value: s.mean_yearly_return,
        })
        .collect();

    let months = summary
        .monthly_movers
        .iter()
        .map(|m| MonthPanel {
            label: format_month(m.month),
            svg: chart_svg::generate_movers_svg(m),
        })
        .collect();

    let skipped = dashboard
        .skipped
        .iter()
        .map(|s| SkippedRow {
            ticker: &s.ticker,
            reason: s.reason.to_string(),
        })
        .collect();

    let template = PanelsTemplate {
        title,
        ticker_count: summary.ticker_count,
        green: summary.green,
        red: summary.red,
        avg_price: format!("{:.2}", summary.avg_price),
        avg_volume: group_thousands(summary.avg_volume),
        volatility_svg: chart_svg::generate_volatility_svg(&summary.top_volatility),
        cumulative_svg: chart_svg::generate_cumulative_svg(&summary.top_performers),
        sector_svg: chart_svg::generate_bar_svg(&sector_bars, "%", None),
        heatmap_svg: chart_svg::generate_heatmap_svg(&dashboard.correlation),
        months,
        skipped,
    };

    template.render().map_err(render_error)
}

/// A complete standalone HTML page.
pub fn render_page(dashboard: &Dashboard, title: &str) -> Result<String, SectorboardError> {
    let body = render_panels(dashboard, title)?;
    PageTemplate { title, body: &body }
        .render()
        .map_err(render_error)
}

pub struct HtmlReportAdapter {
    title: String,
}

impl HtmlReportAdapter {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

impl ReportPort for HtmlReportAdapter {
    fn write(&self, dashboard: &Dashboard, output_path: &Path) -> Result<(), SectorboardError> {
        let html = render_page(dashboard, &self.title)?;

        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(output_path, html)?;

        Ok(())
    }
}
