//! Inline SVG chart rendering for the dashboard.
//!
//! Every generator returns a complete `<svg>` element, or an empty string when
//! there is nothing to plot so callers can substitute a placeholder.

use crate::domain::aggregate::{CumulativeSeries, MonthlyMovers, RankedTicker};
use crate::domain::correlation::CorrelationMatrix;

const WIDTH: f64 = 720.0;
const HEIGHT: f64 = 320.0;
const PADDING: f64 = 48.0;

const POSITIVE: &str = "#16a34a";
const NEGATIVE: &str = "#dc2626";
const NEUTRAL: &str = "#2563eb";

/// Line colours for multi-series charts, cycled.
const PALETTE: [&str; 6] = [
    "#2563eb", "#16a34a", "#f59e0b", "#9333ea", "#dc2626", "#0891b2",
];

/// A labelled bar; `value` may be negative.
#[derive(Debug, Clone)]
pub struct Bar<'a> {
    pub label: &'a str,
    pub value: f64,
}

impl<'a> From<&'a RankedTicker> for Bar<'a> {
    fn from(r: &'a RankedTicker) -> Self {
        Self {
            label: &r.ticker,
            value: r.value,
        }
    }
}

pub fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn open_svg(width: f64, height: f64) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w:.0} {h:.0}" width="100%" font-family="sans-serif" font-size="11">"#,
        w = width,
        h = height
    )
}

/// Maps `[min, max]` to the vertical plot area, always including zero.
struct YScale {
    min: f64,
    max: f64,
    top: f64,
    bottom: f64,
}

impl YScale {
    fn new(values: impl Iterator<Item = f64>, top: f64, bottom: f64) -> Self {
        let (mut min, mut max) = values
            .filter(|v| v.is_finite())
            .fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
        if max - min <= f64::EPSILON {
            min -= 1.0;
            max += 1.0;
        }
        Self {
            min,
            max,
            top,
            bottom,
        }
    }

    fn y(&self, value: f64) -> f64 {
        let value = value.clamp(self.min, self.max);
        self.bottom - (value - self.min) / (self.max - self.min) * (self.bottom - self.top)
    }
}

/// Vertical bar chart. Bars are green when positive and red when negative
/// unless `color` is given.
pub fn generate_bar_svg(bars: &[Bar], value_suffix: &str, color: Option<&str>) -> String {
    if bars.is_empty() {
        return String::new();
    }

    let plot_width = WIDTH - 2.0 * PADDING;
    let scale = YScale::new(bars.iter().map(|b| b.value), PADDING, HEIGHT - PADDING);
    let zero_y = scale.y(0.0);
    let slot = plot_width / bars.len() as f64;
    let bar_width = (slot * 0.7).max(1.0);

    let mut svg = open_svg(WIDTH, HEIGHT);
    svg.push_str(&format!(
        r##"<line x1="{x1:.1}" y1="{y:.1}" x2="{x2:.1}" y2="{y:.1}" stroke="#6b7280" stroke-width="1"/>"##,
        x1 = PADDING,
        x2 = WIDTH - PADDING,
        y = zero_y
    ));

    for (i, bar) in bars.iter().enumerate() {
        let x = PADDING + i as f64 * slot + (slot - bar_width) / 2.0;
        let y = scale.y(bar.value);
        let (top, height) = if y < zero_y {
            (y, zero_y - y)
        } else {
            (zero_y, y - zero_y)
        };
        let fill = color.unwrap_or(if bar.value >= 0.0 { POSITIVE } else { NEGATIVE });
        let label = escape(bar.label);

        svg.push_str(&format!(
            r#"<rect x="{x:.1}" y="{top:.1}" width="{w:.1}" height="{h:.1}" fill="{fill}"><title>{label}: {v:.2}{suffix}</title></rect>"#,
            x = x,
            top = top,
            w = bar_width,
            h = height.max(0.5),
            fill = fill,
            label = label,
            v = bar.value,
            suffix = value_suffix,
        ));
        svg.push_str(&format!(
            r#"<text x="{x:.1}" y="{y:.1}" text-anchor="middle">{label}</text>"#,
            x = x + bar_width / 2.0,
            y = HEIGHT - PADDING + 16.0,
            label = label,
        ));
    }

    svg.push_str(&axis_labels(&scale, value_suffix));
    svg.push_str("</svg>");
    svg
}

fn axis_labels(scale: &YScale, suffix: &str) -> String {
    format!(
        r#"<text x="{x:.1}" y="{top:.1}" text-anchor="end">{max:.2}{suffix}</text><text x="{x:.1}" y="{bottom:.1}" text-anchor="end">{min:.2}{suffix}</text>"#,
        x = PADDING - 6.0,
        top = scale.top + 4.0,
        bottom = scale.bottom,
        max = scale.max,
        min = scale.min,
        suffix = suffix,
    )
}

/// Multi-series line chart of cumulative returns over the union of dates.
pub fn generate_cumulative_svg(series: &[CumulativeSeries]) -> String {
    let first = series.iter().flat_map(|s| s.points.first()).map(|p| p.date).min();
    let last = series.iter().flat_map(|s| s.points.last()).map(|p| p.date).max();
    let (first, last) = match (first, last) {
        (Some(f), Some(l)) => (f, l),
        _ => return String::new(),
    };

    let span_days = (last - first).num_days().max(1) as f64;
    let plot_width = WIDTH - 2.0 * PADDING;
    let scale = YScale::new(
        series.iter().flat_map(|s| s.points.iter().map(|p| p.value * 100.0)),
        PADDING,
        HEIGHT - PADDING,
    );

    let mut svg = open_svg(WIDTH, HEIGHT);
    svg.push_str(&format!(
        r##"<line x1="{x1:.1}" y1="{y:.1}" x2="{x2:.1}" y2="{y:.1}" stroke="#9ca3af" stroke-dasharray="4 3"/>"##,
        x1 = PADDING,
        x2 = WIDTH - PADDING,
        y = scale.y(0.0)
    ));

    for (i, s) in series.iter().enumerate() {
        let color = PALETTE[i % PALETTE.len()];
        let points: Vec<String> = s
            .points
            .iter()
            .map(|p| {
                let x = PADDING + (p.date - first).num_days() as f64 / span_days * plot_width;
                let y = scale.y(p.value * 100.0);
                format!("{:.1},{:.1}", x, y)
            })
            .collect();
        svg.push_str(&format!(
            r#"<polyline fill="none" stroke="{color}" stroke-width="1.5" points="{points}"><title>{ticker}</title></polyline>"#,
            color = color,
            points = points.join(" "),
            ticker = escape(&s.ticker),
        ));
        svg.push_str(&format!(
            r#"<rect x="{x:.1}" y="{y:.1}" width="10" height="10" fill="{color}"/><text x="{tx:.1}" y="{ty:.1}">{ticker}</text>"#,
            x = PADDING + i as f64 * 90.0,
            y = 12.0,
            tx = PADDING + i as f64 * 90.0 + 14.0,
            ty = 21.0,
            color = color,
            ticker = escape(&s.ticker),
        ));
    }

    svg.push_str(&axis_labels(&scale, "%"));
    svg.push_str(&format!(
        r#"<text x="{x1:.1}" y="{y:.1}">{first}</text><text x="{x2:.1}" y="{y:.1}" text-anchor="end">{last}</text>"#,
        x1 = PADDING,
        x2 = WIDTH - PADDING,
        y = HEIGHT - PADDING + 16.0,
        first = first,
        last = last,
    ));
    svg.push_str("</svg>");
    svg
}

/// Blue for +1, white for 0, red for -1, grey when undefined.
pub fn heat_color(value: Option<f64>) -> String {
    let v = match value {
        Some(v) if v.is_finite() => v.clamp(-1.0, 1.0),
        _ => return "#e5e7eb".to_string(),
    };
    let fade = |t: f64| (255.0 * (1.0 - t)).round() as u8;
    if v >= 0.0 {
        format!("rgb({},{},255)", fade(v), fade(v))
    } else {
        format!("rgb(255,{},{})", fade(-v), fade(-v))
    }
}

pub fn generate_heatmap_svg(matrix: &CorrelationMatrix) -> String {
    let n = matrix.len();
    if n == 0 {
        return String::new();
    }

    let label_space = 64.0;
    let cell = ((WIDTH - label_space - PADDING) / n as f64).clamp(8.0, 48.0);
    let size = label_space + cell * n as f64 + PADDING;
    let show_values = cell >= 32.0;

    let mut svg = open_svg(size, size);
    for (row, row_ticker) in matrix.tickers.iter().enumerate() {
        let y = label_space + row as f64 * cell;
        svg.push_str(&format!(
            r#"<text x="{x:.1}" y="{y:.1}" text-anchor="end">{t}</text>"#,
            x = label_space - 4.0,
            y = y + cell / 2.0 + 4.0,
            t = escape(row_ticker),
        ));
        for (col, col_ticker) in matrix.tickers.iter().enumerate() {
            let x = label_space + col as f64 * cell;
            let value = matrix.get(row, col);
            let shown = value
                .map(|v| format!("{:.2}", v))
                .unwrap_or_else(|| "n/a".to_string());
            svg.push_str(&format!(
                r##"<rect x="{x:.1}" y="{y:.1}" width="{c:.1}" height="{c:.1}" fill="{fill}" stroke="#ffffff"><title>{a} / {b}: {shown}</title></rect>"##,
                x = x,
                y = y,
                c = cell,
                fill = heat_color(value),
                a = escape(row_ticker),
                b = escape(col_ticker),
                shown = shown,
            ));
            if show_values {
                svg.push_str(&format!(
                    r#"<text x="{x:.1}" y="{y:.1}" text-anchor="middle" font-size="9">{shown}</text>"#,
                    x = x + cell / 2.0,
                    y = y + cell / 2.0 + 3.0,
                    shown = shown,
                ));
            }
        }
    }
    for (col, ticker) in matrix.tickers.iter().enumerate() {
        let x = label_space + col as f64 * cell + cell / 2.0;
        svg.push_str(&format!(
            r#"<text x="{x:.1}" y="{y:.1}" text-anchor="start" transform="rotate(-45 {x:.1} {y:.1})">{t}</text>"#,
            x = x,
            y = label_space - 6.0,
            t = escape(ticker),
        ));
    }
    svg.push_str("</svg>");
    svg
}

/// One month's gainers followed by its losers, as percentages.
pub fn generate_movers_svg(movers: &MonthlyMovers) -> String {
    let mut bars: Vec<Bar> = movers.gainers.iter().map(Bar::from).collect();
    bars.extend(movers.losers.iter().map(Bar::from));
    let scaled: Vec<Bar> = bars
        .into_iter()
        .map(|b| Bar {
            label: b.label,
            value: b.value * 100.0,
        })
        .collect();
    generate_bar_svg(&scaled, "%", None)
}

/// Bar chart with a fixed colour; used for volatility, which is never negative.
pub fn generate_volatility_svg(top: &[RankedTicker]) -> String {
    let bars: Vec<Bar> = top.iter().map(Bar::from).collect();
    generate_bar_svg(&bars, "", Some(NEUTRAL))
}
