//! HTTP request handlers for web adapter.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::{Html, IntoResponse, Response},
};
use std::sync::Arc;

use crate::adapters::html_report::{render_month_svg, render_page, render_panels};
use crate::domain::returns::{format_month, parse_month};

use super::{is_htmx_request, AppState, WebError};

pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, WebError> {
    let html = if is_htmx_request(&headers) {
        render_panels(&state.dashboard, &state.title)?
    } else {
        render_page(&state.dashboard, &state.title)?
    };
    Ok(Html(html).into_response())
}

pub async fn month_movers(
    State(state): State<Arc<AppState>>,
    Path(month): Path<String>,
) -> Result<Response, WebError> {
    let key = parse_month(&month).ok_or_else(|| {
        WebError::bad_request(format!("Invalid month '{}', expected YYYY-MM", month))
    })?;
    let svg = render_month_svg(&state.dashboard, key)
        .ok_or_else(|| WebError::not_found(format!("No returns recorded for {}", month)))?;
    Ok(Html(format!(
        "<div class=\"month\" id=\"month-{m}\"><h3>{m}</h3>{svg}</div>",
        m = format_month(key),
        svg = svg
    ))
    .into_response())
}

pub async fn not_found() -> WebError {
    WebError::not_found("Page not found")
}
