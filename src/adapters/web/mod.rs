//! Web server adapter.
//!
//! Serves the dashboard over HTTP with Axum. The dashboard is computed once
//! before the server starts and shared read-only between requests. Requests
//! carrying an `HX-Request` header get the bare panels instead of a full page.

mod error;
mod handlers;

pub use error::WebError;
pub use handlers::*;

use axum::{Router, routing::get};
use std::sync::Arc;

use crate::domain::dashboard::Dashboard;

pub struct AppState {
    pub dashboard: Dashboard,
    pub title: String,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::dashboard))
        .route("/month/{month}", get(handlers::month_movers))
        .fallback(handlers::not_found)
        .with_state(Arc::new(state))
}

fn is_htmx_request(headers: &axum::http::HeaderMap) -> bool {
    headers.get("HX-Request").is_some()
}
