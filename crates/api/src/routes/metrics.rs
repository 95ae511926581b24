//! Prometheus metrics endpoint.
//!
//! Renders every registered family: cart mutation counters
//! (`cart_items_added_total`, `cart_items_removed_total`) and the
//! checkout funnel (`checkout_attempts_total`,
//! `checkout_completed_total`, `checkout_failed_total`,
//! `checkout_duration_seconds`).

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use metrics_exporter_prometheus::PrometheusHandle;

/// GET /metrics — renders the Prometheus exposition text.
pub async fn render(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        handle.render(),
    )
}
