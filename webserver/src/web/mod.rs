//! HTTP routing

pub mod handlers;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use dispatcher::traits::{Mailer, PacingPolicy, Personalizer};

use crate::state::AppState;

/// Build the application router over the shared state
pub fn router<M, P, D>(state: AppState<M, P, D>) -> Router
where
    M: Mailer + 'static,
    P: Personalizer + 'static,
    D: PacingPolicy + 'static,
{
    Router::new()
        .route("/upload", post(handlers::dispatch::upload))
        .route("/process/*path", get(handlers::dispatch::process_file))
        .route("/quota", get(handlers::dispatch::quota))
        .route("/stats", get(handlers::stats::stats))
        .route("/track/:tracking_id", get(handlers::tracking::track_open))
        .route("/click/:tracking_id", get(handlers::tracking::track_click))
        .route("/unsubscribe", get(handlers::tracking::unsubscribe))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
