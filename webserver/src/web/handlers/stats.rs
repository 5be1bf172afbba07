//! Statistics endpoint

use axum::extract::State;
use axum::response::Json;
use serde_json::{json, Value};

use dispatcher::traits::{Mailer, PacingPolicy, Personalizer};
use dispatcher::StatsSnapshot;

use crate::error::WebServerResult;
use crate::state::AppState;

/// Campaign statistics: totals, rates, and recent activity
pub async fn stats<M, P, D>(State(state): State<AppState<M, P, D>>) -> WebServerResult<Json<Value>>
where
    M: Mailer + 'static,
    P: Personalizer + 'static,
    D: PacingPolicy + 'static,
{
    // Quota query first: it applies and persists any pending rollovers
    // so the snapshot below reads post-rollover counters.
    let quota = state.dispatcher.quota().await?;

    let ledger_state = state.ledger.load_state().await;
    let snapshot = StatsSnapshot::compute(&ledger_state);

    Ok(Json(json!({
        "status": "success",
        "stats": snapshot,
        "remaining_today": quota.admissible.max(0),
        "weekly_limit": quota.weekly_limit,
        "week_number": quota.week_number
    })))
}
