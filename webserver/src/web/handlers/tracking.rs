//! Tracking callbacks: open pixel, click redirect, unsubscribe

use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Json, Redirect, Response};
use serde::Deserialize;
use serde_json::json;

use dispatcher::services::personalizer::DEFAULT_DESTINATION_URL;
use dispatcher::traits::{Mailer, PacingPolicy, Personalizer};

use crate::error::{WebServerError, WebServerResult};
use crate::state::AppState;

/// 1x1 transparent GIF served by the tracking pixel endpoint
const TRANSPARENT_GIF: &[u8] = &[
    0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0x00, 0x00,
    0x00, 0xff, 0xff, 0xff, 0x21, 0xf9, 0x04, 0x01, 0x00, 0x00, 0x00, 0x00, 0x2c, 0x00, 0x00,
    0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x02, 0x01, 0x44, 0x00, 0x3b,
];

#[derive(Debug, Deserialize)]
pub struct ClickQuery {
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UnsubscribeQuery {
    pub email: Option<String>,
    pub id: Option<String>,
}

/// Email tracking pixel; always returns the GIF, even for forged ids
pub async fn track_open<M, P, D>(
    State(state): State<AppState<M, P, D>>,
    Path(tracking_id): Path<String>,
) -> WebServerResult<Response>
where
    M: Mailer + 'static,
    P: Personalizer + 'static,
    D: PacingPolicy + 'static,
{
    state.recorder.record_open(&tracking_id).await?;

    Ok(([(header::CONTENT_TYPE, "image/gif")], TRANSPARENT_GIF).into_response())
}

/// Click-through redirect with click recording
pub async fn track_click<M, P, D>(
    State(state): State<AppState<M, P, D>>,
    Path(tracking_id): Path<String>,
    Query(query): Query<ClickQuery>,
) -> WebServerResult<Redirect>
where
    M: Mailer + 'static,
    P: Personalizer + 'static,
    D: PacingPolicy + 'static,
{
    state.recorder.record_click(&tracking_id).await?;

    let destination = query
        .url
        .unwrap_or_else(|| DEFAULT_DESTINATION_URL.to_string());
    Ok(Redirect::temporary(&destination))
}

/// One-click unsubscribe
pub async fn unsubscribe<M, P, D>(
    State(state): State<AppState<M, P, D>>,
    Query(query): Query<UnsubscribeQuery>,
) -> WebServerResult<Json<serde_json::Value>>
where
    M: Mailer + 'static,
    P: Personalizer + 'static,
    D: PacingPolicy + 'static,
{
    let email = query
        .email
        .filter(|email| !email.is_empty())
        .ok_or_else(|| WebServerError::invalid_request("Email address is required"))?;

    state
        .recorder
        .record_unsubscribe(&email, query.id.as_deref())
        .await?;

    Ok(Json(json!({
        "status": "success",
        "email": email,
        "message": "You have been unsubscribed."
    })))
}
