//! Dispatch endpoints: CSV upload, scheduled processing, quota query

use std::path::{Path as FsPath, PathBuf};

use axum::extract::{Multipart, Path, Query, State};
use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use dispatcher::config::DEFAULT_BATCH_SIZE;
use dispatcher::traits::{Mailer, PacingPolicy, Personalizer};
use dispatcher::RunSummary;

use crate::error::{WebServerError, WebServerResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ProcessQuery {
    pub batch_size: Option<usize>,
}

/// Strip any directory components from a client-supplied filename
fn secure_filename(filename: &str) -> String {
    FsPath::new(filename)
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "upload.csv".to_string())
}

fn summary_response(summary: &RunSummary) -> WebServerResult<Json<Value>> {
    let mut value = serde_json::to_value(summary).map_err(dispatcher::DispatcherError::from)?;
    if let Some(map) = value.as_object_mut() {
        map.insert("status".to_string(), json!("success"));
    }
    Ok(Json(value))
}

/// Accept a multipart CSV upload and run a dispatch over it
pub async fn upload<M, P, D>(
    State(state): State<AppState<M, P, D>>,
    mut multipart: Multipart,
) -> WebServerResult<Json<Value>>
where
    M: Mailer + 'static,
    P: Personalizer + 'static,
    D: PacingPolicy + 'static,
{
    let mut csv_path: Option<PathBuf> = None;
    let mut batch_size = DEFAULT_BATCH_SIZE;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| WebServerError::invalid_request(format!("Malformed upload: {e}")))?
    {
        match field.name() {
            Some("csv_file") => {
                let filename = field
                    .file_name()
                    .map(secure_filename)
                    .ok_or_else(|| WebServerError::invalid_request("No selected file"))?;
                if !filename.ends_with(".csv") {
                    return Err(WebServerError::invalid_request(
                        "Invalid file type. Please upload a CSV file.",
                    ));
                }

                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| WebServerError::invalid_request(format!("Malformed upload: {e}")))?;

                tokio::fs::create_dir_all(&state.upload_dir)
                    .await
                    .map_err(WebServerError::Io)?;
                let path = state.upload_dir.join(filename);
                tokio::fs::write(&path, &bytes).await.map_err(WebServerError::Io)?;
                csv_path = Some(path);
            }
            Some("batch_size") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| WebServerError::invalid_request(format!("Malformed upload: {e}")))?;
                batch_size = text
                    .trim()
                    .parse()
                    .map_err(|_| WebServerError::invalid_request("Invalid batch size"))?;
            }
            _ => {}
        }
    }

    let csv_path = csv_path.ok_or_else(|| WebServerError::invalid_request("No file part"))?;
    info!("📤 Uploaded recipient file: {}", csv_path.display());

    let summary = state.dispatcher.run(&csv_path, batch_size).await?;
    summary_response(&summary)
}

/// Run a dispatch over a CSV already on disk (scheduled processing)
pub async fn process_file<M, P, D>(
    State(state): State<AppState<M, P, D>>,
    Path(path): Path<String>,
    Query(query): Query<ProcessQuery>,
) -> WebServerResult<Json<Value>>
where
    M: Mailer + 'static,
    P: Personalizer + 'static,
    D: PacingPolicy + 'static,
{
    // The wildcard capture may or may not carry the leading slash of an
    // absolute path; accept either form.
    let mut csv_path = PathBuf::from(&path);
    if !csv_path.exists() {
        csv_path = PathBuf::from(format!("/{path}"));
    }
    if !csv_path.exists() {
        return Err(WebServerError::FileNotFound { path });
    }

    let batch_size = query.batch_size.unwrap_or(DEFAULT_BATCH_SIZE);
    let summary = state.dispatcher.run(&csv_path, batch_size).await?;
    summary_response(&summary)
}

/// Current quota position, for display before a run is launched
pub async fn quota<M, P, D>(
    State(state): State<AppState<M, P, D>>,
) -> WebServerResult<Json<Value>>
where
    M: Mailer + 'static,
    P: Personalizer + 'static,
    D: PacingPolicy + 'static,
{
    let snapshot = state.dispatcher.quota().await?;
    let mut value = serde_json::to_value(&snapshot).map_err(dispatcher::DispatcherError::from)?;
    if let Some(map) = value.as_object_mut() {
        map.insert("status".to_string(), json!("success"));
    }
    Ok(Json(value))
}
