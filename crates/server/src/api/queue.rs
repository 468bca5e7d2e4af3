//! Staging queue endpoints: stage, inspect, preview, remove and submit files.

use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

use dropqueue_core::{
    FileSource, ItemId, ItemStatus, OrchestratorStatus, PreviewKind, QueueError, QueueEvent,
    SkipReason, StagedItem, SubmitOutcome,
};

use super::handlers::ErrorResponse;
use crate::state::AppState;

type ApiError = (StatusCode, Json<ErrorResponse>);

/// A staged item as returned by the API.
#[derive(Debug, Serialize)]
pub struct ItemResponse {
    pub id: ItemId,
    pub name: String,
    pub mime_type: String,
    pub size: u64,
    pub preview: PreviewKind,
    #[serde(flatten)]
    pub status: ItemStatus,
    pub staged_at: DateTime<Utc>,
}

impl From<&StagedItem> for ItemResponse {
    fn from(item: &StagedItem) -> Self {
        Self {
            id: item.id,
            name: item.source.name().to_string(),
            mime_type: item.source.mime_type().to_string(),
            size: item.source.size(),
            preview: item.preview,
            status: item.status.clone(),
            staged_at: item.staged_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct QueueResponse {
    pub items: Vec<ItemResponse>,
    pub status: OrchestratorStatus,
}

#[derive(Debug, Serialize)]
pub struct StageResponse {
    pub items: Vec<ItemResponse>,
}

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub removed: usize,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<SkipReason>,
}

fn queue_error(e: QueueError) -> ApiError {
    let status = match &e {
        QueueError::ItemNotFound(_) => StatusCode::NOT_FOUND,
        QueueError::FileTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        QueueError::InvalidFile(_) => StatusCode::BAD_REQUEST,
        QueueError::InvalidTransition { .. } => StatusCode::CONFLICT,
    };
    (status, Json(ErrorResponse::new(e.to_string())))
}

fn parse_id(id: &str) -> Result<ItemId, ApiError> {
    id.parse().map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(format!("Invalid item id: {}", id))),
        )
    })
}

/// GET /api/v1/queue
///
/// All staged items in staging order, with per-state counts.
pub async fn list_queue(State(state): State<Arc<AppState>>) -> Json<QueueResponse> {
    let items = state.queue().list().await;
    let status = state.orchestrator().status().await;

    Json(QueueResponse {
        items: items.iter().map(ItemResponse::from).collect(),
        status,
    })
}

/// POST /api/v1/queue
///
/// Stage every `file` field of a multipart form as a pending item.
pub async fn stage_files(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<StageResponse>), ApiError> {
    let mut sources = Vec::new();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return Err((
                    e.status(),
                    Json(ErrorResponse::new(format!(
                        "Failed to read upload: {}",
                        e.body_text()
                    ))),
                ))
            }
        };

        if field.name() != Some("file") {
            continue;
        }

        let name = field.file_name().unwrap_or_default().to_string();
        let mime_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(|e| {
            (
                e.status(),
                Json(ErrorResponse::new(format!(
                    "Failed to read file: {}",
                    e.body_text()
                ))),
            )
        })?;

        sources.push(FileSource::new(name, mime_type, bytes.to_vec()));
    }

    if sources.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("No file provided")),
        ));
    }

    let mut staged = Vec::with_capacity(sources.len());
    for source in sources {
        let item = state.queue().stage(source).await.map_err(queue_error)?;
        state.ws_broadcaster().broadcast(QueueEvent::ItemStaged {
            item_id: item.id,
            name: item.name().to_string(),
        });
        staged.push(ItemResponse::from(&item));
    }

    info!(count = staged.len(), "Staged files");
    Ok((StatusCode::CREATED, Json(StageResponse { items: staged })))
}

/// GET /api/v1/queue/{id}
pub async fn get_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ItemResponse>, ApiError> {
    let id = parse_id(&id)?;
    match state.queue().get(id).await {
        Some(item) => Ok(Json(ItemResponse::from(&item))),
        None => Err(queue_error(QueueError::ItemNotFound(id))),
    }
}

/// GET /api/v1/queue/{id}/preview
///
/// Raw bytes with the declared content type, for image and PDF items only.
pub async fn preview_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    let item = state
        .queue()
        .get(id)
        .await
        .ok_or_else(|| queue_error(QueueError::ItemNotFound(id)))?;

    if !item.preview.has_preview() {
        return Err((
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Json(ErrorResponse::new(format!(
                "No preview available for {}",
                item.source.mime_type()
            ))),
        ));
    }

    Ok((
        [(header::CONTENT_TYPE, item.source.mime_type().to_string())],
        item.source.bytes().to_vec(),
    ))
}

/// DELETE /api/v1/queue/{id}
pub async fn remove_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ItemResponse>, ApiError> {
    let id = parse_id(&id)?;
    let item = state.queue().remove(id).await.map_err(queue_error)?;
    state
        .ws_broadcaster()
        .broadcast(QueueEvent::ItemRemoved { item_id: item.id });
    Ok(Json(ItemResponse::from(&item)))
}

/// DELETE /api/v1/queue
pub async fn clear_queue(State(state): State<Arc<AppState>>) -> Json<ClearResponse> {
    let removed = state.queue().clear().await;
    for item in &removed {
        state
            .ws_broadcaster()
            .broadcast(QueueEvent::ItemRemoved { item_id: item.id });
    }
    Json(ClearResponse {
        removed: removed.len(),
    })
}

/// POST /api/v1/queue/submit
///
/// Runs one submission and answers once every dispatched item has finished.
/// The batch runs in its own task and is reconciled even if the client goes away.
pub async fn submit_queue(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let submission =
        tokio::spawn(async move { state.orchestrator().submit_queue().await })
            .await
            .map_err(|e| {
                error!("Queue submission task failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new(format!("Submission task failed: {}", e))),
                )
            })?;

    match submission {
        Ok(SubmitOutcome::Completed(outcome)) => Ok(Json(SubmitResponse {
            attempted: outcome.attempted,
            succeeded: outcome.succeeded,
            failed: outcome.failed(),
            message: outcome.message(),
            skipped: None,
        })),
        Ok(SubmitOutcome::Skipped(SkipReason::EmptyQueue)) => Ok(Json(SubmitResponse {
            attempted: 0,
            succeeded: 0,
            failed: 0,
            message: "No files to upload".to_string(),
            skipped: Some(SkipReason::EmptyQueue),
        })),
        Ok(SubmitOutcome::Skipped(SkipReason::AlreadyInFlight)) => Err((
            StatusCode::CONFLICT,
            Json(ErrorResponse::new("A submission is already in progress")),
        )),
        Err(e) => {
            error!("Queue submission failed: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(e.to_string())),
            ))
        }
    }
}
