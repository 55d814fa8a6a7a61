//! Pending-review surface (§4.3): listing, approve/reject, and
//! similar-suggestion bulk disposition.

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use doc_enrich_core::{DocumentId, PendingReview, PendingReviewKind};
use serde::Deserialize;
use stage_engines::resolution::{self, ResolutionContext};
use uuid::Uuid;

use crate::core::app_state::AppState;
use crate::core::http::response_envelope::ApiResponse;
use crate::error_handler::{AppError, AppResult};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/reviews", get(list))
        .route("/reviews/counts", get(counts))
        .route("/reviews/{id}/approve", post(approve))
        .route("/reviews/{id}/reject", post(reject))
        .route("/reviews/bulk", post(bulk))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    kind: Option<String>,
    doc_id: Option<DocumentId>,
}

async fn list(State(state): State<AppState>, Query(q): Query<ListQuery>) -> AppResult<Json<ApiResponse<Vec<PendingReview>>>> {
    let kind = q.kind.as_deref().map(parse_kind).transpose()?;
    let reviews = state.queue.list(kind, q.doc_id).await?;
    Ok(Json(ApiResponse::success(reviews)))
}

async fn counts(State(state): State<AppState>) -> AppResult<Json<ApiResponse<Vec<(String, i64)>>>> {
    let counts = state.queue.counts_by_kind().await?;
    let counts = counts.into_iter().map(|(kind, n)| (kind.as_str().to_string(), n)).collect();
    Ok(Json(ApiResponse::success(counts)))
}

#[derive(Debug, Deserialize, Default)]
struct ApproveBody {
    value: Option<serde_json::Value>,
}

async fn approve(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Option<Json<ApproveBody>>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.record_manual_activity();
    let override_value = body.and_then(|Json(b)| b.value);
    resolution::approve(&state.stage_ctx, id, override_value, &ResolutionContext::default()).await?;
    Ok(Json(ApiResponse::success(())))
}

#[derive(Debug, Deserialize, Default)]
struct RejectBody {
    #[serde(default)]
    blocklist: bool,
    #[serde(default)]
    feedback: Option<String>,
}

async fn reject(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Option<Json<RejectBody>>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.record_manual_activity();
    let RejectBody { blocklist, feedback } = body.map(|Json(b)| b).unwrap_or_default();
    resolution::reject(&state.stage_ctx, id, blocklist, feedback).await?;
    Ok(Json(ApiResponse::success(())))
}

#[derive(Debug, Deserialize)]
enum BulkActionBody {
    #[serde(rename = "approve")]
    Approve,
    #[serde(rename = "reject")]
    Reject,
}

#[derive(Debug, Deserialize)]
struct BulkBody {
    kind: String,
    normalized_suggestion: String,
    action: BulkActionBody,
}

/// Applies the same decision to every pending review sharing a normalized
/// suggestion for one kind (§4.3 `similar_groups`), e.g. approving "Acme
/// Corp" as the correspondent for every document that proposed it.
async fn bulk(State(state): State<AppState>, Json(body): Json<BulkBody>) -> AppResult<Json<ApiResponse<u32>>> {
    state.record_manual_activity();
    let kind = parse_kind(&body.kind)?;
    let groups = state.queue.similar_groups(Some(kind)).await?;
    let Some((_, items)) = groups.into_iter().find(|(key, _)| *key == body.normalized_suggestion) else {
        return Ok(Json(ApiResponse::success(0)));
    };

    let mut applied = 0u32;
    for review in items {
        match body.action {
            BulkActionBody::Approve => resolution::approve(&state.stage_ctx, review.id, None, &ResolutionContext::default()).await?,
            BulkActionBody::Reject => resolution::reject(&state.stage_ctx, review.id, false, None).await?,
        }
        applied += 1;
    }
    Ok(Json(ApiResponse::success(applied)))
}

fn parse_kind(s: &str) -> Result<PendingReviewKind, AppError> {
    PendingReviewKind::from_str(s).ok_or_else(|| AppError::BadRequest(format!("unknown review kind '{s}'")))
}
