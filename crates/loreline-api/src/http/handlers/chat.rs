//! Turn submission, listing and pruning handlers.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::http::error::AppError;
use crate::http::extractors::auth::Tenant;
use crate::http::extractors::path::CampaignId;
use crate::http::extractors::query::TurnQuery;
use crate::state::AppState;

/// Request body for submitting a turn.
#[derive(Debug, Deserialize)]
pub struct SubmitTurnRequest {
    #[serde(default)]
    pub input: String,
}

/// POST /campaigns/{id}/chats - Submit a turn and return the reply.
///
/// Also mounted at POST /campaigns/{id}.
pub async fn submit_turn(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    CampaignId(id): CampaignId,
    Json(body): Json<SubmitTurnRequest>,
) -> Result<Response, AppError> {
    let outcome = state.chat.submit_turn(&tenant, &id, &body.input).await?;
    Ok(Json(outcome).into_response())
}

/// GET /campaigns/{id}/chats - List turns newest first.
pub async fn list_turns(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    CampaignId(id): CampaignId,
    Query(query): Query<TurnQuery>,
) -> Result<Response, AppError> {
    let turns = state.chat.list_turns(&tenant, &id, query.number).await?;

    if turns.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }
    Ok(Json(turns).into_response())
}

/// DELETE /campaigns/{id}/chats - Trim recent turns, or reset without `number`.
pub async fn delete_turns(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    CampaignId(id): CampaignId,
    Query(query): Query<TurnQuery>,
) -> Result<Response, AppError> {
    let outcome = match query.number {
        Some(n) => state.pruner.trim_recent(&tenant, &id, u64::from(n)).await?,
        None => state.pruner.reset(&tenant, &id).await?,
    };
    Ok(Json(outcome).into_response())
}
