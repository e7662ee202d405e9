//! Campaign CRUD handlers.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use loreline_types::campaign::{CreateCampaignRequest, UpdateCampaignRequest};

use crate::http::error::AppError;
use crate::http::extractors::auth::Tenant;
use crate::http::extractors::path::CampaignId;
use crate::http::extractors::query::CampaignListQuery;
use crate::state::AppState;

/// GET /campaigns - List the caller's campaigns.
///
/// Responds 204 when the caller has none.
pub async fn list_campaigns(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    Query(query): Query<CampaignListQuery>,
) -> Result<Response, AppError> {
    let campaigns = state
        .campaigns
        .list_owned(&tenant, query.user_tag.as_deref())
        .await?;

    if campaigns.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }
    Ok(Json(campaigns).into_response())
}

/// POST /campaigns - Create a campaign.
pub async fn create_campaign(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    Json(body): Json<CreateCampaignRequest>,
) -> Result<Response, AppError> {
    let campaign = state.campaigns.create(&tenant, body).await?;
    Ok((StatusCode::CREATED, Json(campaign)).into_response())
}

/// GET /campaigns/{id}
pub async fn get_campaign(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    CampaignId(id): CampaignId,
) -> Result<Response, AppError> {
    let campaign = state.campaigns.get(&tenant, &id).await?;
    Ok(Json(campaign).into_response())
}

/// PUT /campaigns/{id} - Rename a campaign.
pub async fn update_campaign(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    CampaignId(id): CampaignId,
    Json(body): Json<UpdateCampaignRequest>,
) -> Result<Response, AppError> {
    let campaign = state.campaigns.update_name(&tenant, &id, body).await?;
    Ok(Json(campaign).into_response())
}

/// DELETE /campaigns/{id} - Delete a campaign and its history.
pub async fn delete_campaign(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    CampaignId(id): CampaignId,
) -> Result<Response, AppError> {
    state.campaigns.delete(&tenant, &id).await?;
    Ok(Json(json!({ "deleted": true, "id": id })).into_response())
}
