//! Campaign id path extractor.
//!
//! A path segment that is not a UUID cannot name a campaign, so it is
//! reported as not found rather than as a bad request.

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use uuid::Uuid;

use loreline_types::error::CampaignError;

use crate::http::error::AppError;

/// The `{id}` segment of a campaign route.
#[derive(Debug, Clone, Copy)]
pub struct CampaignId(pub Uuid);

impl<S: Send + Sync> FromRequestParts<S> for CampaignId {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError(CampaignError::NotFound))?;
        let id = Uuid::parse_str(&raw).map_err(|_| AppError(CampaignError::NotFound))?;
        Ok(CampaignId(id))
    }
}
