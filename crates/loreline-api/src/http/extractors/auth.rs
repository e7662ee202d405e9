//! Bearer credential extractor.
//!
//! Resolves `Authorization: Bearer <key>` to the calling tenant. Handlers
//! receive the tenant as a typed value and never read it from request bodies.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use loreline_types::error::AuthError;
use loreline_types::tenant::TenantId;

use crate::http::error::AppError;
use crate::state::AppState;

/// The authenticated caller.
#[derive(Debug, Clone, Copy)]
pub struct Tenant(pub TenantId);

impl FromRequestParts<AppState> for Tenant {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = match parts.headers.get(AUTHORIZATION) {
            Some(value) => Some(
                value
                    .to_str()
                    .map_err(|_| AppError(AuthError::MalformedHeader.into()))?,
            ),
            None => None,
        };

        let tenant = state.resolver.resolve(header).await?;
        Ok(Tenant(tenant))
    }
}
