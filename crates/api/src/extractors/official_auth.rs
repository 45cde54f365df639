//! Official bearer-token authentication extractor.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use domain::models::OfficeAccount;
use shared::jwt::{extract_official_id, JwtError};

use crate::app::AppState;
use crate::error::ApiError;

/// The authenticated official, resolved from the directory.
///
/// Rejects with 401 when the bearer token is missing or invalid, and with
/// 403 when the token's subject is not a known official.
#[derive(Debug, Clone)]
pub struct OfficialAuth {
    pub account: OfficeAccount,
}

#[async_trait]
impl FromRequestParts<AppState> for OfficialAuth {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            ApiError::Unauthorized("Invalid Authorization header format".to_string())
        })?;

        let claims = state.jwt.validate_token(token).map_err(|e| match e {
            JwtError::TokenExpired => ApiError::Unauthorized("Token has expired".to_string()),
            _ => ApiError::Unauthorized("Invalid or expired token".to_string()),
        })?;

        let official_id = extract_official_id(&claims)
            .map_err(|_| ApiError::Unauthorized("Invalid token subject".to_string()))?;

        let account = state
            .directory
            .find_official(official_id)
            .await?
            .ok_or_else(|| {
                tracing::debug!(%official_id, "Token subject is not a registered official");
                ApiError::Forbidden("Only officials can access this endpoint".to_string())
            })?;

        Ok(Self { account })
    }
}
