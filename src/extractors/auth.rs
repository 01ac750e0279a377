use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, request::Parts},
};

use crate::error::AppError;
use crate::state::AppState;

/// Authenticated subject extracted from the `Authorization: Bearer <token>`
/// header.
///
/// Add this as a handler parameter when the credential must be resolved
/// before anything else (the create path). The delete path instead checks
/// record existence first and calls [`bearer_token`] by hand.
pub struct AuthUser {
    pub user_id: String,
}

/// Pull the bearer token out of the Authorization header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::TokenMissing)?;

    value.strip_prefix("Bearer ").ok_or(AppError::TokenInvalid)
}

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app = AppState::from_ref(state);
        let token = bearer_token(&parts.headers)?;
        let user_id = app.verifier.verify(token)?;

        Ok(AuthUser { user_id })
    }
}
