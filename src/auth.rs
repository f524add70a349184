//! Authenticated-user extraction.

use crate::error::Error;
use crate::models::User;
use crate::state::AppState;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use std::sync::Arc;

/// The logged-in user making the request, resolved from the
/// `Authorization: Bearer` session token.
///
/// Extraction fails with [`Error::Unauthenticated`] carrying the requested
/// path, so the rejection becomes a login redirect that can return the user
/// to where they were headed.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let next = parts.uri.path().to_string();

        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "));

        let Some(token) = token else {
            return Err(Error::Unauthenticated { next });
        };

        match state.store.user_by_session(token).await? {
            Some(user) => Ok(CurrentUser(user)),
            None => Err(Error::Unauthenticated { next }),
        }
    }
}
