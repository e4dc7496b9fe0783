// Bearer token gate for protected routes

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use tracing::debug;
use uuid::Uuid;

use crate::auth::{error::AuthError, token::TokenService};

/// Verified identity of the caller
///
/// Taking this as a handler argument gates the route: the handler only runs
/// when the request carried a valid, unexpired bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
}

/// Pull the token out of an `Authorization: Bearer <token>` header value
pub fn bearer_token(header_value: &str) -> Option<&str> {
    header_value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    Arc<TokenService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let endpoint = parts.uri.path().to_string();

        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_token)
            .ok_or_else(|| {
                debug!("No bearer token on request to protected endpoint: {}", endpoint);
                AuthError::MissingToken
            })?;

        let tokens = Arc::<TokenService>::from_ref(state);
        let claims = tokens.verify(token)?;

        debug!("Authenticated user_id={} endpoint={}", claims.id, endpoint);
        Ok(AuthenticatedUser {
            user_id: claims.id,
            email: claims.email,
        })
    }
}
