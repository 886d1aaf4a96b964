use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use tracing::warn;

use crate::errors::AppError;

/// Header carrying the caller's user id. Token verification happens upstream
/// at the gateway; this service only trusts the resolved id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Request guard for authenticated endpoints.
///
/// Use `Option<AuthUser>` for endpoints where auth is optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub uid: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(USER_ID_HEADER) else {
            warn!("Missing {USER_ID_HEADER} header");
            return Err(AppError::Unauthorized);
        };

        let uid = value
            .to_str()
            .map_err(|_| AppError::Unauthorized)?
            .trim();
        if uid.is_empty() {
            warn!("Blank {USER_ID_HEADER} header");
            return Err(AppError::Unauthorized);
        }

        Ok(AuthUser {
            uid: uid.to_string(),
        })
    }
}
