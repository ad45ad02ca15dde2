//! # Caller Identity
//!
//! Authentication happens upstream. The gateway in front of this service
//! forwards the authenticated user as two headers:
//!
//! - `X-User-Id`: the user's numeric id
//! - `X-User-Role`: one of `Player`, `TeamLeader`, `FieldOwner`, `Moderator`
//!
//! Handlers that act on behalf of a user take an [`AuthenticatedCaller`]
//! argument; a request without valid headers never reaches them.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};
use kickoff_core::errors::{KickoffError, KickoffResult};
use kickoff_core::models::identity::{Caller, UserRole};

use super::error_handling::AppError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// The caller of the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedCaller(pub Caller);

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedCaller
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(AuthenticatedCaller(caller_from_headers(&parts.headers)?))
    }
}

pub fn caller_from_headers(headers: &HeaderMap) -> KickoffResult<Caller> {
    let user_id = header(headers, USER_ID_HEADER)?
        .parse::<i64>()
        .map_err(|_| KickoffError::Authentication("X-User-Id must be an integer".to_string()))?;

    let role = header(headers, USER_ROLE_HEADER)?
        .parse::<UserRole>()
        .map_err(|e| KickoffError::Authentication(format!("Invalid X-User-Role: {}", e)))?;

    Ok(Caller::new(user_id, role))
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> KickoffResult<&'a str> {
    headers
        .get(name)
        .ok_or_else(|| KickoffError::Authentication(format!("Missing {} header", name)))?
        .to_str()
        .map(str::trim)
        .map_err(|_| KickoffError::Authentication(format!("Malformed {} header", name)))
}

/// Rejects callers whose role is not `role`.
pub fn require_role(caller: &Caller, role: UserRole) -> KickoffResult<()> {
    if caller.role == role {
        Ok(())
    } else {
        Err(KickoffError::Forbidden(format!(
            "This action requires the {} role",
            role
        )))
    }
}
