//! The authenticated user attached to a request by the auth guard.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{
    Error,
    auth::{Claims, UserID},
};

/// The user a request was authenticated as.
///
/// Protected handlers take a `Principal` argument to learn who is making the request.
/// The principal is placed in the request by [crate::auth::auth_guard], so extracting it in a
/// handler that is not behind the guard fails with [Error::MissingPrincipal].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// The ID of the authenticated user.
    pub user_id: UserID,
    /// The username of the authenticated user.
    pub username: String,
}

impl From<Claims> for Principal {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username,
        }
    }
}

impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Principal>().cloned().ok_or_else(|| {
            tracing::error!(
                "No principal attached to request for {}, is the route missing the auth guard?",
                parts.uri
            );
            Error::MissingPrincipal
        })
    }
}
