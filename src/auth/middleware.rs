//! Authentication middleware that validates bearer tokens on protected routes.

use axum::{
    RequestPartsExt,
    extract::{FromRef, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

use crate::{
    AppState, Error,
    auth::{Principal, TokenKeys, validate_token},
};

/// The state needed for the auth middleware
#[derive(Debug, Clone)]
pub struct AuthState {
    /// The keys used to verify bearer tokens.
    pub token_keys: TokenKeys,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            token_keys: state.token_keys.clone(),
        }
    }
}

/// Middleware function that checks for a valid bearer token in the `Authorization` header.
///
/// If the token is valid, a [Principal] for the token's user is placed into the request and the
/// request is executed normally. Otherwise a 401 response describing the problem is returned and
/// the handler is never called.
///
/// **Note**: Route handlers can use the function argument `principal: Principal` to receive the
/// authenticated user.
pub async fn auth_guard(State(state): State<AuthState>, request: Request, next: Next) -> Response {
    let (mut parts, body) = request.into_parts();

    let principal = match authenticate(&mut parts, &state).await {
        Ok(principal) => principal,
        Err(error) => {
            tracing::debug!("Rejected request to {}: {error}", parts.uri);
            return error.into_response();
        }
    };

    parts.extensions.insert(principal);
    let request = Request::from_parts(parts, body);

    next.run(request).await
}

async fn authenticate(parts: &mut Parts, state: &AuthState) -> Result<Principal, Error> {
    let TypedHeader(Authorization(bearer)) = parts
        .extract::<TypedHeader<Authorization<Bearer>>>()
        .await
        .map_err(|rejection| {
            if rejection.is_missing() {
                Error::MissingAuthHeader
            } else {
                Error::MalformedAuthHeader
            }
        })?;

    let claims = validate_token(bearer.token(), &state.token_keys)?;

    Ok(Principal::from(claims))
}
