//! Issuing and validating the signed bearer tokens handed out at log-in.

use std::fmt::Debug;

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::{Error, auth::UserID};

/// How long a token stays valid after it is issued.
pub const DEFAULT_TOKEN_DURATION: Duration = Duration::hours(24);

/// Tokens are only ever signed with, and accepted with, this algorithm.
const TOKEN_ALGORITHM: Algorithm = Algorithm::HS256;

/// The reasons a bearer token can be rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// The signature does not match, or the token was signed with an unexpected algorithm.
    #[error("the token signature is invalid")]
    InvalidSignature,

    /// The token's expiry time has passed.
    #[error("the token has expired")]
    Expired,

    /// The token could not be decoded.
    #[error("the token is malformed")]
    Malformed,
}

/// The contents of a bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// The ID of the user the token was issued to.
    pub user_id: UserID,
    /// The username of the user the token was issued to.
    pub username: String,
    /// When the token was issued, in seconds since the Unix epoch.
    pub iat: i64,
    /// When the token expires, in seconds since the Unix epoch.
    pub exp: i64,
}

/// The keys for signing and verifying tokens, derived from a single secret.
#[derive(Clone)]
pub struct TokenKeys {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenKeys {
    /// Create the signing and verification keys from `secret`.
    pub fn from_secret(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

impl Debug for TokenKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenKeys").finish_non_exhaustive()
    }
}

/// Issue a token for `user_id` that expires `duration` from now.
///
/// # Errors
/// Returns [Error::TokenCreation] if the token could not be signed.
pub fn issue_token(
    user_id: UserID,
    username: &str,
    duration: Duration,
    keys: &TokenKeys,
) -> Result<String, Error> {
    issue_token_at(user_id, username, OffsetDateTime::now_utc(), duration, keys)
}

/// Issue a token as if it were `issued_at`.
pub(crate) fn issue_token_at(
    user_id: UserID,
    username: &str,
    issued_at: OffsetDateTime,
    duration: Duration,
    keys: &TokenKeys,
) -> Result<String, Error> {
    let claims = Claims {
        user_id,
        username: username.to_owned(),
        iat: issued_at.unix_timestamp(),
        exp: (issued_at + duration).unix_timestamp(),
    };

    encode(&Header::new(TOKEN_ALGORITHM), &claims, &keys.encoding_key)
        .map_err(|error| Error::TokenCreation(error.to_string()))
}

/// Check the signature, algorithm and expiry of `token` and return its claims.
///
/// # Errors
/// Returns a [TokenError] describing why the token was rejected.
pub fn validate_token(token: &str, keys: &TokenKeys) -> Result<Claims, TokenError> {
    let mut validation = Validation::new(TOKEN_ALGORITHM);
    validation.leeway = 0;

    decode::<Claims>(token, &keys.decoding_key, &validation)
        .map(|token_data| token_data.claims)
        .map_err(|error| match error.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                TokenError::InvalidSignature
            }
            _ => TokenError::Malformed,
        })
}
