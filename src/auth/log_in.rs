//! The endpoint for exchanging a username and password for a bearer token.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    response::IntoResponse,
};
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::json;
use time::Duration;

use crate::{
    AppState, Error,
    auth::{PasswordHash, TokenKeys, get_user_by_username, issue_token},
    db::lock_connection,
    extract::ApiJson,
};

/// The username and password sent to register or log in.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    /// The username entered by the client.
    pub username: String,
    /// The plaintext password entered by the client.
    pub password: String,
}

/// The state needed to log in a user.
#[derive(Debug, Clone)]
pub struct LogInState {
    /// The database connection for looking up users.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The keys used to sign issued tokens.
    pub token_keys: TokenKeys,
    /// How long issued tokens stay valid.
    pub token_duration: Duration,
    /// The bcrypt cost of stored password hashes.
    pub password_cost: u32,
}

impl FromRef<AppState> for LogInState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            token_keys: state.token_keys.clone(),
            token_duration: state.token_duration,
            password_cost: state.password_cost,
        }
    }
}

/// Handler for log-in requests.
///
/// On success responds with a bearer token for the user.
///
/// # Errors
///
/// This function will return an error in a few situations.
/// - The username does not belong to a registered user.
/// - The password is not correct.
/// - An internal error occurred when verifying the password or signing the token.
///
/// An unknown username and a wrong password produce the same error.
pub async fn log_in(
    State(state): State<LogInState>,
    ApiJson(credentials): ApiJson<Credentials>,
) -> Result<impl IntoResponse, Error> {
    let user = {
        let connection = lock_connection(&state.db_connection)?;

        match get_user_by_username(&credentials.username, &connection) {
            Ok(user) => Some(user),
            Err(Error::NotFound) => None,
            Err(error) => return Err(error),
        }
    };

    let Some(user) = user else {
        PasswordHash::verify_without_hash(&credentials.password, state.password_cost)?;
        tracing::debug!("Log in attempt for unknown user");
        return Err(Error::InvalidCredentials);
    };

    if !user.password_hash.verify(&credentials.password)? {
        tracing::debug!("Wrong password for user {}", user.id);
        return Err(Error::InvalidCredentials);
    }

    let token = issue_token(
        user.id,
        user.username.as_ref(),
        state.token_duration,
        &state.token_keys,
    )?;

    Ok(Json(json!({
        "message": "logged in successfully",
        "token": token,
    })))
}
