//! The endpoint for registering a new user.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::IntoResponse,
};
use rusqlite::Connection;
use serde_json::json;

use crate::{
    AppState, Error,
    auth::{Credentials, PasswordHash, Username, ValidatedPassword, create_user},
    db::lock_connection,
    extract::ApiJson,
};

/// The state needed for creating a new user.
#[derive(Debug, Clone)]
pub struct RegistrationState {
    /// The database connection for storing the new user.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The bcrypt cost used to hash the new user's password.
    pub password_cost: u32,
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            password_cost: state.password_cost,
        }
    }
}

/// A route handler for creating a new user.
///
/// Responds with 201 and the new user's ID and username.
///
/// # Errors
///
/// This function will return an error if:
/// - the username or password is empty,
/// - the username is already taken,
/// - the password could not be hashed or the user could not be stored.
pub async fn register_user(
    State(state): State<RegistrationState>,
    ApiJson(credentials): ApiJson<Credentials>,
) -> Result<impl IntoResponse, Error> {
    let username = Username::new(&credentials.username)?;
    let password = ValidatedPassword::new(&credentials.password)?;

    // Hashing is slow, so do it before taking the database lock.
    let password_hash = PasswordHash::new(password, state.password_cost)?;

    let connection = lock_connection(&state.db_connection)?;
    let user = create_user(username, password_hash, &connection)?;

    tracing::info!("Registered user {} with ID {}", user.username, user.id);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "user registered successfully",
            "user_id": user.id,
            "username": user.username,
        })),
    ))
}
