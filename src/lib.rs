//! A REST API for tracking personal income and expenses.
//!
//! Users register, log in to receive a bearer token, and then manage their own
//! categories and transactions. Every query is scoped to the authenticated user.
//! Daily and period summaries total transaction amounts per category.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod app_state;
mod auth;
mod category;
mod config;
mod date;
mod db;
mod endpoints;
mod extract;
mod logging;
mod money;
mod routing;
mod summary;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use auth::{Principal, TokenError};
pub use category::CategoryId;
pub use config::Config;
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
///
/// Every error is sent to the client as a JSON object with an `error` field
/// and the status code given by [Error::status_code].
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request body, path or query string could not be parsed.
    #[error("{0}")]
    InvalidInput(String),

    /// The request body could not be read within the size limit.
    #[error("the request body is larger than {0} bytes")]
    RequestBodyTooLarge(usize),

    /// An empty string was used as a username.
    #[error("username cannot be empty")]
    EmptyUsername,

    /// An empty string was used as a password.
    #[error("password cannot be empty")]
    EmptyPassword,

    /// An empty string was used to create a category name.
    #[error("category name cannot be empty")]
    EmptyCategoryName,

    /// A transaction amount was zero or negative, or rounded to zero cents.
    #[error("amount must be greater than zero, got {0}")]
    NonPositiveAmount(f64),

    /// A date string did not have the format `YYYY-MM-DD`.
    #[error("invalid date \"{0}\", use the format YYYY-MM-DD")]
    InvalidDate(String),

    /// A transaction type was neither "expense" nor "income".
    #[error("invalid transaction type \"{0}\", expected \"expense\" or \"income\"")]
    InvalidTransactionType(String),

    /// A field of a partial update was explicitly set to null but cannot be cleared.
    #[error("the field \"{0}\" cannot be null")]
    NullField(&'static str),

    /// A required date query parameter was missing or empty.
    #[error("the query parameter \"{0}\" is required (format YYYY-MM-DD)")]
    MissingDateParameter(&'static str),

    /// The username or password used to log in was wrong.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// The request to a protected route had no `Authorization` header.
    #[error("missing authorization header")]
    MissingAuthHeader,

    /// The `Authorization` header did not have the form `Bearer <token>`.
    #[error("authorization header must have the form 'Bearer <token>'")]
    MalformedAuthHeader,

    /// The bearer token failed validation.
    #[error("invalid token: {0}")]
    InvalidToken(#[from] TokenError),

    /// The username chosen during registration belongs to another user.
    #[error("the username \"{0}\" is already taken")]
    DuplicateUsername(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The signed token could not be created.
    #[error("could not create token: {0}")]
    TokenCreation(String),

    /// The requested resource was not found or belongs to another user.
    ///
    /// Resources owned by other users are reported as missing so that clients
    /// cannot learn whether they exist.
    #[error("the requested resource could not be found")]
    NotFound,

    /// A transaction referred to a category that does not exist or belongs to another user.
    #[error("category {0} could not be found")]
    CategoryNotFound(CategoryId),

    /// A category cannot be deleted while transactions refer to it.
    #[error("the category is used by {count} transaction(s) and cannot be deleted")]
    CategoryInUse {
        /// The number of transactions that refer to the category.
        count: u64,
    },

    /// A protected handler ran without the auth guard having set a principal.
    #[error("no authenticated user was attached to the request")]
    MissingPrincipal,

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl Error {
    /// The HTTP status code used when sending this error to a client.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidInput(_)
            | Error::EmptyUsername
            | Error::EmptyPassword
            | Error::EmptyCategoryName
            | Error::NonPositiveAmount(_)
            | Error::InvalidDate(_)
            | Error::InvalidTransactionType(_)
            | Error::NullField(_)
            | Error::MissingDateParameter(_) => StatusCode::BAD_REQUEST,
            Error::InvalidCredentials
            | Error::MissingAuthHeader
            | Error::MalformedAuthHeader
            | Error::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            Error::NotFound | Error::CategoryNotFound(_) => StatusCode::NOT_FOUND,
            Error::RequestBodyTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Error::DuplicateUsername(_) | Error::CategoryInUse { .. } => StatusCode::CONFLICT,
            Error::HashingError(_)
            | Error::TokenCreation(_)
            | Error::MissingPrincipal
            | Error::DatabaseLockError
            | Error::SqlError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("An unexpected error occurred: {}", self);
        }

        let message = self.to_string();
        let body = match self {
            Error::CategoryInUse { count } => json!({ "error": message, "count": count }),
            _ => json!({ "error": message }),
        };

        (status, Json(body)).into_response()
    }
}
