//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use time::Duration;

use crate::{
    Error,
    auth::{DEFAULT_TOKEN_DURATION, PasswordHash, TokenKeys},
    db::initialize,
};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The database connection shared by all requests.
    pub db_connection: Arc<Mutex<Connection>>,

    /// The keys used to sign and verify bearer tokens.
    pub token_keys: TokenKeys,

    /// How long an issued bearer token stays valid.
    pub token_duration: Duration,

    /// The bcrypt cost used when hashing new passwords.
    pub password_cost: u32,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    /// `token_secret` is the secret used to sign bearer tokens and must come from configuration.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        token_secret: &str,
        token_duration: Duration,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            db_connection: Arc::new(Mutex::new(db_connection)),
            token_keys: TokenKeys::from_secret(token_secret),
            token_duration,
            password_cost: PasswordHash::DEFAULT_COST,
        })
    }

    /// Create a new [AppState] that issues tokens valid for [DEFAULT_TOKEN_DURATION].
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn with_default_token_duration(
        db_connection: Connection,
        token_secret: &str,
    ) -> Result<Self, Error> {
        Self::new(db_connection, token_secret, DEFAULT_TOKEN_DURATION)
    }

    /// Set the bcrypt cost used for hashing new passwords.
    ///
    /// Lower costs make hashing faster and weaker, so anything below
    /// [PasswordHash::DEFAULT_COST] should only be used in tests.
    pub fn with_password_cost(mut self, password_cost: u32) -> Self {
        self.password_cost = password_cost;
        self
    }
}
