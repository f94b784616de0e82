//! User accounts, credentials, bearer tokens and the auth guard for protected routes.

mod log_in;
mod middleware;
mod password;
mod principal;
mod register_user;
mod token;
mod user;

pub use log_in::{Credentials, LogInState, log_in};
pub use middleware::{AuthState, auth_guard};
pub use password::{PasswordHash, ValidatedPassword};
pub use principal::Principal;
pub use register_user::{RegistrationState, register_user};
pub use token::{
    Claims, DEFAULT_TOKEN_DURATION, TokenError, TokenKeys, issue_token, validate_token,
};
pub use user::{User, UserID, Username, create_user, create_user_table, get_user_by_username};

#[cfg(test)]
pub(crate) use token::issue_token_at;
