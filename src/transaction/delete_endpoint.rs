//! Transaction deletion endpoint.

use axum::{Json, extract::State, response::IntoResponse};
use serde_json::json;

use crate::{
    Error,
    auth::Principal,
    db::{DbState, lock_connection},
    extract::ApiPath,
    transaction::{TransactionId, delete_transaction},
};

/// A route handler for deleting one of the requesting user's transactions.
pub async fn delete_transaction_endpoint(
    State(state): State<DbState>,
    principal: Principal,
    ApiPath(transaction_id): ApiPath<TransactionId>,
) -> Result<impl IntoResponse, Error> {
    let connection = lock_connection(&state.db_connection)?;
    delete_transaction(transaction_id, principal.user_id, &connection)?;

    Ok(Json(json!({ "message": "transaction deleted successfully" })))
}
