//! Transaction update endpoint.

use axum::{Json, extract::State, response::IntoResponse};
use serde_json::json;

use crate::{
    Error,
    auth::Principal,
    db::{DbState, lock_connection},
    extract::{ApiJson, ApiPath},
    transaction::{TransactionId, TransactionPatch, update_transaction},
};

/// A route handler for partially updating one of the requesting user's transactions.
///
/// Fields left out of the request body keep their current value.
pub async fn update_transaction_endpoint(
    State(state): State<DbState>,
    principal: Principal,
    ApiPath(transaction_id): ApiPath<TransactionId>,
    ApiJson(patch): ApiJson<TransactionPatch>,
) -> Result<impl IntoResponse, Error> {
    let update = patch.validate()?;

    let connection = lock_connection(&state.db_connection)?;
    let transaction = update_transaction(transaction_id, principal.user_id, update, &connection)?;

    Ok(Json(json!({
        "message": "transaction updated successfully",
        "transaction": transaction,
    })))
}
