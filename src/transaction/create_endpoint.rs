//! Transaction creation endpoint.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;

use crate::{
    Error,
    auth::Principal,
    category::CategoryId,
    date::parse_date,
    db::{DbState, lock_connection},
    extract::ApiJson,
    money::Amount,
    transaction::{NewTransaction, Transaction, TransactionType, create_transaction},
};

/// The request body for creating a transaction.
#[derive(Debug, Deserialize)]
pub struct TransactionData {
    pub category_id: CategoryId,
    pub amount: f64,
    pub description: Option<String>,
    /// A `YYYY-MM-DD` date.
    pub date: String,
    /// Either "expense" or "income".
    #[serde(rename = "type")]
    pub transaction_type: String,
}

impl TransactionData {
    /// Check the amount, date and type of the transaction.
    ///
    /// # Errors
    /// Returns the error for the first invalid field.
    pub fn validate(self) -> Result<NewTransaction, Error> {
        let amount = Amount::from_dollars(self.amount)?;
        let date = parse_date(&self.date)?;
        let transaction_type: TransactionType = self.transaction_type.parse()?;

        Ok(
            Transaction::build(self.category_id, amount, date, transaction_type)
                .description(self.description.as_deref().unwrap_or_default()),
        )
    }
}

/// A route handler for creating a new transaction owned by the requesting user.
///
/// The request is validated before anything is written, and the category must belong to the
/// requesting user.
pub async fn create_transaction_endpoint(
    State(state): State<DbState>,
    principal: Principal,
    ApiJson(data): ApiJson<TransactionData>,
) -> Result<impl IntoResponse, Error> {
    let new_transaction = data.validate()?;

    let connection = lock_connection(&state.db_connection)?;
    let transaction = create_transaction(new_transaction, principal.user_id, &connection)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "transaction created successfully",
            "transaction": transaction,
        })),
    ))
}
