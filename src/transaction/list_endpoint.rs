//! Endpoints for listing a user's transactions and fetching a single transaction.

use axum::{Json, extract::State, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;

use crate::{
    Error,
    auth::Principal,
    category::CategoryId,
    date::parse_optional_date,
    db::{DbState, lock_connection},
    extract::{ApiPath, ApiQuery},
    transaction::{TransactionFilter, TransactionId, get_transaction, query_transactions},
};

/// The query string for listing transactions.
///
/// Parameters are kept as strings so that empty values can be treated as absent.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionQueryParams {
    pub category_id: Option<String>,
    pub begin_date: Option<String>,
    pub end_date: Option<String>,
}

impl TryFrom<TransactionQueryParams> for TransactionFilter {
    type Error = Error;

    fn try_from(params: TransactionQueryParams) -> Result<Self, Self::Error> {
        let category_id = match params.category_id.as_deref() {
            None | Some("") => None,
            Some(text) => Some(text.parse::<CategoryId>().map_err(|_| {
                Error::InvalidInput(format!("invalid category_id \"{text}\""))
            })?),
        };

        Ok(TransactionFilter {
            category_id,
            begin_date: parse_optional_date(params.begin_date.as_deref())?,
            end_date: parse_optional_date(params.end_date.as_deref())?,
        })
    }
}

/// A route handler that lists the requesting user's transactions, newest first.
///
/// Supports the optional query parameters `category_id`, `begin_date` and `end_date`.
pub async fn get_transactions_endpoint(
    State(state): State<DbState>,
    principal: Principal,
    ApiQuery(params): ApiQuery<TransactionQueryParams>,
) -> Result<impl IntoResponse, Error> {
    let filter = TransactionFilter::try_from(params)?;

    let connection = lock_connection(&state.db_connection)?;
    let transactions = query_transactions(principal.user_id, &filter, &connection)?;

    Ok(Json(json!({ "transactions": transactions })))
}

/// A route handler for fetching one of the requesting user's transactions.
pub async fn get_transaction_endpoint(
    State(state): State<DbState>,
    principal: Principal,
    ApiPath(transaction_id): ApiPath<TransactionId>,
) -> Result<impl IntoResponse, Error> {
    let connection = lock_connection(&state.db_connection)?;
    let transaction = get_transaction(transaction_id, principal.user_id, &connection)?;

    Ok(Json(json!({ "transaction": transaction })))
}
