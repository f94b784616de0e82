//! Listing a user's transactions with optional filters.

use rusqlite::{Connection, params_from_iter, types::Value};
use time::Date;

use crate::{
    Error,
    auth::UserID,
    category::CategoryId,
    date::format_date,
    transaction::{
        Transaction,
        core::{TRANSACTION_COLUMNS, map_transaction_row},
    },
};

/// Defines which transactions should be fetched by [query_transactions].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TransactionFilter {
    /// Only include transactions in this category.
    pub category_id: Option<CategoryId>,
    /// Only include transactions on or after this date.
    pub begin_date: Option<Date>,
    /// Only include transactions on or before this date. The whole day is included.
    pub end_date: Option<Date>,
}

/// Query for a user's transactions, newest first.
///
/// Transactions on the same date are ordered by ID, newest first, so the order is stable.
///
/// # Errors
/// This function will return a [Error::SqlError] there is a SQL error.
pub fn query_transactions(
    user_id: UserID,
    filter: &TransactionFilter,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let mut where_clause_parts = vec!["\"transaction\".user_id = ?1".to_string()];
    let mut query_parameters = vec![Value::Integer(user_id.as_i64())];

    if let Some(category_id) = filter.category_id {
        query_parameters.push(Value::Integer(category_id));
        where_clause_parts.push(format!(
            "\"transaction\".category_id = ?{}",
            query_parameters.len()
        ));
    }

    if let Some(begin_date) = filter.begin_date {
        query_parameters.push(Value::Text(format_date(begin_date)));
        where_clause_parts.push(format!("\"transaction\".date >= ?{}", query_parameters.len()));
    }

    if let Some(end_date) = filter.end_date {
        query_parameters.push(Value::Text(format_date(end_date)));
        where_clause_parts.push(format!("\"transaction\".date <= ?{}", query_parameters.len()));
    }

    let query_string = format!(
        "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\"
         INNER JOIN category ON category.id = \"transaction\".category_id
         WHERE {}
         ORDER BY \"transaction\".date DESC, \"transaction\".id DESC",
        where_clause_parts.join(" AND ")
    );
    let params = params_from_iter(query_parameters.iter());

    connection
        .prepare(&query_string)?
        .query_map(params, map_transaction_row)?
        .map(|transaction_result| transaction_result.map_err(Error::from))
        .collect()
}
