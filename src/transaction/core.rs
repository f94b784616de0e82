//! Defines the core data models and database queries for transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    auth::UserID,
    category::{Category, CategoryId, get_category, map_category_row},
    date::iso_date,
    db::{add_column_if_missing, current_timestamp},
    money::Amount,
};

// ============================================================================
// MODELS
// ============================================================================

/// Database identifier for a transaction.
pub type TransactionId = i64;

/// Whether money was spent or earned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money that was spent.
    Expense,
    /// Money that was earned.
    Income,
}

impl TransactionType {
    /// The lowercase name used in JSON and in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Expense => "expense",
            TransactionType::Income => "income",
        }
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "expense" => Ok(TransactionType::Expense),
            "income" => Ok(TransactionType::Income),
            other => Err(Error::InvalidTransactionType(other.to_owned())),
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The user that owns the transaction.
    pub user_id: UserID,
    /// The ID of the category the transaction belongs to.
    pub category_id: CategoryId,
    /// The amount of money spent or earned. Always positive, see `transaction_type`.
    pub amount: Amount,
    /// A text description of what the transaction was for. Empty if none was given.
    pub description: String,
    /// When the transaction happened.
    #[serde(with = "iso_date")]
    pub date: Date,
    /// Whether the money was spent or earned.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    /// The category the transaction belongs to.
    pub category: Category,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [NewTransaction] for discoverability.
    pub fn build(
        category_id: CategoryId,
        amount: Amount,
        date: Date,
        transaction_type: TransactionType,
    ) -> NewTransaction {
        NewTransaction {
            category_id,
            amount,
            description: String::new(),
            date,
            transaction_type,
        }
    }
}

/// A validated transaction that has not been stored yet.
///
/// Pass it to [create_transaction] to store it.
#[derive(Debug, PartialEq, Clone)]
pub struct NewTransaction {
    /// The category the transaction will belong to.
    ///
    /// It is checked against the owner when the transaction is stored.
    pub category_id: CategoryId,
    pub amount: Amount,
    pub description: String,
    pub date: Date,
    pub transaction_type: TransactionType,
}

impl NewTransaction {
    /// Set the description for the transaction.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// The columns selected by every transaction query, with the joined category columns last.
pub(super) const TRANSACTION_COLUMNS: &str = "\"transaction\".id, \"transaction\".user_id, \
    \"transaction\".category_id, \"transaction\".amount, \"transaction\".description, \
    \"transaction\".date, \"transaction\".type, \"transaction\".created_at, \
    \"transaction\".updated_at, category.id, category.user_id, category.name, \
    category.created_at, category.updated_at";

/// Store a new transaction owned by `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::CategoryNotFound] if the category does not exist or belongs to another user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    new_transaction: NewTransaction,
    user_id: UserID,
    connection: &Connection,
) -> Result<Transaction, Error> {
    ensure_category_exists(new_transaction.category_id, user_id, connection)?;

    let now = current_timestamp();

    connection.execute(
        "INSERT INTO \"transaction\"
            (user_id, category_id, amount, description, date, type, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
        (
            user_id.as_i64(),
            new_transaction.category_id,
            new_transaction.amount,
            new_transaction.description,
            new_transaction.date,
            new_transaction.transaction_type,
            now,
        ),
    )?;

    get_transaction(connection.last_insert_rowid(), user_id, connection)
}

/// Retrieve a transaction and its category by the transaction's `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a transaction owned by `user_id`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(
    id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\"
             INNER JOIN category ON category.id = \"transaction\".category_id
             WHERE \"transaction\".id = ?1 AND \"transaction\".user_id = ?2"
        ))?
        .query_row((id, user_id.as_i64()), map_transaction_row)?;

    Ok(transaction)
}

/// Delete a transaction owned by `user_id`.
///
/// # Errors
/// Returns [Error::NotFound] if `id` does not refer to a transaction owned by `user_id`.
pub fn delete_transaction(
    id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
        (id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Count the transactions owned by `user_id` in a category.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_transactions_in_category(
    category_id: CategoryId,
    user_id: UserID,
    connection: &Connection,
) -> Result<u64, Error> {
    let count: i64 = connection.query_row(
        "SELECT COUNT(id) FROM \"transaction\" WHERE category_id = ?1 AND user_id = ?2",
        (category_id, user_id.as_i64()),
        |row| row.get(0),
    )?;

    Ok(count as u64)
}

/// Check that `category_id` refers to a category owned by `user_id`.
///
/// # Errors
/// Returns [Error::CategoryNotFound] if it does not.
pub(super) fn ensure_category_exists(
    category_id: CategoryId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    match get_category(category_id, user_id, connection) {
        Ok(_) => Ok(()),
        Err(Error::NotFound) => Err(Error::CategoryNotFound(category_id)),
        Err(error) => Err(error),
    }
}

/// The definition of the `type` column, shared by new tables and the migration of old ones.
const TYPE_COLUMN_DEFINITION: &str =
    "TEXT NOT NULL DEFAULT 'expense' CHECK (type IN ('expense', 'income'))";

/// Create the transaction table in the database.
///
/// Databases created before transactions had a type get a `type` column where every existing
/// transaction is an expense.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        &format!(
            "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL REFERENCES user(id),
                category_id INTEGER NOT NULL REFERENCES category(id),
                amount INTEGER NOT NULL CHECK (amount > 0),
                description TEXT NOT NULL DEFAULT '',
                date TEXT NOT NULL,
                type {TYPE_COLUMN_DEFINITION},
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
                )"
        ),
        (),
    )?;

    add_column_if_missing(connection, "transaction", "type", TYPE_COLUMN_DEFINITION)?;

    // Used by the transaction listing and the summaries.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, date);",
        (),
    )?;

    Ok(())
}

/// Map a row selected with [TRANSACTION_COLUMNS] to a [Transaction].
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        category_id: row.get(2)?,
        amount: row.get(3)?,
        description: row.get(4)?,
        date: row.get(5)?,
        transaction_type: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
        category: map_category_row(row, 9)?,
    })
}
