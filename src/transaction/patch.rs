//! Partial updates of transactions.
//!
//! A field in an update request can be left out, set to `null`, or set to a new value. Leaving a
//! field out keeps the stored value, and `null` clears the description. Every other field cannot
//! be cleared.

use rusqlite::Connection;
use serde::{Deserialize, Deserializer};
use time::Date;

use crate::{
    Error,
    auth::UserID,
    category::CategoryId,
    date::parse_date,
    db::current_timestamp,
    money::Amount,
    transaction::{
        Transaction, TransactionId, TransactionType,
        core::{ensure_category_exists, get_transaction},
    },
};

/// A field of a partial update.
#[derive(Debug, Clone, PartialEq)]
pub enum Patch<T> {
    /// The field was not in the request.
    Absent,
    /// The field was explicitly set to `null`.
    Null,
    /// The field was set to a value.
    Value(T),
}

// `#[derive(Default)]` would add a `T: Default` bound.
impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Absent
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Only called for fields that are present, absent fields fall back to `Default`.
        Option::<T>::deserialize(deserializer).map(|value| match value {
            Some(value) => Patch::Value(value),
            None => Patch::Null,
        })
    }
}

impl<T> Patch<T> {
    /// Convert a field that cannot be cleared to an `Option` of the new value.
    ///
    /// # Errors
    /// Returns [Error::NullField] naming `field` if the field was set to `null`.
    fn required(self, field: &'static str) -> Result<Option<T>, Error> {
        match self {
            Patch::Absent => Ok(None),
            Patch::Null => Err(Error::NullField(field)),
            Patch::Value(value) => Ok(Some(value)),
        }
    }
}

/// The request body for updating a transaction.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionPatch {
    #[serde(default)]
    pub category_id: Patch<CategoryId>,
    #[serde(default)]
    pub amount: Patch<f64>,
    #[serde(default)]
    pub description: Patch<String>,
    #[serde(default)]
    pub date: Patch<String>,
    #[serde(default, rename = "type")]
    pub transaction_type: Patch<String>,
}

/// A validated [TransactionPatch]. `None` fields keep their stored value.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TransactionUpdate {
    pub category_id: Option<CategoryId>,
    pub amount: Option<Amount>,
    pub description: Option<String>,
    pub date: Option<Date>,
    pub transaction_type: Option<TransactionType>,
}

impl TransactionPatch {
    /// Validate every field of the patch.
    ///
    /// # Errors
    /// Returns the error for the first invalid field, or [Error::NullField] if a field other than
    /// `description` is `null`.
    pub fn validate(self) -> Result<TransactionUpdate, Error> {
        let description = match self.description {
            Patch::Absent => None,
            Patch::Null => Some(String::new()),
            Patch::Value(description) => Some(description),
        };

        Ok(TransactionUpdate {
            category_id: self.category_id.required("category_id")?,
            amount: self
                .amount
                .required("amount")?
                .map(Amount::from_dollars)
                .transpose()?,
            description,
            date: self
                .date
                .required("date")?
                .map(|date| parse_date(&date))
                .transpose()?,
            transaction_type: self
                .transaction_type
                .required("type")?
                .map(|transaction_type| transaction_type.parse())
                .transpose()?,
        })
    }
}

/// Apply `update` to a transaction owned by `user_id` and return the updated transaction.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a transaction owned by `user_id`,
/// - [Error::CategoryNotFound] if the new category does not exist or belongs to another user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_transaction(
    id: TransactionId,
    user_id: UserID,
    update: TransactionUpdate,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let current = get_transaction(id, user_id, connection)?;

    if let Some(category_id) = update.category_id {
        ensure_category_exists(category_id, user_id, connection)?;
    }

    connection.execute(
        "UPDATE \"transaction\"
         SET category_id = ?1, amount = ?2, description = ?3, date = ?4, type = ?5, updated_at = ?6
         WHERE id = ?7 AND user_id = ?8",
        (
            update.category_id.unwrap_or(current.category_id),
            update.amount.unwrap_or(current.amount),
            update.description.unwrap_or(current.description),
            update.date.unwrap_or(current.date),
            update.transaction_type.unwrap_or(current.transaction_type),
            current_timestamp(),
            id,
            user_id.as_i64(),
        ),
    )?;

    get_transaction(id, user_id, connection)
}
