//! Fixed-point monetary amounts.

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Serialize, Serializer};

use crate::Error;

/// The largest amount that can be stored, 99,999,999.99 in cents.
pub const MAX_CENTS: i64 = 9_999_999_999;

/// A strictly positive amount of money with two decimal places.
///
/// The amount is held as a whole number of cents and is serialized as a JSON number,
/// e.g. 1250 cents is sent as `12.5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(i64);

impl Amount {
    /// Create an amount from a whole number of cents.
    ///
    /// # Errors
    /// Returns [Error::NonPositiveAmount] if `cents` is zero or negative, or
    /// [Error::InvalidInput] if `cents` is larger than [MAX_CENTS].
    pub fn from_cents(cents: i64) -> Result<Self, Error> {
        if cents <= 0 {
            return Err(Error::NonPositiveAmount(cents_to_dollars(cents)));
        }

        if cents > MAX_CENTS {
            return Err(Error::InvalidInput(format!(
                "amount cannot be larger than {}",
                cents_to_dollars(MAX_CENTS)
            )));
        }

        Ok(Self(cents))
    }

    /// Create an amount from a decimal number of dollars, rounding to the nearest cent.
    ///
    /// # Errors
    /// Returns [Error::NonPositiveAmount] if `dollars` rounds to zero cents or less, or
    /// [Error::InvalidInput] if `dollars` is not finite or is too large.
    pub fn from_dollars(dollars: f64) -> Result<Self, Error> {
        if !dollars.is_finite() {
            return Err(Error::InvalidInput(
                "amount must be a finite number".to_owned(),
            ));
        }

        let cents = (dollars * 100.0).round();

        if cents < 1.0 {
            return Err(Error::NonPositiveAmount(dollars));
        }

        if cents > MAX_CENTS as f64 {
            return Err(Error::InvalidInput(format!(
                "amount cannot be larger than {}",
                cents_to_dollars(MAX_CENTS)
            )));
        }

        Ok(Self(cents as i64))
    }

    /// The amount as a whole number of cents.
    pub fn cents(&self) -> i64 {
        self.0
    }
}

/// Convert a whole number of cents to dollars.
pub fn cents_to_dollars(cents: i64) -> f64 {
    cents as f64 / 100.0
}

/// Serialize a whole number of cents as a decimal number of dollars.
pub fn serialize_cents<S>(cents: &i64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_f64(cents_to_dollars(*cents))
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serialize_cents(&self.0, serializer)
    }
}

impl ToSql for Amount {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0))
    }
}

impl FromSql for Amount {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let cents = i64::column_result(value)?;

        if cents <= 0 {
            return Err(FromSqlError::OutOfRange(cents));
        }

        Ok(Self(cents))
    }
}
