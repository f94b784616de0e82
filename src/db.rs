//! Database initialization, schema migration and connection helpers.

use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::FromRef;
use rusqlite::{Connection, Transaction as SqlTransaction};
use time::OffsetDateTime;

use crate::{
    AppState, Error, auth::create_user_table, category::create_category_table,
    transaction::create_transaction_table,
};

/// The state needed by handlers that only read and write the database.
#[derive(Debug, Clone)]
pub struct DbState {
    /// The database connection shared by all requests.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DbState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Acquire the lock on the shared database connection.
///
/// # Errors
/// Returns [Error::DatabaseLockError] if the lock was poisoned by a panicking thread.
pub fn lock_connection(
    db_connection: &Mutex<Connection>,
) -> Result<MutexGuard<'_, Connection>, Error> {
    db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })
}

/// Create all of the database tables for the domain models.
///
/// Tables are created if they do not exist, and columns that were added after a table was
/// first created are added to existing tables. Columns are never dropped or altered.
///
/// # Errors
/// Returns an error if a table cannot be created or migrated.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", true)?;

    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_category_table(&transaction)?;
    create_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Add `column` to `table` unless the table already has it.
///
/// `definition` is everything after the column name in an `ALTER TABLE ... ADD COLUMN` clause,
/// e.g. `"TEXT NOT NULL DEFAULT ''"`. Returns whether the column was added.
///
/// # Errors
/// Returns an error if the table information cannot be read or the column cannot be added.
pub fn add_column_if_missing(
    connection: &Connection,
    table: &str,
    column: &str,
    definition: &str,
) -> Result<bool, rusqlite::Error> {
    let column_exists = connection
        .prepare(&format!("PRAGMA table_info(\"{table}\")"))?
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<Result<Vec<_>, _>>()?
        .iter()
        .any(|existing_column| existing_column == column);

    if column_exists {
        return Ok(false);
    }

    tracing::info!("Adding column {column} to table {table}");
    connection.execute(
        &format!("ALTER TABLE \"{table}\" ADD COLUMN {column} {definition}"),
        (),
    )?;

    Ok(true)
}

/// The current UTC time truncated to whole seconds.
///
/// Timestamps are truncated so that they survive a round trip through the database unchanged.
pub fn current_timestamp() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();

    now - time::Duration::nanoseconds(i64::from(now.nanosecond()))
}

#[cfg(test)]
mod db_tests {
    use rusqlite::Connection;

    use super::{add_column_if_missing, current_timestamp, initialize};

    #[test]
    fn initialize_is_idempotent() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).expect("Could not initialize database");
        initialize(&connection).expect("Could not initialize database a second time");
    }

    #[test]
    fn initialize_enables_foreign_keys() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        let foreign_keys: bool = connection
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();

        assert!(foreign_keys);
    }

    #[test]
    fn add_column_adds_missing_column_once() {
        let connection = Connection::open_in_memory().unwrap();
        connection
            .execute("CREATE TABLE foo (id INTEGER PRIMARY KEY)", ())
            .unwrap();

        let added = add_column_if_missing(&connection, "foo", "bar", "TEXT NOT NULL DEFAULT ''")
            .expect("Could not add column");
        let added_again =
            add_column_if_missing(&connection, "foo", "bar", "TEXT NOT NULL DEFAULT ''")
                .expect("Could not check column");

        assert!(added);
        assert!(!added_again);
        connection
            .execute("INSERT INTO foo (bar) VALUES ('baz')", ())
            .expect("Could not insert into added column");
    }

    #[test]
    fn current_timestamp_has_no_subseconds() {
        assert_eq!(current_timestamp().nanosecond(), 0);
    }
}
