//! Database operations for categories.
//!
//! Every query takes the ID of the user making the request and only touches that user's
//! categories. A category owned by someone else behaves exactly like one that does not exist.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    auth::UserID,
    category::{Category, CategoryId, CategoryName},
    db::current_timestamp,
    transaction::count_transactions_in_category,
};

/// Create a category owned by `user_id` and return it with its generated ID.
pub fn create_category(
    user_id: UserID,
    name: CategoryName,
    connection: &Connection,
) -> Result<Category, Error> {
    let now = current_timestamp();

    connection.execute(
        "INSERT INTO category (user_id, name, created_at, updated_at) VALUES (?1, ?2, ?3, ?3);",
        (user_id.as_i64(), name.as_ref(), now),
    )?;

    let id = connection.last_insert_rowid();

    Ok(Category {
        id,
        user_id,
        name,
        created_at: now,
        updated_at: now,
    })
}

/// Retrieve a single category by ID.
///
/// # Errors
/// Returns [Error::NotFound] if the category does not exist or is owned by another user.
pub fn get_category(
    category_id: CategoryId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .prepare(
            "SELECT id, user_id, name, created_at, updated_at FROM category
             WHERE id = :id AND user_id = :user_id;",
        )?
        .query_row(
            &[(":id", &category_id), (":user_id", &user_id.as_i64())],
            |row| map_category_row(row, 0),
        )
        .map_err(|error| error.into())
}

/// Retrieve all of a user's categories ordered alphabetically by name.
pub fn get_categories(user_id: UserID, connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, name, created_at, updated_at FROM category
             WHERE user_id = :user_id ORDER BY name ASC, id ASC;",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], |row| {
            map_category_row(row, 0)
        })?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Rename a category and return the updated category.
///
/// # Errors
/// Returns [Error::NotFound] if the category does not exist or is owned by another user.
pub fn update_category(
    category_id: CategoryId,
    user_id: UserID,
    new_name: CategoryName,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .prepare(
            "UPDATE category SET name = ?1, updated_at = ?2 WHERE id = ?3 AND user_id = ?4
             RETURNING id, user_id, name, created_at, updated_at;",
        )?
        .query_row(
            (
                new_name.as_ref(),
                current_timestamp(),
                category_id,
                user_id.as_i64(),
            ),
            |row| map_category_row(row, 0),
        )
        .map_err(|error| error.into())
}

/// Delete a category that no transactions refer to.
///
/// # Errors
/// Returns [Error::NotFound] if the category does not exist or is owned by another user, or
/// [Error::CategoryInUse] if any transactions refer to it. Nothing is deleted on error.
pub fn delete_category(
    category_id: CategoryId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    get_category(category_id, user_id, connection)?;

    let count = count_transactions_in_category(category_id, user_id, connection)?;
    if count > 0 {
        return Err(Error::CategoryInUse { count });
    }

    connection.execute(
        "DELETE FROM category WHERE id = ?1 AND user_id = ?2",
        (category_id, user_id.as_i64()),
    )?;

    Ok(())
}

/// Initialize the category table and indexes.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL REFERENCES user(id),
            name TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_category_user_id ON category(user_id);",
    )?;

    Ok(())
}

/// Map the five category columns starting at `offset` to a [Category].
///
/// The columns must be in the order `id, user_id, name, created_at, updated_at`.
pub fn map_category_row(row: &Row, offset: usize) -> Result<Category, rusqlite::Error> {
    let id = row.get(offset)?;
    let user_id = UserID::new(row.get(offset + 1)?);
    let raw_name: String = row.get(offset + 2)?;
    let name = CategoryName::new_unchecked(&raw_name);

    Ok(Category {
        id,
        user_id,
        name,
        created_at: row.get(offset + 3)?,
        updated_at: row.get(offset + 4)?,
    })
}
