//! Aggregation queries for the per-category summaries.

use rusqlite::Connection;
use serde::Serialize;

use crate::{
    Error,
    auth::UserID,
    category::{CategoryId, CategoryName},
    date::{DateRange, format_date},
    money::serialize_cents,
};

/// The ID and name of a category in a summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryLabel {
    pub id: CategoryId,
    pub name: CategoryName,
}

/// The total amount of a user's transactions in one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category: CategoryLabel,
    /// The sum of the transaction amounts in cents, sent to clients as dollars.
    #[serde(serialize_with = "serialize_cents")]
    pub total_amount: i64,
}

/// Sum the amounts of a user's transactions in `date_range`, grouped by category.
///
/// Only categories with at least one transaction in the range are included. Categories are
/// ordered by total, largest first, with ties broken by category ID.
///
/// Expenses and income are both added to the total as positive amounts. A range that ends
/// before it starts contains no transactions.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn get_category_totals(
    user_id: UserID,
    date_range: DateRange,
    connection: &Connection,
) -> Result<Vec<CategoryTotal>, Error> {
    connection
        .prepare(
            "SELECT category.id, category.name, SUM(t.amount) AS total
            FROM \"transaction\" t
            INNER JOIN category ON category.id = t.category_id
            WHERE t.user_id = ?1 AND t.date BETWEEN ?2 AND ?3
            GROUP BY category.id, category.name
            ORDER BY total DESC, category.id ASC",
        )?
        .query_map(
            (
                user_id.as_i64(),
                format_date(date_range.start),
                format_date(date_range.end),
            ),
            |row| {
                let raw_name: String = row.get(1)?;

                Ok(CategoryTotal {
                    category: CategoryLabel {
                        id: row.get(0)?,
                        name: CategoryName::new_unchecked(&raw_name),
                    },
                    total_amount: row.get(2)?,
                })
            },
        )?
        .collect::<Result<Vec<CategoryTotal>, rusqlite::Error>>()
        .map_err(|error| error.into())
}

#[cfg(test)]
mod category_totals_tests {
    use rusqlite::Connection;
    use time::{Date, macros::date};

    use crate::{
        auth::UserID,
        category::{Category, CategoryName, create_category},
        date::DateRange,
        money::Amount,
        test_utils::{create_test_user, get_test_connection},
        transaction::{Transaction, TransactionType, create_transaction},
    };

    use super::get_category_totals;

    fn insert(
        category: &Category,
        cents: i64,
        date: Date,
        transaction_type: TransactionType,
        connection: &Connection,
    ) {
        create_transaction(
            Transaction::build(
                category.id,
                Amount::from_cents(cents).unwrap(),
                date,
                transaction_type,
            ),
            category.user_id,
            connection,
        )
        .expect("Could not create transaction");
    }

    fn totals(user_id: UserID, range: DateRange, conn: &Connection) -> Vec<(String, i64)> {
        get_category_totals(user_id, range, conn)
            .expect("Could not get category totals")
            .into_iter()
            .map(|total| (total.category.name.to_string(), total.total_amount))
            .collect()
    }

    #[test]
    fn groups_by_category_largest_first() {
        let conn = get_test_connection();
        let user_id = create_test_user("alice", &conn);
        let food = create_category(user_id, CategoryName::new_unchecked("Food"), &conn).unwrap();
        let rent = create_category(user_id, CategoryName::new_unchecked("Rent"), &conn).unwrap();
        create_category(user_id, CategoryName::new_unchecked("Unused"), &conn).unwrap();
        let day = date!(2024 - 01 - 05);
        insert(&food, 1250, day, TransactionType::Expense, &conn);
        insert(&food, 300, day, TransactionType::Expense, &conn);
        insert(&rent, 50000, day, TransactionType::Expense, &conn);

        let got = totals(user_id, DateRange::single_day(day), &conn);

        assert_eq!(
            got,
            vec![("Rent".to_owned(), 50000), ("Food".to_owned(), 1550)]
        );
    }

    #[test]
    fn ties_are_ordered_by_category_id() {
        let conn = get_test_connection();
        let user_id = create_test_user("alice", &conn);
        let first = create_category(user_id, CategoryName::new_unchecked("Zoo"), &conn).unwrap();
        let second = create_category(user_id, CategoryName::new_unchecked("Art"), &conn).unwrap();
        let day = date!(2024 - 01 - 05);
        insert(&second, 100, day, TransactionType::Expense, &conn);
        insert(&first, 100, day, TransactionType::Expense, &conn);

        let got = get_category_totals(user_id, DateRange::single_day(day), &conn).unwrap();

        assert_eq!(got[0].category.id, first.id);
        assert_eq!(got[1].category.id, second.id);
    }

    // Income is added to the total rather than subtracted from it.
    #[test]
    fn income_and_expenses_are_summed_together() {
        let conn = get_test_connection();
        let user_id = create_test_user("alice", &conn);
        let misc = create_category(user_id, CategoryName::new_unchecked("Misc"), &conn).unwrap();
        let day = date!(2024 - 01 - 05);
        insert(&misc, 1000, day, TransactionType::Expense, &conn);
        insert(&misc, 400, day, TransactionType::Income, &conn);

        let got = totals(user_id, DateRange::single_day(day), &conn);

        assert_eq!(got, vec![("Misc".to_owned(), 1400)]);
    }

    #[test]
    fn range_includes_both_end_days_only() {
        let conn = get_test_connection();
        let user_id = create_test_user("alice", &conn);
        let food = create_category(user_id, CategoryName::new_unchecked("Food"), &conn).unwrap();
        insert(&food, 1, date!(2024 - 01 - 04), TransactionType::Expense, &conn);
        insert(&food, 10, date!(2024 - 01 - 05), TransactionType::Expense, &conn);
        insert(&food, 100, date!(2024 - 01 - 07), TransactionType::Expense, &conn);
        insert(&food, 1000, date!(2024 - 01 - 08), TransactionType::Expense, &conn);

        let got = totals(
            user_id,
            DateRange::new(date!(2024 - 01 - 05), date!(2024 - 01 - 07)),
            &conn,
        );

        assert_eq!(got, vec![("Food".to_owned(), 110)]);
    }

    #[test]
    fn daily_total_equals_single_day_range() {
        let conn = get_test_connection();
        let user_id = create_test_user("alice", &conn);
        let food = create_category(user_id, CategoryName::new_unchecked("Food"), &conn).unwrap();
        let rent = create_category(user_id, CategoryName::new_unchecked("Rent"), &conn).unwrap();
        let day = date!(2024 - 01 - 05);
        insert(&food, 1250, day, TransactionType::Expense, &conn);
        insert(&rent, 800, day, TransactionType::Income, &conn);
        insert(&rent, 800, date!(2024 - 01 - 06), TransactionType::Expense, &conn);

        let daily = get_category_totals(user_id, DateRange::single_day(day), &conn).unwrap();
        let period = get_category_totals(user_id, DateRange::new(day, day), &conn).unwrap();

        assert_eq!(daily, period);
        assert_eq!(daily.len(), 2);
    }

    #[test]
    fn reversed_range_is_empty() {
        let conn = get_test_connection();
        let user_id = create_test_user("alice", &conn);
        let food = create_category(user_id, CategoryName::new_unchecked("Food"), &conn).unwrap();
        insert(&food, 100, date!(2024 - 01 - 05), TransactionType::Expense, &conn);

        let got = totals(
            user_id,
            DateRange::new(date!(2024 - 01 - 07), date!(2024 - 01 - 01)),
            &conn,
        );

        assert!(got.is_empty());
    }

    #[test]
    fn only_includes_own_transactions() {
        let conn = get_test_connection();
        let alice = create_test_user("alice", &conn);
        let bob = create_test_user("bob", &conn);
        let alices = create_category(alice, CategoryName::new_unchecked("Food"), &conn).unwrap();
        let bobs = create_category(bob, CategoryName::new_unchecked("Food"), &conn).unwrap();
        let day = date!(2024 - 01 - 05);
        insert(&alices, 100, day, TransactionType::Expense, &conn);
        insert(&bobs, 999, day, TransactionType::Expense, &conn);

        let got = totals(alice, DateRange::single_day(day), &conn);

        assert_eq!(got, vec![("Food".to_owned(), 100)]);
    }
}
