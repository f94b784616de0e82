//! Transaction management for the expense tracker.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `NewTransaction` builder for creating transactions
//! - Database functions for storing, querying, and updating transactions
//! - Route handlers for the transaction endpoints

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod list_endpoint;
mod patch;
mod query;

pub use core::{
    NewTransaction, Transaction, TransactionId, TransactionType, count_transactions_in_category,
    create_transaction, create_transaction_table, delete_transaction, get_transaction,
    map_transaction_row,
};
pub use create_endpoint::{TransactionData, create_transaction_endpoint};
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::update_transaction_endpoint;
pub use list_endpoint::{TransactionQueryParams, get_transaction_endpoint, get_transactions_endpoint};
pub use patch::{Patch, TransactionPatch, TransactionUpdate, update_transaction};
pub use query::{TransactionFilter, query_transactions};
