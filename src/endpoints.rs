//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/categories/{category_id}', use [format_endpoint].

/// The route for registering a new user.
pub const REGISTER: &str = "/api/register";
/// The route for exchanging a username and password for a bearer token.
pub const LOG_IN: &str = "/api/login";
/// The route for creating and listing categories.
pub const CATEGORIES: &str = "/api/categories";
/// The route for getting, updating and deleting a single category.
pub const CATEGORY: &str = "/api/categories/{category_id}";
/// The route for creating and listing transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route for getting, updating and deleting a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route for the per-category totals of a single day.
pub const DAILY_SUMMARY: &str = "/api/summary/daily";
/// The route for the per-category totals of a date range.
pub const PERIOD_SUMMARY: &str = "/api/summary/period";

/// Replace the first parameter in `endpoint_path` with `id`.
///
/// Paths without a parameter are returned unchanged.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
