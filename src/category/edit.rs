//! Category renaming endpoint.

use axum::{Json, extract::State, response::IntoResponse};
use serde_json::json;

use crate::{
    Error,
    auth::Principal,
    category::{CategoryData, CategoryId, CategoryName, update_category},
    db::{DbState, lock_connection},
    extract::{ApiJson, ApiPath},
};

/// A route handler for renaming one of the requesting user's categories.
pub async fn update_category_endpoint(
    State(state): State<DbState>,
    principal: Principal,
    ApiPath(category_id): ApiPath<CategoryId>,
    ApiJson(data): ApiJson<CategoryData>,
) -> Result<impl IntoResponse, Error> {
    let name = CategoryName::new(&data.name)?;

    let connection = lock_connection(&state.db_connection)?;
    let category = update_category(category_id, principal.user_id, name, &connection)?;

    Ok(Json(json!({
        "message": "category updated successfully",
        "category": category,
    })))
}
