//! Category creation endpoint.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::{
    Error,
    auth::Principal,
    category::{CategoryData, CategoryName, create_category},
    db::{DbState, lock_connection},
    extract::ApiJson,
};

/// A route handler for creating a new category owned by the requesting user.
pub async fn create_category_endpoint(
    State(state): State<DbState>,
    principal: Principal,
    ApiJson(data): ApiJson<CategoryData>,
) -> Result<impl IntoResponse, Error> {
    let name = CategoryName::new(&data.name)?;

    let connection = lock_connection(&state.db_connection)?;
    let category = create_category(principal.user_id, name, &connection)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "category created successfully",
            "category": category,
        })),
    ))
}

#[cfg(test)]
mod create_category_endpoint_tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::{
        endpoints,
        test_utils::{get_test_server, get_test_state, register_and_log_in},
    };

    #[tokio::test]
    async fn create_category_succeeds() {
        let server = get_test_server(get_test_state());
        let token = register_and_log_in(&server, "alice").await;

        let response = server
            .post(endpoints::CATEGORIES)
            .authorization_bearer(&token)
            .json(&json!({"name": "  Food "}))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body = response.json::<Value>();
        let category = &body["category"];
        assert!(body["message"].is_string());
        assert!(category["id"].as_i64().unwrap() > 0);
        assert!(category["user_id"].as_i64().unwrap() > 0);
        assert_eq!(category["name"], "Food");
        assert!(category["created_at"].is_string());
        assert_eq!(category["created_at"], category["updated_at"]);
    }

    #[tokio::test]
    async fn create_category_fails_on_empty_name() {
        let server = get_test_server(get_test_state());
        let token = register_and_log_in(&server, "alice").await;

        let response = server
            .post(endpoints::CATEGORIES)
            .authorization_bearer(&token)
            .json(&json!({"name": " "}))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>()["error"],
            "category name cannot be empty"
        );
    }

    #[tokio::test]
    async fn create_category_fails_without_token() {
        let server = get_test_server(get_test_state());

        let response = server
            .post(endpoints::CATEGORIES)
            .json(&json!({"name": "Food"}))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }
}
