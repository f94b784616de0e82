//! Endpoints for listing a user's categories and fetching a single category.

use axum::{Json, extract::State, response::IntoResponse};
use serde_json::json;

use crate::{
    Error,
    auth::Principal,
    category::{CategoryId, get_categories, get_category},
    db::{DbState, lock_connection},
    extract::ApiPath,
};

/// A route handler that lists the requesting user's categories sorted by name.
pub async fn get_categories_endpoint(
    State(state): State<DbState>,
    principal: Principal,
) -> Result<impl IntoResponse, Error> {
    let connection = lock_connection(&state.db_connection)?;
    let categories = get_categories(principal.user_id, &connection)?;

    Ok(Json(json!({ "categories": categories })))
}

/// A route handler for fetching one of the requesting user's categories.
pub async fn get_category_endpoint(
    State(state): State<DbState>,
    principal: Principal,
    ApiPath(category_id): ApiPath<CategoryId>,
) -> Result<impl IntoResponse, Error> {
    let connection = lock_connection(&state.db_connection)?;
    let category = get_category(category_id, principal.user_id, &connection)?;

    Ok(Json(json!({ "category": category })))
}

#[cfg(test)]
mod list_category_endpoint_tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::{
        endpoints::{self, format_endpoint},
        test_utils::{create_category_via_api, get_test_server, get_test_state, register_and_log_in},
    };

    #[tokio::test]
    async fn list_categories_is_sorted_and_scoped_to_user() {
        let server = get_test_server(get_test_state());
        let alice = register_and_log_in(&server, "alice").await;
        let bob = register_and_log_in(&server, "bob").await;
        create_category_via_api(&server, &alice, "Transport").await;
        create_category_via_api(&server, &alice, "Food").await;
        create_category_via_api(&server, &bob, "Hobbies").await;

        let response = server
            .get(endpoints::CATEGORIES)
            .authorization_bearer(&alice)
            .await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        let names: Vec<&str> = body["categories"]
            .as_array()
            .expect("categories is not an array")
            .iter()
            .map(|category| category["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Food", "Transport"]);
    }

    #[tokio::test]
    async fn list_categories_is_empty_for_new_user() {
        let server = get_test_server(get_test_state());
        let token = register_and_log_in(&server, "alice").await;

        let response = server
            .get(endpoints::CATEGORIES)
            .authorization_bearer(&token)
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({"categories": []}));
    }

    #[tokio::test]
    async fn get_category_succeeds() {
        let server = get_test_server(get_test_state());
        let token = register_and_log_in(&server, "alice").await;
        let category_id = create_category_via_api(&server, &token, "Food").await;

        let response = server
            .get(&format_endpoint(endpoints::CATEGORY, category_id))
            .authorization_bearer(&token)
            .await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["category"]["id"], category_id);
        assert_eq!(body["category"]["name"], "Food");
    }

    #[tokio::test]
    async fn get_category_of_another_user_is_not_found() {
        let server = get_test_server(get_test_state());
        let alice = register_and_log_in(&server, "alice").await;
        let bob = register_and_log_in(&server, "bob").await;
        let category_id = create_category_via_api(&server, &alice, "Food").await;

        let response = server
            .get(&format_endpoint(endpoints::CATEGORY, category_id))
            .authorization_bearer(&bob)
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn get_category_with_invalid_id_is_bad_request() {
        let server = get_test_server(get_test_state());
        let token = register_and_log_in(&server, "alice").await;

        let response = server
            .get("/api/categories/food")
            .authorization_bearer(&token)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(response.json::<Value>()["error"].is_string());
    }
}
