//! Category deletion endpoint.

use axum::{Json, extract::State, response::IntoResponse};
use serde_json::json;

use crate::{
    Error,
    auth::Principal,
    category::{CategoryId, delete_category},
    db::{DbState, lock_connection},
    extract::ApiPath,
};

/// Handle category deletion.
///
/// Categories that transactions still refer to are kept and a 409 with the number of those
/// transactions is returned.
pub async fn delete_category_endpoint(
    State(state): State<DbState>,
    principal: Principal,
    ApiPath(category_id): ApiPath<CategoryId>,
) -> Result<impl IntoResponse, Error> {
    let connection = lock_connection(&state.db_connection)?;
    delete_category(category_id, principal.user_id, &connection)?;

    tracing::debug!("User {} deleted category {category_id}", principal.user_id);

    Ok(Json(json!({ "message": "category deleted successfully" })))
}

#[cfg(test)]
mod delete_category_endpoint_tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::{
        endpoints::{self, format_endpoint},
        test_utils::{
            create_category_via_api, get_test_server, get_test_state, register_and_log_in,
        },
    };

    #[tokio::test]
    async fn delete_unused_category_succeeds() {
        let server = get_test_server(get_test_state());
        let token = register_and_log_in(&server, "alice").await;
        let category_id = create_category_via_api(&server, &token, "Food").await;

        let response = server
            .delete(&format_endpoint(endpoints::CATEGORY, category_id))
            .authorization_bearer(&token)
            .await;

        response.assert_status_ok();
        assert!(response.json::<Value>()["message"].is_string());
        server
            .get(&format_endpoint(endpoints::CATEGORY, category_id))
            .authorization_bearer(&token)
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_category_in_use_is_conflict_with_count() {
        let server = get_test_server(get_test_state());
        let token = register_and_log_in(&server, "alice").await;
        let category_id = create_category_via_api(&server, &token, "Food").await;
        for amount in [12.5, 3.0] {
            server
                .post(endpoints::TRANSACTIONS)
                .authorization_bearer(&token)
                .json(&json!({
                    "category_id": category_id,
                    "amount": amount,
                    "date": "2024-01-05",
                    "type": "expense",
                }))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let response = server
            .delete(&format_endpoint(endpoints::CATEGORY, category_id))
            .authorization_bearer(&token)
            .await;

        response.assert_status(StatusCode::CONFLICT);
        let body = response.json::<Value>();
        assert_eq!(body["count"], 2);
        assert!(body["error"].is_string());
        server
            .get(&format_endpoint(endpoints::CATEGORY, category_id))
            .authorization_bearer(&token)
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn delete_category_of_another_user_is_not_found() {
        let server = get_test_server(get_test_state());
        let alice = register_and_log_in(&server, "alice").await;
        let bob = register_and_log_in(&server, "bob").await;
        let category_id = create_category_via_api(&server, &alice, "Food").await;

        let response = server
            .delete(&format_endpoint(endpoints::CATEGORY, category_id))
            .authorization_bearer(&bob)
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
        server
            .get(&format_endpoint(endpoints::CATEGORY, category_id))
            .authorization_bearer(&alice)
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn delete_missing_category_is_not_found() {
        let server = get_test_server(get_test_state());
        let token = register_and_log_in(&server, "alice").await;

        let response = server
            .delete(&format_endpoint(endpoints::CATEGORY, 999999))
            .authorization_bearer(&token)
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
    }
}
