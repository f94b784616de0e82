//! Wrappers around axum's extractors that report rejections as [Error]s.
//!
//! axum's own extractors reply to bad input with plain text and a mix of status codes.
//! These wrappers turn every rejection into an [Error::InvalidInput] so that clients
//! always receive a 400 with a JSON body.

use axum::extract::{
    FromRequest, FromRequestParts,
    rejection::{JsonRejection, PathRejection, QueryRejection},
};

use crate::Error;

/// Extracts a JSON request body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct ApiJson<T>(pub T);

/// Extracts path parameters.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(Error))]
pub struct ApiPath<T>(pub T);

/// Extracts the query string.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(Error))]
pub struct ApiQuery<T>(pub T);

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidInput(rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::InvalidInput(rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::InvalidInput(rejection.body_text())
    }
}

#[cfg(test)]
mod extract_tests {
    use axum::{
        Router,
        http::StatusCode,
        routing::{get, post},
    };
    use axum_test::TestServer;
    use serde::Deserialize;
    use serde_json::{Value, json};

    use super::{ApiJson, ApiPath, ApiQuery};

    #[derive(Deserialize)]
    struct Body {
        value: i64,
    }

    #[derive(Deserialize)]
    struct Params {
        page: u32,
    }

    async fn echo_json(ApiJson(body): ApiJson<Body>) -> String {
        body.value.to_string()
    }

    async fn echo_path(ApiPath(id): ApiPath<i64>) -> String {
        id.to_string()
    }

    async fn echo_query(ApiQuery(params): ApiQuery<Params>) -> String {
        params.page.to_string()
    }

    fn get_server() -> TestServer {
        let app = Router::new()
            .route("/json", post(echo_json))
            .route("/path/{id}", get(echo_path))
            .route("/query", get(echo_query));

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn valid_input_is_extracted() {
        let server = get_server();

        server
            .post("/json")
            .json(&json!({"value": 3}))
            .await
            .assert_text("3");
        server.get("/path/42").await.assert_text("42");
        server.get("/query?page=2").await.assert_text("2");
    }

    #[tokio::test]
    async fn wrong_json_type_is_bad_request() {
        let response = get_server()
            .post("/json")
            .json(&json!({"value": "three"}))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(response.json::<Value>()["error"].is_string());
    }

    #[tokio::test]
    async fn missing_content_type_is_bad_request() {
        let response = get_server().post("/json").text("{\"value\": 3}").await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(response.json::<Value>()["error"].is_string());
    }

    #[tokio::test]
    async fn invalid_path_is_bad_request() {
        let response = get_server().get("/path/forty-two").await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(response.json::<Value>()["error"].is_string());
    }

    #[tokio::test]
    async fn invalid_query_is_bad_request() {
        let response = get_server().get("/query?page=-1").await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(response.json::<Value>()["error"].is_string());
    }
}
