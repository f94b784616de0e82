#![allow(missing_docs)]

use axum::http::StatusCode;
use axum_test::TestServer;
use rusqlite::Connection;
use serde_json::{Value, json};

use crate::{
    AppState,
    auth::{PasswordHash, UserID, Username, create_user},
    build_router,
    db::initialize,
    endpoints,
};

pub(crate) const TEST_PASSWORD: &str = "pw123";

/// The lowest cost bcrypt accepts, so that tests which register users stay fast.
const TEST_PASSWORD_COST: u32 = 4;

pub(crate) fn get_test_connection() -> Connection {
    let connection = Connection::open_in_memory().expect("Could not open in-memory database");
    initialize(&connection).expect("Could not initialize database");

    connection
}

pub(crate) fn create_test_user(username: &str, connection: &Connection) -> UserID {
    create_user(
        Username::new(username).expect("Invalid test username"),
        PasswordHash::new_unchecked("hunter2"),
        connection,
    )
    .expect("Could not create test user")
    .id
}

pub(crate) fn get_test_state() -> AppState {
    let connection = Connection::open_in_memory().expect("Could not open in-memory database");

    AppState::with_default_token_duration(connection, "wehopnbrsauyecaoehs")
        .expect("Could not create app state")
        .with_password_cost(TEST_PASSWORD_COST)
}

pub(crate) fn get_test_server(state: AppState) -> TestServer {
    TestServer::try_new(build_router(state)).expect("Could not create test server.")
}

/// Register `username` with [TEST_PASSWORD] and return a bearer token for them.
pub(crate) async fn register_and_log_in(server: &TestServer, username: &str) -> String {
    let credentials = json!({ "username": username, "password": TEST_PASSWORD });

    server
        .post(endpoints::REGISTER)
        .json(&credentials)
        .await
        .assert_status(StatusCode::CREATED);

    let response = server.post(endpoints::LOG_IN).json(&credentials).await;
    response.assert_status_ok();

    response.json::<Value>()["token"]
        .as_str()
        .expect("Log in response has no token")
        .to_owned()
}

pub(crate) async fn create_category_via_api(server: &TestServer, token: &str, name: &str) -> i64 {
    let response = server
        .post(endpoints::CATEGORIES)
        .authorization_bearer(token)
        .json(&json!({ "name": name }))
        .await;
    response.assert_status(StatusCode::CREATED);

    response.json::<Value>()["category"]["id"]
        .as_i64()
        .expect("Create category response has no ID")
}

pub(crate) async fn create_transaction_via_api(
    server: &TestServer,
    token: &str,
    category_id: i64,
    amount: f64,
    date: &str,
    transaction_type: &str,
) -> i64 {
    let response = server
        .post(endpoints::TRANSACTIONS)
        .authorization_bearer(token)
        .json(&json!({
            "category_id": category_id,
            "amount": amount,
            "date": date,
            "type": transaction_type,
        }))
        .await;
    response.assert_status(StatusCode::CREATED);

    response.json::<Value>()["transaction"]["id"]
        .as_i64()
        .expect("Create transaction response has no ID")
}
