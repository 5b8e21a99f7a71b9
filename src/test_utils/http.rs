use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use rusqlite::Connection;
use serde_json::json;
use time::OffsetDateTime;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::{
    AppState, Expense, Mailer, Notification, auth::TokenResponse, build_router, endpoints,
    test_utils::RecordingMailer,
};

/// A password that passes the strength check.
pub(crate) const TEST_PASSWORD: &str = "averysafeandsecurepassword";

/// App state backed by an in-memory database that sends alerts with `mailer`.
pub(crate) fn new_test_state(mailer: Arc<dyn Mailer>) -> AppState {
    AppState::new(
        Connection::open_in_memory().expect("Could not create in-memory SQLite database"),
        "foobar",
        "Etc/UTC",
        mailer,
        "alerts@example.com",
    )
    .expect("Could not create app state")
    .with_password_hash_cost(4)
}

pub(crate) fn new_test_server_with_state(state: AppState) -> TestServer {
    TestServer::try_new(build_router(state)).expect("Could not create test server.")
}

/// A test server for the whole app and the receiving end of its alert e-mails.
pub(crate) fn new_test_server() -> (TestServer, UnboundedReceiver<Notification>) {
    let (mailer, notifications) = RecordingMailer::new();
    let server = new_test_server_with_state(new_test_state(Arc::new(mailer)));

    (server, notifications)
}

pub(crate) async fn must_register(server: &TestServer, email: &str) {
    server
        .post(endpoints::REGISTER)
        .json(&json!({"email": email, "password": TEST_PASSWORD}))
        .await
        .assert_status(StatusCode::CREATED);
}

/// Register `email` and return a bearer token for it.
pub(crate) async fn must_log_in(server: &TestServer, email: &str) -> String {
    must_register(server, email).await;

    let response = server
        .post(endpoints::LOG_IN)
        .json(&json!({"email": email, "password": TEST_PASSWORD}))
        .await;
    response.assert_status_ok();

    response.json::<TokenResponse>().token
}

/// Record an expense dated today.
pub(crate) async fn must_create_expense(
    server: &TestServer,
    token: &str,
    label: &str,
    value: i64,
) -> Expense {
    let today = OffsetDateTime::now_utc().date();

    let response = server
        .post(endpoints::EXPENSES)
        .authorization_bearer(token)
        .json(&json!({"label": label, "value": value, "date": today.to_string()}))
        .await;
    response.assert_status(StatusCode::CREATED);

    response.json::<Expense>()
}
