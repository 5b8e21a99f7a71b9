#![allow(missing_docs)]

pub(crate) mod html;
pub(crate) mod http;
pub(crate) mod mail;

use std::str::FromStr;

use email_address::EmailAddress;
use rusqlite::Connection;
use rust_decimal::Decimal;
use time::OffsetDateTime;

use crate::{
    Expense, NewExpense, PasswordHash, User, UserId, ValidatedPassword, create_expense,
    initialize_db, user::create_user,
};

pub(crate) use html::{assert_valid_html, parse_html_fragment};
pub(crate) use http::{
    TEST_PASSWORD, must_create_expense, must_log_in, must_register, new_test_server,
    new_test_server_with_state, new_test_state,
};
pub(crate) use mail::{FailingMailer, RecordingMailer, StalledMailer};

/// An in-memory database with all tables created.
#[track_caller]
pub(crate) fn must_create_test_connection() -> Connection {
    let connection =
        Connection::open_in_memory().expect("Could not create in-memory SQLite database");
    initialize_db(&connection).expect("Could not initialize database");

    connection
}

#[track_caller]
pub(crate) fn must_create_test_user(email: &str, connection: &Connection) -> User {
    create_user(
        EmailAddress::from_str(email).expect("invalid test e-mail"),
        PasswordHash::new(ValidatedPassword::new_unchecked(TEST_PASSWORD), 4)
            .expect("could not hash test password"),
        connection,
    )
    .expect("could not create test user")
}

#[track_caller]
pub(crate) fn must_insert_expense(
    user_id: UserId,
    label: &str,
    value: Decimal,
    connection: &Connection,
) -> Expense {
    let now = OffsetDateTime::now_utc();

    create_expense(
        NewExpense {
            user_id,
            label: label.to_owned(),
            value,
            date: now.date(),
            created_at: now,
        },
        connection,
    )
    .expect("could not create test expense")
}
