//! Spendwatch is a web app for keeping track of your personal expenses.
//!
//! This library provides a JSON REST API for recording expenses, a derived view
//! of a user's expenses (search, sort, totals and chart data) and an e-mail
//! alert that fires when a user's total spending exceeds a fixed threshold.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod alert;
mod app_state;
mod auth;
mod config;
mod database_id;
mod db;
pub mod endpoints;
mod expense;
mod html;
mod logging;
mod mailer;
mod password;
mod routing;
mod timezone;
pub mod user;
mod view;

#[cfg(test)]
mod test_utils;

pub use alert::{ALERT_THRESHOLD, ThresholdAlert};
pub use app_state::AppState;
pub use config::{MailConfig, SmtpCredentials, parse_or_default};
pub use db::initialize as initialize_db;
pub use expense::{Expense, ExpenseId, NewExpense, create_expense, get_expense};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use mailer::{DisabledMailer, MailError, Mailer, Notification, SmtpMailer, build_mailer};
pub use password::{PasswordHash, ValidatedPassword};
pub use routing::build_router;
pub use timezone::get_local_offset;
pub use user::{User, UserId};

use crate::expense::ValidationError;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The user provided an e-mail and password combination that does not
    /// match a registered user.
    #[error("invalid e-mail or password")]
    InvalidCredentials,

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The string used to register a user is not a valid e-mail address.
    #[error("{0} is not a valid e-mail address")]
    InvalidEmail(String),

    /// The e-mail address used to register a user is already taken.
    #[error("the e-mail address is already registered")]
    DuplicateEmail,

    /// The request body, path or query string could not be parsed.
    ///
    /// Carries the status code and message chosen by the extractor.
    #[error("{1}")]
    InvalidRequest(StatusCode, String),

    /// A field of an expense failed validation.
    #[error("{0}")]
    InvalidExpense(ValidationError),

    /// The request did not carry a bearer token.
    #[error("missing bearer token")]
    MissingToken,

    /// The bearer token could not be decoded, has expired, or was signed with
    /// a different secret.
    #[error("invalid bearer token")]
    InvalidToken,

    /// A JSON web token could not be created.
    #[error("could not create token: {0}")]
    TokenCreation(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to update an expense that does not exist or belongs to another user.
    #[error("tried to update an expense that is not in the database")]
    UpdateMissingExpense,

    /// Tried to delete an expense that does not exist or belongs to another user.
    #[error("tried to delete an expense that is not in the database")]
    DeleteMissingExpense,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<ValidationError> for Error {
    fn from(value: ValidationError) -> Self {
        Error::InvalidExpense(value)
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidRequest(rejection.status(), rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::InvalidRequest(rejection.status(), rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::InvalidRequest(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Error::InvalidCredentials => (StatusCode::UNAUTHORIZED, self.to_string()),
            Error::MissingToken | Error::InvalidToken => {
                (StatusCode::UNAUTHORIZED, self.to_string())
            }
            Error::TooWeak(_) | Error::InvalidEmail(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            Error::InvalidRequest(status, message) => (status, message),
            Error::InvalidExpense(error) => (StatusCode::BAD_REQUEST, error.to_string()),
            Error::DuplicateEmail => (StatusCode::CONFLICT, self.to_string()),
            Error::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            Error::UpdateMissingExpense => (
                StatusCode::NOT_FOUND,
                "The expense could not be found.".to_owned(),
            ),
            Error::DeleteMissingExpense => (
                StatusCode::NOT_FOUND,
                "The expense could not be found. \
                It may have already been deleted."
                    .to_owned(),
            ),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred, check the server logs for more details."
                        .to_owned(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
