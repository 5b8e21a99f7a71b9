//! Defines the endpoint for registering a new user.

use std::str::FromStr;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use email_address::EmailAddress;
use serde::{Deserialize, Serialize};

use crate::{
    Error, PasswordHash, UserId, ValidatedPassword,
    auth::{AuthState, log_in::Credentials},
    user::create_user,
};

/// The public details of a newly registered user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisteredUser {
    /// The new user's ID.
    pub id: UserId,
    /// The e-mail address the user registered with.
    pub email: String,
}

/// A route handler for registering a new user.
///
/// Responds with `201 Created` and the new user's ID and e-mail address. The
/// e-mail must be valid and unused and the password must be hard to guess.
pub async fn register_endpoint(
    State(state): State<AuthState>,
    credentials: Result<Json<Credentials>, JsonRejection>,
) -> Result<impl IntoResponse, Error> {
    let Json(credentials) = credentials?;

    let raw_email = credentials.email.trim();
    let email =
        EmailAddress::from_str(raw_email).map_err(|_| Error::InvalidEmail(raw_email.to_owned()))?;

    let password = ValidatedPassword::new(&credentials.password, &[email.as_str()])?;
    let password_hash = PasswordHash::new(password, state.password_hash_cost)
        .inspect_err(|error| tracing::error!("could not hash password: {error}"))?;

    let user = {
        let connection = state.lock_connection()?;
        create_user(email, password_hash, &connection)?
    };

    tracing::info!("Registered user {}", user.id);

    Ok((
        StatusCode::CREATED,
        Json(RegisteredUser {
            id: user.id,
            email: user.email.to_string(),
        }),
    ))
}
