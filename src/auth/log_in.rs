//! Defines the endpoint for exchanging an e-mail and password for a bearer token.

use std::str::FromStr;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use email_address::EmailAddress;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    auth::{AuthState, token::encode_token},
    user::get_user_by_email,
};

/// The credentials sent to log in or register.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    /// The e-mail address the user registered with.
    pub email: String,
    /// The user's password in plain text.
    pub password: String,
}

/// The response to a successful log-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    /// The bearer token to send in the `Authorization` header.
    pub token: String,
}

/// A route handler for logging in.
///
/// Responds with a bearer token, or `401 Unauthorized` if the e-mail is not
/// registered or the password is wrong.
pub async fn log_in_endpoint(
    State(state): State<AuthState>,
    credentials: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<TokenResponse>, Error> {
    let Json(credentials) = credentials?;

    let email =
        EmailAddress::from_str(credentials.email.trim()).map_err(|_| Error::InvalidCredentials)?;

    let user = {
        let connection = state.lock_connection()?;

        get_user_by_email(&email, &connection).map_err(|error| match error {
            Error::NotFound => Error::InvalidCredentials,
            error => {
                tracing::error!("could not look up user: {error}");
                error
            }
        })?
    };

    let is_password_correct = user
        .password_hash
        .verify(&credentials.password)
        .map_err(|error| Error::HashingError(error.to_string()))?;

    if !is_password_correct {
        return Err(Error::InvalidCredentials);
    }

    let token = encode_token(user.id, &state.token_keys)?;

    tracing::info!("User {} logged in", user.id);

    Ok(Json(TokenResponse { token }))
}
