//! Registration, log-in and bearer token authentication.

use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::{AppState, Error};

mod log_in;
mod register;
mod token;

pub use log_in::log_in_endpoint;
pub use register::register_endpoint;
pub use token::{Claims, DEFAULT_TOKEN_LIFETIME, TokenKeys};

#[cfg(test)]
pub(crate) use log_in::TokenResponse;

/// The state needed to register users and log them in.
#[derive(Clone)]
pub struct AuthState {
    /// The database connection for managing users.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The keys for signing bearer tokens.
    pub token_keys: TokenKeys,
    /// The bcrypt cost for hashing new passwords.
    pub password_hash_cost: u32,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            token_keys: state.token_keys.clone(),
            password_hash_cost: state.password_hash_cost,
        }
    }
}

impl FromRef<AppState> for TokenKeys {
    fn from_ref(state: &AppState) -> Self {
        state.token_keys.clone()
    }
}

impl AuthState {
    fn lock_connection(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.db_connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })
    }
}
