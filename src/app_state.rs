//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use time::Duration;

use crate::{
    Error, PasswordHash,
    alert::ThresholdAlert,
    auth::{DEFAULT_TOKEN_LIFETIME, TokenKeys},
    db::initialize,
    mailer::Mailer,
    timezone::get_local_offset,
};

/// The state of the REST server.
#[derive(Clone)]
pub struct AppState {
    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,

    /// The keys for signing and verifying bearer tokens.
    pub token_keys: TokenKeys,

    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,

    /// The bcrypt cost used when hashing new passwords.
    pub password_hash_cost: u32,

    /// The spending alert checked after each change to a user's expenses.
    pub alert: ThresholdAlert,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Pacific/Auckland".
    /// Spending alerts are sent with `mailer` from the address `alert_sender`.
    ///
    /// # Errors
    /// Returns an error if the timezone is not recognised or the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        token_secret: &str,
        local_timezone: &str,
        mailer: Arc<dyn Mailer>,
        alert_sender: &str,
    ) -> Result<Self, Error> {
        if get_local_offset(local_timezone).is_none() {
            return Err(Error::InvalidTimezoneError(local_timezone.to_owned()));
        }

        initialize(&db_connection)?;

        let connection = Arc::new(Mutex::new(db_connection));

        Ok(Self {
            alert: ThresholdAlert::new(connection.clone(), mailer, alert_sender),
            db_connection: connection,
            token_keys: TokenKeys::new(token_secret, DEFAULT_TOKEN_LIFETIME),
            local_timezone: local_timezone.to_owned(),
            password_hash_cost: PasswordHash::DEFAULT_COST,
        })
    }

    /// Use `cost` rounds of bcrypt when hashing new passwords.
    pub fn with_password_hash_cost(self, cost: u32) -> Self {
        Self {
            password_hash_cost: cost,
            ..self
        }
    }

    /// Issue bearer tokens that are valid for `lifetime`.
    pub fn with_token_lifetime(self, lifetime: Duration) -> Self {
        Self {
            token_keys: self.token_keys.clone().with_lifetime(lifetime),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rusqlite::Connection;

    use crate::{AppState, DisabledMailer, Error};

    #[test]
    fn rejects_unknown_timezone() {
        let result = AppState::new(
            Connection::open_in_memory().unwrap(),
            "secret",
            "Not/AZone",
            Arc::new(DisabledMailer),
            "",
        );

        assert!(matches!(result, Err(Error::InvalidTimezoneError(_))));
    }
}
