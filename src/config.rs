//! Settings read from environment variables.

use std::{
    env::{self, VarError},
    fmt::Display,
    str::FromStr,
};

/// Parse the environment variable `env_key` or return `default` if it is not set.
///
/// # Panics
///
/// This function will panic if the environment variable is set but cannot be
/// parsed as a `T`, or is not valid unicode.
///
/// ```should_panic
/// use spendwatch::parse_or_default;
///
/// unsafe { std::env::set_var("SPENDWATCH_DOCTEST_PORT", "123s"); }
/// // This will panic!
/// let port: u16 = parse_or_default("SPENDWATCH_DOCTEST_PORT", 1234);
/// ```
///
/// # Examples
///
/// ```
/// use spendwatch::parse_or_default;
///
/// let port: u16 = parse_or_default("SPENDWATCH_DOCTEST_UNSET", 1234);
/// assert_eq!(port, 1234);
/// ```
pub fn parse_or_default<T>(env_key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    let raw_value = match env::var(env_key) {
        Ok(string) => string,
        Err(VarError::NotPresent) => {
            tracing::debug!(
                "The environment variable '{}' was not set, using the default {}.",
                env_key,
                default
            );
            return default;
        }
        Err(e) => {
            tracing::error!(
                "An error occurred retrieving the environment variable '{}': {}",
                env_key,
                e
            );
            panic!("could not read the environment variable {env_key}");
        }
    };

    match raw_value.parse() {
        Ok(value) => value,
        Err(e) => {
            tracing::error!(
                "An error occurred parsing '{}' from the environment variable '{}': {}",
                raw_value,
                env_key,
                e
            );
            panic!("could not parse the environment variable {env_key}");
        }
    }
}

/// The default SMTP relay.
pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
/// The default SMTP submission port.
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// The login for the SMTP relay.
#[derive(Debug, Clone, PartialEq)]
pub struct SmtpCredentials {
    /// The account name, usually the sender's e-mail address.
    pub username: String,
    /// The account password or app password.
    pub password: String,
}

/// How to reach the SMTP relay used for alert e-mails.
#[derive(Debug, Clone, PartialEq)]
pub struct MailConfig {
    /// The host name of the SMTP relay.
    pub host: String,
    /// The port of the SMTP relay.
    pub port: u16,
    /// Whether to upgrade the connection with STARTTLS.
    pub require_tls: bool,
    /// The SMTP login. Alerts are not sent when this is `None`.
    pub credentials: Option<SmtpCredentials>,
    /// The `From` address of alert e-mails.
    pub sender: String,
}

impl MailConfig {
    /// Read the mail settings from `SMTP_HOST`, `SMTP_PORT`, `SMTP_REQUIRE_TLS`,
    /// `EMAIL` and `PASSWORD`.
    ///
    /// When `EMAIL` or `PASSWORD` is missing the returned config has no
    /// credentials and alert e-mails are disabled.
    ///
    /// # Panics
    ///
    /// Panics if `SMTP_PORT` or `SMTP_REQUIRE_TLS` is set to something that
    /// cannot be parsed.
    pub fn from_env() -> Self {
        let host = env::var("SMTP_HOST").unwrap_or_else(|_| DEFAULT_SMTP_HOST.to_owned());
        let port = parse_or_default("SMTP_PORT", DEFAULT_SMTP_PORT);
        let require_tls = parse_or_default("SMTP_REQUIRE_TLS", true);

        let email = env::var("EMAIL").ok().filter(|email| !email.is_empty());
        let password = env::var("PASSWORD").ok().filter(|password| !password.is_empty());

        let credentials = match (email.clone(), password) {
            (Some(username), Some(password)) => Some(SmtpCredentials { username, password }),
            _ => {
                tracing::warn!(
                    "EMAIL or PASSWORD is not set, spending alerts will not be e-mailed."
                );
                None
            }
        };

        Self {
            host,
            port,
            require_tls,
            credentials,
            sender: email.unwrap_or_default(),
        }
    }
}
