//! Sending notification e-mails.
//!
//! The [Mailer] trait is the seam between the alert rule and the outside
//! world. [SmtpMailer] talks to a real SMTP relay, [DisabledMailer] is used
//! when no SMTP credentials are configured.

use std::{future::Future, pin::Pin, sync::Arc};

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};

use crate::config::MailConfig;

/// A plain text e-mail.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    /// The sender's address.
    pub from: String,
    /// The recipient's address.
    pub to: String,
    /// The subject line.
    pub subject: String,
    /// The plain text body.
    pub text: String,
}

/// The errors that may occur when sending a [Notification].
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum MailError {
    /// No SMTP credentials were configured.
    #[error("e-mail is not configured")]
    NotConfigured,

    /// The SMTP relay could not be reached.
    #[error("could not connect to the SMTP server")]
    Unreachable,

    /// The sender or recipient is not a valid mailbox.
    #[error("invalid address {0}")]
    InvalidAddress(String),

    /// The message could not be built.
    #[error("could not build the message: {0}")]
    Message(String),

    /// The SMTP relay rejected the message or the connection failed mid-send.
    #[error("could not send the message: {0}")]
    Transport(String),
}

/// The future returned by [Mailer::send].
pub type SendFuture<'a> = Pin<Box<dyn Future<Output = Result<(), MailError>> + Send + 'a>>;

/// Something that can deliver a [Notification].
pub trait Mailer: Send + Sync {
    /// Make one attempt at delivering `notification`.
    fn send(&self, notification: Notification) -> SendFuture<'_>;
}

/// Delivers notifications through an SMTP relay.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    /// Create a mailer for the relay described by `config`.
    ///
    /// No connection is made until the first send.
    ///
    /// # Errors
    ///
    /// Returns [MailError::NotConfigured] if `config` has no credentials, or
    /// [MailError::Transport] if the relay's TLS parameters cannot be set up.
    pub fn new(config: &MailConfig) -> Result<Self, MailError> {
        let credentials = config
            .credentials
            .as_ref()
            .ok_or(MailError::NotConfigured)?;
        let credentials =
            Credentials::new(credentials.username.clone(), credentials.password.clone());

        let builder = if config.require_tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                .map_err(|error| MailError::Transport(error.to_string()))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
        };

        let transport = builder.port(config.port).credentials(credentials).build();

        Ok(Self { transport })
    }

    async fn deliver(&self, notification: Notification) -> Result<(), MailError> {
        match self.transport.test_connection().await {
            Ok(true) => {}
            Ok(false) => return Err(MailError::Unreachable),
            Err(error) => {
                tracing::error!("SMTP connection check failed: {error}");
                return Err(MailError::Unreachable);
            }
        }

        let message = build_message(notification)?;

        self.transport
            .send(message)
            .await
            .map(|_| ())
            .map_err(|error| MailError::Transport(error.to_string()))
    }
}

impl Mailer for SmtpMailer {
    fn send(&self, notification: Notification) -> SendFuture<'_> {
        Box::pin(self.deliver(notification))
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address
        .parse()
        .map_err(|_| MailError::InvalidAddress(address.to_owned()))
}

fn build_message(notification: Notification) -> Result<Message, MailError> {
    Message::builder()
        .from(parse_mailbox(&notification.from)?)
        .to(parse_mailbox(&notification.to)?)
        .subject(notification.subject)
        .header(ContentType::TEXT_PLAIN)
        .body(notification.text)
        .map_err(|error| MailError::Message(error.to_string()))
}

/// A mailer that refuses every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledMailer;

impl Mailer for DisabledMailer {
    fn send(&self, _notification: Notification) -> SendFuture<'_> {
        Box::pin(async { Err(MailError::NotConfigured) })
    }
}

/// Pick the mailer for `config`: SMTP when credentials are present, otherwise
/// a [DisabledMailer].
pub fn build_mailer(config: &MailConfig) -> Arc<dyn Mailer> {
    if config.credentials.is_none() {
        return Arc::new(DisabledMailer);
    }

    match SmtpMailer::new(config) {
        Ok(mailer) => {
            tracing::info!(
                "Sending spending alerts via {}:{}",
                config.host,
                config.port
            );
            Arc::new(mailer)
        }
        Err(error) => {
            tracing::error!("Could not set up the SMTP transport, e-mail is disabled: {error}");
            Arc::new(DisabledMailer)
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        config::{MailConfig, SmtpCredentials},
        mailer::{DisabledMailer, MailError, Mailer, Notification, build_message},
    };

    fn notification(to: &str) -> Notification {
        Notification {
            from: "alerts@example.com".to_owned(),
            to: to.to_owned(),
            subject: "Hello".to_owned(),
            text: "World".to_owned(),
        }
    }

    #[tokio::test]
    async fn disabled_mailer_refuses_to_send() {
        let result = DisabledMailer.send(notification("alice@example.com")).await;

        assert_eq!(result, Err(MailError::NotConfigured));
    }

    #[test]
    fn builds_plain_text_message() {
        let message = build_message(notification("alice@example.com")).unwrap();
        let formatted = String::from_utf8(message.formatted()).unwrap();

        assert!(formatted.contains("Subject: Hello"));
        assert!(formatted.contains("To: alice@example.com"));
        assert!(formatted.contains("World"));
    }

    #[test]
    fn rejects_invalid_recipient() {
        let result = build_message(notification("not an address"));

        assert_eq!(
            result.unwrap_err(),
            MailError::InvalidAddress("not an address".to_owned())
        );
    }

    #[tokio::test]
    async fn unreachable_relay_is_reported() {
        let config = MailConfig {
            host: "127.0.0.1".to_owned(),
            port: 1,
            require_tls: false,
            credentials: Some(SmtpCredentials {
                username: "alerts@example.com".to_owned(),
                password: "hunter2".to_owned(),
            }),
            sender: "alerts@example.com".to_owned(),
        };
        let mailer = super::SmtpMailer::new(&config).unwrap();

        let result = mailer.send(notification("alice@example.com")).await;

        assert_eq!(result, Err(MailError::Unreachable));
    }
}
