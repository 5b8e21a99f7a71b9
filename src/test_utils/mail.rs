use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use crate::mailer::{MailError, Mailer, Notification, SendFuture};

/// A mailer that forwards every notification to a channel instead of sending it.
#[derive(Clone)]
pub(crate) struct RecordingMailer {
    sender: UnboundedSender<Notification>,
}

impl RecordingMailer {
    pub(crate) fn new() -> (Self, UnboundedReceiver<Notification>) {
        let (sender, receiver) = unbounded_channel();

        (Self { sender }, receiver)
    }
}

impl Mailer for RecordingMailer {
    fn send(&self, notification: Notification) -> SendFuture<'_> {
        let result = self
            .sender
            .send(notification)
            .map_err(|error| MailError::Transport(error.to_string()));

        Box::pin(async move { result })
    }
}

/// A mailer whose relay is always down.
pub(crate) struct FailingMailer;

impl Mailer for FailingMailer {
    fn send(&self, _notification: Notification) -> SendFuture<'_> {
        Box::pin(async { Err(MailError::Unreachable) })
    }
}

/// A mailer whose relay never answers.
pub(crate) struct StalledMailer;

impl Mailer for StalledMailer {
    fn send(&self, _notification: Notification) -> SendFuture<'_> {
        Box::pin(std::future::pending())
    }
}
