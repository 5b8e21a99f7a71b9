//! The spending alert: e-mail a user when their total expenses pass a threshold.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use rust_decimal::Decimal;

use crate::{
    Error, Expense, UserId,
    expense::get_expenses_by_user,
    mailer::{Mailer, Notification},
    user::get_user_by_id,
};

/// Users whose total expenses are strictly greater than this are e-mailed.
pub const ALERT_THRESHOLD: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);

const ALERT_SUBJECT: &str = "Warning: High Expenses";
const ALERT_TEXT: &str =
    "Your total expenses have exceeded ₹10,000. Please review your spending.";

/// The exact sum of the values of `expenses`.
pub fn total_expenses(expenses: &[Expense]) -> Decimal {
    expenses.iter().map(|expense| expense.value).sum()
}

/// The alert e-mail for a user with `total` in expenses, or `None` if `total`
/// does not exceed [ALERT_THRESHOLD].
pub fn threshold_notification(total: Decimal, from: &str, to: &str) -> Option<Notification> {
    if total <= ALERT_THRESHOLD {
        return None;
    }

    Some(Notification {
        from: from.to_owned(),
        to: to.to_owned(),
        subject: ALERT_SUBJECT.to_owned(),
        text: ALERT_TEXT.to_owned(),
    })
}

/// Checks a user's lifetime spending and e-mails them when it is over the threshold.
#[derive(Clone)]
pub struct ThresholdAlert {
    db_connection: Arc<Mutex<Connection>>,
    mailer: Arc<dyn Mailer>,
    sender: String,
}

impl ThresholdAlert {
    /// Create an alert that reads expenses from `db_connection` and sends
    /// e-mails from `sender` with `mailer`.
    pub fn new(
        db_connection: Arc<Mutex<Connection>>,
        mailer: Arc<dyn Mailer>,
        sender: impl Into<String>,
    ) -> Self {
        Self {
            db_connection,
            mailer,
            sender: sender.into(),
        }
    }

    /// Check `user_id`'s spending in the background.
    ///
    /// Returns immediately. Failures are logged and never reach the caller.
    pub fn dispatch(&self, user_id: UserId) {
        tokio::spawn(self.clone().evaluate_and_notify(user_id));
    }

    /// Sum all of `user_id`'s expenses and make one attempt at e-mailing them
    /// if the total is over [ALERT_THRESHOLD].
    pub async fn evaluate_and_notify(self, user_id: UserId) {
        let notification = match self.build_notification(user_id) {
            Ok(Some(notification)) => notification,
            Ok(None) => return,
            Err(error) => {
                tracing::error!("could not check spending for user {user_id}: {error}");
                return;
            }
        };

        tracing::info!("Total expenses for user {user_id} exceeded the alert threshold");

        if let Err(error) = self.mailer.send(notification).await {
            tracing::error!("could not send spending alert to user {user_id}: {error}");
        }
    }

    fn build_notification(&self, user_id: UserId) -> Result<Option<Notification>, Error> {
        let connection = self
            .db_connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        let user = get_user_by_id(user_id, &connection)?;
        let expenses = get_expenses_by_user(user_id, &connection)?;
        let total = total_expenses(&expenses);

        Ok(threshold_notification(
            total,
            &self.sender,
            user.email.as_str(),
        ))
    }
}


#[cfg(test)]
mod evaluate_tests {
    use std::sync::{Arc, Mutex};

    use rust_decimal::Decimal;

    use crate::{
        alert::{ThresholdAlert, total_expenses},
        expense::get_expenses_by_user,
        test_utils::{
            FailingMailer, RecordingMailer, must_create_test_connection, must_create_test_user,
            must_insert_expense,
        },
        user::UserId,
    };

    #[test]
    fn sums_exactly() {
        let connection = must_create_test_connection();
        let user = must_create_test_user("alice@example.com", &connection);
        must_insert_expense(user.id, "a", Decimal::new(10, 2), &connection);
        must_insert_expense(user.id, "b", Decimal::new(20, 2), &connection);

        let expenses = get_expenses_by_user(user.id, &connection).unwrap();

        assert_eq!(total_expenses(&expenses), Decimal::new(30, 2));
    }

    #[tokio::test]
    async fn sends_one_email_when_over_threshold() {
        let connection = must_create_test_connection();
        let user = must_create_test_user("alice@example.com", &connection);
        must_insert_expense(user.id, "Rent", Decimal::from(6000), &connection);
        must_insert_expense(user.id, "Car", Decimal::from(5000), &connection);
        let (mailer, mut notifications) = RecordingMailer::new();
        let alert = ThresholdAlert::new(
            Arc::new(Mutex::new(connection)),
            Arc::new(mailer),
            "alerts@example.com",
        );

        alert.evaluate_and_notify(user.id).await;

        let notification = notifications.try_recv().unwrap();
        assert_eq!(notification.to, "alice@example.com");
        assert_eq!(notification.from, "alerts@example.com");
        assert!(notifications.try_recv().is_err());
    }

    #[tokio::test]
    async fn sends_nothing_at_or_under_threshold() {
        let connection = must_create_test_connection();
        let user = must_create_test_user("alice@example.com", &connection);
        must_insert_expense(user.id, "Rent", Decimal::from(10_000), &connection);
        let (mailer, mut notifications) = RecordingMailer::new();
        let alert = ThresholdAlert::new(
            Arc::new(Mutex::new(connection)),
            Arc::new(mailer),
            "alerts@example.com",
        );

        alert.evaluate_and_notify(user.id).await;

        assert!(notifications.try_recv().is_err());
    }

    #[tokio::test]
    async fn only_counts_own_expenses() {
        let connection = must_create_test_connection();
        let alice = must_create_test_user("alice@example.com", &connection);
        let bob = must_create_test_user("bob@example.com", &connection);
        must_insert_expense(alice.id, "Rent", Decimal::from(20_000), &connection);
        must_insert_expense(bob.id, "Snack", Decimal::from(5), &connection);
        let (mailer, mut notifications) = RecordingMailer::new();
        let alert = ThresholdAlert::new(
            Arc::new(Mutex::new(connection)),
            Arc::new(mailer),
            "alerts@example.com",
        );

        alert.evaluate_and_notify(bob.id).await;

        assert!(notifications.try_recv().is_err());
    }

    #[tokio::test]
    async fn swallows_send_failures() {
        let connection = must_create_test_connection();
        let user = must_create_test_user("alice@example.com", &connection);
        must_insert_expense(user.id, "Rent", Decimal::from(20_000), &connection);
        let alert = ThresholdAlert::new(
            Arc::new(Mutex::new(connection)),
            Arc::new(FailingMailer),
            "alerts@example.com",
        );

        alert.evaluate_and_notify(user.id).await;
    }

    #[tokio::test]
    async fn swallows_unknown_user() {
        let (mailer, mut notifications) = RecordingMailer::new();
        let alert = ThresholdAlert::new(
            Arc::new(Mutex::new(must_create_test_connection())),
            Arc::new(mailer),
            "alerts@example.com",
        );

        alert.evaluate_and_notify(UserId::new(42)).await;

        assert!(notifications.try_recv().is_err());
    }
}
