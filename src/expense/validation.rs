//! Validation of the expense fields sent by clients.
//!
//! Each validator either returns the parsed value or a single message that can
//! be shown to the user as is. Forms are checked field by field (label, then
//! amount, then date) and the first failure is reported.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use time::{
    Date, OffsetDateTime, format_description::well_known::Rfc3339, macros::date,
    macros::format_description,
};

use crate::expense::ExpenseChanges;

/// The shortest allowed label, in characters, after trimming.
pub const LABEL_MIN_LENGTH: usize = 2;
/// The longest allowed label, in characters, after trimming.
pub const LABEL_MAX_LENGTH: usize = 50;
/// The largest amount a single expense may have.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(999_999_999, 0, 0, false, 0);
/// The earliest date an expense may have.
pub const MIN_DATE: Date = date!(1900 - 01 - 01);

const LABEL_PUNCTUATION: &str = "-_.,!@#$%^&*()";

/// A field failed validation. The message is meant for the end user.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{0}")]
pub struct ValidationError(&'static str);

impl ValidationError {
    /// Create an error with a message for the end user.
    pub fn new(message: &'static str) -> Self {
        Self(message)
    }

    /// The message for the end user.
    pub fn message(&self) -> &'static str {
        self.0
    }
}

/// Check a label and return it trimmed.
///
/// # Errors
/// Returns an error if the label is missing, shorter than
/// [LABEL_MIN_LENGTH] or longer than [LABEL_MAX_LENGTH] characters, or
/// contains anything other than letters, digits, whitespace and `-_.,!@#$%^&*()`.
pub fn validate_label(raw_label: Option<&str>) -> Result<String, ValidationError> {
    let label = raw_label.map(str::trim).unwrap_or_default();

    if label.is_empty() {
        return Err(ValidationError::new("Label is required"));
    }

    let length = label.chars().count();

    if length < LABEL_MIN_LENGTH {
        return Err(ValidationError::new(
            "Label must be at least 2 characters long",
        ));
    }

    if length > LABEL_MAX_LENGTH {
        return Err(ValidationError::new("Label must be less than 50 characters"));
    }

    let is_allowed = |c: char| {
        c.is_ascii_alphanumeric() || c.is_whitespace() || LABEL_PUNCTUATION.contains(c)
    };

    if !label.chars().all(is_allowed) {
        return Err(ValidationError::new("Label contains invalid characters"));
    }

    Ok(label.to_owned())
}

/// Check the text of an amount and parse it as an exact decimal.
///
/// # Errors
/// Returns an error if the amount is missing, not a number, not greater than
/// zero, greater than [MAX_AMOUNT] or has more than two decimal places.
pub fn validate_amount(raw_amount: Option<&str>) -> Result<Decimal, ValidationError> {
    let raw_amount = raw_amount.unwrap_or_default();
    let trimmed = raw_amount.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::new("Amount is required"));
    }

    let amount = match Decimal::from_str(trimmed) {
        Ok(amount) => amount,
        // Plain digits only fail to parse when they overflow a decimal.
        Err(_) if is_plain_decimal(trimmed) => {
            return Err(ValidationError::new("Amount is too large"));
        }
        Err(_) => return Err(ValidationError::new("Amount must be a valid number")),
    };

    if amount <= Decimal::ZERO {
        return Err(ValidationError::new("Amount must be greater than zero"));
    }

    if amount > MAX_AMOUNT {
        return Err(ValidationError::new("Amount is too large"));
    }

    if !is_plain_decimal(raw_amount) {
        return Err(ValidationError::new(
            "Amount can have maximum 2 decimal places",
        ));
    }

    Ok(amount)
}

/// Whether `text` is digits, optionally followed by a point and one or two digits.
fn is_plain_decimal(text: &str) -> bool {
    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());

    match text.split_once('.') {
        Some((whole, fraction)) => all_digits(whole) && all_digits(fraction) && fraction.len() <= 2,
        None => all_digits(text),
    }
}

/// Check the text of a date and parse it.
///
/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp, in which case its calendar
/// date is used. `today` is the latest date allowed.
///
/// # Errors
/// Returns an error if the date is missing, cannot be parsed, is after `today`
/// or before [MIN_DATE].
pub fn validate_date(raw_date: Option<&str>, today: Date) -> Result<Date, ValidationError> {
    let raw_date = raw_date.map(str::trim).unwrap_or_default();

    if raw_date.is_empty() {
        return Err(ValidationError::new("Date is required"));
    }

    let date = Date::parse(raw_date, format_description!("[year]-[month]-[day]"))
        .or_else(|_| OffsetDateTime::parse(raw_date, &Rfc3339).map(|date_time| date_time.date()))
        .map_err(|_| ValidationError::new("Invalid date format"))?;

    if date > today {
        return Err(ValidationError::new("Future dates are not allowed"));
    }

    if date < MIN_DATE {
        return Err(ValidationError::new("Date cannot be before 1900"));
    }

    Ok(date)
}

/// The expense fields as sent by a client.
///
/// `value` may be a JSON number or a string. Any other fields, such as a
/// `userId`, are ignored: expenses always belong to the authenticated user.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExpenseForm {
    /// A short description of the expense.
    pub label: Option<String>,
    /// The amount spent.
    pub value: Option<Value>,
    /// The date of the expense.
    pub date: Option<String>,
}

/// An [ExpenseForm] that passed validation with every field present.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidExpense {
    /// The trimmed label.
    pub label: String,
    /// The exact amount.
    pub value: Decimal,
    /// The date of the expense.
    pub date: Date,
}

impl ExpenseForm {
    /// Validate a form for a new expense. All fields are required.
    ///
    /// # Errors
    /// Returns the first failing field's error, checking the label, the
    /// amount and then the date.
    pub fn validate_new(&self, today: Date) -> Result<ValidExpense, ValidationError> {
        let label = validate_label(self.label.as_deref())?;
        let value = validate_amount(self.raw_value().as_deref())?;
        let date = validate_date(self.date.as_deref(), today)?;

        Ok(ValidExpense { label, value, date })
    }

    /// Validate a partial update. Only the fields that are present are checked.
    ///
    /// # Errors
    /// Returns the first failing field's error, checking the label, the
    /// amount and then the date.
    pub fn validate_changes(&self, today: Date) -> Result<ExpenseChanges, ValidationError> {
        let label = match &self.label {
            Some(label) => Some(validate_label(Some(label))?),
            None => None,
        };

        let value = match self.raw_value() {
            Some(value) => Some(validate_amount(Some(&value))?),
            None => None,
        };

        let date = match &self.date {
            Some(date) => Some(validate_date(Some(date), today)?),
            None => None,
        };

        Ok(ExpenseChanges { label, value, date })
    }

    fn raw_value(&self) -> Option<String> {
        match &self.value {
            None | Some(Value::Null) => None,
            Some(Value::String(text)) => Some(text.clone()),
            Some(Value::Number(number)) => Some(number.to_string()),
            Some(other) => Some(other.to_string()),
        }
    }
}



#[cfg(test)]
mod date_tests {
    use time::macros::date;

    use super::validate_date;

    const TODAY: time::Date = date!(2025 - 10 - 19);

    fn message(raw: Option<&str>) -> &'static str {
        validate_date(raw, TODAY).unwrap_err().message()
    }

    #[test]
    fn missing_date_is_required() {
        assert_eq!(message(None), "Date is required");
        assert_eq!(message(Some("")), "Date is required");
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(message(Some("yesterday")), "Invalid date format");
        assert_eq!(message(Some("2025-02-30")), "Invalid date format");
    }

    #[test]
    fn today_is_allowed_tomorrow_is_not() {
        assert_eq!(validate_date(Some("2025-10-19"), TODAY), Ok(TODAY));
        assert_eq!(message(Some("2025-10-20")), "Future dates are not allowed");
    }

    #[test]
    fn lower_boundary() {
        assert_eq!(
            validate_date(Some("1900-01-01"), TODAY),
            Ok(date!(1900 - 01 - 01))
        );
        assert_eq!(message(Some("1899-12-31")), "Date cannot be before 1900");
    }

    #[test]
    fn accepts_timestamps() {
        assert_eq!(
            validate_date(Some("2025-10-01T00:00:00.000Z"), TODAY),
            Ok(date!(2025 - 10 - 01))
        );
    }
}

#[cfg(test)]
mod form_tests {
    use rust_decimal::Decimal;
    use serde_json::json;
    use time::macros::date;

    use super::{ExpenseForm, ValidExpense};
    use crate::expense::ExpenseChanges;

    const TODAY: time::Date = date!(2025 - 10 - 19);

    fn form(value: serde_json::Value) -> ExpenseForm {
        serde_json::from_value(value).expect("could not parse form")
    }

    #[test]
    fn valid_form_passes() {
        let form = form(json!({"label": " Groceries ", "value": 42.5, "date": "2025-10-18"}));

        assert_eq!(
            form.validate_new(TODAY),
            Ok(ValidExpense {
                label: "Groceries".to_owned(),
                value: Decimal::new(425, 1),
                date: date!(2025 - 10 - 18),
            })
        );
    }

    #[test]
    fn amount_may_be_a_string() {
        let form = form(json!({"label": "Groceries", "value": "42.50", "date": "2025-10-18"}));

        assert_eq!(form.validate_new(TODAY).unwrap().value, Decimal::new(4250, 2));
    }

    #[test]
    fn reports_first_failure_only() {
        let bad_label = form(json!({"label": "x", "value": 0, "date": "2999-01-01"}));

        assert_eq!(
            bad_label.validate_new(TODAY).unwrap_err().message(),
            "Label must be at least 2 characters long"
        );

        let bad_amount = form(json!({"label": "ok", "value": 0, "date": "2999-01-01"}));

        assert_eq!(
            bad_amount.validate_new(TODAY).unwrap_err().message(),
            "Amount must be greater than zero"
        );
    }

    #[test]
    fn new_expense_requires_every_field() {
        let form = form(json!({"label": "Groceries", "value": 1}));

        assert_eq!(
            form.validate_new(TODAY).unwrap_err().message(),
            "Date is required"
        );
    }

    #[test]
    fn changes_only_check_present_fields() {
        let form = form(json!({"value": 3}));

        assert_eq!(
            form.validate_changes(TODAY),
            Ok(ExpenseChanges {
                label: None,
                value: Some(Decimal::from(3)),
                date: None,
            })
        );
    }

    #[test]
    fn changes_reject_invalid_fields() {
        let form = form(json!({"label": "ok", "date": "2025-10-20"}));

        assert_eq!(
            form.validate_changes(TODAY).unwrap_err().message(),
            "Future dates are not allowed"
        );
    }
}
