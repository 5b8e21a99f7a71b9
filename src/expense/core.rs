//! Defines the core data model and database queries for expenses.

use std::str::FromStr;

use rusqlite::{Connection, Row, types::Type};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{Error, UserId, database_id::ExpenseId};

// ============================================================================
// MODELS
// ============================================================================

/// A single expense recorded by a user.
///
/// Serialized as `{id, userId, label, value, date, createdAt}`, where `value`
/// is the amount of money spent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// The ID of the expense.
    pub id: ExpenseId,
    /// The user that recorded the expense.
    pub user_id: UserId,
    /// A short description of what the money was spent on.
    pub label: String,
    /// The amount spent, with at most two decimal places.
    #[serde(with = "rust_decimal::serde::float")]
    pub value: Decimal,
    /// The day the money was spent.
    pub date: Date,
    /// When the expense was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// The fields needed to record a new expense.
///
/// The fields are expected to be validated already, see
/// [ExpenseForm::validate_new](crate::expense::ExpenseForm::validate_new).
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    /// The user that owns the expense.
    pub user_id: UserId,
    /// A short description of what the money was spent on.
    pub label: String,
    /// The amount spent.
    pub value: Decimal,
    /// The day the money was spent.
    pub date: Date,
    /// When the expense was recorded.
    pub created_at: OffsetDateTime,
}

/// The fields of an expense that an update may change.
///
/// `None` leaves the stored value as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseChanges {
    /// The new label.
    pub label: Option<String>,
    /// The new amount.
    pub value: Option<Decimal>,
    /// The new date.
    pub date: Option<Date>,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new expense in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] if `expense.user_id` does
/// not refer to a registered user or there is some other SQL error.
pub fn create_expense(expense: NewExpense, connection: &Connection) -> Result<Expense, Error> {
    let expense = connection
        .prepare(
            "INSERT INTO expense (user_id, label, value, date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, user_id, label, value, date, created_at",
        )?
        .query_row(
            (
                expense.user_id.as_i64(),
                expense.label,
                expense.value.to_string(),
                expense.date,
                expense.created_at,
            ),
            map_expense_row,
        )?;

    Ok(expense)
}

/// Retrieve the expense with `id` owned by `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to an expense owned by `user_id`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_expense(id: ExpenseId, user_id: UserId, connection: &Connection) -> Result<Expense, Error> {
    let expense = connection
        .prepare(
            "SELECT id, user_id, label, value, date, created_at FROM expense
             WHERE id = :id AND user_id = :user_id",
        )?
        .query_row(
            &[(":id", &id), (":user_id", &user_id.as_i64())],
            map_expense_row,
        )?;

    Ok(expense)
}

/// Retrieve all of the expenses owned by `user_id`, most recently recorded first.
///
/// Expenses recorded at the same instant are ordered by descending ID so the
/// order is the same on every call.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn get_expenses_by_user(user_id: UserId, connection: &Connection) -> Result<Vec<Expense>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, label, value, date, created_at FROM expense
             WHERE user_id = :user_id
             ORDER BY created_at DESC, id DESC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_expense_row)?
        .map(|maybe_expense| maybe_expense.map_err(Error::from))
        .collect()
}

/// Apply `changes` to the expense with `id` owned by `user_id` and return the
/// updated expense.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingExpense] if `id` does not refer to an expense owned by `user_id`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn update_expense(
    id: ExpenseId,
    user_id: UserId,
    changes: &ExpenseChanges,
    connection: &Connection,
) -> Result<Expense, Error> {
    connection
        .prepare(
            "UPDATE expense
             SET label = COALESCE(?1, label),
                 value = COALESCE(?2, value),
                 date = COALESCE(?3, date)
             WHERE id = ?4 AND user_id = ?5
             RETURNING id, user_id, label, value, date, created_at",
        )?
        .query_row(
            (
                changes.label.as_deref(),
                changes.value.map(|value| value.to_string()),
                changes.date,
                id,
                user_id.as_i64(),
            ),
            map_expense_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingExpense,
            error => error.into(),
        })
}

/// Delete the expense with `id` owned by `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingExpense] if `id` does not refer to an expense owned by `user_id`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn delete_expense(id: ExpenseId, user_id: UserId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM expense WHERE id = ?1 AND user_id = ?2",
        (id, user_id.as_i64()),
    )?;

    match rows_affected {
        0 => Err(Error::DeleteMissingExpense),
        _ => Ok(()),
    }
}

/// Create the expense table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    // Amounts are stored as text to keep them exact.
    connection.execute(
        "CREATE TABLE IF NOT EXISTS expense (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                label TEXT NOT NULL,
                value TEXT NOT NULL,
                date TEXT NOT NULL,
                created_at TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_expense_user_created ON expense(user_id, created_at);",
        (),
    )?;

    Ok(())
}

/// Map a database row to an [Expense].
fn map_expense_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    let id = row.get(0)?;
    let user_id = UserId::new(row.get(1)?);
    let label = row.get(2)?;

    let raw_value: String = row.get(3)?;
    let value = Decimal::from_str(&raw_value)
        .map_err(|error| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(error)))?;

    let date = row.get(4)?;
    let created_at = row.get(5)?;

    Ok(Expense {
        id,
        user_id,
        label,
        value,
        date,
        created_at,
    })
}

// ============================================================================
// TESTS
// ============================================================================
