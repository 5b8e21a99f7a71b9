//! Database initialization for the application's SQLite database.

use rusqlite::{Connection, Transaction as SqlTransaction};

use crate::{Error, expense::create_expense_table, user::create_user_table};

/// Create the all of the database tables for the application.
///
/// Foreign key enforcement is switched on for `connection` so that expenses
/// are removed together with the user that owns them.
///
/// # Errors
/// This function may return a [Error::SqlError] if a SQL error occurred.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_expense_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
