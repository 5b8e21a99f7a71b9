//! Expense management.
//!
//! This module contains everything related to expenses:
//! - The `Expense` model and the database functions for storing and querying expenses
//! - Validation of the fields clients send when creating or editing an expense
//! - The JSON endpoints for creating, listing, editing and deleting expenses

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod list_endpoint;
mod state;
mod validation;

pub use core::{
    Expense, ExpenseChanges, NewExpense, create_expense, create_expense_table, delete_expense,
    get_expense, get_expenses_by_user, update_expense,
};
pub use create_endpoint::create_expense_endpoint;
pub use delete_endpoint::delete_expense_endpoint;
pub use edit_endpoint::edit_expense_endpoint;
pub use list_endpoint::list_expenses_endpoint;
pub use state::ExpenseState;
pub use validation::{ExpenseForm, ValidationError};

pub use crate::database_id::ExpenseId;
