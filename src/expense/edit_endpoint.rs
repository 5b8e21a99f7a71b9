//! Defines the endpoint for editing an expense.

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
};

use crate::{
    Error,
    auth::Claims,
    expense::{Expense, ExpenseForm, ExpenseId, ExpenseState, update_expense},
    timezone::local_today,
};

/// A route handler for editing an expense owned by the authenticated user.
///
/// Only the fields present in the body are validated and changed. Responds with
/// the updated expense, or `404 Not Found` if the user has no such expense.
pub async fn edit_expense_endpoint(
    State(state): State<ExpenseState>,
    claims: Claims,
    expense_id: Result<Path<ExpenseId>, PathRejection>,
    form: Result<Json<ExpenseForm>, JsonRejection>,
) -> Result<Json<Expense>, Error> {
    let Path(expense_id) = expense_id?;
    let Json(form) = form?;
    let today = local_today(&state.local_timezone)?;
    let changes = form.validate_changes(today)?;

    let expense = {
        let connection = state.lock_connection()?;

        update_expense(expense_id, claims.sub, &changes, &connection).inspect_err(|error| {
            if *error != Error::UpdateMissingExpense {
                tracing::error!("could not update expense {expense_id}: {error}");
            }
        })?
    };

    state.alert.dispatch(claims.sub);

    Ok(Json(expense))
}
