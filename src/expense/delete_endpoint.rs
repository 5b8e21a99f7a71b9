use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
};

use crate::{
    Error,
    auth::Claims,
    expense::{ExpenseId, ExpenseState, delete_expense},
};

/// The message sent back after an expense is deleted.
pub const DELETED_MESSAGE: &str = "Expense has been successfully deleted";

/// A route handler for deleting an expense owned by the authenticated user.
pub async fn delete_expense_endpoint(
    State(state): State<ExpenseState>,
    claims: Claims,
    expense_id: Result<Path<ExpenseId>, PathRejection>,
) -> Result<Json<&'static str>, Error> {
    let Path(expense_id) = expense_id?;

    {
        let connection = state.lock_connection()?;

        delete_expense(expense_id, claims.sub, &connection).inspect_err(|error| {
            if *error != Error::DeleteMissingExpense {
                tracing::error!("could not delete expense {expense_id}: {error}");
            }
        })?;
    }

    state.alert.dispatch(claims.sub);

    Ok(Json(DELETED_MESSAGE))
}
