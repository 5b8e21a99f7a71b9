use axum::{Json, extract::State};

use crate::{
    Error,
    auth::Claims,
    expense::{Expense, ExpenseState, get_expenses_by_user},
};

/// A route handler that lists the authenticated user's expenses, newest first.
pub async fn list_expenses_endpoint(
    State(state): State<ExpenseState>,
    claims: Claims,
) -> Result<Json<Vec<Expense>>, Error> {
    let connection = state.lock_connection()?;

    get_expenses_by_user(claims.sub, &connection)
        .inspect_err(|error| tracing::error!("could not list expenses: {error}"))
        .map(Json)
}
