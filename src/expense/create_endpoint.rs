//! Defines the endpoint for recording a new expense.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use time::OffsetDateTime;

use crate::{
    Error,
    auth::Claims,
    expense::{Expense, ExpenseForm, ExpenseState, NewExpense, create_expense},
    timezone::local_today,
};

/// A route handler for recording a new expense for the authenticated user.
///
/// Responds with `201 Created` and the stored expense. The user's spending is
/// checked against the alert threshold once the expense is stored.
pub async fn create_expense_endpoint(
    State(state): State<ExpenseState>,
    claims: Claims,
    form: Result<Json<ExpenseForm>, JsonRejection>,
) -> Result<impl IntoResponse, Error> {
    let Json(form) = form?;
    let today = local_today(&state.local_timezone)?;
    let fields = form.validate_new(today)?;

    let expense: Expense = {
        let connection = state.lock_connection()?;

        create_expense(
            NewExpense {
                user_id: claims.sub,
                label: fields.label,
                value: fields.value,
                date: fields.date,
                created_at: OffsetDateTime::now_utc(),
            },
            &connection,
        )
        .inspect_err(|error| tracing::error!("could not create expense: {error}"))?
    };

    state.alert.dispatch(claims.sub);

    Ok((StatusCode::CREATED, Json(expense)))
}
