use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use maud::Markup;
use serde::Deserialize;

use crate::{
    Error,
    auth::Claims,
    expense::{ExpenseState, get_expenses_by_user},
    view::{
        core::{DerivedView, SortMode, derive_view},
        report::expense_report,
    },
};

/// The search and sort order picked by the user.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViewQuery {
    /// Only show expenses whose label contains this text.
    #[serde(default)]
    pub search: String,
    /// The order to show expenses in.
    #[serde(default)]
    pub sort: SortMode,
}

fn load_view(state: &ExpenseState, claims: &Claims, query: &ViewQuery) -> Result<DerivedView, Error> {
    let connection = state.lock_connection()?;
    let expenses = get_expenses_by_user(claims.sub, &connection)
        .inspect_err(|error| tracing::error!("could not load expenses: {error}"))?;

    Ok(derive_view(&expenses, &query.search, query.sort))
}

/// A route handler that returns the filtered, sorted and totalled expenses of
/// the authenticated user.
pub async fn expense_view_endpoint(
    State(state): State<ExpenseState>,
    claims: Claims,
    query: Result<Query<ViewQuery>, QueryRejection>,
) -> Result<Json<DerivedView>, Error> {
    let Query(query) = query?;

    load_view(&state, &claims, &query).map(Json)
}

/// A route handler that renders the same view as [expense_view_endpoint] as an
/// HTML fragment with a pie chart.
pub async fn expense_report_endpoint(
    State(state): State<ExpenseState>,
    claims: Claims,
    query: Result<Query<ViewQuery>, QueryRejection>,
) -> Result<Markup, Error> {
    let Query(query) = query?;

    load_view(&state, &claims, &query).map(|view| expense_report(&view))
}
