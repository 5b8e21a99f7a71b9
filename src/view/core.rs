//! Filtering, sorting and totalling a user's expenses for display.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    Expense,
    alert::total_expenses,
    expense::ExpenseId,
};

/// The order to show expenses in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortMode {
    /// Keep the order the expenses were given in.
    #[default]
    #[serde(rename = "all")]
    Unsorted,
    /// Largest amount first.
    #[serde(rename = "high")]
    AmountDescending,
    /// Smallest amount first.
    #[serde(rename = "low")]
    AmountAscending,
    /// Latest date first.
    #[serde(rename = "recent")]
    DateRecentFirst,
    /// Earliest date first.
    #[serde(rename = "old")]
    DateOldestFirst,
}

/// One slice of the expenses pie chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSlice {
    /// The ID of the expense the slice stands for.
    pub id: ExpenseId,
    /// The expense's label.
    pub label: String,
    /// The expense's amount.
    #[serde(with = "rust_decimal::serde::float")]
    pub value: Decimal,
}

/// The data behind the expenses chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "slices", rename_all = "camelCase")]
pub enum ChartData {
    /// Nothing matched, show a placeholder instead of a chart.
    NoData,
    /// One slice per visible expense, in display order.
    Slices(Vec<ChartSlice>),
}

/// What the user sees for a given search and sort order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedView {
    /// The expenses that matched the search, in display order.
    pub visible: Vec<Expense>,
    /// The sum of the visible expenses.
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    /// The chart of the visible expenses.
    pub chart: ChartData,
}

/// Filter `expenses` by `search_term`, order them by `sort` and total them.
///
/// The search is a case-insensitive substring match on the label. An empty
/// search term matches every expense. Sorting is stable, so expenses that
/// compare equal stay in the order they were given in.
pub fn derive_view(expenses: &[Expense], search_term: &str, sort: SortMode) -> DerivedView {
    let needle = search_term.to_lowercase();

    let mut visible: Vec<Expense> = expenses
        .iter()
        .filter(|expense| needle.is_empty() || expense.label.to_lowercase().contains(&needle))
        .cloned()
        .collect();

    match sort {
        SortMode::Unsorted => {}
        SortMode::AmountDescending => visible.sort_by(|a, b| b.value.cmp(&a.value)),
        SortMode::AmountAscending => visible.sort_by(|a, b| a.value.cmp(&b.value)),
        SortMode::DateRecentFirst => visible.sort_by(|a, b| b.date.cmp(&a.date)),
        SortMode::DateOldestFirst => visible.sort_by(|a, b| a.date.cmp(&b.date)),
    }

    let total = total_expenses(&visible);
    let chart = chart_data(&visible);

    DerivedView {
        visible,
        total,
        chart,
    }
}

fn chart_data(visible: &[Expense]) -> ChartData {
    if visible.is_empty() {
        return ChartData::NoData;
    }

    ChartData::Slices(
        visible
            .iter()
            .map(|expense| ChartSlice {
                id: expense.id,
                label: expense.label.clone(),
                value: expense.value,
            })
            .collect(),
    )
}
