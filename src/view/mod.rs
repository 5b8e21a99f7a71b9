//! The derived view of a user's expenses: search, sort, total and chart.

mod core;
mod endpoint;
mod report;

pub use endpoint::{expense_report_endpoint, expense_view_endpoint};
