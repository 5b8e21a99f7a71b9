//! Renders a [DerivedView] as an HTML fragment with a pie chart of the visible expenses.

use charming::{
    Chart,
    component::Legend,
    element::{Tooltip, Trigger},
    series::Pie,
};
use maud::{Markup, html};
use rust_decimal::prelude::ToPrimitive;

use crate::{
    html::{chart_script, format_currency, format_date},
    view::core::{ChartData, ChartSlice, DerivedView},
};

const CHART_ID: &str = "expenses-chart";

fn expenses_chart(slices: &[ChartSlice]) -> Chart {
    let data: Vec<(f64, &str)> = slices
        .iter()
        .map(|slice| (slice.value.to_f64().unwrap_or_default(), slice.label.as_str()))
        .collect();

    Chart::new()
        .tooltip(Tooltip::new().trigger(Trigger::Item))
        .legend(Legend::new().top("bottom"))
        .series(
            Pie::new()
                .name("Expenses")
                .radius(vec!["30%", "70%"])
                .data(data),
        )
}

/// The total, the table of visible expenses and the chart.
pub fn expense_report(view: &DerivedView) -> Markup {
    html! {
        section id="expense-report" {
            p id="total" { "Total Expenses: " (format_currency(view.total)) }

            @if view.visible.is_empty() {
                p { "No expenses found" }
            } @else {
                table {
                    thead {
                        tr {
                            th { "Label" }
                            th { "Amount" }
                            th { "Date" }
                        }
                    }
                    tbody {
                        @for expense in &view.visible {
                            tr data-expense-id=(expense.id) {
                                td { (expense.label) }
                                td { (format_currency(expense.value)) }
                                td { (format_date(expense.date)) }
                            }
                        }
                    }
                }
            }

            @match &view.chart {
                ChartData::NoData => {
                    p id="no-chart-data" { "No data available for chart" }
                },
                ChartData::Slices(slices) => {
                    div id=(CHART_ID) style="min-height: 380px" {}
                    (chart_script(CHART_ID, &expenses_chart(slices).to_string()))
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use scraper::Selector;
    use time::{OffsetDateTime, macros::date};

    use crate::{
        Expense, UserId,
        test_utils::{assert_valid_html, parse_html_fragment},
        view::{
            core::{SortMode, derive_view},
            report::expense_report,
        },
    };

    fn expenses() -> Vec<Expense> {
        vec![
            Expense {
                id: 1,
                user_id: UserId::new(1),
                label: "Groceries".to_owned(),
                value: Decimal::new(4250, 2),
                date: date!(2025 - 03 - 07),
                created_at: OffsetDateTime::UNIX_EPOCH,
            },
            Expense {
                id: 2,
                user_id: UserId::new(1),
                label: "Rent".to_owned(),
                value: Decimal::from(900),
                date: date!(2025 - 03 - 01),
                created_at: OffsetDateTime::UNIX_EPOCH,
            },
        ]
    }

    #[test]
    fn renders_total_table_and_chart() {
        let view = derive_view(&expenses(), "", SortMode::Unsorted);

        let html = parse_html_fragment(&expense_report(&view).into_string());

        assert_valid_html(&html);
        let total = Selector::parse("#total").unwrap();
        assert_eq!(
            html.select(&total).next().unwrap().text().collect::<String>(),
            "Total Expenses: ₹942.50"
        );
        let rows = Selector::parse("tbody tr").unwrap();
        let first_row: Vec<String> = html
            .select(&rows)
            .next()
            .unwrap()
            .text()
            .map(str::to_owned)
            .collect();
        assert_eq!(first_row, vec!["Groceries", "₹42.50", "07/03/2025"]);
        let chart = Selector::parse("#expenses-chart").unwrap();
        assert_eq!(html.select(&chart).count(), 1);
        let script = Selector::parse("script").unwrap();
        let script_text: String = html.select(&script).next().unwrap().text().collect();
        assert!(script_text.contains("Groceries"));
    }

    #[test]
    fn renders_placeholder_when_nothing_matches() {
        let view = derive_view(&expenses(), "holiday", SortMode::Unsorted);

        let html = parse_html_fragment(&expense_report(&view).into_string());

        let placeholder = Selector::parse("#no-chart-data").unwrap();
        assert_eq!(
            html.select(&placeholder).next().unwrap().text().collect::<String>(),
            "No data available for chart"
        );
        let chart = Selector::parse("#expenses-chart").unwrap();
        assert_eq!(html.select(&chart).count(), 0);
        let total = Selector::parse("#total").unwrap();
        assert_eq!(
            html.select(&total).next().unwrap().text().collect::<String>(),
            "Total Expenses: ₹0.00"
        );
    }
}
