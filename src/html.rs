//! Shared helpers for rendering HTML fragments.

use maud::{Markup, PreEscaped, html};
use rust_decimal::Decimal;
use time::{Date, macros::format_description};

/// Format `amount` in rupees with two decimal places, e.g. "₹1234.50".
pub fn format_currency(amount: Decimal) -> String {
    format!("₹{:.2}", amount.round_dp(2))
}

/// Format `date` as "DD/MM/YYYY".
pub fn format_date(date: Date) -> String {
    date.format(format_description!("[day]/[month]/[year]"))
        .unwrap_or_else(|_| date.to_string())
}

/// A script that draws an ECharts chart with `options` into the element `chart_id`.
///
/// The chart follows the user's dark mode preference and resizes with the window.
pub fn chart_script(chart_id: &str, options: &str) -> Markup {
    let script = format!(
        r#"(function() {{
            const chartDom = document.getElementById("{chart_id}");
            const chart = echarts.init(chartDom);
            const option = {options};
            chart.setOption(option);

            window.addEventListener('resize', chart.resize);

            const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
            const updateTheme = () => {{
                chart.setTheme(darkModeMediaQuery.matches ? 'dark' : 'default');
            }};
            darkModeMediaQuery.addEventListener('change', updateTheme);
            updateTheme();
        }})();"#
    );

    html! {
        script { (PreEscaped(script)) }
    }
}
