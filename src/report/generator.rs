//! Text and JSON report generation.
//!
//! This module formats a [`SalesAnalysis`] as the human-readable summary
//! printed to stdout, or as pretty JSON.

use crate::models::{GroupedSales, SalesAnalysis};
use anyhow::Result;

/// Options for text rendering.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Symbol placed before monetary amounts.
    pub currency_symbol: String,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            currency_symbol: "$".to_string(),
        }
    }
}

/// Generate the complete text summary.
pub fn render_summary(analysis: &SalesAnalysis, options: &ReportOptions) -> String {
    let mut output = String::new();

    output.push_str("Sales Analysis Summary:\n");
    output.push_str("---------------------\n");
    output.push_str(&format!(
        "Total Revenue: {}\n",
        format_currency(analysis.total_revenue, &options.currency_symbol)
    ));
    output.push_str(&format!(
        "Average Units per Transaction: {:.2}\n",
        analysis.avg_units
    ));

    output.push_str(&generate_group_section("Sales by Region", &analysis.region_sales));
    output.push_str(&generate_group_section("Sales by Product", &analysis.product_sales));
    output.push_str(&generate_group_section("Monthly Sales", &analysis.monthly_sales));

    output
}

/// Generate one grouped listing, keeping the stored order.
fn generate_group_section(title: &str, grouped: &GroupedSales) -> String {
    let mut section = String::new();

    section.push_str(&format!("\n{}:\n", title));

    if grouped.is_empty() {
        section.push_str("  (none)\n");
        return section;
    }

    let formatted: Vec<(&str, String)> = grouped
        .iter()
        .map(|(label, value)| (label, format_amount(value)))
        .collect();
    let label_width = formatted.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
    let value_width = formatted.iter().map(|(_, v)| v.len()).max().unwrap_or(0);

    for (label, value) in formatted {
        section.push_str(&format!(
            "  {:<lw$}  {:>vw$}\n",
            label,
            value,
            lw = label_width,
            vw = value_width
        ));
    }

    section
}

/// Format a monetary amount: symbol, thousands separators, two decimals.
pub fn format_currency(value: f64, symbol: &str) -> String {
    let amount = format_amount(value);
    match amount.strip_prefix('-') {
        Some(magnitude) => format!("-{}{}", symbol, magnitude),
        None => format!("{}{}", symbol, amount),
    }
}

/// Format a number with thousands separators and two decimals.
fn format_amount(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    // -0.001 rounds to zero; no sign in that case.
    let negative = value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0');
    format!("{}{}.{}", if negative { "-" } else { "" }, grouped, fraction)
}

/// Generate a JSON report.
pub fn render_json(analysis: &SalesAnalysis) -> Result<String> {
    serde_json::to_string_pretty(analysis).map_err(Into::into)
}
