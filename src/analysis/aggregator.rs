//! Revenue aggregation and statistics.
//!
//! This module computes the summary scalars and grouped revenue series
//! that make up a [`SalesAnalysis`]. The table is only ever read.

use crate::error::{Result, SalesError};
use crate::models::{GroupedSales, SalesAnalysis, Transaction, TransactionTable};
use std::collections::HashMap;
use tracing::debug;

/// Run every aggregation over the table.
///
/// Fails with [`SalesError::EmptyTable`] when there are no rows, since the
/// average unit count is undefined, and with [`SalesError::NonFinite`] when
/// any sum overflows.
pub fn analyze_sales(table: &TransactionTable) -> Result<SalesAnalysis> {
    let avg_units = average_units(table)?;

    let analysis = SalesAnalysis {
        total_revenue: total_revenue(table),
        avg_units,
        transaction_count: table.len(),
        region_sales: region_sales(table),
        product_sales: product_sales(table),
        monthly_sales: monthly_sales(table),
    };

    ensure_finite("total_revenue", analysis.total_revenue)?;
    ensure_finite("avg_units", analysis.avg_units)?;
    // A group sum is finite only if every group value is.
    ensure_finite("region_sales", analysis.region_sales.sum())?;
    ensure_finite("product_sales", analysis.product_sales.sum())?;
    ensure_finite("monthly_sales", analysis.monthly_sales.sum())?;

    debug!(
        "Aggregated {} transactions into {} regions, {} products, {} months",
        analysis.transaction_count,
        analysis.region_sales.len(),
        analysis.product_sales.len(),
        analysis.monthly_sales.len()
    );

    Ok(analysis)
}

fn ensure_finite(name: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SalesError::NonFinite(name.to_string()))
    }
}

/// Sum of every transaction total. Zero for an empty table.
pub fn total_revenue(table: &TransactionTable) -> f64 {
    table.iter().map(Transaction::total).sum()
}

/// Mean unit count per transaction.
pub fn average_units(table: &TransactionTable) -> Result<f64> {
    if table.is_empty() {
        return Err(SalesError::EmptyTable);
    }

    let units: f64 = table.iter().map(Transaction::units).sum();
    Ok(units / table.len() as f64)
}

/// Revenue per region, highest first.
pub fn region_sales(table: &TransactionTable) -> GroupedSales {
    group_sum_descending(table, |t| t.region.clone(), Transaction::total)
}

/// Revenue per product, highest first.
pub fn product_sales(table: &TransactionTable) -> GroupedSales {
    group_sum_descending(table, |t| t.product.clone(), Transaction::total)
}

/// Revenue per `YYYY-MM` month, chronological.
///
/// Zero-padded year-month labels sort lexicographically in calendar order.
pub fn monthly_sales(table: &TransactionTable) -> GroupedSales {
    let mut entries = group_sum(table, Transaction::month_label, Transaction::total);
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    GroupedSales::new(entries)
}

/// Units sold per product, ordered by product label.
pub fn units_by_product(table: &TransactionTable) -> GroupedSales {
    let mut entries = group_sum(table, |t| t.product.clone(), Transaction::units);
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    GroupedSales::new(entries)
}

/// Sum `value` per `key`, then order descending by sum.
///
/// Equal sums keep the order in which their keys first appear in the table.
pub fn group_sum_descending<K, V>(table: &TransactionTable, key: K, value: V) -> GroupedSales
where
    K: Fn(&Transaction) -> String,
    V: Fn(&Transaction) -> f64,
{
    let mut entries = group_sum(table, key, value);
    // Stable sort: ties stay in first-occurrence order.
    entries.sort_by(|a, b| b.1.total_cmp(&a.1));
    GroupedSales::new(entries)
}

/// Sum `value` per `key`, keys in first-occurrence order.
fn group_sum<K, V>(table: &TransactionTable, key: K, value: V) -> Vec<(String, f64)>
where
    K: Fn(&Transaction) -> String,
    V: Fn(&Transaction) -> f64,
{
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut entries: Vec<(String, f64)> = Vec::new();

    for tx in table.iter() {
        let label = key(tx);
        match positions.get(&label) {
            Some(&i) => entries[i].1 += value(tx),
            None => {
                positions.insert(label.clone(), entries.len());
                entries.push((label, value(tx)));
            }
        }
    }

    entries
}
