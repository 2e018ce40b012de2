//! Data models for the sales report.
//!
//! This module contains the transaction table produced by the loader and
//! the result bundle produced by the aggregator.

use chrono::NaiveDate;
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};

/// A single sales transaction.
///
/// The `total` is derived once from `units * price_per_unit` and cannot be
/// changed afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// Calendar day of the sale.
    pub date: NaiveDate,
    /// Region label.
    pub region: String,
    /// Product label.
    pub product: String,
    units: f64,
    price_per_unit: f64,
    total: f64,
}

impl Transaction {
    /// Creates a transaction and derives its total.
    pub fn new(
        date: NaiveDate,
        region: impl Into<String>,
        product: impl Into<String>,
        units: f64,
        price_per_unit: f64,
    ) -> Self {
        Self {
            date,
            region: region.into(),
            product: product.into(),
            units,
            price_per_unit,
            total: units * price_per_unit,
        }
    }

    /// Number of units sold.
    pub fn units(&self) -> f64 {
        self.units
    }

    /// Price of a single unit.
    pub fn price_per_unit(&self) -> f64 {
        self.price_per_unit
    }

    /// Revenue of this transaction.
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Year-month grouping key, e.g. `2024-01`.
    pub fn month_label(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }
}

/// The in-memory row set loaded from the input file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionTable {
    rows: Vec<Transaction>,
}

impl TransactionTable {
    pub fn new(rows: Vec<Transaction>) -> Self {
        Self { rows }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// An ordered label → value aggregation.
///
/// The order of entries is meaningful (descending by value, or
/// chronological for months) and is preserved when serialized.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedSales {
    entries: Vec<(String, f64)>,
}

impl GroupedSales {
    pub fn new(entries: Vec<(String, f64)>) -> Self {
        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(label, value)| (label.as_str(), *value))
    }

    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|(label, _)| label.as_str()).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.entries.iter().map(|(_, value)| *value).collect()
    }

    /// Sum of all values; non-finite if any value is.
    pub fn sum(&self) -> f64 {
        self.entries.iter().map(|(_, value)| value).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Serialize)]
struct GroupEntry<'a> {
    label: &'a str,
    value: f64,
}

impl Serialize for GroupedSales {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.entries.len()))?;
        for (label, value) in self.iter() {
            seq.serialize_element(&GroupEntry { label, value })?;
        }
        seq.end()
    }
}

/// Result bundle of the aggregation stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesAnalysis {
    /// Sum of all transaction totals.
    pub total_revenue: f64,
    /// Mean unit count per transaction.
    pub avg_units: f64,
    /// Number of transactions aggregated.
    pub transaction_count: usize,
    /// Revenue by region, highest first.
    pub region_sales: GroupedSales,
    /// Revenue by product, highest first.
    pub product_sales: GroupedSales,
    /// Revenue by `YYYY-MM` month, chronological.
    pub monthly_sales: GroupedSales,
}
