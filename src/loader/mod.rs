//! Sales file loading.
//!
//! Reads a delimited text file with a header row into a
//! [`TransactionTable`], deriving each row's total. Any malformed cell
//! fails the whole load.

mod dates;

use crate::error::{Result, SalesError};
use crate::models::{Transaction, TransactionTable};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Options for reading the input file.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Field delimiter byte.
    pub delimiter: u8,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

/// Positions of the required columns (`date, region, product, units,
/// price_per_unit`) within a header row.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    date: usize,
    region: usize,
    product: usize,
    units: usize,
    price_per_unit: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| SalesError::MissingColumn(name.to_string()))
        };

        Ok(Self {
            date: find("date")?,
            region: find("region")?,
            product: find("product")?,
            units: find("units")?,
            price_per_unit: find("price_per_unit")?,
        })
    }
}

/// Load the sales file at `path`.
pub fn load_sales_data(path: &Path, options: &LoadOptions) -> Result<TransactionTable> {
    if !path.exists() {
        return Err(SalesError::FileNotFound(path.to_path_buf()));
    }

    info!("Loading sales data from {}", path.display());
    let file = std::fs::File::open(path)?;
    let table = read_transactions(file, options)?;

    info!("Loaded {} transactions", table.len());
    Ok(table)
}

/// Parse transactions from any reader.
pub fn read_transactions<R: Read>(input: R, options: &LoadOptions) -> Result<TransactionTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(options.delimiter)
        // Header names must match exactly; only data cells are trimmed.
        .trim(Trim::Fields)
        .from_reader(input);

    let columns = ColumnIndex::from_headers(reader.headers()?)?;
    debug!("Column layout: {:?}", columns);

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(parse_record(&record, &columns)?);
    }

    Ok(TransactionTable::new(rows))
}

/// Convert one record into a transaction.
fn parse_record(record: &StringRecord, columns: &ColumnIndex) -> Result<Transaction> {
    let line = record.position().map(|p| p.line()).unwrap_or(0);
    let cell = |index: usize| record.get(index).unwrap_or("");

    let raw_date = cell(columns.date);
    let date = dates::parse_date(raw_date).ok_or_else(|| SalesError::Parse {
        line,
        column: "date".to_string(),
        value: raw_date.to_string(),
        reason: "unrecognised date format".to_string(),
    })?;

    let units = parse_number(cell(columns.units), "units", line)?;
    let price_per_unit = parse_number(cell(columns.price_per_unit), "price_per_unit", line)?;

    let transaction = Transaction::new(
        date,
        cell(columns.region),
        cell(columns.product),
        units,
        price_per_unit,
    );
    if !transaction.total().is_finite() {
        return Err(SalesError::Parse {
            line,
            column: "units * price_per_unit".to_string(),
            value: format!("{} * {}", units, price_per_unit),
            reason: "derived total is not a finite number".to_string(),
        });
    }

    Ok(transaction)
}

fn parse_number(value: &str, column: &str, line: u64) -> Result<f64> {
    let parse_error = |reason: String| SalesError::Parse {
        line,
        column: column.to_string(),
        value: value.to_string(),
        reason,
    };

    let number: f64 = value.parse().map_err(|e| parse_error(format!("{}", e)))?;
    if !number.is_finite() {
        return Err(parse_error("value is not a finite number".to_string()));
    }

    Ok(number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SCENARIO: &str = "\
date,region,product,units,price_per_unit
2024-01-05,East,Widget,10,2.0
2024-01-20,West,Widget,5,2.0
2024-02-01,East,Gadget,3,10.0
";

    fn read(input: &str) -> Result<TransactionTable> {
        read_transactions(input.as_bytes(), &LoadOptions::default())
    }

    #[test]
    fn test_reads_rows_and_derives_totals() {
        let table = read(SCENARIO).unwrap();
        assert_eq!(table.len(), 3);

        let first = first_row(&table);
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(first.region, "East");
        assert_eq!(first.product, "Widget");
        assert_eq!(first.total(), 20.0);

        let totals: Vec<f64> = table.iter().map(|t| t.total()).collect();
        assert_eq!(totals, vec![20.0, 10.0, 30.0]);
    }

    #[test]
    fn test_columns_in_any_order_with_extras() {
        let input = "\
product,units,note,price_per_unit,region,date
Widget,4,promo,2.5,North,2024-05-01
";
        let table = read(input).unwrap();
        let tx = first_row(&table);
        assert_eq!(tx.region, "North");
        assert_eq!(tx.total(), 10.0);
    }

    fn first_row(table: &TransactionTable) -> &Transaction {
        table.iter().next().unwrap()
    }

    #[test]
    fn test_trims_cells() {
        let input = "date,region,product,units,price_per_unit\n2024-01-05, East , Widget, 2 , 3\n";
        let table = read(input).unwrap();
        assert_eq!(first_row(&table).region, "East");
        assert_eq!(first_row(&table).total(), 6.0);
    }

    #[test]
    fn test_quoted_fields() {
        let input = "date,region,product,units,price_per_unit\n2024-01-05,\"North, East\",\"Widget \"\"XL\"\"\",1,9.5\n";
        let table = read(input).unwrap();
        assert_eq!(first_row(&table).region, "North, East");
        assert_eq!(first_row(&table).product, "Widget \"XL\"");
    }

    #[test]
    fn test_custom_delimiter() {
        let input = "date;region;product;units;price_per_unit\n2024-01-05;East;Widget;10;2\n";
        let options = LoadOptions { delimiter: b';' };
        let table = read_transactions(input.as_bytes(), &options).unwrap();
        assert_eq!(first_row(&table).total(), 20.0);
    }

    #[test]
    fn test_header_only_yields_empty_table() {
        let table = read("date,region,product,units,price_per_unit\n").unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_missing_column() {
        let err = read("date,region,product,units\n2024-01-05,East,Widget,1\n").unwrap_err();
        assert!(matches!(err, SalesError::MissingColumn(ref c) if c == "price_per_unit"));
    }

    #[test]
    fn test_header_names_are_exact() {
        let err = read("date, region,product,units,price_per_unit\n2024-01-05,East,Widget,1,2\n")
            .unwrap_err();
        assert!(matches!(err, SalesError::MissingColumn(ref c) if c == "region"));
    }

    #[test]
    fn test_overflowing_total_fails() {
        let input = "date,region,product,units,price_per_unit\n2024-01-05,East,Widget,1e308,10\n";
        match read(input).unwrap_err() {
            SalesError::Parse { line, column, .. } => {
                assert_eq!(line, 2);
                assert_eq!(column, "units * price_per_unit");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_malformed_date_fails_whole_load() {
        let input = "\
date,region,product,units,price_per_unit
2024-01-05,East,Widget,10,2.0
not-a-date,West,Widget,5,2.0
2024-02-01,East,Gadget,3,10.0
";
        match read(input).unwrap_err() {
            SalesError::Parse { line, column, value, .. } => {
                assert_eq!(line, 3);
                assert_eq!(column, "date");
                assert_eq!(value, "not-a-date");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_non_numeric_units_fail() {
        let input = "date,region,product,units,price_per_unit\n2024-01-05,East,Widget,ten,2.0\n";
        let err = read(input).unwrap_err();
        assert!(matches!(err, SalesError::Parse { ref column, .. } if column == "units"));
    }

    #[test]
    fn test_non_finite_price_fails() {
        let input = "date,region,product,units,price_per_unit\n2024-01-05,East,Widget,1,NaN\n";
        let err = read(input).unwrap_err();
        assert!(matches!(err, SalesError::Parse { ref column, .. } if column == "price_per_unit"));
    }

    #[test]
    fn test_empty_numeric_cell_fails() {
        let input = "date,region,product,units,price_per_unit\n2024-01-05,East,Widget,,2.0\n";
        assert!(matches!(read(input), Err(SalesError::Parse { .. })));
    }

    #[test]
    fn test_ragged_row_is_csv_error() {
        let input = "date,region,product,units,price_per_unit\n2024-01-05,East,Widget\n";
        assert!(matches!(read(input), Err(SalesError::Csv(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SCENARIO.as_bytes()).unwrap();

        let table = load_sales_data(file.path(), &LoadOptions::default()).unwrap();
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sales_data.txt");
        let err = load_sales_data(&path, &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, SalesError::FileNotFound(p) if p == path));
    }

    #[test]
    fn test_fixture_file_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/sales_data.txt");
        let table = load_sales_data(&path, &LoadOptions::default()).unwrap();
        assert!(!table.is_empty());
    }
}
