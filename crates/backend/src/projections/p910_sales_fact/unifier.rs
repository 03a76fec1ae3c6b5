use chrono::{Datelike, NaiveDate, NaiveDateTime};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::PathBuf;

use super::columns;
use super::fact::FactTable;
use crate::shared::config::DataConfig;
use crate::shared::data::csv_source::load_table;
use crate::shared::data::error::{UnifyError, UnifyResult};
use crate::shared::data::table::{CellValue, Table};

/// Day-first layouts, tried in order
const DATE_FORMATS: &[&str] = &["%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y-%m-%d"];

/// Two-digit years: 00..=69 map to 20xx, 70..=99 to 19xx
const SHORT_YEAR_FORMATS: &[&str] = &["%d/%m/%y", "%d-%m-%y", "%d.%m.%y"];

/// `%Y` also accepts "21" or "021"; such years are not taken literally
const MIN_FULL_YEAR: i32 = 1000;

const DATETIME_FORMATS: &[&str] = &[
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

/// Kind of number expected in a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericKind {
    /// Non-negative integer (quantities)
    Count,
    /// Non-negative decimal (prices)
    Amount,
}

/// Build the fact table from the configured sources
///
/// Order: sales concat → rename → numeric/date parsing; reference tables
/// rename and derive; then sales ⋈ products ⋈ stores ⋈ customers, total
/// value, column dedupe.
pub fn build_fact_table(config: &DataConfig) -> UnifyResult<FactTable> {
    let delimiter = config.delimiter_byte()?;

    let sales = load_and_concatenate(&config.sales_paths(), delimiter)?;
    let sales = standardize_columns(&sales, &config.rename.sales);
    let sales = parse_numeric_column(&sales, columns::QUANTITY, NumericKind::Count)?;
    let sales = parse_and_extract_year(&sales, columns::SALE_DATE, columns::SALE_YEAR)?;

    let products = load_table(&config.products_path(), delimiter)?;
    let products = standardize_columns(&products, &config.rename.products);
    let products = parse_numeric_column(&products, columns::UNIT_PRICE, NumericKind::Amount)?;

    let stores = load_table(&config.stores_path(), delimiter)?;
    let stores = standardize_columns(&stores, &config.rename.stores);

    let customers = load_table(&config.customers_path(), delimiter)?;
    let customers = standardize_columns(&customers, &config.rename.customers);
    let customers = derive_customer_name(&customers)?;

    let joined = join_all(&sales, &products, &stores, &customers)?;
    let fact_table = FactTable::from_table(&joined)?;

    tracing::info!(
        "Fact table ready: {} rows, {} columns",
        fact_table.len(),
        joined.columns().len()
    );

    Ok(fact_table)
}

/// Join the prepared tables and derive the total value column
pub fn join_all(
    sales: &Table,
    products: &Table,
    stores: &Table,
    customers: &Table,
) -> UnifyResult<Table> {
    let joined = join_left(sales, products, columns::PRODUCT_ID)?;
    let joined = join_left(&joined, stores, columns::STORE_ID)?;
    let joined = join_left(&joined, customers, columns::CUSTOMER_ID)?;
    let joined = compute_total_value(&joined)?;
    let joined = dedupe_columns(&joined);

    debug_assert_eq!(joined.row_count(), sales.row_count());

    Ok(joined)
}

/// Load each sales source and concatenate them in source order
pub fn load_and_concatenate(sources: &[PathBuf], delimiter: u8) -> UnifyResult<Table> {
    let tables = sources
        .iter()
        .map(|path| load_table(path, delimiter))
        .collect::<UnifyResult<Vec<_>>>()?;

    let sales = concatenate("sales", &tables)?;
    tracing::info!(
        "Concatenated {} sales sources: {} rows",
        tables.len(),
        sales.row_count()
    );
    Ok(sales)
}

/// Concatenate tables with the same column set
///
/// The first table fixes the column order; later tables with the same set in
/// another order are realigned.
pub fn concatenate(name: &str, tables: &[Table]) -> UnifyResult<Table> {
    let Some(first) = tables.first() else {
        return Ok(Table::new(name, Vec::new(), Vec::new()));
    };

    let expected = first.columns().to_vec();
    let mut expected_sorted = expected.clone();
    expected_sorted.sort();

    let mut rows = Vec::new();
    for table in tables {
        let mut found_sorted = table.columns().to_vec();
        found_sorted.sort();
        if found_sorted != expected_sorted {
            return Err(UnifyError::SchemaMismatch {
                source_name: table.name().to_string(),
                expected: expected.clone(),
                found: table.columns().to_vec(),
            });
        }

        if table.columns() == expected.as_slice() {
            rows.extend(table.rows().iter().cloned());
        } else {
            let order = alignment(table.columns(), &expected);
            rows.extend(
                table
                    .rows()
                    .iter()
                    .map(|row| order.iter().map(|&i| row[i].clone()).collect::<Vec<_>>()),
            );
        }
    }

    Ok(Table::new(name, expected, rows))
}

/// Source position for each target column; repeated names map in order
fn alignment(source: &[String], target: &[String]) -> Vec<usize> {
    let mut used = vec![false; source.len()];
    target
        .iter()
        .map(|name| {
            let idx = source
                .iter()
                .enumerate()
                .position(|(i, c)| !used[i] && c == name)
                .unwrap_or(0);
            used[idx] = true;
            idx
        })
        .collect()
}

/// Rename columns per the mapping; unmapped columns pass through
pub fn standardize_columns(table: &Table, rename_map: &BTreeMap<String, String>) -> Table {
    let columns = table
        .columns()
        .iter()
        .map(|c| rename_map.get(c).cloned().unwrap_or_else(|| c.clone()))
        .collect();

    Table::new(table.name(), columns, table.rows().to_vec())
}

/// Convert a text column to numbers of the given kind
///
/// Null stays Null. Decimals accept comma or dot as separator.
pub fn parse_numeric_column(table: &Table, column: &str, kind: NumericKind) -> UnifyResult<Table> {
    let idx = table.require_column(column)?;

    let values = table
        .rows()
        .iter()
        .enumerate()
        .map(|(row, cells)| {
            let cell = &cells[idx];
            let parsed = match (cell, kind) {
                (CellValue::Null, _) => Some(CellValue::Null),
                (CellValue::Integer(i), NumericKind::Count) if *i >= 0 => Some(cell.clone()),
                (CellValue::Integer(i), NumericKind::Amount) if *i >= 0 => {
                    Some(CellValue::Number(*i as f64))
                }
                (CellValue::Number(n), NumericKind::Amount) if *n >= 0.0 => Some(cell.clone()),
                (CellValue::Text(s), NumericKind::Count) => s
                    .trim()
                    .parse::<i64>()
                    .ok()
                    .filter(|v| *v >= 0)
                    .map(CellValue::Integer),
                (CellValue::Text(s), NumericKind::Amount) => parse_decimal(s)
                    .filter(|v| *v >= 0.0)
                    .map(CellValue::Number),
                _ => None,
            };

            parsed.ok_or_else(|| UnifyError::InvalidNumber {
                table: table.name().to_string(),
                column: column.to_string(),
                row,
                value: cell.to_key_string().unwrap_or_default(),
            })
        })
        .collect::<UnifyResult<Vec<_>>>()?;

    Ok(table.with_replaced_column(idx, values))
}

/// Parse a decimal that may use comma or dot as separator
///
/// When both appear, the last one is the decimal separator.
fn parse_decimal(s: &str) -> Option<f64> {
    let s = s.trim().trim_start_matches("R$").trim();
    let normalized = match (s.rfind(','), s.rfind('.')) {
        (Some(comma), Some(dot)) if comma > dot => s.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => s.replace(',', ""),
        (Some(_), None) => s.replace(',', "."),
        _ => s.to_string(),
    };
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Add Customer Name = First Name + " " + Last Name
///
/// A missing part yields a null name.
pub fn derive_customer_name(customers: &Table) -> UnifyResult<Table> {
    let first_idx = customers.require_column(columns::FIRST_NAME)?;
    let last_idx = customers.require_column(columns::LAST_NAME)?;

    let mut missing = 0usize;
    let names = customers
        .rows()
        .iter()
        .map(|row| {
            match (row[first_idx].to_key_string(), row[last_idx].to_key_string()) {
                (Some(first), Some(last)) => CellValue::Text(format!("{} {}", first, last)),
                _ => {
                    missing += 1;
                    CellValue::Null
                }
            }
        })
        .collect();

    if missing > 0 {
        tracing::warn!(
            "{}: {} customers without a complete name",
            customers.name(),
            missing
        );
    }

    Ok(customers.with_column(columns::CUSTOMER_NAME, names))
}

/// Parse a date day-first ("05/03/2021" is 5 March 2021, "05/03/21" too)
///
/// Three-digit years match no layout and yield None.
pub fn parse_day_first(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let full_year = |d: &NaiveDate| d.year() >= MIN_FULL_YEAR;

    DATE_FORMATS
        .iter()
        .filter_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .find(full_year)
        .or_else(|| {
            SHORT_YEAR_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        })
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .filter_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                .map(|dt| dt.date())
                .find(full_year)
        })
}

/// Parse the date column in place of its text and append an integer year column
pub fn parse_and_extract_year(
    table: &Table,
    date_column: &str,
    year_column: &str,
) -> UnifyResult<Table> {
    let idx = table.require_column(date_column)?;

    let dates = table
        .rows()
        .iter()
        .enumerate()
        .map(|(row, cells)| {
            let cell = &cells[idx];
            let parsed = match cell {
                CellValue::Date(d) => Some(*d),
                CellValue::Text(s) => parse_day_first(s),
                _ => None,
            };
            parsed.ok_or_else(|| UnifyError::DateParse {
                table: table.name().to_string(),
                column: date_column.to_string(),
                row,
                value: cell.to_key_string().unwrap_or_default(),
            })
        })
        .collect::<UnifyResult<Vec<_>>>()?;

    let years = dates
        .iter()
        .map(|d| CellValue::Integer(i64::from(d.year())))
        .collect();
    let date_cells = dates.into_iter().map(CellValue::Date).collect();

    Ok(table
        .with_replaced_column(idx, date_cells)
        .with_column(year_column, years))
}

/// Left outer join on a key column
///
/// Every base row is kept once, in order. The key must be unique in `other`;
/// null keys never match.
pub fn join_left(base: &Table, other: &Table, on_key: &str) -> UnifyResult<Table> {
    let base_key = base.require_column(on_key)?;
    let other_key = other.require_column(on_key)?;

    let mut index: HashMap<String, usize> = HashMap::with_capacity(other.row_count());
    for (i, row) in other.rows().iter().enumerate() {
        if let Some(key) = row[other_key].to_key_string() {
            if index.insert(key.clone(), i).is_some() {
                return Err(UnifyError::DuplicateKey {
                    table: other.name().to_string(),
                    column: on_key.to_string(),
                    key,
                });
            }
        }
    }

    let carried: Vec<usize> = (0..other.columns().len())
        .filter(|&i| i != other_key)
        .collect();

    let mut columns = base.columns().to_vec();
    columns.extend(carried.iter().map(|&i| other.columns()[i].clone()));

    let mut unmatched = 0usize;
    let rows = base
        .rows()
        .iter()
        .map(|row| {
            let matched = row[base_key]
                .to_key_string()
                .and_then(|key| index.get(&key))
                .map(|&i| &other.rows()[i]);

            let mut joined = row.clone();
            match matched {
                Some(other_row) => joined.extend(carried.iter().map(|&i| other_row[i].clone())),
                None => {
                    unmatched += 1;
                    joined.extend(carried.iter().map(|_| CellValue::Null));
                }
            }
            joined
        })
        .collect();

    if unmatched > 0 {
        tracing::warn!(
            "Join {} with {} on '{}': {} rows without a match",
            base.name(),
            other.name(),
            on_key,
            unmatched
        );
    }

    Ok(Table::new(base.name(), columns, rows))
}

/// Add Total Value = Quantity × Unit Price; null when either side is null
pub fn compute_total_value(table: &Table) -> UnifyResult<Table> {
    let qty_idx = table.require_column(columns::QUANTITY)?;
    let price_idx = table.require_column(columns::UNIT_PRICE)?;

    let totals = table
        .rows()
        .iter()
        .map(|row| match (row[qty_idx].as_f64(), row[price_idx].as_f64()) {
            (Some(qty), Some(price)) => CellValue::Number(qty * price),
            _ => CellValue::Null,
        })
        .collect();

    Ok(table.with_column(columns::TOTAL_VALUE, totals))
}

/// Drop repeated column names, keeping the first occurrence
pub fn dedupe_columns(table: &Table) -> Table {
    let mut seen = HashSet::new();
    let keep: Vec<usize> = table
        .columns()
        .iter()
        .enumerate()
        .filter(|(_, name)| seen.insert(name.as_str()))
        .map(|(i, _)| i)
        .collect();

    if keep.len() == table.columns().len() {
        return table.clone();
    }

    tracing::debug!(
        "{}: dropping {} duplicate columns",
        table.name(),
        table.columns().len() - keep.len()
    );

    let columns = keep.iter().map(|&i| table.columns()[i].clone()).collect();
    let rows = table
        .rows()
        .iter()
        .map(|row| keep.iter().map(|&i| row[i].clone()).collect())
        .collect();

    Table::new(table.name(), columns, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn table(name: &str, columns: &[&str], rows: &[&[&str]]) -> Table {
        Table::new(
            name,
            cols(columns),
            rows.iter()
                .map(|r| r.iter().map(|v| CellValue::from_field(v)).collect())
                .collect(),
        )
    }

    fn sales() -> Table {
        table(
            "sales",
            &[columns::SALE_DATE, columns::PRODUCT_ID, columns::STORE_ID, columns::CUSTOMER_ID, columns::QUANTITY],
            &[
                &["05/03/2021", "P1", "S1", "C1", "2"],
                &["06/03/2021", "P2", "S2", "C1", "1"],
                &["01/01/2022", "P9", "S1", "C2", "3"],
            ],
        )
    }

    fn products() -> Table {
        table(
            "products",
            &[columns::PRODUCT_ID, columns::PRODUCT_NAME, columns::PRODUCT_TYPE, columns::BRAND, columns::UNIT_PRICE],
            &[
                &["P1", "Widget", "Tools", "Acme", "10,00"],
                &["P2", "Gadget", "Tools", "Acme", "5.00"],
            ],
        )
    }

    fn stores() -> Table {
        table("stores", &[columns::STORE_ID, columns::STORE_NAME], &[&["S1", "A"], &["S2", "B"]])
    }

    fn customers() -> Table {
        table(
            "customers",
            &[columns::CUSTOMER_ID, columns::FIRST_NAME, columns::LAST_NAME],
            &[&["C1", "Bob", "Silva"], &["C2", "Ana", ""]],
        )
    }

    fn prepared() -> (Table, Table, Table, Table) {
        let sales = parse_numeric_column(&sales(), columns::QUANTITY, NumericKind::Count).unwrap();
        let sales = parse_and_extract_year(&sales, columns::SALE_DATE, columns::SALE_YEAR).unwrap();
        let products =
            parse_numeric_column(&products(), columns::UNIT_PRICE, NumericKind::Amount).unwrap();
        let customers = derive_customer_name(&customers()).unwrap();
        (sales, products, stores(), customers)
    }

    #[test]
    fn test_concatenate_keeps_source_order() {
        let a = table("2020.csv", &["d", "q"], &[&["1", "a"], &["2", "b"]]);
        let b = table("2021.csv", &["d", "q"], &[&["3", "c"]]);
        let all = concatenate("sales", &[a, b]).unwrap();
        let firsts: Vec<_> = all.rows().iter().map(|r| r[0].clone()).collect();
        assert_eq!(firsts, vec![text("1"), text("2"), text("3")]);
    }

    #[test]
    fn test_concatenate_realigns_reordered_columns() {
        let a = table("2020.csv", &["d", "q"], &[&["1", "a"]]);
        let b = table("2021.csv", &["q", "d"], &[&["b", "2"]]);
        let all = concatenate("sales", &[a, b]).unwrap();
        assert_eq!(all.value(1, "d"), Some(&text("2")));
        assert_eq!(all.value(1, "q"), Some(&text("b")));
    }

    #[test]
    fn test_concatenate_schema_mismatch() {
        let a = table("2020.csv", &["d", "q"], &[]);
        let b = table("2021.csv", &["d", "qty"], &[]);
        let err = concatenate("sales", &[a, b]).unwrap_err();
        match err {
            UnifyError::SchemaMismatch { source_name, .. } => assert_eq!(source_name, "2021.csv"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_and_concatenate_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut paths = Vec::new();
        for (year, row) in [("2020", "01/02/2020;P1;2"), ("2021", "01/02/2021;P2;3")] {
            let path = dir.path().join(format!("Base Vendas - {year}.csv"));
            let mut file = std::fs::File::create(&path).unwrap();
            writeln!(file, "Data da Venda;SKU;Qtd Vendida").unwrap();
            writeln!(file, "{row}").unwrap();
            paths.push(path);
        }

        let sales = load_and_concatenate(&paths, b';').unwrap();
        assert_eq!(sales.row_count(), 2);
        assert_eq!(sales.value(1, "SKU"), Some(&text("P2")));
    }

    #[test]
    fn test_standardize_columns_passes_unmapped_through() {
        let t = table("p", &["SKU", "Extra"], &[&["P1", "x"]]);
        let map = BTreeMap::from([("SKU".to_string(), columns::PRODUCT_ID.to_string())]);
        let renamed = standardize_columns(&t, &map);
        assert_eq!(renamed.columns(), &[columns::PRODUCT_ID, "Extra"]);
        assert_eq!(t.columns(), &["SKU", "Extra"]);
    }

    #[test]
    fn test_parse_decimal_separators() {
        assert_eq!(parse_decimal("10,50"), Some(10.5));
        assert_eq!(parse_decimal("10.50"), Some(10.5));
        assert_eq!(parse_decimal("1.234,56"), Some(1234.56));
        assert_eq!(parse_decimal("1,234.56"), Some(1234.56));
        assert_eq!(parse_decimal("R$ 7,00"), Some(7.0));
        assert_eq!(parse_decimal("abc"), None);
    }

    #[test]
    fn test_negative_quantity_rejected() {
        let t = table("sales", &[columns::QUANTITY], &[&["-1"]]);
        let err = parse_numeric_column(&t, columns::QUANTITY, NumericKind::Count).unwrap_err();
        assert!(matches!(err, UnifyError::InvalidNumber { row: 0, .. }));
    }

    #[test]
    fn test_day_first_parsing() {
        assert_eq!(parse_day_first("05/03/2021"), NaiveDate::from_ymd_opt(2021, 3, 5));
        assert_eq!(parse_day_first("5/3/2021"), NaiveDate::from_ymd_opt(2021, 3, 5));
        assert_eq!(parse_day_first("25-12-2020"), NaiveDate::from_ymd_opt(2020, 12, 25));
        assert_eq!(parse_day_first("2022-01-31"), NaiveDate::from_ymd_opt(2022, 1, 31));
        assert_eq!(parse_day_first("05/03/2021 14:30"), NaiveDate::from_ymd_opt(2021, 3, 5));
        assert_eq!(parse_day_first("31/02/2021"), None);
        assert_eq!(parse_day_first("yesterday"), None);
    }

    #[test]
    fn test_two_digit_year_is_2000s() {
        assert_eq!(parse_day_first("05/03/21"), NaiveDate::from_ymd_opt(2021, 3, 5));
        assert_eq!(parse_day_first("5-3-21"), NaiveDate::from_ymd_opt(2021, 3, 5));
        assert_eq!(parse_day_first("05/03/021"), None);
        assert_eq!(parse_day_first("05/03/0021 10:00"), None);

        let t = table("sales", &[columns::SALE_DATE], &[&["05/03/21"], &["05/03/021"]]);
        let err = parse_and_extract_year(&t, columns::SALE_DATE, columns::SALE_YEAR).unwrap_err();
        assert!(matches!(err, UnifyError::DateParse { row: 1, .. }));

        let t = table("sales", &[columns::SALE_DATE], &[&["05/03/21"]]);
        let parsed = parse_and_extract_year(&t, columns::SALE_DATE, columns::SALE_YEAR).unwrap();
        assert_eq!(parsed.value(0, columns::SALE_YEAR), Some(&CellValue::Integer(2021)));
    }

    #[test]
    fn test_extract_year() {
        let (sales, ..) = prepared();
        assert_eq!(sales.value(0, columns::SALE_YEAR), Some(&CellValue::Integer(2021)));
        assert_eq!(sales.value(2, columns::SALE_YEAR), Some(&CellValue::Integer(2022)));
        assert_eq!(
            sales.value(0, columns::SALE_DATE),
            Some(&CellValue::Date(NaiveDate::from_ymd_opt(2021, 3, 5).unwrap()))
        );
    }

    #[test]
    fn test_unparseable_date_fails() {
        let t = table("sales", &[columns::SALE_DATE], &[&["05/03/2021"], &["not a date"]]);
        let err = parse_and_extract_year(&t, columns::SALE_DATE, columns::SALE_YEAR).unwrap_err();
        match err {
            UnifyError::DateParse { row, value, .. } => {
                assert_eq!(row, 1);
                assert_eq!(value, "not a date");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_customer_name_null_when_part_missing() {
        let customers = derive_customer_name(&customers()).unwrap();
        assert_eq!(customers.value(0, columns::CUSTOMER_NAME), Some(&text("Bob Silva")));
        assert_eq!(customers.value(1, columns::CUSTOMER_NAME), Some(&CellValue::Null));
    }

    #[test]
    fn test_join_left_keeps_unmatched_rows() {
        let (sales, products, ..) = prepared();
        let joined = join_left(&sales, &products, columns::PRODUCT_ID).unwrap();

        assert_eq!(joined.row_count(), sales.row_count());
        assert_eq!(joined.value(0, columns::PRODUCT_NAME), Some(&text("Widget")));
        assert_eq!(joined.value(2, columns::PRODUCT_ID), Some(&text("P9")));
        assert_eq!(joined.value(2, columns::PRODUCT_NAME), Some(&CellValue::Null));
    }

    #[test]
    fn test_join_left_null_key_never_matches() {
        let base = table("sales", &[columns::STORE_ID, columns::QUANTITY], &[&["", "1"], &["S1", "2"]]);
        let stores = table("stores", &[columns::STORE_ID, columns::STORE_NAME], &[&["", "Blank"], &["S1", "Centro"]]);

        let joined = join_left(&base, &stores, columns::STORE_ID).unwrap();
        assert_eq!(joined.value(0, columns::STORE_NAME), Some(&CellValue::Null));
        assert_eq!(joined.value(1, columns::STORE_NAME), Some(&text("Centro")));
    }

    #[test]
    fn test_join_left_duplicate_key() {
        let (sales, ..) = prepared();
        let dup = table("stores", &[columns::STORE_ID, columns::STORE_NAME], &[&["S1", "A"], &["S1", "A2"]]);
        let err = join_left(&sales, &dup, columns::STORE_ID).unwrap_err();
        match err {
            UnifyError::DuplicateKey { key, table, .. } => {
                assert_eq!(key, "S1");
                assert_eq!(table, "stores");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_join_missing_key_column() {
        let (sales, ..) = prepared();
        let bad = table("stores", &["Loja"], &[]);
        assert!(matches!(
            join_left(&sales, &bad, columns::STORE_ID),
            Err(UnifyError::MissingColumn { .. })
        ));
    }

    #[test]
    fn test_join_all_preserves_cardinality_and_totals() {
        let (sales, products, stores, customers) = prepared();
        let joined = join_all(&sales, &products, &stores, &customers).unwrap();

        assert_eq!(joined.row_count(), sales.row_count());
        for row in 0..joined.row_count() {
            let qty = joined.value(row, columns::QUANTITY).and_then(CellValue::as_f64);
            let price = joined.value(row, columns::UNIT_PRICE).and_then(CellValue::as_f64);
            let total = joined.value(row, columns::TOTAL_VALUE).and_then(CellValue::as_f64);
            match (qty, price) {
                (Some(q), Some(p)) => assert_eq!(total, Some(q * p)),
                _ => assert_eq!(total, None),
            }
        }
        assert_eq!(joined.value(0, columns::TOTAL_VALUE), Some(&CellValue::Number(20.0)));
        assert_eq!(joined.value(0, columns::STORE_NAME), Some(&text("A")));
        assert_eq!(joined.value(1, columns::CUSTOMER_NAME), Some(&text("Bob Silva")));
    }

    #[test]
    fn test_dedupe_first_occurrence_wins() {
        let t = Table::new(
            "t",
            cols(&["id", "name", "name"]),
            vec![vec![text("1"), text("first"), text("second")]],
        );
        let deduped = dedupe_columns(&t);
        assert_eq!(deduped.columns(), &["id", "name"]);
        assert_eq!(deduped.value(0, "name"), Some(&text("first")));
    }

    #[test]
    fn test_join_collision_resolved_by_dedupe() {
        let (sales, products, stores, customers) = prepared();
        // Customers also carry a "Store Name" column; the store table's value must win
        let customers = customers.with_column(
            columns::STORE_NAME,
            vec![text("home store"), text("home store")],
        );
        let joined = join_all(&sales, &products, &stores, &customers).unwrap();
        let store_columns = joined
            .columns()
            .iter()
            .filter(|c| c.as_str() == columns::STORE_NAME)
            .count();
        assert_eq!(store_columns, 1);
        assert_eq!(joined.value(0, columns::STORE_NAME), Some(&text("A")));
    }

    fn sample_config() -> DataConfig {
        let config: crate::shared::config::Config =
            toml::from_str(include_str!("../../../../../config.toml")).unwrap();
        let mut data = config.data;
        data.directory = concat!(env!("CARGO_MANIFEST_DIR"), "/../../data").to_string();
        data
    }

    #[test]
    fn test_build_fact_table_from_sample_data() {
        let facts = build_fact_table(&sample_config()).unwrap();
        assert_eq!(facts.len(), 12);

        let first = &facts.rows()[0];
        assert_eq!(first.sale_date, NaiveDate::from_ymd_opt(2020, 3, 5).unwrap());
        assert_eq!(first.product_name.as_deref(), Some("Notebook Inspiron 15"));
        assert_eq!(first.store_name.as_deref(), Some("Shopping Centro"));
        assert_eq!(first.customer_name.as_deref(), Some("Ana Souza"));
        assert_eq!(first.total_value, Some(3500.0));

        // Unknown SKU keeps its row with empty product attributes
        let orphan = facts
            .rows()
            .iter()
            .find(|f| f.product_id.as_deref() == Some("HL9999"))
            .unwrap();
        assert_eq!(orphan.product_name, None);
        assert_eq!(orphan.total_value, None);
        assert_eq!(orphan.store_name.as_deref(), Some("Shopping Norte"));

        // Customer without a last name
        let partial = facts
            .rows()
            .iter()
            .find(|f| f.customer_id.as_deref() == Some("105"))
            .unwrap();
        assert_eq!(partial.customer_name, None);

        let years: Vec<_> = facts.rows().iter().map(|f| f.sale_year).collect();
        assert_eq!(years, vec![2020, 2020, 2020, 2020, 2021, 2021, 2021, 2021, 2022, 2022, 2022, 2022]);
    }

    #[test]
    fn test_build_fact_table_fails_on_missing_source() {
        let mut config = sample_config();
        config.sales_files.push("Base Vendas - 2099.csv".to_string());
        assert!(matches!(build_fact_table(&config), Err(UnifyError::Csv { .. })));
    }
}
