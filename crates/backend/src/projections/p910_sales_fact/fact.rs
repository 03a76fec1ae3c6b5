use chrono::NaiveDate;

use super::columns;
use crate::shared::data::error::{UnifyError, UnifyResult};
use crate::shared::data::table::{CellValue, Table};

/// One sales line item enriched with its reference attributes
///
/// Reference attributes are None when the key had no match in its
/// reference table.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleFact {
    pub sale_date: NaiveDate,
    pub sale_year: i32,
    pub product_id: Option<String>,
    pub store_id: Option<String>,
    pub customer_id: Option<String>,
    pub quantity: i64,
    pub product_name: Option<String>,
    pub product_type: Option<String>,
    pub brand: Option<String>,
    pub unit_price: Option<f64>,
    pub store_name: Option<String>,
    pub customer_name: Option<String>,
    pub total_value: Option<f64>,
}

/// Read-only fact table, built once at startup
#[derive(Debug, Clone, Default)]
pub struct FactTable {
    rows: Vec<SaleFact>,
}

impl FactTable {
    pub fn new(rows: Vec<SaleFact>) -> Self {
        Self { rows }
    }

    /// Project the unified table onto typed rows
    pub fn from_table(table: &Table) -> UnifyResult<Self> {
        let idx = |column: &str| table.require_column(column);

        let sale_date = idx(columns::SALE_DATE)?;
        let sale_year = idx(columns::SALE_YEAR)?;
        let product_id = idx(columns::PRODUCT_ID)?;
        let store_id = idx(columns::STORE_ID)?;
        let customer_id = idx(columns::CUSTOMER_ID)?;
        let quantity = idx(columns::QUANTITY)?;
        let product_name = idx(columns::PRODUCT_NAME)?;
        let product_type = idx(columns::PRODUCT_TYPE)?;
        let brand = idx(columns::BRAND)?;
        let unit_price = idx(columns::UNIT_PRICE)?;
        let store_name = idx(columns::STORE_NAME)?;
        let customer_name = idx(columns::CUSTOMER_NAME)?;
        let total_value = idx(columns::TOTAL_VALUE)?;

        let missing = |row: usize, column: &str| UnifyError::MissingValue {
            table: table.name().to_string(),
            column: column.to_string(),
            row,
        };

        let rows = table
            .rows()
            .iter()
            .enumerate()
            .map(|(row, cells)| {
                Ok(SaleFact {
                    sale_date: cells[sale_date]
                        .as_date()
                        .ok_or_else(|| missing(row, columns::SALE_DATE))?,
                    sale_year: cells[sale_year]
                        .as_i64()
                        .and_then(|y| i32::try_from(y).ok())
                        .ok_or_else(|| missing(row, columns::SALE_YEAR))?,
                    product_id: cells[product_id].to_key_string(),
                    store_id: cells[store_id].to_key_string(),
                    customer_id: cells[customer_id].to_key_string(),
                    quantity: cells[quantity]
                        .as_i64()
                        .ok_or_else(|| missing(row, columns::QUANTITY))?,
                    product_name: text(&cells[product_name]),
                    product_type: text(&cells[product_type]),
                    brand: text(&cells[brand]),
                    unit_price: cells[unit_price].as_f64(),
                    store_name: text(&cells[store_name]),
                    customer_name: text(&cells[customer_name]),
                    total_value: cells[total_value].as_f64(),
                })
            })
            .collect::<UnifyResult<Vec<_>>>()?;

        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[SaleFact] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn text(cell: &CellValue) -> Option<String> {
    cell.as_text().map(str::to_string)
}
