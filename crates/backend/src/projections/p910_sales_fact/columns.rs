//! Canonical column names of the unified sales table.
//!
//! Source headers are mapped onto these by the rename maps in `config.toml`.

pub const SALE_DATE: &str = "Sale Date";
pub const SALE_YEAR: &str = "Sale Year";
pub const PRODUCT_ID: &str = "Product ID";
pub const STORE_ID: &str = "Store ID";
pub const CUSTOMER_ID: &str = "Customer ID";
pub const QUANTITY: &str = "Quantity";

pub const PRODUCT_NAME: &str = "Product Name";
pub const PRODUCT_TYPE: &str = "Product Type";
pub const BRAND: &str = "Brand";
pub const UNIT_PRICE: &str = "Unit Price";

pub const STORE_NAME: &str = "Store Name";

pub const FIRST_NAME: &str = "First Name";
pub const LAST_NAME: &str = "Last Name";
pub const CUSTOMER_NAME: &str = "Customer Name";

pub const TOTAL_VALUE: &str = "Total Value";
