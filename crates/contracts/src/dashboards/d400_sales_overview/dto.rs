use serde::{Deserialize, Serialize};

/// Title shown by every chart when the filters match no sales
pub const NO_DATA_MESSAGE: &str = "No data to display for the selected filters";

/// Message shown in place of the top customers table when the filters match no sales
pub const NO_CUSTOMER_DATA_MESSAGE: &str = "No customer data to display for the selected filters";

/// Current state of all dashboard dropdowns
///
/// Sent on every filter change. Empty lists and a missing product type mean
/// "no constraint" for that dimension.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSelection {
    #[serde(default)]
    pub products: Vec<String>,
    #[serde(default)]
    pub stores: Vec<String>,
    #[serde(default)]
    pub customers: Vec<String>,
    /// Single-select; an empty string is treated as unset
    #[serde(default)]
    pub product_type: Option<String>,
    #[serde(default)]
    pub brands: Vec<String>,
}

impl FilterSelection {
    /// Selected product type, ignoring an empty value
    pub fn selected_product_type(&self) -> Option<&str> {
        self.product_type.as_deref().filter(|t| !t.is_empty())
    }
}

/// Total sales for one category value (store, product, brand, product type)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

/// Total sales for one calendar year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearTotal {
    pub year: i32,
    pub total: f64,
}

/// Row of the top customers table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerTotal {
    pub customer_name: String,
    pub total: f64,
    /// Total formatted for display, e.g. "1,234.56"
    pub total_display: String,
}

/// One dashboard section: either data to plot or the explicit "no data" state
///
/// `NoData` is distinct from `Ready` with an empty list: the presentation layer
/// renders it as a message instead of empty axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SectionData<T> {
    NoData { message: String },
    Ready { items: Vec<T> },
}

impl<T> SectionData<T> {
    pub fn no_data(message: &str) -> Self {
        Self::NoData {
            message: message.to_string(),
        }
    }

    pub fn ready(items: Vec<T>) -> Self {
        Self::Ready { items }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData { .. })
    }

    /// Items of a ready section, None for the sentinel
    pub fn items(&self) -> Option<&[T]> {
        match self {
            Self::Ready { items } => Some(items),
            Self::NoData { .. } => None,
        }
    }
}

/// Response for the sales overview dashboard: one field per visual
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesOverviewResponse {
    /// Line chart, ascending by year
    pub by_year: SectionData<YearTotal>,
    /// Horizontal bar chart, ascending by total
    pub by_store: SectionData<CategoryTotal>,
    /// Top 10 products, descending by total
    pub by_product: SectionData<CategoryTotal>,
    /// Top 10 customers table, descending by total
    pub by_customer: SectionData<CustomerTotal>,
    /// Pie chart
    pub by_product_type: SectionData<CategoryTotal>,
    /// Top 10 brands, descending by total
    pub by_brand: SectionData<CategoryTotal>,
}

impl SalesOverviewResponse {
    /// Response used when the filters match no sales
    pub fn no_data() -> Self {
        Self {
            by_year: SectionData::no_data(NO_DATA_MESSAGE),
            by_store: SectionData::no_data(NO_DATA_MESSAGE),
            by_product: SectionData::no_data(NO_DATA_MESSAGE),
            by_customer: SectionData::no_data(NO_CUSTOMER_DATA_MESSAGE),
            by_product_type: SectionData::no_data(NO_DATA_MESSAGE),
            by_brand: SectionData::no_data(NO_DATA_MESSAGE),
        }
    }

    pub fn is_no_data(&self) -> bool {
        self.by_year.is_no_data()
            && self.by_store.is_no_data()
            && self.by_product.is_no_data()
            && self.by_customer.is_no_data()
            && self.by_product_type.is_no_data()
            && self.by_brand.is_no_data()
    }
}

/// Query for the brand dropdown, which depends on the selected product type
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrandOptionsRequest {
    #[serde(default)]
    pub product_type: Option<String>,
}

/// Dropdown entry in the label/value shape the UI widgets expect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropdownOption {
    pub label: String,
    pub value: String,
}

impl DropdownOption {
    /// Build options where label and value are the same string
    pub fn from_values(values: Vec<String>) -> Vec<Self> {
        values
            .into_iter()
            .map(|value| Self {
                label: value.clone(),
                value,
            })
            .collect()
    }
}

/// Options for the independent dropdowns (everything except brand)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterOptionsResponse {
    pub products: Vec<DropdownOption>,
    pub stores: Vec<DropdownOption>,
    pub customers: Vec<DropdownOption>,
    pub product_types: Vec<DropdownOption>,
}
