use contracts::dashboards::d400_sales_overview::{
    CategoryTotal, CustomerTotal, DropdownOption, FilterOptionsResponse, FilterSelection,
    SalesOverviewResponse, SectionData, YearTotal,
};
use std::collections::{BTreeMap, BTreeSet, HashSet};

use super::filter::apply_filters;
use crate::projections::p910_sales_fact::{FactTable, SaleFact};
use crate::shared::format::format_money;

/// Number of entries kept by the ranking charts
pub const TOP_N: usize = 10;

/// Compute all six dashboard sections for the given filters
///
/// When no row matches, every section is the "no data" sentinel.
pub fn build_sales_overview(table: &FactTable, selection: &FilterSelection) -> SalesOverviewResponse {
    let rows = apply_filters(table, selection);

    if rows.is_empty() {
        return SalesOverviewResponse::no_data();
    }

    SalesOverviewResponse {
        by_year: SectionData::ready(sales_by_year(&rows)),
        by_store: SectionData::ready(sales_by_store(&rows)),
        by_product: SectionData::ready(top_products(&rows)),
        by_customer: SectionData::ready(top_customers(&rows)),
        by_product_type: SectionData::ready(sales_by_product_type(&rows)),
        by_brand: SectionData::ready(top_brands(&rows)),
    }
}

/// Yearly totals, ascending by year
pub fn sales_by_year(rows: &[&SaleFact]) -> Vec<YearTotal> {
    sum_by(rows, |f| Some(f.sale_year))
        .into_iter()
        .map(|(year, total)| YearTotal { year, total })
        .collect()
}

/// Store totals, ascending by total (smallest bar first)
pub fn sales_by_store(rows: &[&SaleFact]) -> Vec<CategoryTotal> {
    let mut totals = sum_by(rows, |f| f.store_name.as_deref());
    totals.sort_by(|a, b| a.1.total_cmp(&b.1));
    to_category_totals(totals)
}

/// Top products by total, descending
pub fn top_products(rows: &[&SaleFact]) -> Vec<CategoryTotal> {
    to_category_totals(top_n(sum_by(rows, |f| f.product_name.as_deref())))
}

/// Top customers by total, descending, with display-formatted totals
pub fn top_customers(rows: &[&SaleFact]) -> Vec<CustomerTotal> {
    top_n(sum_by(rows, |f| f.customer_name.as_deref()))
        .into_iter()
        .map(|(name, total)| CustomerTotal {
            customer_name: name.to_string(),
            total,
            total_display: format_money(total),
        })
        .collect()
}

/// Totals per product type, ascending by type name
pub fn sales_by_product_type(rows: &[&SaleFact]) -> Vec<CategoryTotal> {
    to_category_totals(sum_by(rows, |f| f.product_type.as_deref()))
}

/// Top brands by total, descending
pub fn top_brands(rows: &[&SaleFact]) -> Vec<CategoryTotal> {
    to_category_totals(top_n(sum_by(rows, |f| f.brand.as_deref())))
}

/// Brands available for the selected product type
///
/// Always computed from the full table so that other filters never narrow
/// the list. Empty when no product type is selected.
pub fn brand_options_for(table: &FactTable, product_type: Option<&str>) -> Vec<String> {
    let Some(product_type) = product_type.filter(|t| !t.is_empty()) else {
        return Vec::new();
    };

    table
        .rows()
        .iter()
        .filter(|f| f.product_type.as_deref() == Some(product_type))
        .filter_map(|f| f.brand.as_deref())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Options for the product, store, customer and product type dropdowns
pub fn filter_options(table: &FactTable) -> FilterOptionsResponse {
    let rows = table.rows();
    FilterOptionsResponse {
        products: DropdownOption::from_values(distinct_in_order(
            rows.iter().map(|f| f.product_name.as_deref()),
        )),
        stores: DropdownOption::from_values(distinct_in_order(
            rows.iter().map(|f| f.store_name.as_deref()),
        )),
        customers: DropdownOption::from_values(distinct_in_order(
            rows.iter().map(|f| f.customer_name.as_deref()),
        )),
        product_types: DropdownOption::from_values(distinct_in_order(
            rows.iter().map(|f| f.product_type.as_deref()),
        )),
    }
}

/// Sum total value per key, in ascending key order
///
/// Rows without a key are skipped; null totals count as zero.
fn sum_by<'a, K: Ord>(
    rows: &[&'a SaleFact],
    key: impl Fn(&'a SaleFact) -> Option<K>,
) -> Vec<(K, f64)> {
    let mut totals: BTreeMap<K, f64> = BTreeMap::new();
    for &fact in rows {
        if let Some(k) = key(fact) {
            *totals.entry(k).or_insert(0.0) += fact.total_value.unwrap_or(0.0);
        }
    }
    totals.into_iter().collect()
}

/// Stable descending sort by total, cut to TOP_N
fn top_n<K>(mut totals: Vec<(K, f64)>) -> Vec<(K, f64)> {
    totals.sort_by(|a, b| b.1.total_cmp(&a.1));
    totals.truncate(TOP_N);
    totals
}

fn to_category_totals(totals: Vec<(&str, f64)>) -> Vec<CategoryTotal> {
    totals
        .into_iter()
        .map(|(category, total)| CategoryTotal {
            category: category.to_string(),
            total,
        })
        .collect()
}

fn distinct_in_order<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .flatten()
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}
