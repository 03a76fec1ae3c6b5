use contracts::dashboards::d400_sales_overview::FilterSelection;

use crate::projections::p910_sales_fact::{FactTable, SaleFact};

/// Rows matching every active filter, in fact table order
///
/// Filters combine with AND; empty dimensions are ignored. Null attributes
/// never match an active filter.
pub fn apply_filters<'a>(table: &'a FactTable, selection: &FilterSelection) -> Vec<&'a SaleFact> {
    table
        .rows()
        .iter()
        .filter(|fact| matches_selection(fact, selection))
        .collect()
}

pub fn matches_selection(fact: &SaleFact, selection: &FilterSelection) -> bool {
    in_selection(fact.product_name.as_deref(), &selection.products)
        && in_selection(fact.store_name.as_deref(), &selection.stores)
        && in_selection(fact.customer_name.as_deref(), &selection.customers)
        && selection
            .selected_product_type()
            .map_or(true, |t| fact.product_type.as_deref() == Some(t))
        && in_selection(fact.brand.as_deref(), &selection.brands)
}

fn in_selection(value: Option<&str>, selected: &[String]) -> bool {
    if selected.is_empty() {
        return true;
    }
    value.map_or(false, |v| selected.iter().any(|s| s == v))
}
