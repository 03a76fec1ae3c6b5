use axum::{extract::Query, http::StatusCode, Json};
use contracts::dashboards::d400_sales_overview::{
    BrandOptionsRequest, DropdownOption, FilterOptionsResponse, FilterSelection,
    SalesOverviewResponse,
};

use crate::dashboards::d400_sales_overview::service;
use crate::projections::p910_sales_fact::repository::get_fact_table;

/// POST /api/d400/sales_overview
pub async fn get_sales_overview(
    Json(selection): Json<FilterSelection>,
) -> Result<Json<SalesOverviewResponse>, StatusCode> {
    tracing::info!(
        "D400 Dashboard: filters products={} stores={} customers={} type={:?} brands={}",
        selection.products.len(),
        selection.stores.len(),
        selection.customers.len(),
        selection.selected_product_type(),
        selection.brands.len()
    );

    match get_fact_table() {
        Ok(table) => {
            let response = service::build_sales_overview(table, &selection);
            if response.is_no_data() {
                tracing::info!("D400 Dashboard: no rows match the selected filters");
            }
            Ok(Json(response))
        }
        Err(e) => {
            tracing::error!("D400 Dashboard: Failed to build sales overview: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// GET /api/d400/brand_options?product_type=Eletrônicos
pub async fn get_brand_options(
    Query(request): Query<BrandOptionsRequest>,
) -> Result<Json<Vec<DropdownOption>>, StatusCode> {
    match get_fact_table() {
        Ok(table) => {
            let brands = service::brand_options_for(table, request.product_type.as_deref());
            tracing::info!(
                "D400 Dashboard: {} brands for product type {:?}",
                brands.len(),
                request.product_type
            );
            Ok(Json(DropdownOption::from_values(brands)))
        }
        Err(e) => {
            tracing::error!("D400 Dashboard: Failed to get brand options: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// GET /api/d400/filter_options
pub async fn get_filter_options() -> Result<Json<FilterOptionsResponse>, StatusCode> {
    match get_fact_table() {
        Ok(table) => Ok(Json(service::filter_options(table))),
        Err(e) => {
            tracing::error!("D400 Dashboard: Failed to get filter options: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
