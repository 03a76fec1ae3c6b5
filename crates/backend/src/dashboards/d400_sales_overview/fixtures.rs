use chrono::NaiveDate;

use crate::projections::p910_sales_fact::{FactTable, SaleFact};

/// Sale with every reference attribute present
pub fn sale(
    year: i32,
    store: &str,
    product: &str,
    product_type: &str,
    brand: &str,
    customer: &str,
    quantity: i64,
    unit_price: f64,
) -> SaleFact {
    SaleFact {
        sale_date: NaiveDate::from_ymd_opt(year, 6, 1).unwrap(),
        sale_year: year,
        product_id: Some(format!("id-{product}")),
        store_id: Some(format!("id-{store}")),
        customer_id: Some(format!("id-{customer}")),
        quantity,
        product_name: Some(product.to_string()),
        product_type: Some(product_type.to_string()),
        brand: Some(brand.to_string()),
        unit_price: Some(unit_price),
        store_name: Some(store.to_string()),
        customer_name: Some(customer.to_string()),
        total_value: Some(quantity as f64 * unit_price),
    }
}

/// The two-row table from the dashboard examples
pub fn two_rows() -> FactTable {
    FactTable::new(vec![
        sale(2021, "A", "Widget", "Tools", "Acme", "Bob", 2, 10.0),
        sale(2021, "B", "Gadget", "Tools", "Acme", "Bob", 1, 5.0),
    ])
}

/// Several years, types and brands
pub fn mixed() -> FactTable {
    FactTable::new(vec![
        sale(2020, "Centro", "Notebook", "Eletrônicos", "Dell", "Ana Souza", 1, 3500.0),
        sale(2021, "Centro", "Celular", "Eletrônicos", "Samsung", "Bruno Lima", 2, 1800.0),
        sale(2021, "Norte", "Fone", "Eletrônicos", "JBL", "Ana Souza", 3, 200.0),
        sale(2022, "Norte", "Camisa", "Vestuário", "Hering", "Carla Dias", 5, 60.0),
        sale(2022, "Sul", "Tênis", "Calçados", "Nike", "Bruno Lima", 1, 450.0),
        sale(2022, "Sul", "Celular", "Eletrônicos", "Apple", "Carla Dias", 1, 5200.0),
    ])
}
