use once_cell::sync::OnceCell;

use super::fact::FactTable;
use super::unifier;
use crate::shared::config::DataConfig;

static FACT_TABLE: OnceCell<FactTable> = OnceCell::new();

/// Build the fact table from the configured sources and publish it
///
/// Must complete before the server starts accepting requests.
pub fn initialize_fact_table(config: &DataConfig) -> anyhow::Result<&'static FactTable> {
    let table = unifier::build_fact_table(config)?;
    FACT_TABLE
        .set(table)
        .map_err(|_| anyhow::anyhow!("fact table is already initialized"))?;
    get_fact_table()
}

pub fn get_fact_table() -> anyhow::Result<&'static FactTable> {
    FACT_TABLE
        .get()
        .ok_or_else(|| anyhow::anyhow!("fact table has not been initialized"))
}
