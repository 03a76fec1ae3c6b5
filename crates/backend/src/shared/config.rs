use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::shared::data::error::{UnifyError, UnifyResult};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub data: DataConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory with the built presentation layer, served as fallback
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

fn default_port() -> u16 {
    3000
}

fn default_static_dir() -> String {
    "dist".to_string()
}

fn default_delimiter() -> String {
    ";".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataConfig {
    pub directory: String,
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    /// Sales files in load order (one per year)
    pub sales_files: Vec<String>,
    pub products_file: String,
    pub stores_file: String,
    pub customers_file: String,
    #[serde(default)]
    pub rename: RenameConfig,
}

/// Source header -> canonical column name, per source kind
#[derive(Debug, Deserialize, Clone, Default)]
pub struct RenameConfig {
    #[serde(default)]
    pub sales: BTreeMap<String, String>,
    #[serde(default)]
    pub products: BTreeMap<String, String>,
    #[serde(default)]
    pub stores: BTreeMap<String, String>,
    #[serde(default)]
    pub customers: BTreeMap<String, String>,
}

impl DataConfig {
    /// Delimiter as a single byte
    pub fn delimiter_byte(&self) -> UnifyResult<u8> {
        match self.delimiter.as_bytes() {
            [b] if b.is_ascii() => Ok(*b),
            _ => Err(UnifyError::InvalidDelimiter {
                delimiter: self.delimiter.clone(),
            }),
        }
    }

    pub fn sales_paths(&self) -> Vec<PathBuf> {
        let dir = resolve_data_dir(&self.directory);
        self.sales_files.iter().map(|f| dir.join(f)).collect()
    }

    pub fn products_path(&self) -> PathBuf {
        resolve_data_dir(&self.directory).join(&self.products_file)
    }

    pub fn stores_path(&self) -> PathBuf {
        resolve_data_dir(&self.directory).join(&self.stores_file)
    }

    pub fn customers_path(&self) -> PathBuf {
        resolve_data_dir(&self.directory).join(&self.customers_file)
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
port = 3000
static_dir = "dist"

[data]
directory = "data"
delimiter = ";"
sales_files = ["Base Vendas - 2020.csv", "Base Vendas - 2021.csv", "Base Vendas - 2022.csv"]
products_file = "Cadastro Produtos.csv"
stores_file = "Cadastro Lojas.csv"
customers_file = "Cadastro Clientes.csv"

[data.rename.sales]
"Data da Venda" = "Sale Date"
"SKU" = "Product ID"
"ID Loja" = "Store ID"
"ID Cliente" = "Customer ID"
"Qtd Vendida" = "Quantity"

[data.rename.products]
"SKU" = "Product ID"
"Produto" = "Product Name"
"Tipo do Produto" = "Product Type"
"Marca" = "Brand"
"Preço Unitario" = "Unit Price"

[data.rename.stores]
"ID Loja" = "Store ID"
"Nome da Loja" = "Store Name"

[data.rename.customers]
"ID Cliente" = "Customer ID"
"Primeiro Nome" = "First Name"
"Sobrenome" = "Last Name"
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    // Try to find config.toml next to the executable
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                return parse_config(&contents)
                    .map_err(|e| anyhow::anyhow!("{}: {}", config_path.display(), e));
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    // Fall back to default config
    tracing::info!("Using default embedded configuration");
    parse_config(DEFAULT_CONFIG)
}

/// Parse and validate a configuration document
pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let config: Config = toml::from_str(contents)?;
    config.data.delimiter_byte()?;
    Ok(config)
}

pub fn resolve_data_dir(directory: &str) -> PathBuf {
    let dir = Path::new(directory);

    if dir.is_absolute() {
        return dir.to_path_buf();
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let resolved = exe_dir.join(dir);
            if resolved.is_dir() {
                return resolved;
            }
        }
    }

    PathBuf::from(directory)
}
