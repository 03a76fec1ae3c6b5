use thiserror::Error;

/// Errors raised while loading and unifying the sales sources
///
/// All of them are fatal: the dashboard cannot serve requests until the
/// fact table has been built.
#[derive(Debug, Error)]
pub enum UnifyError {
    #[error("schema mismatch in {source_name}: expected columns {expected:?}, found {found:?}")]
    SchemaMismatch {
        source_name: String,
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("cannot parse date {value:?} in column '{column}' of {table}, row {row}")]
    DateParse {
        table: String,
        column: String,
        row: usize,
        value: String,
    },

    #[error("duplicate key {key:?} in column '{column}' of {table}")]
    DuplicateKey {
        table: String,
        column: String,
        key: String,
    },

    #[error("column '{column}' not found in {table}")]
    MissingColumn { table: String, column: String },

    #[error("invalid number {value:?} in column '{column}' of {table}, row {row}")]
    InvalidNumber {
        table: String,
        column: String,
        row: usize,
        value: String,
    },

    #[error("missing value in column '{column}' of {table}, row {row}")]
    MissingValue {
        table: String,
        column: String,
        row: usize,
    },

    #[error("delimiter must be a single ASCII character, got {delimiter:?}")]
    InvalidDelimiter { delimiter: String },

    #[error("{table}, line {line}: expected at most {expected} fields, found {found}")]
    TooManyFields {
        table: String,
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("failed to read {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
}

pub type UnifyResult<T> = Result<T, UnifyError>;
