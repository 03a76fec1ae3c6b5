use std::io::Read;
use std::path::Path;

use super::error::{UnifyError, UnifyResult};
use super::table::{CellValue, Table};

/// Read a delimited file with a header row into a text table
///
/// The table is named after the file name. Blank fields load as Null.
pub fn load_table(path: &Path, delimiter: u8) -> UnifyResult<Table> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let file = std::fs::File::open(path).map_err(|e| UnifyError::Csv {
        path: path.display().to_string(),
        source: csv::Error::from(e),
    })?;

    let table = read_table(&name, file, delimiter).map_err(|e| match e {
        UnifyError::Csv { source, .. } => UnifyError::Csv {
            path: path.display().to_string(),
            source,
        },
        other => other,
    })?;

    tracing::info!(
        "Loaded {}: {} rows, columns {:?}",
        name,
        table.row_count(),
        table.columns()
    );

    Ok(table)
}

/// Parse delimited text from any reader
///
/// Short records are padded with Null; a record with more fields than the
/// header fails with `TooManyFields`.
pub fn read_table<R: Read>(name: &str, reader: R, delimiter: u8) -> UnifyResult<Table> {
    let csv_error = |source| UnifyError::Csv {
        path: name.to_string(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let h = h.trim();
            // Strip UTF-8 BOM if present
            if i == 0 {
                h.trim_start_matches('\u{FEFF}').to_string()
            } else {
                h.to_string()
            }
        })
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        if record.len() > headers.len() {
            return Err(UnifyError::TooManyFields {
                table: name.to_string(),
                line: record.position().map_or(0, |p| p.line()),
                expected: headers.len(),
                found: record.len(),
            });
        }
        rows.push(record.iter().map(CellValue::from_field).collect());
    }

    Ok(Table::new(name, headers, rows))
}
