pub mod manifest;

use std::path::{Path, PathBuf};
use std::{fmt, io};

use thiserror::Error;

use crate::model::table::{Table, TableError};

#[derive(Error, Debug)]
pub enum InputError {
    #[error("missing required input: {0}")]
    Missing(String),
    #[error("input file not found: {0}")]
    MissingFile(PathBuf),
    #[error("column {index} is out of range for {path} ({n_cols} columns)")]
    ColumnOutOfRange {
        path: PathBuf,
        index: usize,
        n_cols: usize,
    },
    #[error("invalid CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("unsupported gzip input without feature enabled: {0}")]
    GzipNotEnabled(PathBuf),
    #[error("table error: {0}")]
    Table(#[from] TableError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

pub fn open_reader(path: &Path) -> Result<Box<dyn io::Read>, InputError> {
    if !path.is_file() {
        return Err(InputError::MissingFile(path.to_path_buf()));
    }
    let file = std::fs::File::open(path)?;
    if path.extension().and_then(|s| s.to_str()) == Some("gz") {
        #[cfg(feature = "gz")]
        {
            let decoder = flate2::read::GzDecoder::new(file);
            return Ok(Box::new(io::BufReader::new(decoder)));
        }
        #[cfg(not(feature = "gz"))]
        {
            return Err(InputError::GzipNotEnabled(path.to_path_buf()));
        }
    }
    Ok(Box::new(io::BufReader::new(file)))
}

pub fn path_display(path: &Path) -> impl fmt::Display + '_ {
    path.to_string_lossy()
}

/// Reads a CSV file into a [`Table`]. Without a header row, columns are named
/// by position (`0`, `1`, ...). Short rows are padded with empty cells.
pub fn read_table(path: &Path, header: bool) -> Result<Table, InputError> {
    let reader = open_reader(path)?;
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    for record in csv_reader.records() {
        let record = record.map_err(|source| InputError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        records.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }

    let mut records = records.into_iter();
    let header_row = if header { records.next() } else { None };
    let body: Vec<Vec<String>> = records.collect();

    let width = body
        .iter()
        .map(Vec::len)
        .chain(header_row.as_ref().map(Vec::len))
        .max()
        .unwrap_or(0);
    let columns: Vec<String> = (0..width)
        .map(|i| match &header_row {
            Some(names) => names.get(i).cloned().unwrap_or_default(),
            None => i.to_string(),
        })
        .collect();

    let mut table = Table::new(columns);
    for mut row in body {
        row.resize(width, String::new());
        table.push_row(row)?;
    }
    Ok(table)
}

/// Concatenates the selected columns, column after column, trimming cells and
/// skipping blanks.
pub fn select_identifiers(
    table: &Table,
    columns: &[usize],
    path: &Path,
) -> Result<Vec<String>, InputError> {
    if columns.is_empty() {
        return Err(InputError::Missing(format!(
            "no identifier columns selected for {}",
            path_display(path)
        )));
    }
    let mut ids = Vec::new();
    for &index in columns {
        if index >= table.n_cols() {
            return Err(InputError::ColumnOutOfRange {
                path: path.to_path_buf(),
                index,
                n_cols: table.n_cols(),
            });
        }
        ids.extend(
            table
                .column(index)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string),
        );
    }
    Ok(ids)
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/mod.rs"]
mod tests;
