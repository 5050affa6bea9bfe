use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::model::table::Table;
use crate::pipeline::attributes::MAPPING_KEY;
use crate::report::ReportError;

/// Writes the interaction table as-is, no index column.
pub fn write_network(path: &Path, table: &Table) -> Result<(), ReportError> {
    let writer = BufWriter::new(File::create(path)?);
    table.write_csv(writer)?;
    Ok(())
}

/// Writes the annotated table with `Mapping Key` as the leading index column.
pub fn write_attributes(path: &Path, table: &Table) -> Result<(), ReportError> {
    if table.columns().first().map(String::as_str) != Some(MAPPING_KEY) {
        return Err(ReportError::MissingIndex(MAPPING_KEY));
    }
    let writer = BufWriter::new(File::create(path)?);
    table.write_csv(writer)?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/export.rs"]
mod tests;
