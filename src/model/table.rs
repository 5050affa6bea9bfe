use std::collections::{HashMap, HashSet};
use std::io::Write;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("row has {found} cells, table has {expected} columns")]
    RowWidth { expected: usize, found: usize },
    #[error("column sets differ: {left:?} vs {right:?}")]
    ColumnMismatch {
        left: Vec<String>,
        right: Vec<String>,
    },
    #[error("no such column: {0}")]
    MissingColumn(String),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    /// Every left row, matched where possible.
    Left,
    /// Every row from both sides.
    Outer,
}

/// Row-oriented table of string cells with named, ordered columns.
/// Missing values are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn from_rows<S: Into<String>>(
        columns: impl IntoIterator<Item = S>,
        rows: Vec<Vec<String>>,
    ) -> Result<Self, TableError> {
        let mut table = Self::new(columns);
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn push_row(&mut self, row: Vec<String>) -> Result<(), TableError> {
        if row.len() != self.columns.len() {
            return Err(TableError::RowWidth {
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn require_column(&self, name: &str) -> Result<usize, TableError> {
        self.column_index(name)
            .ok_or_else(|| TableError::MissingColumn(name.to_string()))
    }

    pub fn column(&self, idx: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(move |r| r.get(idx).map(String::as_str).unwrap_or(""))
    }

    pub fn rename_column(&mut self, idx: usize, name: impl Into<String>) {
        if let Some(slot) = self.columns.get_mut(idx) {
            *slot = name.into();
        }
    }

    /// Keeps the columns whose index satisfies `keep`, in order.
    pub fn retain_columns<F>(&mut self, mut keep: F)
    where
        F: FnMut(usize, &str) -> bool,
    {
        let kept: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .filter(|(i, name)| keep(*i, name))
            .map(|(i, _)| i)
            .collect();
        self.columns = kept.iter().map(|&i| self.columns[i].clone()).collect();
        for row in &mut self.rows {
            *row = kept.iter().map(|&i| row[i].clone()).collect();
        }
    }

    pub fn retain_rows<F>(&mut self, keep: F)
    where
        F: FnMut(&Vec<String>) -> bool,
    {
        self.rows.retain(keep);
    }

    /// Appends a column; `values` must have one cell per row.
    pub fn push_column(
        &mut self,
        name: impl Into<String>,
        values: Vec<String>,
    ) -> Result<(), TableError> {
        if values.len() != self.rows.len() {
            return Err(TableError::RowWidth {
                expected: self.rows.len(),
                found: values.len(),
            });
        }
        self.columns.push(name.into());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
        Ok(())
    }

    /// Appends `other`'s rows beneath this table's. Columns must match by name
    /// and order.
    pub fn append(&mut self, other: &Table) -> Result<(), TableError> {
        if self.columns != other.columns {
            return Err(TableError::ColumnMismatch {
                left: self.columns.clone(),
                right: other.columns.clone(),
            });
        }
        self.rows.extend(other.rows.iter().cloned());
        Ok(())
    }

    /// Joins `right` onto this table on the key column `on`. The result starts
    /// with the key, then this table's other columns, then `right`'s. Non-key
    /// names present on both sides get `_x` / `_y` suffixes. Many-to-many
    /// matches expand to every pairing; unmatched cells are empty.
    pub fn merge(&self, right: &Table, on: &str, how: JoinKind) -> Result<Table, TableError> {
        let left_key = self.require_column(on)?;
        let right_key = right.require_column(on)?;
        let left_others: Vec<usize> = (0..self.n_cols()).filter(|&i| i != left_key).collect();
        let right_others: Vec<usize> = (0..right.n_cols()).filter(|&i| i != right_key).collect();

        let overlap: HashSet<&str> = left_others
            .iter()
            .map(|&i| self.columns[i].as_str())
            .filter(|name| {
                right_others
                    .iter()
                    .any(|&j| right.columns[j].as_str() == *name)
            })
            .collect();
        let suffixed = |name: &str, suffix: &str| {
            if overlap.contains(name) {
                format!("{name}{suffix}")
            } else {
                name.to_string()
            }
        };

        let mut columns = vec![on.to_string()];
        columns.extend(left_others.iter().map(|&i| suffixed(&self.columns[i], "_x")));
        columns.extend(right_others.iter().map(|&j| suffixed(&right.columns[j], "_y")));
        let mut out = Table::new(columns);

        let mut right_index: HashMap<&str, Vec<usize>> = HashMap::new();
        for (idx, row) in right.rows.iter().enumerate() {
            right_index.entry(row[right_key].as_str()).or_default().push(idx);
        }
        let mut right_matched = vec![false; right.n_rows()];

        for row in &self.rows {
            let key = row[left_key].as_str();
            let left_cells = left_others.iter().map(|&i| row[i].clone());
            match right_index.get(key) {
                Some(matches) => {
                    for &ridx in matches {
                        right_matched[ridx] = true;
                        let other = &right.rows[ridx];
                        let mut joined = vec![key.to_string()];
                        joined.extend(left_cells.clone());
                        joined.extend(right_others.iter().map(|&j| other[j].clone()));
                        out.push_row(joined)?;
                    }
                }
                None => {
                    let mut joined = vec![key.to_string()];
                    joined.extend(left_cells);
                    joined.extend(right_others.iter().map(|_| String::new()));
                    out.push_row(joined)?;
                }
            }
        }

        if how == JoinKind::Outer {
            for (ridx, other) in right.rows.iter().enumerate() {
                if right_matched[ridx] {
                    continue;
                }
                let mut joined = vec![other[right_key].clone()];
                joined.extend(left_others.iter().map(|_| String::new()));
                joined.extend(right_others.iter().map(|&j| other[j].clone()));
                out.push_row(joined)?;
            }
        }
        Ok(out)
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), TableError> {
        let mut out = csv::Writer::from_writer(writer);
        out.write_record(&self.columns)?;
        for row in &self.rows {
            out.write_record(row)?;
        }
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/table.rs"]
mod tests;
