use std::collections::{HashMap, HashSet};

use thiserror::Error;
use tracing::debug;

use crate::model::organism::Organism;
use crate::model::table::{JoinKind, Table, TableError};
use crate::pipeline::nodes::NodeTable;
use crate::resolver::{ResolveError, Resolver, SYMBOL_FIELDS, SYNONYM_FIELDS, identifier_batch};

pub const MAPPING_KEY: &str = "Mapping Key";

#[derive(Debug, Error)]
pub enum AttributeError {
    #[error("mapping key column {index} is out of range ({n_cols} columns)")]
    MappingKeyOutOfRange { index: usize, n_cols: usize },
    #[error("resolution failed: {0}")]
    Resolve(#[from] ResolveError),
    #[error("table error: {0}")]
    Table(#[from] TableError),
}

/// A column of genes that share one property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListColumn {
    pub name: String,
    pub identifiers: Vec<String>,
}

/// A submitted attribute table, already named and trimmed to its used columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeTable {
    List(Vec<ListColumn>),
    /// First column is `Mapping Key`, the rest carry values.
    DiscreteContinuous(Table),
}

/// Names columns by position: explicit `names` first, then the header name
/// when the file had one, otherwise blank.
fn apply_names(raw: &mut Table, header: bool, names: &[String]) {
    for idx in 0..raw.n_cols() {
        let name = match names.get(idx) {
            Some(name) => name.trim().to_string(),
            None if header => raw.columns()[idx].clone(),
            None => String::new(),
        };
        raw.rename_column(idx, name);
    }
}

impl AttributeTable {
    /// Blank-named columns are dropped.
    pub fn list(mut raw: Table, header: bool, names: &[String]) -> Self {
        apply_names(&mut raw, header, names);
        raw.retain_columns(|_, name| !name.is_empty());
        let columns = raw
            .columns()
            .iter()
            .enumerate()
            .map(|(idx, name)| ListColumn {
                name: name.clone(),
                identifiers: raw
                    .column(idx)
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(str::to_string)
                    .collect(),
            })
            .collect();
        AttributeTable::List(columns)
    }

    /// Column `mapping_key` becomes `Mapping Key` and moves first; other
    /// blank-named columns are dropped.
    pub fn discrete_continuous(
        mut raw: Table,
        header: bool,
        names: &[String],
        mapping_key: usize,
    ) -> Result<Self, AttributeError> {
        if mapping_key >= raw.n_cols() {
            return Err(AttributeError::MappingKeyOutOfRange {
                index: mapping_key,
                n_cols: raw.n_cols(),
            });
        }
        apply_names(&mut raw, header, names);
        raw.rename_column(mapping_key, MAPPING_KEY);
        raw.retain_columns(|idx, name| {
            idx == mapping_key || (!name.is_empty() && name != MAPPING_KEY)
        });

        let key = raw.require_column(MAPPING_KEY)?;
        let mut columns = vec![MAPPING_KEY.to_string()];
        columns.extend(
            raw.columns()
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != key)
                .map(|(_, c)| c.clone()),
        );
        let mut table = Table::new(columns);
        for row in raw.rows() {
            let mut reordered = vec![row[key].trim().to_string()];
            reordered.extend(
                row.iter()
                    .enumerate()
                    .filter(|(i, _)| *i != key)
                    .map(|(_, v)| v.clone()),
            );
            table.push_row(reordered)?;
        }
        Ok(AttributeTable::DiscreteContinuous(table))
    }

    /// Number of attribute columns the table contributes.
    pub fn width(&self) -> usize {
        match self {
            AttributeTable::List(columns) => columns.len(),
            AttributeTable::DiscreteContinuous(table) => table.n_cols().saturating_sub(1),
        }
    }
}

/// One list attribute after resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListAttribute {
    pub name: String,
    /// Canonical symbols the service returned for the column.
    pub symbols: HashSet<String>,
    /// The column's identifiers as submitted.
    pub identifiers: HashSet<String>,
}

impl ListAttribute {
    pub fn contains(&self, nodes: &NodeTable, symbol: &str) -> bool {
        if self.symbols.contains(symbol) {
            return true;
        }
        nodes
            .synonyms(symbol)
            .is_some_and(|synonyms| synonyms.iter().any(|s| self.identifiers.contains(s)))
    }
}

/// Synonym to canonical symbol, with every symbol mapping to itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SynonymTable {
    pairs: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl SynonymTable {
    /// Builds from `(synonym, symbol)` rows: the rows first, then every symbol
    /// paired with itself, keeping the first pair per synonym.
    pub fn from_pairs<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let rows: Vec<(String, String)> = rows.into_iter().collect();
        let identity: Vec<(String, String)> = rows
            .iter()
            .map(|(_, symbol)| (symbol.clone(), symbol.clone()))
            .collect();
        let mut table = Self::default();
        for (synonym, symbol) in rows.into_iter().chain(identity) {
            if synonym.is_empty() || table.index.contains_key(&synonym) {
                continue;
            }
            table.index.insert(synonym.clone(), table.pairs.len());
            table.pairs.push((synonym, symbol));
        }
        table
    }

    pub fn canonical(&self, synonym: &str) -> Option<&str> {
        self.index
            .get(synonym)
            .map(|&i| self.pairs[i].1.as_str())
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Resolves mapping-key values to `(synonym, symbol)` pairs and expands them
/// into a [`SynonymTable`].
pub fn expand_synonyms<R: Resolver>(
    keys: &[String],
    organism: Organism,
    resolver: &R,
) -> Result<SynonymTable, AttributeError> {
    if keys.is_empty() {
        return Ok(SynonymTable::default());
    }
    let rows = resolver.resolve(keys, organism, &SYNONYM_FIELDS)?;
    Ok(SynonymTable::from_pairs(rows.into_iter().filter_map(
        |row| match <[String; 2]>::try_from(row) {
            Ok([synonym, symbol]) => Some((synonym, symbol)),
            Err(_) => None,
        },
    )))
}

/// What a single submission contributed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    List { columns: Vec<String> },
    DiscreteContinuous { kept_rows: usize, dropped_rows: usize },
}

/// Accumulates attribute submissions against one node table.
#[derive(Debug, Clone)]
pub struct AttributeMerger {
    lists: Vec<ListAttribute>,
    measures: Table,
}

impl Default for AttributeMerger {
    fn default() -> Self {
        Self {
            lists: Vec::new(),
            measures: Table::new([MAPPING_KEY]),
        }
    }
}

impl AttributeMerger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lists(&self) -> &[ListAttribute] {
        &self.lists
    }

    /// Discrete/continuous values merged so far, keyed by `Mapping Key`.
    pub fn measures(&self) -> &Table {
        &self.measures
    }

    pub fn submit<R: Resolver>(
        &mut self,
        attribute: AttributeTable,
        nodes: &NodeTable,
        organism: Organism,
        resolver: &R,
    ) -> Result<SubmitOutcome, AttributeError> {
        match attribute {
            AttributeTable::List(columns) => self.add_lists(columns, organism, resolver),
            AttributeTable::DiscreteContinuous(table) => {
                self.add_measures(table, nodes, organism, resolver)
            }
        }
    }

    fn add_lists<R: Resolver>(
        &mut self,
        columns: Vec<ListColumn>,
        organism: Organism,
        resolver: &R,
    ) -> Result<SubmitOutcome, AttributeError> {
        let mut names = Vec::with_capacity(columns.len());
        for column in columns {
            let batch = identifier_batch(column.identifiers.iter().map(String::as_str));
            let symbols: HashSet<String> = if batch.is_empty() {
                HashSet::new()
            } else {
                resolver
                    .resolve(&batch, organism, &SYMBOL_FIELDS)?
                    .into_iter()
                    .filter_map(|row| row.into_iter().next())
                    .filter(|s| !s.is_empty())
                    .collect()
            };
            debug!(
                attribute = %column.name,
                identifiers = batch.len(),
                symbols = symbols.len(),
                "resolved list attribute"
            );
            names.push(column.name.clone());
            self.lists.push(ListAttribute {
                name: column.name,
                symbols,
                identifiers: batch.into_iter().collect(),
            });
        }
        Ok(SubmitOutcome::List { columns: names })
    }

    fn add_measures<R: Resolver>(
        &mut self,
        mut table: Table,
        nodes: &NodeTable,
        organism: Organism,
        resolver: &R,
    ) -> Result<SubmitOutcome, AttributeError> {
        let key = table.require_column(MAPPING_KEY)?;
        let submitted = table.n_rows();
        table.retain_rows(|row| nodes.recognizes(&row[key]));

        let keys = identifier_batch(table.column(key));
        let synonyms = expand_synonyms(&keys, organism, resolver)?;

        let mut translated = Table::new(table.columns().iter().cloned());
        let mut untranslated = 0usize;
        for row in table.rows() {
            match synonyms.canonical(&row[key]) {
                Some(symbol) => {
                    let mut row = row.clone();
                    row[key] = symbol.to_string();
                    translated.push_row(row)?;
                }
                None => untranslated += 1,
            }
        }
        let kept_rows = translated.n_rows();
        debug!(
            submitted,
            kept_rows,
            unrecognized = submitted - table.n_rows(),
            untranslated,
            "filtered discrete/continuous attribute"
        );

        self.measures = self.measures.merge(&translated, MAPPING_KEY, JoinKind::Outer)?;
        Ok(SubmitOutcome::DiscreteContinuous {
            kept_rows,
            dropped_rows: submitted - kept_rows,
        })
    }

    /// One row per node symbol: accumulated values left-joined on
    /// `Mapping Key`, then one `True`/`False` column per list attribute.
    pub fn make_attribute_table(&self, nodes: &NodeTable) -> Result<Table, AttributeError> {
        let mut output = Table::new([MAPPING_KEY]);
        for symbol in nodes.symbols() {
            output.push_row(vec![symbol.to_string()])?;
        }
        if !self.measures.is_empty() {
            output = output.merge(&self.measures, MAPPING_KEY, JoinKind::Left)?;
        }
        let key = output.require_column(MAPPING_KEY)?;
        for list in &self.lists {
            let flags = output
                .column(key)
                .map(|symbol| bool_cell(list.contains(nodes, symbol)))
                .collect();
            output.push_column(list.name.clone(), flags)?;
        }
        Ok(output)
    }
}

fn bool_cell(value: bool) -> String {
    let cell = if value { "True" } else { "False" };
    cell.to_string()
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/attributes.rs"]
mod tests;
