use std::collections::{BTreeSet, HashMap};

use thiserror::Error;
use tracing::debug;

use crate::model::gene::{GeneRecord, collect_records};
use crate::model::organism::Organism;
use crate::model::table::{Table, TableError};
use crate::pipeline::wheel::{SOURCE_PRIMARY, TARGET_PRIMARY};
use crate::resolver::{NODE_FIELDS, ResolveError, Resolver, identifier_batch};

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("network table is missing a column: {0}")]
    Table(#[from] TableError),
    #[error("resolution failed: {0}")]
    Resolve(#[from] ResolveError),
}

/// Genes referenced by a network, one entry per canonical symbol, each with
/// every synonym the service reported.
#[derive(Debug, Clone, Default)]
pub struct NodeTable {
    genes: Vec<GeneRecord>,
    index_by_symbol: HashMap<String, usize>,
}

impl NodeTable {
    /// Resolves the union of source and target primary identifiers of a
    /// network table.
    pub fn from_network<R: Resolver>(
        network: &Table,
        organism: Organism,
        resolver: &R,
    ) -> Result<Self, NodeError> {
        let source = network.require_column(SOURCE_PRIMARY)?;
        let target = network.require_column(TARGET_PRIMARY)?;
        let ids = identifier_batch(network.column(source).chain(network.column(target)));
        if ids.is_empty() {
            return Ok(Self::default());
        }
        let rows = resolver.resolve(&ids, organism, &NODE_FIELDS)?;
        let nodes = Self::from_records(collect_records(&rows));
        debug!(ids = ids.len(), nodes = nodes.len(), "built node table");
        Ok(nodes)
    }

    /// Groups records by canonical symbol, merging synonyms of records that
    /// share one.
    pub fn from_records(records: Vec<GeneRecord>) -> Self {
        let mut table = Self::default();
        for record in records {
            match table.index_by_symbol.get(&record.symbol) {
                Some(&idx) => table.genes[idx].synonyms.extend(record.synonyms),
                None => {
                    table
                        .index_by_symbol
                        .insert(record.symbol.clone(), table.genes.len());
                    table.genes.push(record);
                }
            }
        }
        table
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn genes(&self) -> &[GeneRecord] {
        &self.genes
    }

    /// Canonical symbols in first-seen order.
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.genes.iter().map(|g| g.symbol.as_str())
    }

    pub fn get(&self, symbol: &str) -> Option<&GeneRecord> {
        self.index_by_symbol.get(symbol).map(|&i| &self.genes[i])
    }

    /// True if `value` is a symbol or synonym of any node.
    pub fn recognizes(&self, value: &str) -> bool {
        self.genes.iter().any(|g| g.answers_to(value))
    }

    pub fn synonyms(&self, symbol: &str) -> Option<&BTreeSet<String>> {
        self.get(symbol).map(|g| &g.synonyms)
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/nodes.rs"]
mod tests;
