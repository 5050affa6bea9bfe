use thiserror::Error;
use tracing::debug;

use crate::model::gene::{GeneRecord, collect_records};
use crate::model::organism::Organism;
use crate::model::table::{Table, TableError};
use crate::resolver::{
    CORE_FIELDS, INTERACTION_FIELDS, PRIMARY_FIELDS, ResolveError, Resolver, identifier_batch,
};

pub const SOURCE_PRIMARY: &str = "Source Primary Identifier";
pub const SOURCE_SECONDARY: &str = "Source Secondary Identifier";
pub const SOURCE_SYMBOL: &str = "Source Symbol";
pub const INTERACTION: &str = "Interaction";
pub const TARGET_SYMBOL: &str = "Target Symbol";
pub const TARGET_SECONDARY: &str = "Target Secondary Identifier";
pub const TARGET_PRIMARY: &str = "Target Primary Identifier";

pub const INTERACTION_COLUMNS: [&str; 7] = [
    SOURCE_PRIMARY,
    SOURCE_SECONDARY,
    SOURCE_SYMBOL,
    INTERACTION,
    TARGET_SYMBOL,
    TARGET_SECONDARY,
    TARGET_PRIMARY,
];

#[derive(Debug, Error)]
pub enum WheelError {
    #[error("resolution failed: {0}")]
    Resolve(#[from] ResolveError),
    #[error("core gene {core} did not match any {organism} gene")]
    UnresolvedCore { core: String, organism: Organism },
    #[error("core gene {core} matched {count} distinct {organism} genes")]
    AmbiguousCore {
        core: String,
        organism: Organism,
        count: usize,
    },
    #[error("{step} must run before building the table of {dataset}")]
    StepOutOfOrder { dataset: String, step: &'static str },
    #[error("table error: {0}")]
    Table(#[from] TableError),
}

/// What a user submits for one dataset.
#[derive(Debug, Clone)]
pub struct WheelInput {
    pub name: String,
    pub organism: Organism,
    pub core: String,
    pub technique: String,
    pub interactors: Vec<String>,
}

/// One interaction dataset: a core gene, a technique label and the interactors
/// reported for it.
#[derive(Debug, Clone)]
pub struct Wheel {
    name: String,
    organism: Organism,
    core_query: String,
    technique: String,
    interactors: Vec<String>,
    core: Option<GeneRecord>,
    primaries: Option<Table>,
    secondaries: Option<Table>,
    table: Option<Table>,
}

impl Wheel {
    pub fn new(input: WheelInput) -> Self {
        Self {
            name: input.name,
            organism: input.organism,
            core_query: input.core,
            technique: input.technique,
            interactors: input.interactors,
            core: None,
            primaries: None,
            secondaries: None,
            table: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn organism(&self) -> Organism {
        self.organism
    }

    pub fn technique(&self) -> &str {
        &self.technique
    }

    pub fn core(&self) -> Option<&GeneRecord> {
        self.core.as_ref()
    }

    pub fn primaries(&self) -> Option<&Table> {
        self.primaries.as_ref()
    }

    pub fn secondaries(&self) -> Option<&Table> {
        self.secondaries.as_ref()
    }

    pub fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    /// Interactors followed by the core identifier itself, deduplicated.
    pub fn identifiers(&self) -> Vec<String> {
        identifier_batch(
            self.interactors
                .iter()
                .map(String::as_str)
                .chain(std::iter::once(self.core_query.as_str())),
        )
    }

    pub fn resolve_core<R: Resolver>(&mut self, resolver: &R) -> Result<&GeneRecord, WheelError> {
        let rows = resolver.resolve(
            std::slice::from_ref(&self.core_query),
            self.organism,
            &CORE_FIELDS,
        )?;
        let mut records = collect_records(&rows);
        let core = match records.len() {
            0 => {
                return Err(WheelError::UnresolvedCore {
                    core: self.core_query.clone(),
                    organism: self.organism,
                });
            }
            1 => records.remove(0),
            count => {
                return Err(WheelError::AmbiguousCore {
                    core: self.core_query.clone(),
                    organism: self.organism,
                    count,
                });
            }
        };
        debug!(
            dataset = %self.name,
            core = %self.core_query,
            symbol = %core.symbol,
            "resolved core gene"
        );
        Ok(&*self.core.insert(core))
    }

    /// Resolves interactors and core, tagging each row with the technique.
    /// Columns: Interaction, Target Symbol, Target Secondary/Primary Identifier.
    pub fn resolve_primaries<R: Resolver>(&mut self, resolver: &R) -> Result<&Table, WheelError> {
        let rows = resolver.resolve(&self.identifiers(), self.organism, &PRIMARY_FIELDS)?;
        let mut table = Table::new(INTERACTION_COLUMNS[3..].iter().copied());
        for row in rows {
            let mut tagged = Vec::with_capacity(row.len() + 1);
            tagged.push(self.technique.clone());
            tagged.extend(row);
            table.push_row(tagged)?;
        }
        debug!(dataset = %self.name, rows = table.n_rows(), "resolved primary interactors");
        Ok(&*self.primaries.insert(table))
    }

    /// Fetches every second-degree interaction of the dataset's genes.
    pub fn fetch_secondary<R: Resolver>(&mut self, resolver: &R) -> Result<&Table, WheelError> {
        let rows = resolver.resolve(&self.identifiers(), self.organism, &INTERACTION_FIELDS)?;
        let table = Table::from_rows(INTERACTION_COLUMNS, rows)?;
        debug!(dataset = %self.name, rows = table.n_rows(), "fetched secondary interactions");
        Ok(&*self.secondaries.insert(table))
    }

    /// Pairs the core with every primary row, then appends any secondary rows.
    pub fn build_table(&mut self) -> Result<&Table, WheelError> {
        let core = self.core.as_ref().ok_or_else(|| WheelError::StepOutOfOrder {
            dataset: self.name.clone(),
            step: "resolve_core",
        })?;
        let primaries = self
            .primaries
            .as_ref()
            .ok_or_else(|| WheelError::StepOutOfOrder {
                dataset: self.name.clone(),
                step: "resolve_primaries",
            })?;

        let mut table = Table::new(INTERACTION_COLUMNS);
        for target in primaries.rows() {
            let mut row = Vec::with_capacity(INTERACTION_COLUMNS.len());
            row.push(core.primary_id.clone());
            row.push(core.secondary_id.clone());
            row.push(core.symbol.clone());
            row.extend(target.iter().cloned());
            table.push_row(row)?;
        }
        if let Some(secondaries) = &self.secondaries {
            table.append(secondaries)?;
        }
        Ok(&*self.table.insert(table))
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/wheel.rs"]
mod tests;
