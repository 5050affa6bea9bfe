use std::time::Instant;

use thiserror::Error;
use tracing::{info, warn};

use crate::model::organism::Organism;
use crate::model::table::{Table, TableError};
use crate::pipeline::wheel::{INTERACTION_COLUMNS, Wheel, WheelError};
use crate::resolver::{INTERACTION_FIELDS, ResolveError, Resolver};

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("dataset {dataset}: {source}")]
    Wheel {
        dataset: String,
        #[source]
        source: WheelError,
    },
    #[error("dataset {dataset} uses {found}, but the network is for {expected}")]
    OrganismMismatch {
        dataset: String,
        expected: Organism,
        found: Organism,
    },
    #[error("no datasets were submitted")]
    NoDatasets,
    #[error("interaction probe failed: {0}")]
    Probe(#[from] ResolveError),
    #[error("table error: {0}")]
    Table(#[from] TableError),
}

/// Per-dataset outcome of a network build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WheelSummary {
    pub name: String,
    pub core_symbol: String,
    pub primary_rows: usize,
    pub secondary_rows: usize,
}

/// Ordered collection of wheels sharing one organism and one download mode.
#[derive(Debug, Clone, Default)]
pub struct Network {
    wheels: Vec<Wheel>,
    organism: Option<Organism>,
    download: bool,
    download_decided: bool,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wheels(&self) -> &[Wheel] {
        &self.wheels
    }

    pub fn len(&self) -> usize {
        self.wheels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wheels.is_empty()
    }

    pub fn organism(&self) -> Option<Organism> {
        self.organism
    }

    pub fn download(&self) -> bool {
        self.download
    }

    pub fn download_decided(&self) -> bool {
        self.download_decided
    }

    /// Adds a wheel. The first wheel fixes the network's organism; later
    /// wheels for another organism are rejected.
    pub fn append(&mut self, wheel: Wheel) -> Result<(), NetworkError> {
        match self.organism {
            None => self.organism = Some(wheel.organism()),
            Some(expected) if expected != wheel.organism() => {
                return Err(NetworkError::OrganismMismatch {
                    dataset: wheel.name().to_string(),
                    expected,
                    found: wheel.organism(),
                });
            }
            Some(_) => {}
        }
        self.wheels.push(wheel);
        Ok(())
    }

    /// Settles the download mode once, before any interactions are fetched.
    /// A requested download is probed against the service with `identifiers`;
    /// if the organism's data model has no interaction data the mode falls back
    /// to off. Returns the effective mode.
    pub fn negotiate_download<R: Resolver>(
        &mut self,
        requested: bool,
        organism: Organism,
        identifiers: &[String],
        resolver: &R,
    ) -> Result<bool, NetworkError> {
        if self.download_decided {
            return Ok(self.download);
        }
        let mut download = requested;
        if requested && !identifiers.is_empty() {
            match resolver.resolve(identifiers, organism, &INTERACTION_FIELDS) {
                Ok(_) => {}
                Err(err) if err.is_model_failure() => {
                    warn!(
                        %organism,
                        error = %err,
                        "interaction data not available; building the network without it"
                    );
                    download = false;
                }
                Err(err) => return Err(err.into()),
            }
        }
        self.download = download;
        self.download_decided = true;
        Ok(download)
    }

    /// Runs every wheel through core resolution, primary resolution, optional
    /// secondary fetch and table building, then stacks the tables in
    /// submission order. Duplicate interactions are kept.
    pub fn build_network<R: Resolver>(
        &mut self,
        resolver: &R,
    ) -> Result<(Table, Vec<WheelSummary>), NetworkError> {
        if self.wheels.is_empty() {
            return Err(NetworkError::NoDatasets);
        }
        let download = self.download;
        let mut summaries = Vec::with_capacity(self.wheels.len());
        for wheel in &mut self.wheels {
            let start = Instant::now();
            info!(dataset = wheel.name(), "building wheel");
            let summary = build_wheel(wheel, download, resolver).map_err(|source| {
                NetworkError::Wheel {
                    dataset: wheel.name().to_string(),
                    source,
                }
            })?;
            info!(
                dataset = wheel.name(),
                primary_rows = summary.primary_rows,
                secondary_rows = summary.secondary_rows,
                elapsed_ms = start.elapsed().as_millis(),
                "finished wheel"
            );
            summaries.push(summary);
        }

        let tables: Vec<&Table> = self.wheels.iter().filter_map(Wheel::table).collect();
        if tables.iter().all(|t| t.is_empty()) {
            let first = tables
                .first()
                .map(|t| (*t).clone())
                .unwrap_or_else(|| Table::new(INTERACTION_COLUMNS));
            return Ok((first, summaries));
        }
        let mut master = Table::new(INTERACTION_COLUMNS);
        for table in tables {
            master.append(table)?;
        }
        Ok((master, summaries))
    }
}

fn build_wheel<R: Resolver>(
    wheel: &mut Wheel,
    download: bool,
    resolver: &R,
) -> Result<WheelSummary, WheelError> {
    let core_symbol = wheel.resolve_core(resolver)?.symbol.clone();
    let primary_rows = wheel.resolve_primaries(resolver)?.n_rows();
    let secondary_rows = if download {
        wheel.fetch_secondary(resolver)?.n_rows()
    } else {
        0
    };
    wheel.build_table()?;
    Ok(WheelSummary {
        name: wheel.name().to_string(),
        core_symbol,
        primary_rows,
        secondary_rows,
    })
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/network.rs"]
mod tests;
