use thiserror::Error;
use tracing::info;

use crate::model::gene::collect_records;
use crate::model::organism::Organism;
use crate::model::table::Table;
use crate::pipeline::attributes::{AttributeError, AttributeMerger, AttributeTable, SubmitOutcome};
use crate::pipeline::network::{Network, NetworkError, WheelSummary};
use crate::pipeline::nodes::{NodeError, NodeTable};
use crate::pipeline::wheel::{Wheel, WheelInput};
use crate::resolver::{CORE_FIELDS, ResolveError, Resolver};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid core gene identifier {core} for dataset {dataset}")]
    InvalidCore { dataset: String, core: String },
    #[error("resolution failed: {0}")]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Network(#[from] NetworkError),
    #[error(transparent)]
    Nodes(#[from] NodeError),
    #[error(transparent)]
    Attribute(#[from] AttributeError),
    #[error("no network table has been loaded")]
    NoNetworkTable,
}

#[derive(Debug, Clone)]
struct Annotation {
    organism: Organism,
    nodes: NodeTable,
    merger: AttributeMerger,
}

/// All state of one run: the submitted datasets and the attribute
/// accumulator. Build one per run; [`Session::reset`] discards everything.
#[derive(Debug, Clone, Default)]
pub struct Session {
    network: Network,
    annotation: Option<Annotation>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn nodes(&self) -> Option<&NodeTable> {
        self.annotation.as_ref().map(|a| &a.nodes)
    }

    pub fn merger(&self) -> Option<&AttributeMerger> {
        self.annotation.as_ref().map(|a| &a.merger)
    }

    /// Drops all submitted datasets, nodes and attributes.
    pub fn reset(&mut self) {
        info!(datasets = self.network.len(), "resetting session");
        *self = Session::default();
    }

    /// Checks the core identifier, settles the download mode on the first
    /// submission and queues the dataset.
    pub fn submit_dataset<R: Resolver>(
        &mut self,
        input: WheelInput,
        download_requested: bool,
        resolver: &R,
    ) -> Result<(), SessionError> {
        let rows = resolver.resolve(
            std::slice::from_ref(&input.core),
            input.organism,
            &CORE_FIELDS,
        )?;
        if collect_records(&rows).is_empty() {
            return Err(SessionError::InvalidCore {
                dataset: input.name,
                core: input.core,
            });
        }

        let wheel = Wheel::new(input);
        if !self.network.download_decided() {
            self.network.negotiate_download(
                download_requested,
                wheel.organism(),
                &wheel.identifiers(),
                resolver,
            )?;
        }
        info!(
            dataset = wheel.name(),
            technique = wheel.technique(),
            download = self.network.download(),
            "dataset submitted"
        );
        self.network.append(wheel)?;
        Ok(())
    }

    pub fn build_network<R: Resolver>(
        &mut self,
        resolver: &R,
    ) -> Result<(Table, Vec<WheelSummary>), SessionError> {
        Ok(self.network.build_network(resolver)?)
    }

    /// Resolves the genes of a network table into the node table attributes
    /// are merged onto. Replaces any earlier network table and attributes.
    pub fn load_network_table<R: Resolver>(
        &mut self,
        network: &Table,
        organism: Organism,
        resolver: &R,
    ) -> Result<&NodeTable, SessionError> {
        let nodes = NodeTable::from_network(network, organism, resolver)?;
        info!(%organism, nodes = nodes.len(), "network table loaded");
        let annotation = self.annotation.insert(Annotation {
            organism,
            nodes,
            merger: AttributeMerger::new(),
        });
        Ok(&annotation.nodes)
    }

    pub fn submit_attribute<R: Resolver>(
        &mut self,
        attribute: AttributeTable,
        resolver: &R,
    ) -> Result<SubmitOutcome, SessionError> {
        let annotation = self
            .annotation
            .as_mut()
            .ok_or(SessionError::NoNetworkTable)?;
        let outcome = annotation.merger.submit(
            attribute,
            &annotation.nodes,
            annotation.organism,
            resolver,
        )?;
        Ok(outcome)
    }

    pub fn make_attribute_table(&self) -> Result<Table, SessionError> {
        let annotation = self
            .annotation
            .as_ref()
            .ok_or(SessionError::NoNetworkTable)?;
        Ok(annotation.merger.make_attribute_table(&annotation.nodes)?)
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/session.rs"]
mod tests;
