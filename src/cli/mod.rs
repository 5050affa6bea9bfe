use std::path::Path;

use clap::{Parser, Subcommand};
use tracing::info;

use crate::resolver::Resolver;
use crate::resolver::catalog::GeneCatalog;
use crate::resolver::intermine::{InterMineClient, ServiceConfig};

mod attributes;
mod network;
mod organisms;
mod validate;

#[derive(Parser, Debug)]
#[command(
    name = "netr-attr",
    version,
    about = "Build gene-interaction networks and annotate them with attribute tables"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve interaction datasets and export the network table
    Network(network::NetworkArgs),
    /// Merge attribute tables onto a network's genes
    Attributes(attributes::AttributesArgs),
    /// Check manifests and input files without contacting any service
    Validate(validate::ValidateArgs),
    /// List supported organisms and their service endpoints
    Organisms,
}

impl Cli {
    pub fn dispatch(self) -> anyhow::Result<()> {
        match self.command {
            Command::Network(args) => network::handle(args),
            Command::Attributes(args) => attributes::handle(args),
            Command::Validate(args) => validate::handle(args),
            Command::Organisms => organisms::handle(),
        }
    }
}

/// The local catalog when one is given, the InterMine services otherwise.
fn make_resolver(
    catalog: Option<&Path>,
    service: &ServiceConfig,
) -> anyhow::Result<Box<dyn Resolver>> {
    match catalog {
        Some(path) => {
            let catalog = GeneCatalog::load(path)?;
            info!(
                catalog = %path.display(),
                genes = catalog.genes.len(),
                "resolving against local gene catalog"
            );
            Ok(Box::new(catalog))
        }
        None => Ok(Box::new(InterMineClient::new(service.clone())?)),
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/cli/mod.rs"]
mod tests;
