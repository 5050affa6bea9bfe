use std::path::{Path, PathBuf};

use clap::Args;

use super::attributes::build_attribute;
use crate::input::manifest::{AttributeManifest, NetworkManifest};
use crate::input::{path_display, read_table, select_identifiers};
use crate::pipeline::wheel::INTERACTION_COLUMNS;

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Network manifest to check
    #[arg(long)]
    pub(crate) network: Option<PathBuf>,

    /// Attribute manifest to check
    #[arg(long)]
    pub(crate) attributes: Option<PathBuf>,
}

pub fn handle(args: ValidateArgs) -> anyhow::Result<()> {
    if args.network.is_none() && args.attributes.is_none() {
        anyhow::bail!("nothing to validate: pass --network and/or --attributes");
    }
    let mut lines = Vec::new();
    if let Some(path) = &args.network {
        lines.extend(validate_network(path)?);
    }
    if let Some(path) = &args.attributes {
        lines.extend(validate_attributes(path)?);
    }
    for (key, value) in lines {
        println!("{key}\t{value}");
    }
    Ok(())
}

pub(crate) fn validate_network(path: &Path) -> anyhow::Result<Vec<(String, String)>> {
    let manifest = NetworkManifest::load(path)?;
    let mut lines = vec![
        ("organism".to_string(), manifest.organism.to_string()),
        ("download".to_string(), manifest.download.to_string()),
        ("datasets".to_string(), manifest.datasets.len().to_string()),
    ];
    for dataset in &manifest.datasets {
        let table = read_table(&dataset.file, dataset.header)?;
        let ids = select_identifiers(&table, &dataset.columns, &dataset.file)?;
        lines.push((format!("dataset.{}.core", dataset.name), dataset.core.clone()));
        lines.push((
            format!("dataset.{}.interactors", dataset.name),
            ids.len().to_string(),
        ));
    }
    Ok(lines)
}

pub(crate) fn validate_attributes(path: &Path) -> anyhow::Result<Vec<(String, String)>> {
    let manifest = AttributeManifest::load(path)?;
    let network = read_table(&manifest.network, true)?;
    for column in INTERACTION_COLUMNS {
        if network.column_index(column).is_none() {
            anyhow::bail!(
                "network table {} is missing column {column}",
                path_display(&manifest.network)
            );
        }
    }
    let mut lines = vec![
        ("organism".to_string(), manifest.organism.to_string()),
        ("network_rows".to_string(), network.n_rows().to_string()),
        (
            "attribute_tables".to_string(),
            manifest.attributes.len().to_string(),
        ),
    ];
    for entry in &manifest.attributes {
        let raw = read_table(&entry.file, entry.header)?;
        let label = path_display(&entry.file).to_string();
        let (attribute, kind) = build_attribute(entry, raw)?;
        lines.push((format!("attribute.{label}.kind"), kind.to_string()));
        let used_columns = attribute.width();
        lines.push((format!("attribute.{label}.columns"), used_columns.to_string()));
    }
    Ok(lines)
}
