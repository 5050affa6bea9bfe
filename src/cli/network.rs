use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use tracing::info;

use crate::input::manifest::NetworkManifest;
use crate::input::{read_table, select_identifiers};
use crate::pipeline::session::Session;
use crate::pipeline::wheel::WheelInput;
use crate::report::export::write_network;
use crate::report::json::{DatasetSummary, NetworkSummary, ToolSummary, write_summary};

#[derive(Args, Debug)]
pub struct NetworkArgs {
    /// Network manifest (TOML)
    #[arg(long)]
    pub(crate) manifest: PathBuf,

    /// Output CSV path
    #[arg(long)]
    pub(crate) out: PathBuf,

    /// Resolve against a local gene catalog (TOML) instead of InterMine
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,

    /// Optional run summary JSON
    #[arg(long)]
    pub(crate) summary: Option<PathBuf>,
}

pub fn handle(args: NetworkArgs) -> anyhow::Result<()> {
    let manifest = NetworkManifest::load(&args.manifest)?;
    let resolver = super::make_resolver(args.catalog.as_deref(), &manifest.service)?;
    let mut session = Session::new();

    let start = Instant::now();
    info!(stage = "submit", datasets = manifest.datasets.len(), "starting stage");
    for dataset in &manifest.datasets {
        let table = read_table(&dataset.file, dataset.header)?;
        let interactors = select_identifiers(&table, &dataset.columns, &dataset.file)?;
        let input = WheelInput {
            name: dataset.name.clone(),
            organism: manifest.organism,
            core: dataset.core.clone(),
            technique: dataset.technique.clone(),
            interactors,
        };
        session.submit_dataset(input, manifest.download, &resolver)?;
    }
    info!(
        stage = "submit",
        elapsed_ms = start.elapsed().as_millis(),
        download = session.network().download(),
        "finished stage"
    );

    let start = Instant::now();
    info!(stage = "build_network", "starting stage");
    let (table, wheels) = session.build_network(&resolver)?;
    info!(
        stage = "build_network",
        elapsed_ms = start.elapsed().as_millis(),
        rows = table.n_rows(),
        "finished stage"
    );

    write_network(&args.out, &table)?;
    info!(out = %args.out.display(), rows = table.n_rows(), "network table written");

    if let Some(path) = &args.summary {
        let summary = NetworkSummary {
            tool: ToolSummary::default(),
            organism: manifest.organism.to_string(),
            download_requested: manifest.download,
            download_effective: session.network().download(),
            datasets: wheels.iter().map(DatasetSummary::from).collect(),
            total_rows: table.n_rows(),
        };
        write_summary(path, &summary)?;
    }

    session.reset();
    Ok(())
}
