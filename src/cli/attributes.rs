use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use tracing::{info, warn};

use crate::input::manifest::{AttributeEntry, AttributeKind, AttributeManifest};
use crate::input::{path_display, read_table};
use crate::model::table::Table;
use crate::pipeline::attributes::{AttributeError, AttributeTable, SubmitOutcome};
use crate::pipeline::session::Session;
use crate::report::export::write_attributes;
use crate::report::json::{AttributeSubmission, AttributeSummary, ToolSummary, write_summary};

#[derive(Args, Debug)]
pub struct AttributesArgs {
    /// Attribute manifest (TOML)
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

/// Names and trims a raw attribute file according to its manifest entry.
pub(crate) fn build_attribute(
    entry: &AttributeEntry,
    raw: Table,
) -> Result<(AttributeTable, &'static str), AttributeError> {
    Ok(match entry.kind {
        AttributeKind::List => (
            AttributeTable::list(raw, entry.header, &entry.names),
            "list",
        ),
        AttributeKind::DiscreteContinuous { mapping_key } => (
            AttributeTable::discrete_continuous(raw, entry.header, &entry.names, mapping_key)?,
            "discrete-continuous",
        ),
    })
}

pub fn handle(args: AttributesArgs) -> anyhow::Result<()> {
    let manifest = AttributeManifest::load(&args.manifest)?;
    let resolver = super::make_resolver(args.catalog.as_deref(), &manifest.service)?;
    let mut session = Session::new();

    let start = Instant::now();
    info!(stage = "nodes", "starting stage");
    let network = read_table(&manifest.network, true)?;
    let n_nodes = session
        .load_network_table(&network, manifest.organism, &resolver)?
        .len();
    info!(
        stage = "nodes",
        elapsed_ms = start.elapsed().as_millis(),
        nodes = n_nodes,
        "finished stage"
    );

    let start = Instant::now();
    info!(stage = "attributes", tables = manifest.attributes.len(), "starting stage");
    let mut submissions = Vec::with_capacity(manifest.attributes.len());
    for entry in &manifest.attributes {
        let raw = read_table(&entry.file, entry.header)?;
        let (attribute, kind) = build_attribute(entry, raw)?;
        if let AttributeTable::List(columns) = &attribute
            && columns.is_empty()
        {
            warn!(
                file = %path_display(&entry.file),
                "list table has no named columns; nothing to add"
            );
        }
        let outcome = session.submit_attribute(attribute, &resolver)?;
        let mut submission = AttributeSubmission {
            file: path_display(&entry.file).to_string(),
            kind: kind.to_string(),
            columns: Vec::new(),
            kept_rows: None,
            dropped_rows: None,
        };
        match outcome {
            SubmitOutcome::List { columns } => submission.columns = columns,
            SubmitOutcome::DiscreteContinuous {
                kept_rows,
                dropped_rows,
            } => {
                submission.kept_rows = Some(kept_rows);
                submission.dropped_rows = Some(dropped_rows);
            }
        }
        submissions.push(submission);
    }
    info!(
        stage = "attributes",
        elapsed_ms = start.elapsed().as_millis(),
        "finished stage"
    );

    let output = session.make_attribute_table()?;
    write_attributes(&args.out, &output)?;
    info!(out = %args.out.display(), rows = output.n_rows(), "attribute table written");

    if let Some(path) = &args.summary {
        let summary = AttributeSummary {
            tool: ToolSummary::default(),
            organism: manifest.organism.to_string(),
            nodes: n_nodes,
            submissions,
            output_rows: output.n_rows(),
            output_columns: output.columns().to_vec(),
        };
        write_summary(path, &summary)?;
    }

    session.reset();
    Ok(())
}
