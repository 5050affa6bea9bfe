use super::*;
use crate::pipeline::wheel::WheelInput;
use crate::resolver::catalog::GeneCatalog;
use crate::resolver::{CORE_FIELDS, ResolvedRow};
use crate::test_support::{Recording, catalog, strings};

fn wheel(name: &str, organism: Organism, core: &str, interactors: &[&str]) -> Wheel {
    Wheel::new(WheelInput {
        name: name.to_string(),
        organism,
        core: core.to_string(),
        technique: "AP-MS".to_string(),
        interactors: strings(interactors),
    })
}

/// Resolves cores but reports no interactors at all.
struct CoreOnly(GeneCatalog);

impl Resolver for CoreOnly {
    fn resolve(
        &self,
        identifiers: &[String],
        organism: Organism,
        fields: &[&str],
    ) -> Result<Vec<ResolvedRow>, ResolveError> {
        if fields == CORE_FIELDS {
            self.0.resolve(identifiers, organism, fields)
        } else {
            Ok(Vec::new())
        }
    }
}

#[test]
fn first_wheel_fixes_organism() {
    let mut network = Network::new();
    network
        .append(wheel("a", Organism::DrosophilaMelanogaster, "abc", &["d"]))
        .expect("append");
    let err = network
        .append(wheel("b", Organism::DanioRerio, "zz", &[]))
        .expect_err("mismatch");
    assert!(matches!(
        err,
        NetworkError::OrganismMismatch { dataset, found: Organism::DanioRerio, .. } if dataset == "b"
    ));
    assert_eq!(network.len(), 1);
    assert_eq!(network.organism(), Some(Organism::DrosophilaMelanogaster));
}

#[test]
fn empty_network_cannot_be_built() {
    let err = Network::new().build_network(&catalog()).expect_err("empty");
    assert!(matches!(err, NetworkError::NoDatasets));
}

#[test]
fn stacks_wheels_in_submission_order() {
    let resolver = catalog();
    let mut network = Network::new();
    network
        .append(wheel("first", Organism::DrosophilaMelanogaster, "abc", &["d", "e"]))
        .expect("append");
    network
        .append(wheel("second", Organism::DrosophilaMelanogaster, "f", &["abc"]))
        .expect("append");
    let (table, summaries) = network.build_network(&resolver).expect("build");
    assert_eq!(table.columns(), INTERACTION_COLUMNS);
    assert_eq!(table.n_rows(), 5);
    assert_eq!(table.column(2).collect::<Vec<_>>(), ["abc", "abc", "abc", "f", "f"]);
    assert!(table.column(3).all(|v| v == "AP-MS"));
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[1].core_symbol, "f");
    assert_eq!(summaries[1].primary_rows, 2);
    assert_eq!(summaries[1].secondary_rows, 0);
}

#[test]
fn download_adds_secondary_rows() {
    let resolver = catalog();
    let mut network = Network::new();
    let ids = strings(&["d", "e", "abc"]);
    let download = network
        .negotiate_download(true, Organism::DrosophilaMelanogaster, &ids, &resolver)
        .expect("probe");
    assert!(download);
    network
        .append(wheel("y2h", Organism::DrosophilaMelanogaster, "abc", &["d", "e"]))
        .expect("append");
    let (table, summaries) = network.build_network(&resolver).expect("build");
    assert_eq!(summaries[0].primary_rows + summaries[0].secondary_rows, table.n_rows());
    assert_eq!(summaries[0].secondary_rows, 2);
}

#[test]
fn download_falls_back_without_interaction_model() {
    let resolver = Recording::new(catalog());
    let mut network = Network::new();
    let ids = strings(&["zz"]);
    let download = network
        .negotiate_download(true, Organism::DanioRerio, &ids, &resolver)
        .expect("probe");
    assert!(!download);
    assert!(network.download_decided());
    assert_eq!(resolver.call_count(), 1);

    let again = network
        .negotiate_download(true, Organism::DrosophilaMelanogaster, &ids, &resolver)
        .expect("probe");
    assert!(!again);
    assert_eq!(resolver.call_count(), 1);
}

#[test]
fn download_off_skips_the_probe() {
    let resolver = Recording::new(catalog());
    let mut network = Network::new();
    let download = network
        .negotiate_download(false, Organism::DrosophilaMelanogaster, &strings(&["d"]), &resolver)
        .expect("probe");
    assert!(!download);
    assert_eq!(resolver.call_count(), 0);
}

#[test]
fn all_empty_wheels_yield_first_empty_table() {
    let resolver = CoreOnly(catalog());
    let mut network = Network::new();
    network
        .append(wheel("a", Organism::DrosophilaMelanogaster, "abc", &["nothing"]))
        .expect("append");
    network
        .append(wheel("b", Organism::DrosophilaMelanogaster, "d", &["nada"]))
        .expect("append");
    let (table, summaries) = network.build_network(&resolver).expect("build");
    assert!(table.is_empty());
    assert_eq!(table.columns(), INTERACTION_COLUMNS);
    assert_eq!(summaries.len(), 2);
    assert!(summaries.iter().all(|s| s.primary_rows == 0));
}

#[test]
fn failing_wheel_names_its_dataset() {
    let mut network = Network::new();
    network
        .append(wheel("broken", Organism::DrosophilaMelanogaster, "nope", &["d"]))
        .expect("append");
    let err = network.build_network(&catalog()).expect_err("core");
    assert!(matches!(
        err,
        NetworkError::Wheel { dataset, source: WheelError::UnresolvedCore { .. } } if dataset == "broken"
    ));
}
