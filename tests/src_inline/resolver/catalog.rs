use super::*;
use crate::resolver::{CORE_FIELDS, INTERACTION_FIELDS, NODE_FIELDS, SYMBOL_FIELDS};
use crate::test_support::{CATALOG_TOML, catalog, strings};
use tempfile::tempdir;

const FLY: Organism = Organism::DrosophilaMelanogaster;

#[test]
fn matches_any_identifier_kind() {
    let catalog = catalog();
    let rows = catalog
        .resolve(&strings(&["FBgn2", "CG3", "f", "gee1"]), FLY, &SYMBOL_FIELDS)
        .expect("resolve");
    assert_eq!(rows, [strings(&["d"]), strings(&["e"]), strings(&["f"]), strings(&["g1"])]);
}

#[test]
fn lookup_is_case_sensitive() {
    let catalog = catalog();
    let rows = catalog
        .resolve(&strings(&["ABC", "Abc"]), FLY, &CORE_FIELDS)
        .expect("resolve");
    assert!(rows.is_empty());
}

#[test]
fn filters_by_organism() {
    let catalog = catalog();
    let rows = catalog
        .resolve(&strings(&["zz"]), FLY, &SYMBOL_FIELDS)
        .expect("resolve");
    assert!(rows.is_empty());
    let rows = catalog
        .resolve(&strings(&["zz"]), Organism::DanioRerio, &CORE_FIELDS)
        .expect("resolve");
    assert_eq!(rows, [strings(&["ZDB-GENE-1", "", "zz"])]);
}

#[test]
fn synonym_fields_fan_out() {
    let catalog = catalog();
    let rows = catalog
        .resolve(&strings(&["abc"]), FLY, &NODE_FIELDS)
        .expect("resolve");
    assert_eq!(
        rows,
        [
            strings(&["FBgn1", "CG1", "abc", "abc"]),
            strings(&["FBgn1", "CG1", "abc", "ABC-1"]),
        ]
    );
}

#[test]
fn interaction_fields_follow_partners() {
    let catalog = catalog();
    let rows = catalog
        .resolve(&strings(&["d", "e"]), FLY, &INTERACTION_FIELDS)
        .expect("resolve");
    assert_eq!(
        rows,
        [strings(&["FBgn2", "CG2", "d", "genetic", "abc", "CG1", "FBgn1"])]
    );
}

#[test]
fn interactions_unsupported_where_configured() {
    let catalog = catalog();
    let err = catalog
        .resolve(&strings(&["zz"]), Organism::DanioRerio, &INTERACTION_FIELDS)
        .expect_err("no interactions");
    assert!(err.is_model_failure());
}

#[test]
fn unknown_field_is_model_failure() {
    let catalog = catalog();
    let err = catalog
        .resolve(&strings(&["abc"]), FLY, &["length"])
        .expect_err("unknown field");
    assert!(matches!(err, ResolveError::UnsupportedField { path, .. } if path == "length"));
}

#[test]
fn empty_batch_is_rejected() {
    let catalog = catalog();
    let err = catalog.resolve(&[], FLY, &SYMBOL_FIELDS).expect_err("empty");
    assert!(matches!(err, ResolveError::EmptyBatch));
}

#[test]
fn loads_from_file() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("catalog.toml");
    std::fs::write(&path, CATALOG_TOML).expect("write");
    let catalog = GeneCatalog::load(&path).expect("load");
    assert_eq!(catalog.genes.len(), 11);
    assert!(catalog.without_interactions.contains(&Organism::DanioRerio));
}

#[test]
fn load_rejects_unknown_partner() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("catalog.toml");
    std::fs::write(
        &path,
        r#"
[[gene]]
organism = "Homo sapiens"
primary_identifier = "ENSG1"
symbol = "A1"
interactions = [{ type = "physical", partner = "ENSG9" }]
"#,
    )
    .expect("write");
    let err = GeneCatalog::load(&path).expect_err("partner");
    assert!(matches!(err, CatalogLoadError::UnknownPartner { partner, .. } if partner == "ENSG9"));
}
