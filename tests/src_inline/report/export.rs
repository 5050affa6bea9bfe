use super::*;
use tempfile::tempdir;

fn table(columns: &[&str], row: &[&str]) -> Table {
    Table::from_rows(
        columns.iter().copied(),
        vec![row.iter().map(|c| c.to_string()).collect()],
    )
    .expect("table")
}

#[test]
fn network_is_written_without_index() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("network.csv");
    write_network(&path, &table(&["Source Symbol", "Target Symbol"], &["abc", "d"]))
        .expect("write");
    let text = std::fs::read_to_string(&path).expect("read");
    assert_eq!(text, "Source Symbol,Target Symbol\nabc,d\n");
}

#[test]
fn attributes_lead_with_mapping_key() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("attributes.csv");
    write_attributes(&path, &table(&[MAPPING_KEY, "Hot"], &["g1", "True"])).expect("write");
    let text = std::fs::read_to_string(&path).expect("read");
    assert_eq!(text, "Mapping Key,Hot\ng1,True\n");
}

#[test]
fn attributes_without_index_are_rejected() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("attributes.csv");
    let err = write_attributes(&path, &table(&["Hot", MAPPING_KEY], &["True", "g1"]))
        .expect_err("index");
    assert!(matches!(err, ReportError::MissingIndex(_)));
    assert!(!path.exists());
}
