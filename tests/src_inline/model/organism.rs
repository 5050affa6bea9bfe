use super::*;

#[test]
fn parses_full_names() {
    let organism: Organism = "Danio rerio".parse().expect("organism");
    assert_eq!(organism, Organism::DanioRerio);
    let padded: Organism = "  Homo sapiens ".parse().expect("organism");
    assert_eq!(padded, Organism::HomoSapiens);
}

#[test]
fn rejects_unknown_and_abbreviated_names() {
    assert!("D. melanogaster".parse::<Organism>().is_err());
    assert!("homo sapiens".parse::<Organism>().is_err());
}

#[test]
fn display_round_trips_every_organism() {
    for organism in Organism::ordered() {
        let parsed: Organism = organism.to_string().parse().expect("organism");
        assert_eq!(parsed, *organism);
    }
}

#[test]
fn ordered_is_sorted_by_name() {
    let names: Vec<&str> = Organism::ordered().iter().map(Organism::as_str).collect();
    let mut sorted = names.clone();
    sorted.sort_unstable();
    assert_eq!(names, sorted);
    assert_eq!(names.len(), 6);
}

#[test]
fn default_is_fly() {
    assert_eq!(Organism::default(), Organism::DrosophilaMelanogaster);
    assert_eq!(
        Organism::default().service_url(),
        "https://www.flymine.org/query/service"
    );
}

#[test]
fn deserializes_from_full_name() {
    #[derive(serde::Deserialize)]
    struct Wrapper {
        organism: Organism,
    }
    let w: Wrapper = toml::from_str("organism = \"Mus musculus\"").expect("toml");
    assert_eq!(w.organism, Organism::MusMusculus);
}
