use std::cell::RefCell;

use crate::model::organism::Organism;
use crate::resolver::catalog::GeneCatalog;
use crate::resolver::{ResolveError, ResolvedRow, Resolver};

pub const CATALOG_TOML: &str = r#"
without_interactions = ["Danio rerio"]

[[gene]]
organism = "Drosophila melanogaster"
primary_identifier = "FBgn1"
secondary_identifier = "CG1"
symbol = "abc"
synonyms = ["abc", "ABC-1"]
interactions = [{ type = "physical", partner = "FBgn4" }]

[[gene]]
organism = "Drosophila melanogaster"
primary_identifier = "FBgn2"
secondary_identifier = "CG2"
symbol = "d"
synonyms = ["d", "dee"]
interactions = [{ type = "genetic", partner = "FBgn1" }]

[[gene]]
organism = "Drosophila melanogaster"
primary_identifier = "FBgn3"
secondary_identifier = "CG3"
symbol = "e"
synonyms = ["e"]

[[gene]]
organism = "Drosophila melanogaster"
primary_identifier = "FBgn4"
secondary_identifier = "CG4"
symbol = "f"
synonyms = ["f", "eff"]

[[gene]]
organism = "Drosophila melanogaster"
primary_identifier = "FBgn11"
secondary_identifier = "CG11"
symbol = "g1"
synonyms = ["g1", "gee1"]

[[gene]]
organism = "Drosophila melanogaster"
primary_identifier = "FBgn12"
secondary_identifier = "CG12"
symbol = "g2"
synonyms = ["g2"]

[[gene]]
organism = "Drosophila melanogaster"
primary_identifier = "FBgn13"
secondary_identifier = "CG13"
symbol = "g3"
synonyms = ["g3", "old-g3"]

[[gene]]
organism = "Drosophila melanogaster"
primary_identifier = "FBgn14"
secondary_identifier = "CG14"
symbol = "g4"
synonyms = ["g4"]

[[gene]]
organism = "Drosophila melanogaster"
primary_identifier = "FBgn21"
secondary_identifier = "CG21"
symbol = "s1"
synonyms = ["s1", "shared"]

[[gene]]
organism = "Drosophila melanogaster"
primary_identifier = "FBgn22"
secondary_identifier = "CG22"
symbol = "s2"
synonyms = ["s2", "shared"]

[[gene]]
organism = "Danio rerio"
primary_identifier = "ZDB-GENE-1"
symbol = "zz"
synonyms = ["zz"]
"#;

pub fn catalog() -> GeneCatalog {
    toml::from_str(CATALOG_TOML).expect("catalog fixture")
}

pub fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// Wraps a resolver and records the identifiers and fields of every call.
pub struct Recording<R> {
    pub inner: R,
    pub calls: RefCell<Vec<(Vec<String>, Vec<String>)>>,
}

impl<R> Recording<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl<R: Resolver> Resolver for Recording<R> {
    fn resolve(
        &self,
        identifiers: &[String],
        organism: Organism,
        fields: &[&str],
    ) -> Result<Vec<ResolvedRow>, ResolveError> {
        self.calls.borrow_mut().push((
            identifiers.to_vec(),
            fields.iter().map(|f| f.to_string()).collect(),
        ));
        self.inner.resolve(identifiers, organism, fields)
    }
}
