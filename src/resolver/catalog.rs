use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::model::organism::Organism;
use crate::resolver::{
    INTERACTION_TYPE, PARTNER_PRIMARY_IDENTIFIER, PARTNER_SECONDARY_IDENTIFIER, PARTNER_SYMBOL,
    PRIMARY_IDENTIFIER, ResolveError, ResolvedRow, Resolver, SECONDARY_IDENTIFIER, SYMBOL,
    SYNONYM_VALUE,
};

#[derive(Debug, Error)]
pub enum CatalogLoadError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("interaction partner {partner} of {gene} is not in the catalog")]
    UnknownPartner { gene: String, partner: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogGene {
    pub organism: Organism,
    pub primary_identifier: String,
    #[serde(default)]
    pub secondary_identifier: String,
    pub symbol: String,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub interactions: Vec<CatalogInteraction>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogInteraction {
    #[serde(rename = "type")]
    pub kind: String,
    /// Primary identifier of the partner gene.
    pub partner: String,
}

/// A fixed, local gene dataset answering the same field paths as the remote
/// services. Lookups are case-sensitive against primary and secondary
/// identifiers, symbols and synonyms.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneCatalog {
    /// Organisms whose data model carries no interaction data.
    #[serde(default)]
    pub without_interactions: BTreeSet<Organism>,
    #[serde(default, rename = "gene")]
    pub genes: Vec<CatalogGene>,
}

impl GeneCatalog {
    pub fn load(path: &Path) -> Result<Self, CatalogLoadError> {
        let text = fs::read_to_string(path)?;
        let catalog: GeneCatalog = toml::from_str(&text)?;
        catalog.check_partners()?;
        Ok(catalog)
    }

    fn check_partners(&self) -> Result<(), CatalogLoadError> {
        for gene in &self.genes {
            for interaction in &gene.interactions {
                if self.by_primary(gene.organism, &interaction.partner).is_none() {
                    return Err(CatalogLoadError::UnknownPartner {
                        gene: gene.primary_identifier.clone(),
                        partner: interaction.partner.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    fn by_primary(&self, organism: Organism, primary: &str) -> Option<&CatalogGene> {
        self.genes
            .iter()
            .find(|g| g.organism == organism && g.primary_identifier == primary)
    }

    fn matches(gene: &CatalogGene, id: &str) -> bool {
        gene.primary_identifier == id
            || (!gene.secondary_identifier.is_empty() && gene.secondary_identifier == id)
            || gene.symbol == id
            || gene.synonyms.iter().any(|s| s == id)
    }

    fn gene_rows(&self, gene: &CatalogGene, fields: &[&str]) -> Vec<ResolvedRow> {
        let wants_synonyms = fields.iter().any(|f| f.starts_with("synonyms."));
        let wants_interactions = fields.iter().any(|f| f.starts_with("interactions."));

        let synonyms: Vec<Option<&str>> = if wants_synonyms {
            gene.synonyms.iter().map(|s| Some(s.as_str())).collect()
        } else {
            vec![None]
        };
        let interactions: Vec<Option<&CatalogInteraction>> = if wants_interactions {
            gene.interactions.iter().map(Some).collect()
        } else {
            vec![None]
        };

        let mut rows = Vec::new();
        for synonym in &synonyms {
            for interaction in &interactions {
                let partner =
                    interaction.and_then(|i| self.by_primary(gene.organism, &i.partner));
                let row = fields
                    .iter()
                    .map(|field| match *field {
                        PRIMARY_IDENTIFIER => gene.primary_identifier.clone(),
                        SECONDARY_IDENTIFIER => gene.secondary_identifier.clone(),
                        SYMBOL => gene.symbol.clone(),
                        SYNONYM_VALUE => synonym.unwrap_or_default().to_string(),
                        INTERACTION_TYPE => interaction
                            .map(|i| i.kind.clone())
                            .unwrap_or_default(),
                        PARTNER_SYMBOL => partner.map(|p| p.symbol.clone()).unwrap_or_default(),
                        PARTNER_SECONDARY_IDENTIFIER => partner
                            .map(|p| p.secondary_identifier.clone())
                            .unwrap_or_default(),
                        PARTNER_PRIMARY_IDENTIFIER => partner
                            .map(|p| p.primary_identifier.clone())
                            .unwrap_or_default(),
                        _ => String::new(),
                    })
                    .collect();
                rows.push(row);
            }
        }
        rows
    }
}

fn is_known_field(field: &str) -> bool {
    matches!(
        field,
        PRIMARY_IDENTIFIER
            | SECONDARY_IDENTIFIER
            | SYMBOL
            | SYNONYM_VALUE
            | INTERACTION_TYPE
            | PARTNER_SYMBOL
            | PARTNER_SECONDARY_IDENTIFIER
            | PARTNER_PRIMARY_IDENTIFIER
    )
}

impl Resolver for GeneCatalog {
    fn resolve(
        &self,
        identifiers: &[String],
        organism: Organism,
        fields: &[&str],
    ) -> Result<Vec<ResolvedRow>, ResolveError> {
        if identifiers.is_empty() {
            return Err(ResolveError::EmptyBatch);
        }
        for field in fields {
            let interaction_path = field.starts_with("interactions.");
            if !is_known_field(field)
                || (interaction_path && self.without_interactions.contains(&organism))
            {
                return Err(ResolveError::UnsupportedField {
                    organism,
                    path: (*field).to_string(),
                });
            }
        }

        let mut rows = Vec::new();
        for gene in self.genes.iter().filter(|g| g.organism == organism) {
            if identifiers.iter().any(|id| Self::matches(gene, id)) {
                rows.extend(self.gene_rows(gene, fields));
            }
        }
        Ok(rows)
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/resolver/catalog.rs"]
mod tests;
