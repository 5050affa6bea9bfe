//! Identifier resolution against a gene-information service.
//!
//! Every lookup goes through [`Resolver::resolve`]: one batch of identifiers,
//! one organism, an ordered list of field paths rooted at `Gene`. Rows come
//! back in field order; genes with no match produce no row.

pub mod catalog;
pub mod intermine;

use std::collections::HashSet;

use thiserror::Error;

use crate::model::organism::Organism;

pub const PRIMARY_IDENTIFIER: &str = "primaryIdentifier";
pub const SECONDARY_IDENTIFIER: &str = "secondaryIdentifier";
pub const SYMBOL: &str = "symbol";
pub const SYNONYM_VALUE: &str = "synonyms.value";
pub const INTERACTION_TYPE: &str = "interactions.details.type";
pub const PARTNER_SYMBOL: &str = "interactions.participant2.symbol";
pub const PARTNER_SECONDARY_IDENTIFIER: &str = "interactions.participant2.secondaryIdentifier";
pub const PARTNER_PRIMARY_IDENTIFIER: &str = "interactions.participant2.primaryIdentifier";

pub const CORE_FIELDS: [&str; 3] = [PRIMARY_IDENTIFIER, SECONDARY_IDENTIFIER, SYMBOL];
pub const PRIMARY_FIELDS: [&str; 3] = [SYMBOL, SECONDARY_IDENTIFIER, PRIMARY_IDENTIFIER];
pub const INTERACTION_FIELDS: [&str; 7] = [
    PRIMARY_IDENTIFIER,
    SECONDARY_IDENTIFIER,
    SYMBOL,
    INTERACTION_TYPE,
    PARTNER_SYMBOL,
    PARTNER_SECONDARY_IDENTIFIER,
    PARTNER_PRIMARY_IDENTIFIER,
];
pub const NODE_FIELDS: [&str; 4] = [PRIMARY_IDENTIFIER, SECONDARY_IDENTIFIER, SYMBOL, SYNONYM_VALUE];
pub const SYNONYM_FIELDS: [&str; 2] = [SYNONYM_VALUE, SYMBOL];
pub const SYMBOL_FIELDS: [&str; 1] = [SYMBOL];

/// One result row, cells in requested field order. Nulls are empty strings.
pub type ResolvedRow = Vec<String>;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("field path {path} is not available for {organism}")]
    UnsupportedField { organism: Organism, path: String },
    #[error("no identifiers to resolve")]
    EmptyBatch,
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("service error ({status}): {message}")]
    Service { status: u16, message: String },
    #[error("unexpected service response: {0}")]
    Decode(String),
}

impl ResolveError {
    /// The service's data model lacks a requested field path.
    pub fn is_model_failure(&self) -> bool {
        matches!(self, ResolveError::UnsupportedField { .. })
    }
}

pub trait Resolver {
    fn resolve(
        &self,
        identifiers: &[String],
        organism: Organism,
        fields: &[&str],
    ) -> Result<Vec<ResolvedRow>, ResolveError>;
}

impl<R: Resolver + ?Sized> Resolver for &R {
    fn resolve(
        &self,
        identifiers: &[String],
        organism: Organism,
        fields: &[&str],
    ) -> Result<Vec<ResolvedRow>, ResolveError> {
        (**self).resolve(identifiers, organism, fields)
    }
}

impl<R: Resolver + ?Sized> Resolver for Box<R> {
    fn resolve(
        &self,
        identifiers: &[String],
        organism: Organism,
        fields: &[&str],
    ) -> Result<Vec<ResolvedRow>, ResolveError> {
        (**self).resolve(identifiers, organism, fields)
    }
}

/// Drops duplicate and blank identifiers, keeping first-seen order.
pub fn identifier_batch<'a, I>(identifiers: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    let mut batch = Vec::new();
    for id in identifiers {
        if id.is_empty() {
            continue;
        }
        if seen.insert(id) {
            batch.push(id.to_string());
        }
    }
    batch
}

#[cfg(test)]
#[path = "../../tests/src_inline/resolver/mod.rs"]
mod tests;
