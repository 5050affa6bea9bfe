use std::collections::{BTreeSet, HashMap};

/// A gene as reported by a resolver. Two records describe the same gene iff
/// their primary identifiers match.
#[derive(Debug, Clone, Eq)]
pub struct GeneRecord {
    pub primary_id: String,
    pub secondary_id: String,
    pub symbol: String,
    pub synonyms: BTreeSet<String>,
}

impl GeneRecord {
    /// Builds a record from a `primaryIdentifier, secondaryIdentifier, symbol` row.
    pub(crate) fn from_identity_row(row: &[String]) -> Option<Self> {
        match row {
            [primary, secondary, symbol, ..] => Some(Self {
                primary_id: primary.clone(),
                secondary_id: secondary.clone(),
                symbol: symbol.clone(),
                synonyms: BTreeSet::new(),
            }),
            _ => None,
        }
    }

    pub fn is_same_gene(&self, other: &GeneRecord) -> bool {
        self.primary_id == other.primary_id
    }

    /// True if `value` is this gene's symbol or one of its synonyms.
    pub fn answers_to(&self, value: &str) -> bool {
        self.symbol == value || self.synonyms.contains(value)
    }
}

impl PartialEq for GeneRecord {
    fn eq(&self, other: &Self) -> bool {
        self.is_same_gene(other)
    }
}

impl std::hash::Hash for GeneRecord {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.primary_id.hash(state);
    }
}

/// Folds `primaryIdentifier, secondaryIdentifier, symbol[, synonym]` rows into
/// one record per gene, first-seen order. Rows with fewer than three cells are
/// skipped.
pub(crate) fn collect_records<'a, I>(rows: I) -> Vec<GeneRecord>
where
    I: IntoIterator<Item = &'a Vec<String>>,
{
    let mut records: Vec<GeneRecord> = Vec::new();
    let mut index_by_primary: HashMap<String, usize> = HashMap::new();
    for row in rows {
        let Some(record) = GeneRecord::from_identity_row(row) else {
            continue;
        };
        let idx = match index_by_primary.get(&record.primary_id) {
            Some(&idx) => idx,
            None => {
                index_by_primary.insert(record.primary_id.clone(), records.len());
                records.push(record);
                records.len() - 1
            }
        };
        if let Some(synonym) = row.get(3)
            && !synonym.is_empty()
        {
            records[idx].synonyms.insert(synonym.clone());
        }
    }
    records
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/gene.rs"]
mod tests;
