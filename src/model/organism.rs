use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Organisms with an InterMine instance the tools know how to query.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Organism {
    #[serde(rename = "Caenorhabditis elegans")]
    CaenorhabditisElegans,
    #[serde(rename = "Danio rerio")]
    DanioRerio,
    #[default]
    #[serde(rename = "Drosophila melanogaster")]
    DrosophilaMelanogaster,
    #[serde(rename = "Homo sapiens")]
    HomoSapiens,
    #[serde(rename = "Mus musculus")]
    MusMusculus,
    #[serde(rename = "Rattus norvegicus")]
    RattusNorvegicus,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported organism: {0}")]
pub struct UnknownOrganism(pub String);

impl Organism {
    pub fn as_str(&self) -> &'static str {
        match self {
            Organism::CaenorhabditisElegans => "Caenorhabditis elegans",
            Organism::DanioRerio => "Danio rerio",
            Organism::DrosophilaMelanogaster => "Drosophila melanogaster",
            Organism::HomoSapiens => "Homo sapiens",
            Organism::MusMusculus => "Mus musculus",
            Organism::RattusNorvegicus => "Rattus norvegicus",
        }
    }

    pub fn service_url(&self) -> &'static str {
        match self {
            Organism::CaenorhabditisElegans => {
                "https://intermine.wormbase.org/tools/wormmine/service"
            }
            Organism::DanioRerio => "https://zmine.zfin.org/service",
            Organism::DrosophilaMelanogaster => "https://www.flymine.org/query/service",
            Organism::HomoSapiens => "https://www.humanmine.org/humanmine/service",
            Organism::MusMusculus => "https://www.mousemine.org/mousemine/service",
            Organism::RattusNorvegicus => "https://ratmine.org/ratmine/service",
        }
    }

    /// All organisms, sorted by name.
    pub fn ordered() -> &'static [Organism] {
        &[
            Organism::CaenorhabditisElegans,
            Organism::DanioRerio,
            Organism::DrosophilaMelanogaster,
            Organism::HomoSapiens,
            Organism::MusMusculus,
            Organism::RattusNorvegicus,
        ]
    }
}

impl fmt::Display for Organism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Organism {
    type Err = UnknownOrganism;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Organism::ordered()
            .iter()
            .copied()
            .find(|o| o.as_str() == wanted)
            .ok_or_else(|| UnknownOrganism(s.to_string()))
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/organism.rs"]
mod tests;
