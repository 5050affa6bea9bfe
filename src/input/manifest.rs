use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::model::organism::Organism;
use crate::resolver::intermine::ServiceConfig;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("toml parse error in {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("missing required input: {0}")]
    Missing(String),
}

/// One submitted interaction dataset.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetEntry {
    #[serde(default)]
    pub name: String,
    pub file: PathBuf,
    #[serde(default)]
    pub header: bool,
    pub core: String,
    #[serde(default)]
    pub technique: String,
    /// Column positions holding interactor identifiers.
    #[serde(default = "default_columns")]
    pub columns: Vec<usize>,
}

fn default_columns() -> Vec<usize> {
    vec![0]
}

#[derive(Debug, Clone, Deserialize)]
pub struct NetworkManifest {
    #[serde(default)]
    pub organism: Organism,
    /// Whether second-degree interaction partners should be fetched.
    #[serde(default)]
    pub download: bool,
    #[serde(default, rename = "dataset")]
    pub datasets: Vec<DatasetEntry>,
    #[serde(default)]
    pub service: ServiceConfig,
}

/// How an attribute file is to be read.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum AttributeKind {
    /// Every named column is a list of genes sharing that property.
    List,
    /// One column holds gene identifiers, the rest hold values.
    DiscreteContinuous { mapping_key: usize },
}

#[derive(Debug, Clone, Deserialize)]
pub struct AttributeEntry {
    #[serde(flatten)]
    pub kind: AttributeKind,
    pub file: PathBuf,
    #[serde(default)]
    pub header: bool,
    /// Column names by position; blank drops the column. Positions past the
    /// end fall back to the header name, or blank without a header.
    #[serde(default)]
    pub names: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AttributeManifest {
    #[serde(default)]
    pub organism: Organism,
    pub network: PathBuf,
    #[serde(default, rename = "attribute")]
    pub attributes: Vec<AttributeEntry>,
    #[serde(default)]
    pub service: ServiceConfig,
}

impl NetworkManifest {
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let mut manifest: NetworkManifest = parse(path)?;
        let base = base_dir(path);
        for (i, dataset) in manifest.datasets.iter_mut().enumerate() {
            if dataset.name.trim().is_empty() {
                dataset.name = format!("dataset-{}", i + 1);
            }
            if dataset.file.as_os_str().is_empty() {
                return Err(ManifestError::Missing(format!(
                    "file path for {}",
                    dataset.name
                )));
            }
            if dataset.core.trim().is_empty() {
                return Err(ManifestError::Missing(format!(
                    "core gene for {}",
                    dataset.name
                )));
            }
            dataset.core = dataset.core.trim().to_string();
            dataset.file = base.join(&dataset.file);
        }
        if manifest.datasets.is_empty() {
            return Err(ManifestError::Missing("at least one [[dataset]]".to_string()));
        }
        Ok(manifest)
    }
}

impl AttributeManifest {
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let mut manifest: AttributeManifest = parse(path)?;
        let base = base_dir(path);
        if manifest.network.as_os_str().is_empty() {
            return Err(ManifestError::Missing("network table path".to_string()));
        }
        manifest.network = base.join(&manifest.network);
        for attribute in &mut manifest.attributes {
            if attribute.file.as_os_str().is_empty() {
                return Err(ManifestError::Missing("attribute table path".to_string()));
            }
            attribute.file = base.join(&attribute.file);
        }
        if manifest.attributes.is_empty() {
            return Err(ManifestError::Missing(
                "at least one [[attribute]]".to_string(),
            ));
        }
        Ok(manifest)
    }
}

fn parse<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, ManifestError> {
    let text = fs::read_to_string(path).map_err(|source| ManifestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| ManifestError::Toml {
        path: path.to_path_buf(),
        source,
    })
}

fn base_dir(path: &Path) -> PathBuf {
    path.parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/manifest.rs"]
mod tests;
