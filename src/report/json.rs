use std::path::Path;

use serde::Serialize;

use crate::pipeline::network::WheelSummary;
use crate::report::ReportError;

#[derive(Debug, Clone, Serialize)]
pub struct ToolSummary {
    pub name: String,
    pub version: String,
}

impl Default for ToolSummary {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub name: String,
    pub core_symbol: String,
    pub primary_rows: usize,
    pub secondary_rows: usize,
}

impl From<&WheelSummary> for DatasetSummary {
    fn from(value: &WheelSummary) -> Self {
        Self {
            name: value.name.clone(),
            core_symbol: value.core_symbol.clone(),
            primary_rows: value.primary_rows,
            secondary_rows: value.secondary_rows,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NetworkSummary {
    pub tool: ToolSummary,
    pub organism: String,
    pub download_requested: bool,
    pub download_effective: bool,
    pub datasets: Vec<DatasetSummary>,
    pub total_rows: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttributeSubmission {
    pub file: String,
    pub kind: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kept_rows: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dropped_rows: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttributeSummary {
    pub tool: ToolSummary,
    pub organism: String,
    pub nodes: usize,
    pub submissions: Vec<AttributeSubmission>,
    pub output_rows: usize,
    pub output_columns: Vec<String>,
}

pub fn write_summary<T: Serialize>(path: &Path, summary: &T) -> Result<(), ReportError> {
    let json = serde_json::to_string_pretty(summary)?;
    std::fs::write(path, json)?;
    Ok(())
}
