use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::rc::Rc;
use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::model::organism::Organism;
use crate::resolver::{ResolveError, ResolvedRow, Resolver};

pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
const ROOT_CLASS: &str = "Gene";

/// Endpoint and transport settings for the InterMine services.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Per-organism endpoint overrides, keyed by organism name.
    #[serde(default)]
    pub endpoints: BTreeMap<Organism, String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            endpoints: BTreeMap::new(),
        }
    }
}

impl ServiceConfig {
    pub fn endpoint(&self, organism: Organism) -> String {
        self.endpoints
            .get(&organism)
            .cloned()
            .unwrap_or_else(|| organism.service_url().to_string())
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Resolver backed by the organism's InterMine web service.
///
/// Each call validates the requested paths against the service's data model
/// (fetched once per organism) and then issues a single path query.
#[derive(Debug)]
pub struct InterMineClient {
    client: Client,
    config: ServiceConfig,
    models: RefCell<HashMap<Organism, Rc<DataModel>>>,
}

impl InterMineClient {
    pub fn new(config: ServiceConfig) -> Result<Self, ResolveError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(format!("netr-attr/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            config,
            models: RefCell::new(HashMap::new()),
        })
    }

    fn model(&self, organism: Organism) -> Result<Rc<DataModel>, ResolveError> {
        if let Some(model) = self.models.borrow().get(&organism) {
            return Ok(Rc::clone(model));
        }
        let url = format!("{}/model", self.config.endpoint(organism));
        debug!(%organism, url = %url, "fetching data model");
        let response = self
            .client
            .get(&url)
            .query(&[("format", "json")])
            .send()?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            return Err(ResolveError::Service {
                status,
                message: format!("model request to {url} failed"),
            });
        }
        let envelope: ModelEnvelope = response
            .json()
            .map_err(|e| ResolveError::Decode(format!("data model: {e}")))?;
        let model = Rc::new(envelope.model);
        self.models
            .borrow_mut()
            .insert(organism, Rc::clone(&model));
        Ok(model)
    }
}

impl Resolver for InterMineClient {
    fn resolve(
        &self,
        identifiers: &[String],
        organism: Organism,
        fields: &[&str],
    ) -> Result<Vec<ResolvedRow>, ResolveError> {
        if identifiers.is_empty() {
            return Err(ResolveError::EmptyBatch);
        }
        let model = self.model(organism)?;
        for field in fields {
            if !model.has_path(ROOT_CLASS, field) {
                return Err(ResolveError::UnsupportedField {
                    organism,
                    path: (*field).to_string(),
                });
            }
        }

        let url = format!("{}/query/results", self.config.endpoint(organism));
        let xml = query_xml(identifiers, organism, fields);
        debug!(%organism, n_ids = identifiers.len(), query = %xml, "posting path query");
        let response = self
            .client
            .post(&url)
            .form(&[("query", xml.as_str()), ("format", "json")])
            .send()?;
        let status = response.status().as_u16();
        let body: ResultsEnvelope = response
            .json()
            .map_err(|e| ResolveError::Decode(format!("query results: {e}")))?;
        decode_results(status, body, fields.len())
    }
}

/// Turns a query-results response into rows of `n_fields` cells.
fn decode_results(
    status: u16,
    body: ResultsEnvelope,
    n_fields: usize,
) -> Result<Vec<ResolvedRow>, ResolveError> {
    if !(200..300).contains(&status) || body.error.is_some() {
        return Err(ResolveError::Service {
            status,
            message: body.error.unwrap_or_else(|| "query failed".to_string()),
        });
    }
    let rows = body
        .results
        .into_iter()
        .map(|row| row.into_iter().map(cell_to_string).collect::<Vec<_>>())
        .collect::<Vec<_>>();
    for row in &rows {
        if row.len() != n_fields {
            return Err(ResolveError::Decode(format!(
                "expected {n_fields} cells per row, got {}",
                row.len()
            )));
        }
    }
    Ok(rows)
}

/// Path query selecting `fields` on genes matching any of `identifiers` in
/// `organism`. Case handling is left to the service's LOOKUP operator, which
/// path queries cannot make case-sensitive.
pub fn query_xml(identifiers: &[String], organism: Organism, fields: &[&str]) -> String {
    let view = fields
        .iter()
        .map(|f| format!("{ROOT_CLASS}.{f}"))
        .collect::<Vec<_>>()
        .join(" ");
    let lookup = identifiers.join(",");
    format!(
        "<query model=\"genomic\" view=\"{}\" constraintLogic=\"A and B\">\
         <constraint path=\"{ROOT_CLASS}\" op=\"LOOKUP\" value=\"{}\" code=\"A\"/>\
         <constraint path=\"{ROOT_CLASS}.organism.name\" op=\"=\" value=\"{}\" code=\"B\"/>\
         </query>",
        escape_xml(&view),
        escape_xml(&lookup),
        escape_xml(organism.as_str())
    )
}

fn escape_xml(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}

fn cell_to_string(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    }
}

#[derive(Debug, Deserialize)]
struct ResultsEnvelope {
    #[serde(default)]
    results: Vec<Vec<Value>>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ModelEnvelope {
    model: DataModel,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataModel {
    #[serde(default)]
    pub classes: HashMap<String, ClassDescriptor>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClassDescriptor {
    #[serde(default)]
    pub extends: Vec<String>,
    #[serde(default)]
    pub attributes: HashMap<String, Value>,
    #[serde(default)]
    pub references: HashMap<String, FieldReference>,
    #[serde(default)]
    pub collections: HashMap<String, FieldReference>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FieldReference {
    #[serde(rename = "referencedType")]
    pub referenced_type: String,
}

enum FieldKind<'a> {
    Attribute,
    Reference(&'a str),
}

impl DataModel {
    /// True if the dotted `path` ends in an attribute reachable from `root`.
    pub fn has_path(&self, root: &str, path: &str) -> bool {
        let mut class = root.to_string();
        let mut segments = path.split('.').peekable();
        while let Some(segment) = segments.next() {
            let last = segments.peek().is_none();
            match self.find_field(&class, segment, &mut HashSet::new()) {
                Some(FieldKind::Attribute) => return last,
                Some(FieldKind::Reference(next)) => {
                    if last {
                        return false;
                    }
                    class = next.to_string();
                }
                None => return false,
            }
        }
        false
    }

    fn find_field<'a>(
        &'a self,
        class: &str,
        field: &str,
        visited: &mut HashSet<String>,
    ) -> Option<FieldKind<'a>> {
        if !visited.insert(class.to_string()) {
            return None;
        }
        let descriptor = self.classes.get(class)?;
        if descriptor.attributes.contains_key(field) {
            return Some(FieldKind::Attribute);
        }
        if let Some(r) = descriptor
            .references
            .get(field)
            .or_else(|| descriptor.collections.get(field))
        {
            return Some(FieldKind::Reference(&r.referenced_type));
        }
        descriptor
            .extends
            .iter()
            .find_map(|parent| self.find_field(parent, field, visited))
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/resolver/intermine.rs"]
mod tests;
