use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::fmt;

use crate::value::{lookup, stable_string, CLASSIFICATION_KEY};

/// Coarse semantic grouping of a record
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Cluster {
    Identity,
    Measurement,
    Financial,
    Temporal,
    #[serde(rename = "Config/Rules")]
    ConfigRules,
    Descriptive,
    #[default]
    Other,
}

impl Cluster {
    pub const ALL: [Cluster; 7] = [
        Cluster::Identity,
        Cluster::Measurement,
        Cluster::Financial,
        Cluster::Temporal,
        Cluster::ConfigRules,
        Cluster::Descriptive,
        Cluster::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Cluster::Identity => "Identity",
            Cluster::Measurement => "Measurement",
            Cluster::Financial => "Financial",
            Cluster::Temporal => "Temporal",
            Cluster::ConfigRules => "Config/Rules",
            Cluster::Descriptive => "Descriptive",
            Cluster::Other => "Other",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Cluster::ALL
            .into_iter()
            .find(|cluster| cluster.as_str().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A catalogue record with its derived fields.
///
/// Built once per catalogue load and never mutated afterwards. The original
/// fields stay untouched in `raw`; derived values live in their own fields so
/// nothing in the source record is shadowed.
#[derive(Debug, Clone, Serialize)]
pub struct NormalizedRecord {
    pub id: String,
    pub name: String,
    pub cluster: Cluster,
    pub semantic_type: String,
    pub domain: String,
    pub computable: bool,
    pub ontology_candidate: bool,
    pub has_valid_set: bool,
    pub flow_count: u64,
    /// Tag of the adapter that produced the record
    pub source: String,
    /// Category name for records extracted from a map-of-arrays section
    pub category: String,
    /// Lower-cased text the search filter matches against
    #[serde(skip)]
    pub haystack: String,
    pub raw: Map<String, Value>,
}

impl NormalizedRecord {
    /// Look up a raw field by key or dotted path.
    /// A bare key missing at the top level is also looked up in the
    /// classification sub-object.
    pub fn raw_field(&self, path: &str) -> Option<&Value> {
        lookup(&self.raw, path).or_else(|| {
            if path.contains('.') {
                return None;
            }
            self.raw.get(CLASSIFICATION_KEY)?.get(path)
        })
    }

    /// Project a field for sorting, faceting or display
    pub fn field(&self, field: &Field) -> FieldValue {
        match field {
            Field::Id => FieldValue::Text(self.id.clone()),
            Field::Name => FieldValue::Text(self.name.clone()),
            Field::Cluster => FieldValue::Text(self.cluster.as_str().to_string()),
            Field::SemanticType => FieldValue::Text(self.semantic_type.clone()),
            Field::Domain => FieldValue::Text(self.domain.clone()),
            Field::FlowCount => FieldValue::Number(self.flow_count as f64),
            Field::Computable => FieldValue::Text(self.computable.to_string()),
            Field::OntologyCandidate => FieldValue::Text(self.ontology_candidate.to_string()),
            Field::HasValidSet => FieldValue::Text(self.has_valid_set.to_string()),
            Field::Source => FieldValue::Text(self.source.clone()),
            Field::Category => FieldValue::Text(self.category.clone()),
            Field::Raw(path) => match self.raw_field(path) {
                Some(Value::Number(n)) => n
                    .as_f64()
                    .map(FieldValue::Number)
                    .unwrap_or_else(|| FieldValue::Text(n.to_string())),
                Some(value) => FieldValue::Text(stable_string(value)),
                None => FieldValue::Text(String::new()),
            },
        }
    }

    /// Field projected as text
    pub fn field_text(&self, field: &Field) -> String {
        self.field(field).to_text().into_owned()
    }
}

/// Addressable field of a normalized record
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Field {
    Id,
    Name,
    Cluster,
    SemanticType,
    Domain,
    FlowCount,
    Computable,
    OntologyCandidate,
    HasValidSet,
    Source,
    Category,
    /// Key or dotted path into the original record
    Raw(String),
}

impl Field {
    /// Parse a sort/facet key. Leading underscores are ignored so that
    /// `__id`, `_table` and `table` all resolve.
    pub fn parse(key: &str) -> Self {
        match key.trim().trim_start_matches('_') {
            "id" => Field::Id,
            "name" => Field::Name,
            "cluster" => Field::Cluster,
            "semantic" | "semantic_type" => Field::SemanticType,
            "domain" => Field::Domain,
            "flow" | "flow_count" => Field::FlowCount,
            "computable" => Field::Computable,
            "ontology" | "ontology_candidate" => Field::OntologyCandidate,
            "has_valid_set" | "hasValidSet" => Field::HasValidSet,
            "source" => Field::Source,
            "category" => Field::Category,
            other => Field::Raw(other.to_string()),
        }
    }
}

/// A projected field value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            FieldValue::Number(n) => Cow::Owned(n.to_string()),
            FieldValue::Text(s) => Cow::Borrowed(s),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, FieldValue::Text(s) if s.is_empty())
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

/// A filterable dimension of a dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Facet {
    /// Key used in URLs and selections
    pub key: String,
    pub label: String,
    pub field: Field,
}

impl Facet {
    pub fn new(key: &str, label: &str, field: Field) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            field,
        }
    }
}

/// Number of records sharing one value of a facet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetCount {
    pub value: String,
    pub count: usize,
}
