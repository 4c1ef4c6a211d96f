//! Dataset adapters.
//!
//! Catalogue variants disagree on where records live and what their fields are
//! called. Each adapter knows one variant: where to find its records, which
//! keys identify and describe them, what can be faceted and searched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::{Facet, Field};
use crate::value::first_truthy_text;

/// Identifier candidates, most specific first
pub const ID_KEYS: &[&str] = &[
    "item_reference",
    "item_id",
    "bmrs_code",
    "calculation_code",
    "rule_id",
    "id",
];

/// Descriptive-text candidates, most specific first
pub const NAME_KEYS: &[&str] = &[
    "item_name",
    "data_description",
    "expansion",
    "description",
    "title",
    "requirement",
];

/// A raw record pulled out of a catalogue payload
#[derive(Debug, Clone, PartialEq)]
pub struct RawEntry {
    /// Category key when the section is a map of arrays
    pub category: Option<String>,
    pub fields: Map<String, Value>,
}

/// What the text search looks at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchScope {
    /// Id, name and the listed fields; array values contribute every element
    Fields(Vec<Field>),
    /// The whole record serialized as JSON
    WholeRecord,
}

/// Uniform capability every dataset adapter provides
pub trait Normalizable {
    /// Tag stamped on every produced record
    fn source_tag(&self) -> &str;

    /// Human-readable dataset name
    fn label(&self) -> &str;

    /// Pull the flat list of raw records out of a catalogue document
    fn extract(&self, payload: &Value) -> Vec<RawEntry>;

    fn derive_id(&self, raw: &Map<String, Value>) -> String {
        first_truthy_text(raw, ID_KEYS)
    }

    fn derive_name(&self, raw: &Map<String, Value>) -> String {
        first_truthy_text(raw, NAME_KEYS)
    }

    fn facets(&self) -> Vec<Facet>;

    fn search_scope(&self) -> SearchScope;

    fn default_sort_key(&self) -> &str;

    /// Facet keys charted on the overview page
    fn overview_facets(&self) -> Vec<&'static str> {
        vec!["cluster"]
    }
}

/// The closed set of catalogue dataset variants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Adapter {
    /// `reporting_items`: flat array of reporting codes
    Reporting,
    /// `calculated_data_items`: flat array of derived fields
    Calculated,
    /// `functional_requirements`: map of category to requirement entries
    Requirements,
    /// Any other section, flat array or map of arrays
    Section { tag: String, section: String },
}

impl Adapter {
    /// Catalogue key the adapter reads
    pub fn section(&self) -> &str {
        match self {
            Adapter::Reporting => "reporting_items",
            Adapter::Calculated => "calculated_data_items",
            Adapter::Requirements => "functional_requirements",
            Adapter::Section { section, .. } => section,
        }
    }

    /// Key of the catalogue statistic that reports this dataset's size
    pub fn statistic_key(&self) -> Option<&'static str> {
        match self {
            Adapter::Reporting => Some("total_reporting_items"),
            Adapter::Calculated => Some("calculated_data_items"),
            Adapter::Requirements => Some("functional_rules_extracted"),
            Adapter::Section { .. } => Some("total_data_items"),
        }
    }

    pub fn defaults() -> Vec<Adapter> {
        vec![Adapter::Reporting, Adapter::Calculated, Adapter::Requirements]
    }
}

impl Normalizable for Adapter {
    fn source_tag(&self) -> &str {
        match self {
            Adapter::Reporting => "reporting",
            Adapter::Calculated => "calculated",
            Adapter::Requirements => "requirements",
            Adapter::Section { tag, .. } => tag,
        }
    }

    fn label(&self) -> &str {
        match self {
            Adapter::Reporting => "Reporting items",
            Adapter::Calculated => "Calculated items",
            Adapter::Requirements => "Functional requirements",
            Adapter::Section { tag, .. } => tag,
        }
    }

    fn extract(&self, payload: &Value) -> Vec<RawEntry> {
        extract_section(payload, self.section())
    }

    fn facets(&self) -> Vec<Facet> {
        match self {
            Adapter::Reporting => vec![
                Facet::new("cluster", "Cluster", Field::Cluster),
                Facet::new("table", "Table", Field::Raw("table".to_string())),
                Facet::new("semantic_type", "Semantic type", Field::SemanticType),
                Facet::new(
                    "data_provider",
                    "Provider",
                    Field::Raw("smart_classification.data_provider".to_string()),
                ),
                Facet::new("frequency", "Frequency", Field::Raw("frequency".to_string())),
                Facet::new(
                    "temporal_scope",
                    "Temporal scope",
                    Field::Raw("temporal_scope".to_string()),
                ),
                Facet::new(
                    "granularity",
                    "Granularity",
                    Field::Raw("granularity".to_string()),
                ),
                Facet::new(
                    "ontology_candidate",
                    "Ontology candidate",
                    Field::OntologyCandidate,
                ),
            ],
            Adapter::Calculated => vec![
                Facet::new("cluster", "Cluster", Field::Cluster),
                Facet::new("semantic_type", "Semantic type", Field::SemanticType),
                Facet::new("bsc_section", "BSC section", Field::Raw("bsc_section".to_string())),
            ],
            Adapter::Requirements => vec![
                Facet::new("category", "Category", Field::Category),
                Facet::new("cluster", "Cluster", Field::Cluster),
            ],
            Adapter::Section { .. } => vec![
                Facet::new("cluster", "Cluster", Field::Cluster),
                Facet::new("domain", "Domain", Field::Domain),
                Facet::new("semantic", "Semantic type", Field::SemanticType),
            ],
        }
    }

    fn search_scope(&self) -> SearchScope {
        let raw = |keys: &[&str]| -> Vec<Field> {
            keys.iter().map(|key| Field::Raw(key.to_string())).collect()
        };

        match self {
            Adapter::Reporting => SearchScope::Fields(raw(&[
                "bmrs_code",
                "data_description",
                "frequency",
                "format",
                "default",
                "temporal_scope",
                "granularity",
                "table",
                "smart_classification.semantic_type",
                "smart_classification.data_provider",
                "smart_classification.bsc_section_references",
                "smart_classification.related_bmrs_codes",
            ])),
            Adapter::Calculated | Adapter::Requirements => SearchScope::WholeRecord,
            Adapter::Section { .. } => SearchScope::Fields(raw(&[
                "notes",
                "description",
                "data_description",
                "defined_in",
                "bsc_section",
                "bmrs_code",
            ])),
        }
    }

    fn default_sort_key(&self) -> &str {
        match self {
            Adapter::Reporting => "bmrs_code",
            Adapter::Calculated => "calculation_code",
            Adapter::Requirements => "category",
            Adapter::Section { .. } => "id",
        }
    }

    fn overview_facets(&self) -> Vec<&'static str> {
        match self {
            Adapter::Reporting => vec!["table", "semantic_type", "data_provider"],
            _ => vec!["cluster"],
        }
    }
}

/// Pull records from a section that is either a flat array or a map of arrays.
/// Non-object array elements are kept under a `value` key so nothing is dropped.
pub fn extract_section(payload: &Value, section: &str) -> Vec<RawEntry> {
    match payload.get(section) {
        Some(Value::Array(items)) => items.iter().map(|item| entry(None, item)).collect(),
        Some(Value::Object(categories)) => categories
            .iter()
            .filter_map(|(category, items)| items.as_array().map(|items| (category, items)))
            .flat_map(|(category, items)| {
                items.iter().map(move |item| entry(Some(category.clone()), item))
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn entry(category: Option<String>, item: &Value) -> RawEntry {
    let fields = match item {
        Value::Object(map) => map.clone(),
        other => {
            let mut map = Map::new();
            map.insert("value".to_string(), other.clone());
            map
        }
    };
    RawEntry { category, fields }
}
