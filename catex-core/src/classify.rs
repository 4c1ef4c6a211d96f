use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

use crate::models::Cluster;
use crate::value::{first_present, first_truthy_text, stable_string};

/// Keys holding the semantic type, nested classification first
pub const SEMANTIC_TYPE_KEYS: &[&str] = &[
    "smart_classification.semantic_type",
    "smart_classification.semanticType",
    "semantic_type",
    "semanticType",
];

/// Keys whose first non-empty value feeds the name heuristics
const NAME_BLOB_KEYS: &[&str] = &["item_name", "data_description", "calculation_code", "rule_id"];

/// Semantic-type substrings, in priority order
const SEMANTIC_RULES: &[(&[&str], Cluster)] = &[
    (&["identifier"], Cluster::Identity),
    (&["measurement"], Cluster::Measurement),
    (&["financial"], Cluster::Financial),
    (&["temporal"], Cluster::Temporal),
    (&["configuration", "constraint"], Cluster::ConfigRules),
    (&["descriptive"], Cluster::Descriptive),
];

/// Name heuristics, in priority order. Each token must end on a word boundary.
static NAME_RULES: LazyLock<Vec<(Regex, Cluster)>> = LazyLock::new(|| {
    [
        (r"(id|identifier|mpan|bmu|party|agent|serial|code)\b", Cluster::Identity),
        (r"(price|charge|cash|cost|credit|invoice|settlement|£)\b", Cluster::Financial),
        (r"(time|date|period|week|run|timestamp)\b", Cluster::Temporal),
        (
            r"(flag|status|indicator|cert|accredit|rule|constraint|validation)\b",
            Cluster::ConfigRules,
        ),
        (r"(volume|energy|mw|mwh|kwh|demand|forecast|meter)\b", Cluster::Measurement),
    ]
    .into_iter()
    .map(|(pattern, cluster)| (Regex::new(pattern).expect("valid cluster pattern"), cluster))
    .collect()
});

/// Semantic type of a raw record, empty when absent
pub fn semantic_type(record: &Map<String, Value>) -> String {
    first_present(record, SEMANTIC_TYPE_KEYS)
        .map(stable_string)
        .unwrap_or_default()
}

/// Assign a raw record to exactly one cluster
pub fn classify(record: &Map<String, Value>) -> Cluster {
    let name_blob = first_truthy_text(record, NAME_BLOB_KEYS);
    classify_parts(&semantic_type(record), &name_blob)
}

/// Cluster from a semantic type, falling back to name heuristics
pub fn classify_parts(semantic_type: &str, name_blob: &str) -> Cluster {
    let semantic = semantic_type.to_lowercase();
    for (needles, cluster) in SEMANTIC_RULES {
        if needles.iter().any(|needle| semantic.contains(needle)) {
            return *cluster;
        }
    }

    let name = name_blob.to_lowercase();
    NAME_RULES
        .iter()
        .find(|(pattern, _)| pattern.is_match(&name))
        .map(|(_, cluster)| *cluster)
        .unwrap_or(Cluster::Other)
}
