use serde_json::{Map, Value};

use crate::adapters::{Normalizable, RawEntry, SearchScope};
use crate::classify::{classify, semantic_type};
use crate::models::{Field, NormalizedRecord};
use crate::value::{boolish, coerce_count, first_present, stable_string, truthy};

const DOMAIN_KEYS: &[&str] = &[
    "domain",
    "smart_classification.domain",
    "data_domain",
    "dataDomain",
];
const COMPUTABLE_KEYS: &[&str] = &["smart_classification.is_computable", "is_computable"];
const ONTOLOGY_KEYS: &[&str] = &[
    "smart_classification.ontology_candidate",
    "ontology_candidate",
];
const FLOW_KEYS: &[&str] = &[
    "data_flow_count",
    "smart_classification.data_flow_count",
    "flow_count",
    "flowCount",
];
const VALID_SET_KEYS: &[&str] = &["valid_set_name", "valid_set_values", "valid_set", "validSet"];

/// Normalize every record an adapter extracts from a catalogue payload.
/// No record is dropped; missing fields degrade to empty, zero or false.
pub fn normalize<A: Normalizable + ?Sized>(adapter: &A, payload: &Value) -> Vec<NormalizedRecord> {
    let records: Vec<NormalizedRecord> = adapter
        .extract(payload)
        .into_iter()
        .map(|entry| normalize_entry(adapter, entry))
        .collect();

    tracing::debug!(
        source = adapter.source_tag(),
        count = records.len(),
        "normalized dataset"
    );
    records
}

/// Normalize a single raw record
pub fn normalize_entry<A: Normalizable + ?Sized>(adapter: &A, entry: RawEntry) -> NormalizedRecord {
    let RawEntry { category, fields } = entry;

    let mut record = NormalizedRecord {
        id: adapter.derive_id(&fields),
        name: adapter.derive_name(&fields),
        cluster: classify(&fields),
        semantic_type: semantic_type(&fields),
        domain: text_of(&fields, DOMAIN_KEYS),
        computable: first_present(&fields, COMPUTABLE_KEYS).is_some_and(boolish),
        ontology_candidate: first_present(&fields, ONTOLOGY_KEYS).is_some_and(boolish),
        has_valid_set: VALID_SET_KEYS
            .iter()
            .filter_map(|key| fields.get(*key))
            .any(truthy),
        flow_count: first_present(&fields, FLOW_KEYS).map_or(0, coerce_count),
        source: adapter.source_tag().to_string(),
        category: category.unwrap_or_default(),
        haystack: String::new(),
        raw: fields,
    };
    record.haystack = build_haystack(&record, &adapter.search_scope());
    record
}

fn text_of(fields: &Map<String, Value>, keys: &[&str]) -> String {
    first_present(fields, keys)
        .map(stable_string)
        .unwrap_or_default()
}

/// Lower-cased search text for a record
pub fn build_haystack(record: &NormalizedRecord, scope: &SearchScope) -> String {
    match scope {
        SearchScope::WholeRecord => Value::Object(record.raw.clone()).to_string().to_lowercase(),
        SearchScope::Fields(fields) => {
            let mut parts = vec![record.id.clone(), record.name.clone()];
            for field in fields {
                match field {
                    Field::Raw(path) => match record.raw_field(path) {
                        Some(Value::Array(items)) => {
                            parts.extend(items.iter().map(stable_string));
                        }
                        Some(value) => parts.push(stable_string(value)),
                        None => {}
                    },
                    derived => parts.push(record.field_text(derived)),
                }
            }
            parts.retain(|part| !part.is_empty());
            parts.join(" | ").to_lowercase()
        }
    }
}
