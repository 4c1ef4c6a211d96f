use std::collections::{BTreeMap, BTreeSet};

use crate::models::{Facet, NormalizedRecord};
use crate::state::QueryState;

/// Parse facet filter strings in the format "key=value" into a selection map.
/// Multiple values for the same key are collected; a value may itself be a
/// comma-separated list.
pub fn parse_facet_filters(facet_strings: &[String]) -> BTreeMap<String, BTreeSet<String>> {
    let mut facet_map: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

    for facet_str in facet_strings {
        if let Some((key, value)) = facet_str.split_once('=') {
            let values = value
                .split(',')
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string);
            let entry = facet_map.entry(key.trim().to_string()).or_default();
            entry.extend(values);
        }
    }

    facet_map.retain(|_, values| !values.is_empty());
    facet_map
}

/// Apply every filter to a record set, keeping input order
pub fn apply_filters<'a>(
    records: &'a [NormalizedRecord],
    state: &QueryState,
    facets: &[Facet],
) -> Vec<&'a NormalizedRecord> {
    let needle = search_needle(state);
    records
        .iter()
        .filter(|record| matches_filters(record, state, facets, &needle))
        .collect()
}

/// Apply everything except the facet filters.
/// This is the baseline facet counts are computed against.
pub fn apply_base_filters<'a>(
    records: &'a [NormalizedRecord],
    state: &QueryState,
) -> Vec<&'a NormalizedRecord> {
    let needle = search_needle(state);
    records
        .iter()
        .filter(|record| matches_search(record, &needle) && matches_thresholds(record, state))
        .collect()
}

/// Lower-cased, trimmed search text
pub fn search_needle(state: &QueryState) -> String {
    state.search.trim().to_lowercase()
}

/// Check if a record matches the given state
/// AND logic between filter categories, OR within one facet
pub fn matches_filters(
    record: &NormalizedRecord,
    state: &QueryState,
    facets: &[Facet],
    needle: &str,
) -> bool {
    matches_search(record, needle)
        && matches_facets(record, state, facets)
        && matches_thresholds(record, state)
}

/// Case-insensitive substring match; an empty needle matches everything
pub fn matches_search(record: &NormalizedRecord, needle: &str) -> bool {
    needle.is_empty() || record.haystack.contains(needle)
}

/// Equality facets. Selections under keys the dataset does not define are ignored.
pub fn matches_facets(record: &NormalizedRecord, state: &QueryState, facets: &[Facet]) -> bool {
    facets.iter().all(|facet| match state.facets.get(&facet.key) {
        Some(selected) if !selected.is_empty() => {
            selected.contains(record.field_text(&facet.field).as_str())
        }
        _ => true,
    })
}

/// Minimum flow count and boolean toggles
pub fn matches_thresholds(record: &NormalizedRecord, state: &QueryState) -> bool {
    record.flow_count >= state.min_flow
        && (!state.only_computable || record.computable)
        && (!state.only_ontology || record.ontology_candidate)
        && (!state.only_valid_set || record.has_valid_set)
}

/// Check if any filter is active
pub fn has_filters(state: &QueryState) -> bool {
    !state.search.trim().is_empty()
        || state.facets.values().any(|values| !values.is_empty())
        || state.min_flow > 0
        || state.only_computable
        || state.only_ontology
        || state.only_valid_set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Cluster, Field};
    use crate::state::Tab;
    use serde_json::json;

    fn record(id: &str, cluster: Cluster, computable: bool, flow: u64) -> NormalizedRecord {
        NormalizedRecord {
            id: id.to_string(),
            name: format!("{id} name"),
            cluster,
            semantic_type: String::new(),
            domain: String::new(),
            computable,
            ontology_candidate: false,
            has_valid_set: false,
            flow_count: flow,
            source: "test".to_string(),
            category: String::new(),
            haystack: format!("{id} | {id} name").to_lowercase(),
            raw: json!({"table": id}).as_object().cloned().unwrap_or_default(),
        }
    }

    fn state() -> QueryState {
        QueryState::new(Tab::Dataset("test".to_string()), "id", 25)
    }

    fn cluster_facet() -> Vec<Facet> {
        vec![Facet::new("cluster", "Cluster", Field::Cluster)]
    }

    #[test]
    fn test_search_matches_whole_query_text() {
        let mut r = record("B0006", Cluster::Other, false, 0);
        r.haystack = "b0006 | settlement price".to_string();
        assert!(matches_search(&r, "settlement price"));
        assert!(matches_search(&r, "ment pri"));
        assert!(!matches_search(&r, "price settlement"));
        assert!(matches_search(&r, ""));
    }

    #[test]
    fn test_parse_facet_filters() {
        let parsed = parse_facet_filters(&[
            "table=A".to_string(),
            "table=B, C".to_string(),
            "bad".to_string(),
            "empty=".to_string(),
        ]);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed["table"].len(), 3);
    }

    #[test]
    fn test_facet_or_within_and_across() {
        let records = vec![
            record("a", Cluster::Identity, true, 0),
            record("b", Cluster::Financial, false, 0),
            record("c", Cluster::Temporal, true, 0),
        ];
        let mut s = state();
        s.toggle_facet_value("cluster", "Identity");
        s.toggle_facet_value("cluster", "Temporal");
        let ids: Vec<_> = apply_filters(&records, &s, &cluster_facet())
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids, ["a", "c"]);

        s.set_search("c name");
        let ids: Vec<_> = apply_filters(&records, &s, &cluster_facet())
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids, ["c"]);
    }

    #[test]
    fn test_unknown_facet_key_is_ignored() {
        let records = vec![record("a", Cluster::Identity, true, 0)];
        let mut s = state();
        s.toggle_facet_value("nonexistent", "x");
        assert_eq!(apply_filters(&records, &s, &cluster_facet()).len(), 1);
    }

    #[test]
    fn test_stale_selection_yields_no_matches() {
        let records = vec![record("a", Cluster::Identity, true, 0)];
        let mut s = state();
        s.toggle_facet_value("cluster", "Financial");
        assert!(apply_filters(&records, &s, &cluster_facet()).is_empty());
        assert!(s.is_facet_selected("cluster", "Financial"));
    }

    #[test]
    fn test_thresholds_and_toggles() {
        let records = vec![
            record("a", Cluster::Other, true, 5),
            record("b", Cluster::Other, false, 10),
            record("c", Cluster::Other, true, 1),
        ];
        let mut s = state();
        s.set_min_flow(5);
        assert_eq!(apply_filters(&records, &s, &[]).len(), 2);
        s.only_computable = true;
        let ids: Vec<_> = apply_filters(&records, &s, &[]).iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["a"]);
    }

    #[test]
    fn test_base_filters_skip_facets() {
        let records = vec![
            record("a", Cluster::Identity, true, 0),
            record("b", Cluster::Financial, true, 0),
        ];
        let mut s = state();
        s.toggle_facet_value("cluster", "Identity");
        assert_eq!(apply_base_filters(&records, &s).len(), 2);
        assert!(has_filters(&s));
    }

    #[test]
    fn test_search_is_case_insensitive_and_trimmed() {
        let records = vec![record("B1610", Cluster::Other, false, 0)];
        let mut s = state();
        s.set_search("  b1610 ");
        assert_eq!(apply_filters(&records, &s, &[]).len(), 1);
    }
}
