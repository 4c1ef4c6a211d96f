use std::collections::HashMap;

use crate::models::{Facet, FacetCount, NormalizedRecord};
use crate::sorting::collate;
use crate::state::QueryState;

/// Count distinct projected values.
/// Empty values are skipped; output is sorted by count descending, then by
/// value in locale order.
pub fn compute_counts<'a, I, F>(records: I, projection: F) -> Vec<FacetCount>
where
    I: IntoIterator<Item = &'a NormalizedRecord>,
    F: Fn(&NormalizedRecord) -> Option<String>,
{
    let mut counts: HashMap<String, usize> = HashMap::new();
    for record in records {
        match projection(record) {
            Some(value) if !value.is_empty() => *counts.entry(value).or_default() += 1,
            _ => {}
        }
    }

    let mut out: Vec<FacetCount> = counts
        .into_iter()
        .map(|(value, count)| FacetCount { value, count })
        .collect();
    out.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| collate(&a.value, &b.value, false))
            .then_with(|| a.value.cmp(&b.value))
    });
    out
}

/// Counts for one facet's field
pub fn facet_counts<'a, I>(records: I, facet: &Facet) -> Vec<FacetCount>
where
    I: IntoIterator<Item = &'a NormalizedRecord>,
{
    compute_counts(records, |record| Some(record.field_text(&facet.field)))
}

/// Option list for one facet, with the current selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetSummary {
    pub key: String,
    pub label: String,
    pub counts: Vec<FacetCount>,
    /// Selected values, including ones no longer present in `counts`
    pub selected: Vec<String>,
}

/// Summaries for every facet, counted against `baseline`
pub fn summarize(baseline: &[&NormalizedRecord], facets: &[Facet], state: &QueryState) -> Vec<FacetSummary> {
    facets
        .iter()
        .map(|facet| FacetSummary {
            key: facet.key.clone(),
            label: facet.label.clone(),
            counts: facet_counts(baseline.iter().copied(), facet),
            selected: state
                .facets
                .get(&facet.key)
                .map(|values| values.iter().cloned().collect())
                .unwrap_or_default(),
        })
        .collect()
}

/// The first `n` counts
pub fn top_n(counts: &[FacetCount], n: usize) -> &[FacetCount] {
    &counts[..counts.len().min(n)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Cluster, Field};
    use crate::state::Tab;
    use proptest::prelude::*;
    use serde_json::json;

    fn record(table: &str) -> NormalizedRecord {
        NormalizedRecord {
            id: table.to_string(),
            name: String::new(),
            cluster: Cluster::Other,
            semantic_type: String::new(),
            domain: String::new(),
            computable: false,
            ontology_candidate: false,
            has_valid_set: false,
            flow_count: 0,
            source: "test".to_string(),
            category: String::new(),
            haystack: String::new(),
            raw: json!({"table": table}).as_object().cloned().unwrap_or_default(),
        }
    }

    fn table_facet() -> Facet {
        Facet::new("table", "Table", Field::Raw("table".to_string()))
    }

    #[test]
    fn test_counts_sorted_by_count_then_value() {
        let records: Vec<_> = ["b", "a", "c", "c", "", "b", "c"].into_iter().map(record).collect();
        let counts = facet_counts(&records, &table_facet());
        let pairs: Vec<_> = counts.iter().map(|c| (c.value.as_str(), c.count)).collect();
        assert_eq!(pairs, [("c", 3), ("b", 2), ("a", 1)]);
    }

    #[test]
    fn test_ties_use_locale_order() {
        let records: Vec<_> = ["beta", "Alpha", "gamma"].into_iter().map(record).collect();
        let counts = facet_counts(&records, &table_facet());
        let values: Vec<_> = counts.iter().map(|c| c.value.as_str()).collect();
        assert_eq!(values, ["Alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_summary_keeps_stale_selection() {
        let records: Vec<_> = ["a"].into_iter().map(record).collect();
        let baseline: Vec<_> = records.iter().collect();
        let mut state = QueryState::new(Tab::Dataset("test".to_string()), "id", 25);
        state.toggle_facet_value("table", "gone");
        let summary = summarize(&baseline, &[table_facet()], &state);
        assert_eq!(summary[0].selected, ["gone"]);
        assert_eq!(summary[0].counts.len(), 1);
    }

    #[test]
    fn test_top_n() {
        let records: Vec<_> = ["a", "b", "c"].into_iter().map(record).collect();
        let counts = facet_counts(&records, &table_facet());
        assert_eq!(top_n(&counts, 2).len(), 2);
        assert_eq!(top_n(&counts, 10).len(), 3);
    }

    proptest! {
        #[test]
        fn counts_sum_to_non_empty_records(tables in proptest::collection::vec("[a-c]{0,1}", 0..40)) {
            let records: Vec<_> = tables.iter().map(|t| record(t)).collect();
            let counts = facet_counts(&records, &table_facet());
            let total: usize = counts.iter().map(|c| c.count).sum();
            let non_empty = tables.iter().filter(|t| !t.is_empty()).count();
            prop_assert_eq!(total, non_empty);
        }
    }
}
