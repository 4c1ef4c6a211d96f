use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::adapters::{Adapter, Normalizable};
use crate::facets::FacetSummary;
use crate::models::{Facet, NormalizedRecord};
use crate::normalize::normalize;
use crate::pipeline::{facet_summaries, query, QueryResult};
use crate::state::QueryState;
use crate::value::stable_string;

/// Document metadata from the catalogue's `metadata` object
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CatalogueMeta {
    pub document_title: Option<String>,
    pub document_reference: Option<String>,
    pub version: Option<String>,
    pub status: Option<String>,
    pub effective_from_date: Option<String>,
    pub bsc_section_reference: Option<String>,
    pub smart_level: Option<String>,
    pub smart_level_notes: Option<String>,
    pub statistics: Statistics,
}

/// Numeric entries of `metadata.statistics`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Statistics(BTreeMap<String, u64>);

impl Statistics {
    pub fn get(&self, key: &str) -> Option<u64> {
        self.0.get(key).copied()
    }

    pub fn total_data_items(&self) -> Option<u64> {
        self.get("total_data_items")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.0.iter().map(|(key, value)| (key.as_str(), *value))
    }
}

impl CatalogueMeta {
    /// Read metadata from a catalogue document.
    /// Scalars may be strings or numbers; empty values are treated as absent.
    pub fn from_document(document: &Value) -> Self {
        let meta = document.get("metadata");
        let text = |key: &str| -> Option<String> {
            meta.and_then(|m| m.get(key))
                .map(stable_string)
                .filter(|s| !s.is_empty())
        };

        let statistics = meta
            .and_then(|m| m.get("statistics"))
            .and_then(|s| s.as_object())
            .map(|stats| {
                stats
                    .iter()
                    .filter_map(|(key, value)| {
                        let count = match value {
                            Value::Number(n) => n.as_u64(),
                            Value::String(s) => s.trim().parse::<u64>().ok(),
                            _ => None,
                        }?;
                        Some((key.clone(), count))
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            document_title: text("document_title"),
            document_reference: text("document_reference"),
            version: text("version"),
            status: text("status"),
            effective_from_date: text("effective_from_date"),
            bsc_section_reference: text("bsc_section_reference"),
            smart_level: text("smart_level"),
            smart_level_notes: text("smart_level_notes"),
            statistics: Statistics(statistics),
        }
    }

    /// One-line summary: title · vVERSION · STATUS · effective DATE · N items
    pub fn summary_line(&self) -> String {
        let mut bits = Vec::new();
        if let Some(title) = &self.document_title {
            bits.push(title.clone());
        }
        if let Some(version) = &self.version {
            bits.push(format!("v{version}"));
        }
        if let Some(status) = &self.status {
            bits.push(status.clone());
        }
        if let Some(date) = &self.effective_from_date {
            bits.push(format!("effective {date}"));
        }
        if let Some(total) = self.statistics.total_data_items().filter(|n| *n > 0) {
            bits.push(format!("{} items", format_thousands(total)));
        }
        bits.join(" · ")
    }
}

/// Group digits in threes: 12345 -> "12,345"
pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, c) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// One dataset's normalized records
#[derive(Debug, Clone)]
pub struct Dataset {
    pub adapter: Adapter,
    pub records: Vec<NormalizedRecord>,
}

impl Dataset {
    pub fn from_document(adapter: Adapter, document: &Value) -> Self {
        let records = normalize(&adapter, document);
        Self { adapter, records }
    }

    pub fn tag(&self) -> &str {
        self.adapter.source_tag()
    }

    pub fn label(&self) -> &str {
        self.adapter.label()
    }

    pub fn facets(&self) -> Vec<Facet> {
        self.adapter.facets()
    }

    pub fn query(&self, state: &QueryState) -> QueryResult<'_> {
        query(&self.records, state, &self.facets())
    }

    pub fn facet_summaries(&self, state: &QueryState) -> Vec<FacetSummary> {
        facet_summaries(&self.records, state, &self.facets())
    }

    /// Record with the given id, first match
    pub fn find(&self, id: &str) -> Option<&NormalizedRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    /// Size reported by the catalogue statistics, else the record count
    pub fn reported_size(&self, meta: &CatalogueMeta) -> u64 {
        self.adapter
            .statistic_key()
            .and_then(|key| meta.statistics.get(key))
            .unwrap_or(self.records.len() as u64)
    }
}

/// A loaded catalogue. Immutable once built; reloading replaces it whole.
#[derive(Debug, Clone)]
pub struct Catalogue {
    /// Location the document was loaded from
    pub location: String,
    pub meta: CatalogueMeta,
    pub datasets: Vec<Dataset>,
    pub document: Value,
}

impl Catalogue {
    pub fn from_document(location: &str, document: Value, adapters: &[Adapter]) -> Self {
        let meta = CatalogueMeta::from_document(&document);
        let datasets: Vec<Dataset> = adapters
            .iter()
            .cloned()
            .map(|adapter| Dataset::from_document(adapter, &document))
            .collect();

        tracing::info!(
            location,
            datasets = datasets.len(),
            records = datasets.iter().map(|d| d.records.len()).sum::<usize>(),
            "catalogue ready"
        );

        Self {
            location: location.to_string(),
            meta,
            datasets,
            document,
        }
    }

    pub fn dataset(&self, tag: &str) -> Option<&Dataset> {
        self.datasets.iter().find(|dataset| dataset.tag() == tag)
    }

    pub fn record_count(&self) -> usize {
        self.datasets.iter().map(|d| d.records.len()).sum()
    }
}
