//! Filter, sort and paginate.
//!
//! `query` is a pure function of the record set and the query state. It never
//! mutates the state; the clamped page it reports is for the caller to write
//! back if it wants to.

use serde::Serialize;

use crate::facets::{summarize, FacetSummary};
use crate::filtering::{apply_base_filters, apply_filters};
use crate::models::{Facet, NormalizedRecord};
use crate::sorting::sort_records;
use crate::state::QueryState;

/// One page of query results
#[derive(Debug, Clone)]
pub struct QueryResult<'a> {
    /// Records on the current page
    pub records: Vec<&'a NormalizedRecord>,
    /// Records matching every filter
    pub total: usize,
    pub pages: usize,
    /// Current page after clamping into `1..=pages`
    pub page: usize,
    pub page_size: usize,
    pub kpis: Kpis,
}

/// Headline counts over the filtered set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Kpis {
    pub total: usize,
    pub computable: usize,
    pub ontology: usize,
    pub valid_set: usize,
}

impl Kpis {
    pub fn from_records(records: &[&NormalizedRecord]) -> Self {
        Self {
            total: records.len(),
            computable: records.iter().filter(|r| r.computable).count(),
            ontology: records.iter().filter(|r| r.ontology_candidate).count(),
            valid_set: records.iter().filter(|r| r.has_valid_set).count(),
        }
    }
}

/// Page bounds for a result set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub total: usize,
    pub pages: usize,
    pub page: usize,
    pub start: usize,
    pub end: usize,
}

/// Clamp the requested page into `[1, max(1, ceil(total / page_size))]`
pub fn paginate(total: usize, page: usize, page_size: usize) -> Pagination {
    let page_size = page_size.max(1);
    let pages = total.div_ceil(page_size).max(1);
    let page = page.clamp(1, pages);
    let start = ((page - 1) * page_size).min(total);
    let end = (start + page_size).min(total);
    Pagination {
        total,
        pages,
        page,
        start,
        end,
    }
}

/// Run the whole pipeline: search, facets, thresholds, toggles, sort, page
pub fn query<'a>(
    records: &'a [NormalizedRecord],
    state: &QueryState,
    facets: &[Facet],
) -> QueryResult<'a> {
    let mut filtered = apply_filters(records, state, facets);
    tracing::debug!(
        input = records.len(),
        matched = filtered.len(),
        "applied filters"
    );

    let kpis = Kpis::from_records(&filtered);
    sort_records(&mut filtered, &state.sort);

    let bounds = paginate(filtered.len(), state.page, state.page_size);
    let page_records = filtered[bounds.start..bounds.end].to_vec();

    QueryResult {
        records: page_records,
        total: bounds.total,
        pages: bounds.pages,
        page: bounds.page,
        page_size: state.page_size.max(1),
        kpis,
    }
}

/// Facet option lists counted against the set before any facet filter applies
pub fn facet_summaries(
    records: &[NormalizedRecord],
    state: &QueryState,
    facets: &[Facet],
) -> Vec<FacetSummary> {
    let baseline = apply_base_filters(records, state);
    summarize(&baseline, facets, state)
}
