use catex_core::{Bar, FacetSummary, Kpis, NormalizedRecord, QueryResult, QueryState, Toggle};

/// Width of a full-length overview bar, in characters
pub const BAR_WIDTH: usize = 30;

/// Shorten text to `max` characters, marking the cut with an ellipsis
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{kept}…")
}

pub fn format_flag(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

/// One facet as a single line: selected values in brackets, then the
/// most frequent values up to `limit`
pub fn format_facet_summary(summary: &FacetSummary, limit: usize) -> String {
    let values: Vec<String> = summary
        .counts
        .iter()
        .take(limit)
        .map(|c| {
            if summary.selected.contains(&c.value) {
                format!("[{}] {}", c.value, c.count)
            } else {
                format!("{} {}", c.value, c.count)
            }
        })
        .collect();

    let mut line = format!("{}: {}", summary.label, values.join(" · "));
    if summary.counts.len() > limit {
        line.push_str(&format!(" · +{} more", summary.counts.len() - limit));
    }
    line
}

/// Table row: id, name, cluster, flow count
pub fn format_record_row(record: &NormalizedRecord) -> String {
    format!(
        "{:<14} {:<52} {:<13} {:>3}",
        truncate(&record.id, 14),
        truncate(&record.name, 52),
        record.cluster.as_str(),
        record.flow_count
    )
}

/// Detail panel for the selected record
pub fn format_record_detail(record: &NormalizedRecord) -> String {
    let mut lines = vec![
        format!("{} {}", record.id, record.name),
        format!("  Cluster:        {}", record.cluster),
    ];
    if !record.semantic_type.is_empty() {
        lines.push(format!("  Semantic type:  {}", record.semantic_type));
    }
    if !record.domain.is_empty() {
        lines.push(format!("  Domain:         {}", record.domain));
    }
    lines.push(format!("  Computable:     {}", format_flag(record.computable)));
    lines.push(format!(
        "  Ontology:       {}",
        format_flag(record.ontology_candidate)
    ));
    lines.push(format!("  Valid set:      {}", format_flag(record.has_valid_set)));
    lines.push(format!("  Data flows:     {}", record.flow_count));
    lines.join("\n")
}

/// Pretty-printed source fields of a record
pub fn format_record_json(record: &NormalizedRecord) -> String {
    serde_json::to_string_pretty(&record.raw).unwrap_or_default()
}

pub fn format_bar(bar: &Bar, label_width: usize) -> String {
    let filled = (usize::from(bar.width) * BAR_WIDTH).div_ceil(100).max(1);
    format!(
        "  {:<label_width$} {} {}",
        truncate(&bar.value, label_width),
        "█".repeat(filled),
        bar.count
    )
}

pub fn format_kpis(kpis: &Kpis) -> String {
    format!(
        "{} results · {} computable · {} ontology candidates · {} with valid sets",
        kpis.total, kpis.computable, kpis.ontology, kpis.valid_set
    )
}

pub fn format_pager(result: &QueryResult<'_>) -> String {
    format!(
        "Page {} of {} · {} per page",
        result.page, result.pages, result.page_size
    )
}

/// Active search and filters, `None` when nothing narrows the results
pub fn format_active_filters(state: &QueryState, summaries: &[FacetSummary]) -> Option<String> {
    let mut parts = Vec::new();
    if !state.search.is_empty() {
        parts.push(format!("\"{}\"", state.search));
    }
    for (key, values) in &state.facets {
        let label = summaries
            .iter()
            .find(|s| &s.key == key)
            .map_or(key.as_str(), |s| s.label.as_str());
        let values: Vec<&str> = values.iter().map(String::as_str).collect();
        parts.push(format!("{label} = {}", values.join(" or ")));
    }
    if state.min_flow > 0 {
        parts.push(format!("flows ≥ {}", state.min_flow));
    }
    for toggle in Toggle::ALL {
        if state.toggle(toggle) {
            parts.push(format!("only {}", toggle.label()));
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(format!("Filters: {}", parts.join(" · ")))
    }
}
