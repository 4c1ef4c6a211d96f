use colored::Colorize;
use serde::Serialize;

use catex_core::{
    AboutView, DatasetView, Explorer, Kpis, NormalizedRecord, Normalizable, Overview,
    RequirementsView, Tab, View,
};

use super::dialogs::format_error;
use super::formatting::{
    format_active_filters, format_bar, format_facet_summary, format_kpis, format_pager,
    format_record_detail, format_record_row,
};
use crate::errors::map_load_error;
use crate::state::AppState;

/// Facet values shown per facet line
const FACET_VALUES_SHOWN: usize = 8;

/// Print the current view to stdout
pub fn update_ui_from_state(state: &AppState) {
    print!("{}", render(state));
}

/// Render the current view, tab bar and link as text
pub fn render(state: &AppState) -> String {
    let explorer = &state.explorer;
    let mut out = format!("{}\n{}\n\n", state.title().bold(), render_tabs(explorer));

    let body = match explorer.view() {
        View::Loading { locations } => {
            format!("Loading catalogue from {}\n", locations.join(", "))
        }
        View::Failed { error } => {
            let (title, message, details) = map_load_error(error);
            format_error(&title, &message, &details)
        }
        View::Overview { summary, overview } => render_overview(&summary, &overview),
        View::Dataset(view) => render_dataset(&view, explorer),
        View::Requirements(view) => render_requirements(&view),
        View::About(about) => render_about(&about),
    };
    out.push_str(&body);
    out.push_str(&format!("\n{}\n", format!("Link: {}", state.location.current()).dimmed()));
    out
}

/// Current page of a dataset tab in machine-readable form
#[derive(Debug, Serialize)]
pub struct PageReport<'a> {
    pub fragment: &'a str,
    pub tab: &'a str,
    pub total: usize,
    pub page: usize,
    pub pages: usize,
    pub page_size: usize,
    pub kpis: Kpis,
    pub records: Vec<&'a NormalizedRecord>,
}

/// `None` unless a dataset tab is open on a loaded catalogue
pub fn page_report(state: &AppState) -> Option<PageReport<'_>> {
    let dataset = state.explorer.active_dataset()?;
    let result = dataset.query(state.explorer.state());
    Some(PageReport {
        fragment: state.location.current(),
        tab: dataset.tag(),
        total: result.total,
        page: result.page,
        pages: result.pages,
        page_size: result.page_size,
        kpis: result.kpis,
        records: result.records,
    })
}

fn tab_label(explorer: &Explorer, tab: &Tab) -> String {
    match tab {
        Tab::Overview => "Overview".to_string(),
        Tab::About => "About".to_string(),
        Tab::Dataset(tag) => explorer
            .codec()
            .adapter_for(tab)
            .map_or_else(|| tag.clone(), |adapter| adapter.label().to_string()),
    }
}

fn render_tabs(explorer: &Explorer) -> String {
    let active = &explorer.state().tab;
    explorer
        .tabs()
        .iter()
        .enumerate()
        .map(|(i, tab)| {
            let label = format!("{} {}", i + 1, tab_label(explorer, tab));
            if tab == active {
                format!("[{label}]").cyan().bold().to_string()
            } else {
                format!(" {label} ")
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_overview(summary: &str, overview: &Overview) -> String {
    let status = match overview.status.level {
        catex_core::StatusLevel::Good => overview.status.text.green(),
        catex_core::StatusLevel::Warn => overview.status.text.yellow(),
        catex_core::StatusLevel::Bad => overview.status.text.red(),
    };
    let mut out = format!("{summary}\n{status} · SMART {}\n\n", overview.smart_level);

    for kpi in &overview.kpis {
        out.push_str(&format!("{:>10}  {}\n", kpi.value.bold(), kpi.label));
    }
    out.push('\n');
    for (label, value) in &overview.details {
        out.push_str(&format!("{:<22} {value}\n", format!("{label}:")));
    }

    for chart in &overview.charts {
        if chart.bars.is_empty() {
            continue;
        }
        let label_width = chart
            .bars
            .iter()
            .map(|b| b.value.chars().count())
            .max()
            .unwrap_or(0)
            .min(24);
        out.push_str(&format!("\n{}\n", chart.title.bold()));
        for bar in &chart.bars {
            out.push_str(&format_bar(bar, label_width));
            out.push('\n');
        }
    }
    out
}

fn render_dataset(view: &DatasetView<'_>, explorer: &Explorer) -> String {
    let state = explorer.state();
    let mut out = format!("{}\n", format_kpis(&view.result.kpis).bold());
    if let Some(filters) = format_active_filters(state, &view.facets) {
        out.push_str(&format!("{}\n", filters.yellow()));
    }
    out.push('\n');

    for summary in view.facets.iter().filter(|s| !s.counts.is_empty()) {
        out.push_str(&format_facet_summary(summary, FACET_VALUES_SHOWN));
        out.push('\n');
    }
    out.push('\n');

    let header = format!("{:<14} {:<52} {:<13} {:>3}", "ID", "Name", "Cluster", "Flows");
    out.push_str(&format!("{}\n", header.underline()));
    if view.result.records.is_empty() {
        out.push_str("No matching records.\n");
    }
    for record in &view.result.records {
        let row = format_record_row(record);
        if state.selected.as_deref() == Some(record.id.as_str()) {
            out.push_str(&format!("{}\n", row.reversed()));
        } else {
            out.push_str(&row);
            out.push('\n');
        }
    }

    out.push_str(&format!(
        "\n{} · sorted by {} {}\n",
        format_pager(&view.result),
        state.sort.key,
        state.sort.direction.as_str()
    ));

    if let Some(record) = view.selected {
        out.push_str(&format!("\n{}\n", format_record_detail(record)));
    }
    out
}

fn render_requirements(view: &RequirementsView<'_>) -> String {
    let mut out = format!("{} matching {}\n", view.matched, view.dataset.label());
    for group in &view.groups {
        out.push_str(&format!(
            "\n{} ({}/{})\n",
            group.label.bold(),
            group.entries.len(),
            group.total
        ));
        for entry in &group.entries {
            if entry.reference.is_empty() {
                out.push_str(&format!("  - {}\n", entry.title));
            } else {
                out.push_str(&format!("  - {} [{}]\n", entry.title, entry.reference.dimmed()));
            }
        }
    }
    out
}

fn render_about(about: &AboutView) -> String {
    let mut out = format!(
        "{}\n{}\nSource: {}\n\nDatasets:\n",
        about.title.bold(),
        about.summary,
        about.location
    );
    for (tag, label) in &about.datasets {
        out.push_str(&format!("  {tag:<14} {label}\n"));
    }
    out
}
