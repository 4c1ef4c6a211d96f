//! Overview page: status badge, metadata rows, headline counts and
//! top-N bar charts per dataset.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;

use crate::adapters::Normalizable;
use crate::catalogue::{format_thousands, Catalogue};
use crate::facets::{facet_counts, top_n};
use crate::models::FacetCount;

/// Placeholder for absent values
pub const MISSING: &str = "—";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusLevel {
    Good,
    Warn,
    Bad,
}

/// Badge for the catalogue's publication status
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusTag {
    pub level: StatusLevel,
    pub text: String,
}

impl StatusTag {
    pub fn from_status(status: Option<&str>) -> Self {
        let upper = status.unwrap_or_default().trim().to_uppercase();
        let level = match upper.as_str() {
            "LIVE" => StatusLevel::Good,
            "DRAFT" => StatusLevel::Warn,
            "SUPERSEDED" => StatusLevel::Bad,
            _ => StatusLevel::Warn,
        };
        let text = if upper.is_empty() {
            "UNKNOWN".to_string()
        } else {
            upper
        };
        Self { level, text }
    }
}

/// Render an effective date as `YYYY-MM-DD`.
/// Timestamps are converted to UTC first; unparseable text is returned as is.
pub fn format_effective_date(date: Option<&str>) -> String {
    let Some(raw) = date.map(str::trim).filter(|d| !d.is_empty()) else {
        return MISSING.to_string();
    };

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return timestamp.with_timezone(&Utc).format("%Y-%m-%d").to_string();
    }
    if let Ok(timestamp) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return timestamp.format("%Y-%m-%d").to_string();
    }
    if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return day.format("%Y-%m-%d").to_string();
    }
    raw.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Kpi {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bar {
    pub value: String,
    pub count: usize,
    /// Length relative to the longest bar, 0-100
    pub width: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chart {
    pub title: String,
    pub bars: Vec<Bar>,
}

impl Chart {
    pub fn from_counts(title: &str, counts: &[FacetCount]) -> Self {
        let max = counts.iter().map(|c| c.count).max().unwrap_or(0).max(1);
        let bars = counts
            .iter()
            .map(|c| Bar {
                value: c.value.clone(),
                count: c.count,
                width: ((c.count as f64 / max as f64) * 100.0).round() as u8,
            })
            .collect();
        Self {
            title: title.to_string(),
            bars,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Overview {
    pub status: StatusTag,
    pub smart_level: String,
    pub kpis: Vec<Kpi>,
    /// (label, value) pairs for the metadata table
    pub details: Vec<(String, String)>,
    pub charts: Vec<Chart>,
}

pub fn build_overview(catalogue: &Catalogue, chart_top_n: usize) -> Overview {
    let meta = &catalogue.meta;
    let or_missing = |value: &Option<String>| value.clone().unwrap_or_else(|| MISSING.to_string());

    let mut kpis: Vec<Kpi> = catalogue
        .datasets
        .iter()
        .map(|dataset| Kpi {
            label: dataset.label().to_string(),
            value: format_thousands(dataset.reported_size(meta)),
        })
        .collect();
    kpis.push(Kpi {
        label: "Version".to_string(),
        value: or_missing(&meta.version),
    });

    let details = vec![
        ("Title".to_string(), or_missing(&meta.document_title)),
        ("Reference".to_string(), or_missing(&meta.document_reference)),
        (
            "Effective from".to_string(),
            format_effective_date(meta.effective_from_date.as_deref()),
        ),
        ("BSC reference".to_string(), or_missing(&meta.bsc_section_reference)),
        ("SMART notes".to_string(), or_missing(&meta.smart_level_notes)),
    ];

    let mut charts = Vec::new();
    for dataset in &catalogue.datasets {
        let facets = dataset.facets();
        for key in dataset.adapter.overview_facets() {
            let Some(facet) = facets.iter().find(|facet| facet.key == key) else {
                continue;
            };
            let counts = facet_counts(&dataset.records, facet);
            let title = format!(
                "{} by {}",
                dataset.label(),
                facet.label.to_lowercase()
            );
            charts.push(Chart::from_counts(&title, top_n(&counts, chart_top_n)));
        }
    }

    Overview {
        status: StatusTag::from_status(meta.status.as_deref()),
        smart_level: or_missing(&meta.smart_level),
        kpis,
        details,
        charts,
    }
}
