use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::adapters::{Adapter, Normalizable};
use crate::codec::{HashCodec, UrlGrammar};
use crate::error::CatalogueError;
use crate::state::{Tab, DEFAULT_PAGE_SIZE, PAGE_SIZES};

/// Explorer settings. Every field is optional in the JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    pub title: String,
    /// Candidate catalogue locations, tried in order
    pub data_paths: Vec<String>,
    pub grammar: UrlGrammar,
    /// Datasets in tab order
    pub datasets: Vec<Adapter>,
    /// Dataset tag the flat grammar decodes into; the first dataset when unset
    pub flat_tab: Option<String>,
    pub page_sizes: Vec<usize>,
    pub default_page_size: usize,
    /// Bars per overview chart
    pub chart_top_n: usize,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            title: "BMRS Data Catalogue Explorer".to_string(),
            data_paths: vec![
                "data/bmrs_data_catalogue.json".to_string(),
                "./docs/data/bmrs_data_catalogue.json".to_string(),
            ],
            grammar: UrlGrammar::Tabbed,
            datasets: Adapter::defaults(),
            flat_tab: None,
            page_sizes: PAGE_SIZES.to_vec(),
            default_page_size: DEFAULT_PAGE_SIZE,
            chart_top_n: 10,
        }
    }
}

impl ExplorerConfig {
    /// Tab flat-grammar fragments decode into
    pub fn flat_tab(&self) -> Tab {
        match &self.flat_tab {
            Some(tag) => Tab::Dataset(tag.clone()),
            None => self
                .datasets
                .first()
                .map(|adapter| Tab::Dataset(adapter.source_tag().to_string()))
                .unwrap_or(Tab::Overview),
        }
    }

    pub fn codec(&self) -> HashCodec {
        HashCodec::new(
            self.grammar,
            self.datasets.clone(),
            self.flat_tab(),
            self.default_page_size,
        )
    }

    /// Check settings that would make the explorer unusable
    pub fn validate(&self) -> Result<(), String> {
        if self.datasets.is_empty() {
            return Err("at least one dataset is required".to_string());
        }
        if self.default_page_size == 0 || self.page_sizes.contains(&0) {
            return Err("page sizes must be positive".to_string());
        }
        let mut tags: Vec<&str> = self.datasets.iter().map(|d| d.source_tag()).collect();
        tags.sort_unstable();
        if let Some(pair) = tags.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(format!("duplicate dataset tag '{}'", pair[0]));
        }
        if let Some(tag) = tags.iter().find(|tag| ["overview", "about"].contains(tag)) {
            return Err(format!("dataset tag '{tag}' is reserved"));
        }
        Ok(())
    }
}

/// Load and validate an explorer configuration file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ExplorerConfig, CatalogueError> {
    let path = path.as_ref();
    let config_error = |reason: String| CatalogueError::Config {
        path: path.to_path_buf(),
        reason,
    };

    let contents = fs::read_to_string(path).map_err(|e| config_error(e.to_string()))?;
    let config: ExplorerConfig =
        serde_json::from_str(&contents).map_err(|e| config_error(e.to_string()))?;
    config.validate().map_err(config_error)?;

    tracing::debug!(path = %path.display(), datasets = config.datasets.len(), "loaded config");
    Ok(config)
}
