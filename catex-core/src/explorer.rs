//! The explorer engine.
//!
//! An `Explorer` owns everything the UI layer reads: configuration, the URL
//! codec, the loaded catalogue and the current query state. The catalogue is
//! replaced whole on every load and never mutated in between; the query state
//! changes only through the owner's `&mut` calls.

use serde_json::Value;

use crate::adapters::{Adapter, Normalizable};
use crate::catalogue::{Catalogue, Dataset};
use crate::codec::{HashCodec, UrlGrammar};
use crate::config::ExplorerConfig;
use crate::error::CatalogueError;
use crate::facets::FacetSummary;
use crate::filtering::apply_filters;
use crate::grouping::{group_requirements, RequirementGroup};
use crate::io::{fetch_with_fallback, CatalogueSource};
use crate::models::{Facet, NormalizedRecord};
use crate::overview::{build_overview, Overview};
use crate::pipeline::QueryResult;
use crate::state::{QueryState, Tab};

/// Identifies one load attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The catalogue was replaced
    Applied,
    /// The load failed; the error is shown instead of the catalogue
    Failed,
    /// A newer load was started after this one; the result was dropped
    Stale,
}

/// Result table for one dataset
#[derive(Debug, Clone)]
pub struct DatasetView<'a> {
    pub dataset: &'a Dataset,
    pub result: QueryResult<'a>,
    pub facets: Vec<FacetSummary>,
    pub selected: Option<&'a NormalizedRecord>,
}

/// Requirement records grouped by category
#[derive(Debug, Clone)]
pub struct RequirementsView<'a> {
    pub dataset: &'a Dataset,
    pub groups: Vec<RequirementGroup<'a>>,
    pub matched: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AboutView {
    pub title: String,
    pub location: String,
    pub summary: String,
    /// (tab, label) per dataset
    pub datasets: Vec<(String, String)>,
}

/// Everything the UI needs to draw the current screen
#[derive(Debug, Clone)]
pub enum View<'a> {
    Loading { locations: &'a [String] },
    Failed { error: &'a CatalogueError },
    Overview { summary: String, overview: Overview },
    Dataset(DatasetView<'a>),
    Requirements(RequirementsView<'a>),
    About(AboutView),
}

#[derive(Debug)]
pub struct Explorer {
    config: ExplorerConfig,
    codec: HashCodec,
    catalogue: Option<Catalogue>,
    load_error: Option<CatalogueError>,
    state: QueryState,
    generation: u64,
}

impl Explorer {
    pub fn new(config: ExplorerConfig) -> Self {
        let codec = config.codec();
        let state = codec.decode("");
        Self {
            config,
            codec,
            catalogue: None,
            load_error: None,
            state,
            generation: 0,
        }
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    pub fn codec(&self) -> &HashCodec {
        &self.codec
    }

    pub fn catalogue(&self) -> Option<&Catalogue> {
        self.catalogue.as_ref()
    }

    pub fn load_error(&self) -> Option<&CatalogueError> {
        self.load_error.as_ref()
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut QueryState {
        &mut self.state
    }

    /// Start a load. Only the most recently issued ticket can be applied.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        tracing::debug!(generation = self.generation, "load started");
        LoadTicket(self.generation)
    }

    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<(String, Value), CatalogueError>,
    ) -> LoadOutcome {
        if ticket.0 != self.generation {
            tracing::debug!(
                ticket = ticket.0,
                current = self.generation,
                "dropping stale load"
            );
            return LoadOutcome::Stale;
        }

        match result {
            Ok((location, document)) => {
                self.catalogue = Some(Catalogue::from_document(
                    &location,
                    document,
                    &self.config.datasets,
                ));
                self.load_error = None;
                LoadOutcome::Applied
            }
            Err(error) => {
                tracing::error!(%error, "catalogue load failed");
                self.catalogue = None;
                self.load_error = Some(error);
                LoadOutcome::Failed
            }
        }
    }

    /// Fetch from the configured candidate locations and apply the result
    pub fn load_from<S: CatalogueSource + ?Sized>(&mut self, source: &S) -> LoadOutcome {
        let ticket = self.begin_load();
        let result = fetch_with_fallback(source, self.config.data_paths.as_slice());
        self.finish_load(ticket, result)
    }

    /// Replace the query state with the one a fragment describes
    pub fn navigate(&mut self, fragment: &str) {
        self.state = self.codec.decode(fragment);
    }

    /// Canonical fragment for the current state
    pub fn fragment(&self) -> String {
        self.codec.encode(&self.state)
    }

    /// Move to a tab, starting from its default state.
    /// The flat grammar has no tab segment, so it only ever shows its one tab.
    pub fn switch_tab(&mut self, tab: Tab) {
        let tab = match self.codec.grammar() {
            UrlGrammar::Tabbed => tab,
            UrlGrammar::Flat => self.codec.flat_tab().clone(),
        };
        self.state = self.codec.defaults_for(&tab);
    }

    /// Tabs in display order
    pub fn tabs(&self) -> Vec<Tab> {
        if self.codec.grammar() == UrlGrammar::Flat {
            return vec![self.codec.flat_tab().clone()];
        }
        let mut tabs = vec![Tab::Overview];
        tabs.extend(
            self.config
                .datasets
                .iter()
                .map(|adapter| Tab::Dataset(adapter.source_tag().to_string())),
        );
        tabs.push(Tab::About);
        tabs
    }

    pub fn active_dataset(&self) -> Option<&Dataset> {
        match &self.state.tab {
            Tab::Dataset(tag) => self.catalogue.as_ref()?.dataset(tag),
            Tab::Overview | Tab::About => None,
        }
    }

    /// Facets of the active dataset
    pub fn active_facets(&self) -> Vec<Facet> {
        self.codec
            .adapter_for(&self.state.tab)
            .map(|adapter| adapter.facets())
            .unwrap_or_default()
    }

    pub fn selected_record(&self) -> Option<&NormalizedRecord> {
        let id = self.state.selected.as_deref()?;
        self.active_dataset()?.find(id)
    }

    /// Write the pipeline's clamped page back into the state
    pub fn clamp_page(&mut self) {
        let clamped = self
            .active_dataset()
            .map(|dataset| dataset.query(&self.state).page);
        if let Some(page) = clamped {
            if page != self.state.page {
                tracing::debug!(from = self.state.page, to = page, "clamped page");
                self.state.page = page;
            }
        }
    }

    pub fn view(&self) -> View<'_> {
        if let Some(error) = &self.load_error {
            return View::Failed { error };
        }
        let Some(catalogue) = &self.catalogue else {
            return View::Loading {
                locations: &self.config.data_paths,
            };
        };

        match &self.state.tab {
            Tab::About => View::About(self.about(catalogue)),
            Tab::Dataset(tag) => match catalogue.dataset(tag) {
                Some(dataset) if matches!(dataset.adapter, Adapter::Requirements) => {
                    View::Requirements(self.requirements(dataset))
                }
                Some(dataset) => View::Dataset(DatasetView {
                    dataset,
                    result: dataset.query(&self.state),
                    facets: dataset.facet_summaries(&self.state),
                    selected: self.state.selected.as_deref().and_then(|id| dataset.find(id)),
                }),
                None => self.overview(catalogue),
            },
            Tab::Overview => self.overview(catalogue),
        }
    }

    fn overview<'a>(&self, catalogue: &'a Catalogue) -> View<'a> {
        View::Overview {
            summary: catalogue.meta.summary_line(),
            overview: build_overview(catalogue, self.config.chart_top_n),
        }
    }

    fn requirements<'a>(&self, dataset: &'a Dataset) -> RequirementsView<'a> {
        let matching = apply_filters(&dataset.records, &self.state, &dataset.facets());
        RequirementsView {
            dataset,
            matched: matching.len(),
            groups: group_requirements(&dataset.records, &matching),
        }
    }

    fn about(&self, catalogue: &Catalogue) -> AboutView {
        AboutView {
            title: self.config.title.clone(),
            location: catalogue.location.clone(),
            summary: catalogue.meta.summary_line(),
            datasets: catalogue
                .datasets
                .iter()
                .map(|d| (d.tag().to_string(), d.label().to_string()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::MemorySource;
    use serde_json::json;

    fn document() -> Value {
        let reporting: Vec<Value> = (1..=30)
            .map(|i| {
                json!({
                    "bmrs_code": format!("B{i:04}"),
                    "data_description": if i % 2 == 0 { "Settlement price" } else { "Generation volume" },
                    "table": if i % 3 == 0 { "T3" } else { "T1" }
                })
            })
            .collect();
        json!({
            "metadata": {"document_title": "Catalogue", "status": "LIVE"},
            "reporting_items": reporting,
            "functional_requirements": {
                "publishing": [{"title": "Publish daily"}, {"title": "Archive"}]
            }
        })
    }

    fn loaded() -> Explorer {
        let mut explorer = Explorer::new(ExplorerConfig::default());
        let ticket = explorer.begin_load();
        let outcome = explorer.finish_load(ticket, Ok(("mem".to_string(), document())));
        assert_eq!(outcome, LoadOutcome::Applied);
        explorer
    }

    #[test]
    fn test_loading_view_before_load() {
        let explorer = Explorer::new(ExplorerConfig::default());
        assert!(matches!(explorer.view(), View::Loading { .. }));
    }

    #[test]
    fn test_stale_load_is_dropped() {
        let mut explorer = Explorer::new(ExplorerConfig::default());
        let first = explorer.begin_load();
        let second = explorer.begin_load();

        let stale = explorer.finish_load(first, Ok(("old".to_string(), document())));
        assert_eq!(stale, LoadOutcome::Stale);
        assert!(explorer.catalogue().is_none());

        let applied = explorer.finish_load(second, Ok(("new".to_string(), document())));
        assert_eq!(applied, LoadOutcome::Applied);
        assert_eq!(explorer.catalogue().unwrap().location, "new");
    }

    #[test]
    fn test_failed_load_shows_error() {
        let mut explorer = Explorer::new(ExplorerConfig::default());
        let source = MemorySource::new();
        assert_eq!(explorer.load_from(&source), LoadOutcome::Failed);
        match explorer.view() {
            View::Failed { error } => {
                assert_eq!(error.location(), Some("./docs/data/bmrs_data_catalogue.json"))
            }
            other => panic!("expected failure view, got {other:?}"),
        }
    }

    #[test]
    fn test_dataset_view_and_selection() {
        let mut explorer = loaded();
        explorer.navigate("#/reporting?table=T3&sel=B0003");
        match explorer.view() {
            View::Dataset(view) => {
                assert_eq!(view.result.total, 10);
                assert_eq!(view.selected.map(|r| r.id.as_str()), Some("B0003"));
                let table = view.facets.iter().find(|f| f.key == "table").unwrap();
                assert_eq!(table.counts.len(), 2);
            }
            other => panic!("expected dataset view, got {other:?}"),
        }
        assert_eq!(explorer.selected_record().unwrap().id, "B0003");
    }

    #[test]
    fn test_clamp_page_writes_back() {
        let mut explorer = loaded();
        explorer.navigate("#/reporting?page=9");
        explorer.clamp_page();
        assert_eq!(explorer.state().page, 2);
        assert_eq!(explorer.fragment(), "#/reporting?page=2");
    }

    #[test]
    fn test_requirements_view_groups() {
        let mut explorer = loaded();
        explorer.navigate("#/requirements?q=archive");
        match explorer.view() {
            View::Requirements(view) => {
                assert_eq!(view.matched, 1);
                assert_eq!(view.groups[0].total, 2);
                assert_eq!(view.groups[0].entries[0].title, "Archive");
            }
            other => panic!("expected requirements view, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_tab_falls_back_to_overview() {
        let mut explorer = loaded();
        explorer.navigate("#/nowhere");
        assert!(matches!(explorer.view(), View::Overview { .. }));
        assert_eq!(explorer.tabs().len(), 5);
    }

    #[test]
    fn test_flat_grammar_stays_on_its_tab() {
        let config = ExplorerConfig {
            grammar: UrlGrammar::Flat,
            ..ExplorerConfig::default()
        };
        let mut explorer = Explorer::new(config);
        let ticket = explorer.begin_load();
        explorer.finish_load(ticket, Ok(("mem".to_string(), document())));

        let reporting = Tab::Dataset("reporting".to_string());
        assert_eq!(explorer.tabs(), [reporting.clone()]);

        explorer.switch_tab(Tab::Dataset("calculated".to_string()));
        assert_eq!(explorer.state().tab, reporting);
        assert_eq!(explorer.state().sort.key, "bmrs_code");

        let steps: [fn(&mut QueryState); 5] = [
            |s| s.set_search("price"),
            |s| s.toggle_facet_value("table", "T3"),
            |s| s.toggle_sort("table"),
            |s| s.select(Some("B0003")),
            |s| s.set_page_size(50),
        ];
        for step in steps {
            step(explorer.state_mut());
            explorer.clamp_page();
            let fragment = explorer.fragment();
            assert_eq!(&explorer.codec().decode(&fragment), explorer.state(), "{fragment}");
        }
        explorer.switch_tab(Tab::About);
        assert_eq!(explorer.codec().decode(&explorer.fragment()), *explorer.state());
    }

    #[test]
    fn test_switch_tab_resets_state() {
        let mut explorer = loaded();
        explorer.navigate("#/reporting?q=price&page=2");
        explorer.switch_tab(Tab::Dataset("calculated".to_string()));
        assert_eq!(explorer.state().search, "");
        assert_eq!(explorer.state().sort.key, "calculation_code");
        assert_eq!(explorer.fragment(), "#/calculated");
    }
}
