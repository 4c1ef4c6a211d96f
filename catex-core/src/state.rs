use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

pub const DEFAULT_PAGE_SIZE: usize = 25;
pub const PAGE_SIZES: [usize; 3] = [25, 50, 100];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub key: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn ascending(key: &str) -> Self {
        Self {
            key: key.to_string(),
            direction: SortDirection::Asc,
        }
    }
}

/// Top-level view of the explorer
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Tab {
    Overview,
    About,
    /// A dataset, by adapter tag
    Dataset(String),
}

impl Tab {
    pub fn parse(name: &str) -> Self {
        match name.trim().trim_matches('/') {
            "" | "overview" => Tab::Overview,
            "about" => Tab::About,
            other => Tab::Dataset(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Tab::Overview => "overview",
            Tab::About => "about",
            Tab::Dataset(tag) => tag,
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Independent boolean filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Toggle {
    Computable,
    Ontology,
    ValidSet,
}

impl Toggle {
    pub const ALL: [Toggle; 3] = [Toggle::Computable, Toggle::Ontology, Toggle::ValidSet];

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "computable" => Some(Toggle::Computable),
            "ontology" | "ontology_candidate" => Some(Toggle::Ontology),
            "valid-set" | "valid_set" | "validset" => Some(Toggle::ValidSet),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Toggle::Computable => "computable",
            Toggle::Ontology => "ontology",
            Toggle::ValidSet => "valid-set",
        }
    }
}

/// Every user-chosen filter, sort, pagination and selection parameter.
///
/// Owned by the orchestrating layer; the pipeline only reads it. Facet
/// selections never hold empty sets, so two states with the same effective
/// filters compare equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    pub tab: Tab,
    pub search: String,
    /// Selected values per facet key (OR within a facet)
    pub facets: BTreeMap<String, BTreeSet<String>>,
    pub min_flow: u64,
    pub only_computable: bool,
    pub only_ontology: bool,
    pub only_valid_set: bool,
    pub sort: SortSpec,
    pub page: usize,
    pub page_size: usize,
    pub selected: Option<String>,
}

impl QueryState {
    /// Default state for a tab with its default sort key
    pub fn new(tab: Tab, default_sort_key: &str, page_size: usize) -> Self {
        Self {
            tab,
            search: String::new(),
            facets: BTreeMap::new(),
            min_flow: 0,
            only_computable: false,
            only_ontology: false,
            only_valid_set: false,
            sort: SortSpec::ascending(default_sort_key),
            page: 1,
            page_size: page_size.max(1),
            selected: None,
        }
    }

    pub fn set_search(&mut self, text: &str) {
        self.search = text.to_string();
        self.page = 1;
    }

    /// Check or uncheck one facet value
    pub fn toggle_facet_value(&mut self, key: &str, value: &str) {
        if value.is_empty() {
            return;
        }
        let values = self.facets.entry(key.to_string()).or_default();
        if !values.remove(value) {
            values.insert(value.to_string());
        }
        if values.is_empty() {
            self.facets.remove(key);
        }
        self.page = 1;
    }

    pub fn set_facet_values<I, S>(&mut self, key: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: BTreeSet<String> = values
            .into_iter()
            .map(Into::into)
            .filter(|v: &String| !v.is_empty())
            .collect();
        if values.is_empty() {
            self.facets.remove(key);
        } else {
            self.facets.insert(key.to_string(), values);
        }
        self.page = 1;
    }

    pub fn clear_facet(&mut self, key: &str) {
        self.facets.remove(key);
        self.page = 1;
    }

    pub fn is_facet_selected(&self, key: &str, value: &str) -> bool {
        self.facets.get(key).is_some_and(|values| values.contains(value))
    }

    /// Clear search, facets, thresholds, toggles and selection.
    /// Sort and page size are kept.
    pub fn clear_filters(&mut self) {
        self.search.clear();
        self.facets.clear();
        self.min_flow = 0;
        self.only_computable = false;
        self.only_ontology = false;
        self.only_valid_set = false;
        self.selected = None;
        self.page = 1;
    }

    pub fn set_min_flow(&mut self, min_flow: u64) {
        self.min_flow = min_flow;
        self.page = 1;
    }

    pub fn set_toggle(&mut self, toggle: Toggle, on: bool) {
        match toggle {
            Toggle::Computable => self.only_computable = on,
            Toggle::Ontology => self.only_ontology = on,
            Toggle::ValidSet => self.only_valid_set = on,
        }
        self.page = 1;
    }

    pub fn toggle(&self, toggle: Toggle) -> bool {
        match toggle {
            Toggle::Computable => self.only_computable,
            Toggle::Ontology => self.only_ontology,
            Toggle::ValidSet => self.only_valid_set,
        }
    }

    /// Column-header click: the same key flips direction, a new key sorts ascending
    pub fn toggle_sort(&mut self, key: &str) {
        if key.is_empty() {
            return;
        }
        if self.sort.key == key {
            self.sort.direction = self.sort.direction.flipped();
        } else {
            self.sort = SortSpec::ascending(key);
        }
        self.page = 1;
    }

    /// Sort selector: change the key, keep the direction
    pub fn set_sort(&mut self, key: &str) {
        if key.is_empty() {
            return;
        }
        self.sort.key = key.to_string();
        self.page = 1;
    }

    pub fn set_direction(&mut self, direction: SortDirection) {
        self.sort.direction = direction;
        self.page = 1;
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        if page_size == 0 {
            return;
        }
        self.page_size = page_size;
        self.page = 1;
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    pub fn next_page(&mut self) {
        self.page = self.page.saturating_add(1);
    }

    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    pub fn select(&mut self, id: Option<&str>) {
        self.selected = id.filter(|id| !id.is_empty()).map(str::to_string);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> QueryState {
        QueryState::new(Tab::Dataset("reporting".to_string()), "bmrs_code", DEFAULT_PAGE_SIZE)
    }

    #[test]
    fn test_next_page_saturates() {
        let mut s = state();
        s.set_page(usize::MAX);
        s.next_page();
        assert_eq!(s.page, usize::MAX);
        s.prev_page();
        assert_eq!(s.page, usize::MAX - 1);
    }

    #[test]
    fn test_toggle_sort_flips_same_key() {
        let mut s = state();
        s.toggle_sort("bmrs_code");
        assert_eq!(s.sort.direction, SortDirection::Desc);
        s.toggle_sort("bmrs_code");
        assert_eq!(s.sort.direction, SortDirection::Asc);
    }

    #[test]
    fn test_toggle_sort_new_key_resets_ascending() {
        let mut s = state();
        s.set_direction(SortDirection::Desc);
        s.toggle_sort("_table");
        assert_eq!(s.sort, SortSpec::ascending("_table"));
    }

    #[test]
    fn test_toggle_facet_value_removes_empty_sets() {
        let mut s = state();
        s.toggle_facet_value("table", "B1610");
        assert!(s.is_facet_selected("table", "B1610"));
        s.toggle_facet_value("table", "B1610");
        assert!(s.facets.is_empty());
    }

    #[test]
    fn test_mutations_reset_page() {
        let mut s = state();
        s.set_page(4);
        s.set_search("price");
        assert_eq!(s.page, 1);

        s.set_page(4);
        s.set_toggle(Toggle::Computable, true);
        assert_eq!(s.page, 1);

        s.set_page(4);
        s.set_page_size(50);
        assert_eq!(s.page, 1);
        assert_eq!(s.page_size, 50);
    }

    #[test]
    fn test_prev_page_floors_at_one() {
        let mut s = state();
        s.prev_page();
        assert_eq!(s.page, 1);
        s.next_page();
        s.next_page();
        s.prev_page();
        assert_eq!(s.page, 2);
    }

    #[test]
    fn test_clear_filters_keeps_sort() {
        let mut s = state();
        s.toggle_sort("_table");
        s.set_search("x");
        s.toggle_facet_value("frequency", "daily");
        s.set_min_flow(3);
        s.select(Some("B1610"));
        s.clear_filters();
        assert_eq!(s.search, "");
        assert!(s.facets.is_empty());
        assert_eq!(s.min_flow, 0);
        assert_eq!(s.selected, None);
        assert_eq!(s.sort.key, "_table");
    }

    #[test]
    fn test_tab_parse() {
        assert_eq!(Tab::parse(""), Tab::Overview);
        assert_eq!(Tab::parse("/about"), Tab::About);
        assert_eq!(Tab::parse("reporting"), Tab::Dataset("reporting".to_string()));
    }
}
