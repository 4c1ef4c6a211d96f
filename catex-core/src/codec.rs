//! Query state in the URL fragment.
//!
//! Two grammars are supported:
//!
//! - tabbed: `#/<tab>?q=..&sort=..&dir=..&page=..&ps=..&sel=..&<facet>=a,b`
//! - flat: `#q=..&sortKey=..&sortDir=..&page=..&pageSize=..&selected=..&<facet>=a,b`
//!
//! Both carry `minFlow`, `onlyComputable`, `onlyOntology` and `onlyValidSet`.
//! Values equal to their default are left out when encoding, and unknown keys
//! or malformed numbers are ignored when decoding.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use crate::adapters::{Adapter, Normalizable};
use crate::state::{QueryState, SortDirection, Tab, Toggle, DEFAULT_PAGE_SIZE};
use crate::value::{boolish_text, parse_count};

const MIN_FLOW_KEY: &str = "minFlow";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrlGrammar {
    /// `#/<tab>?key=value&...`
    #[default]
    Tabbed,
    /// `#key=value&...`, no tab segment
    Flat,
}

/// Key names for one grammar
#[derive(Debug, Clone, Copy)]
struct Vocabulary {
    search: &'static str,
    sort: &'static str,
    direction: &'static str,
    page: &'static str,
    page_size: &'static str,
    selected: &'static str,
}

impl UrlGrammar {
    fn vocabulary(self) -> Vocabulary {
        match self {
            UrlGrammar::Tabbed => Vocabulary {
                search: "q",
                sort: "sort",
                direction: "dir",
                page: "page",
                page_size: "ps",
                selected: "sel",
            },
            UrlGrammar::Flat => Vocabulary {
                search: "q",
                sort: "sortKey",
                direction: "sortDir",
                page: "page",
                page_size: "pageSize",
                selected: "selected",
            },
        }
    }
}

fn toggle_key(toggle: Toggle) -> &'static str {
    match toggle {
        Toggle::Computable => "onlyComputable",
        Toggle::Ontology => "onlyOntology",
        Toggle::ValidSet => "onlyValidSet",
    }
}

/// Encoder/decoder between `QueryState` and a URL fragment
#[derive(Debug, Clone)]
pub struct HashCodec {
    grammar: UrlGrammar,
    adapters: Vec<Adapter>,
    flat_tab: Tab,
    default_page_size: usize,
}

impl HashCodec {
    /// `flat_tab` is the tab every flat-grammar fragment decodes into
    pub fn new(
        grammar: UrlGrammar,
        adapters: Vec<Adapter>,
        flat_tab: Tab,
        default_page_size: usize,
    ) -> Self {
        Self {
            grammar,
            adapters,
            flat_tab,
            default_page_size: if default_page_size == 0 {
                DEFAULT_PAGE_SIZE
            } else {
                default_page_size
            },
        }
    }

    pub fn grammar(&self) -> UrlGrammar {
        self.grammar
    }

    /// Tab flat-grammar fragments decode into
    pub fn flat_tab(&self) -> &Tab {
        &self.flat_tab
    }

    pub fn adapters(&self) -> &[Adapter] {
        &self.adapters
    }

    pub fn adapter_for(&self, tab: &Tab) -> Option<&Adapter> {
        match tab {
            Tab::Dataset(tag) => self.adapters.iter().find(|a| a.source_tag() == tag),
            Tab::Overview | Tab::About => None,
        }
    }

    /// The state a tab starts from
    pub fn defaults_for(&self, tab: &Tab) -> QueryState {
        let sort_key = self
            .adapter_for(tab)
            .map(|adapter| adapter.default_sort_key())
            .unwrap_or("id");
        QueryState::new(tab.clone(), sort_key, self.default_page_size)
    }

    fn facet_keys(&self, tab: &Tab) -> Vec<String> {
        self.adapter_for(tab)
            .map(|adapter| adapter.facets().into_iter().map(|f| f.key).collect())
            .unwrap_or_default()
    }

    pub fn decode(&self, fragment: &str) -> QueryState {
        let fragment = fragment.trim().trim_start_matches('#');
        let (tab, query) = match self.grammar {
            UrlGrammar::Tabbed => {
                let (path, query) = fragment.split_once('?').unwrap_or((fragment, ""));
                (Tab::parse(&decode_component(path)), query)
            }
            UrlGrammar::Flat => {
                let query = fragment.split_once('?').map_or(fragment, |(_, q)| q);
                (self.flat_tab.clone(), query)
            }
        };

        let vocab = self.grammar.vocabulary();
        let facet_keys = self.facet_keys(&tab);
        let mut state = self.defaults_for(&tab);

        for (key, raw) in pairs(query) {
            if key == vocab.search {
                state.search = decode_component(raw).into_owned();
            } else if key == vocab.sort {
                let sort = decode_component(raw);
                if !sort.is_empty() {
                    state.sort.key = sort.into_owned();
                }
            } else if key == vocab.direction {
                if let Some(direction) = SortDirection::parse(&decode_component(raw)) {
                    state.sort.direction = direction;
                }
            } else if key == vocab.page {
                // applied last, facet setters reset it
            } else if key == vocab.page_size {
                if let Some(size) = positive(raw) {
                    state.page_size = size;
                }
            } else if key == vocab.selected {
                let selected = decode_component(raw);
                state.selected = (!selected.is_empty()).then(|| selected.into_owned());
            } else if key == MIN_FLOW_KEY {
                state.set_min_flow(parse_count(&decode_component(raw)));
            } else if let Some(toggle) = Toggle::ALL.into_iter().find(|t| toggle_key(*t) == key) {
                state.set_toggle(toggle, boolish_text(&decode_component(raw)));
            } else if facet_keys.iter().any(|k| k == key) {
                let values = raw
                    .split(',')
                    .map(|piece| decode_component(piece).trim().to_string())
                    .filter(|value| !value.is_empty());
                let existing = state.facets.remove(key).unwrap_or_default();
                state.set_facet_values(key, existing.into_iter().chain(values));
            } else {
                tracing::trace!(key, "ignoring unknown fragment key");
            }
        }

        if let Some(page) = pairs(query)
            .filter(|(key, _)| *key == vocab.page)
            .filter_map(|(_, raw)| positive(raw))
            .last()
        {
            state.page = page;
        }

        state
    }

    pub fn encode(&self, state: &QueryState) -> String {
        let vocab = self.grammar.vocabulary();
        let defaults = self.defaults_for(&state.tab);
        let mut params: Vec<(Cow<'static, str>, String)> = Vec::new();

        if !state.search.is_empty() {
            params.push((vocab.search.into(), encode_component(&state.search)));
        }
        if state.sort.key != defaults.sort.key {
            params.push((vocab.sort.into(), encode_component(&state.sort.key)));
        }
        if state.sort.direction != SortDirection::Asc {
            params.push((vocab.direction.into(), state.sort.direction.as_str().to_string()));
        }
        if state.page != 1 {
            params.push((vocab.page.into(), state.page.to_string()));
        }
        if state.page_size != self.default_page_size {
            params.push((vocab.page_size.into(), state.page_size.to_string()));
        }
        if let Some(selected) = &state.selected {
            params.push((vocab.selected.into(), encode_component(selected)));
        }
        if state.min_flow > 0 {
            params.push((MIN_FLOW_KEY.into(), state.min_flow.to_string()));
        }
        for toggle in Toggle::ALL {
            if state.toggle(toggle) {
                params.push((toggle_key(toggle).into(), "1".to_string()));
            }
        }
        for (key, values) in &state.facets {
            if values.is_empty() {
                continue;
            }
            let joined = values
                .iter()
                .map(|v| encode_component(v))
                .collect::<Vec<_>>()
                .join(",");
            params.push((encode_component(key).into(), joined));
        }

        let query = params
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("&");

        match self.grammar {
            UrlGrammar::Tabbed if query.is_empty() => {
                format!("#/{}", encode_component(state.tab.as_str()))
            }
            UrlGrammar::Tabbed => format!("#/{}?{query}", encode_component(state.tab.as_str())),
            UrlGrammar::Flat => format!("#{query}"),
        }
    }
}

fn pairs(query: &str) -> impl Iterator<Item = (&str, &str)> + '_ {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
}

fn positive(raw: &str) -> Option<usize> {
    raw.trim().parse::<usize>().ok().filter(|n| *n > 0)
}

/// Form-style decoding: `+` is a space, then percent escapes
fn decode_component(raw: &str) -> Cow<'_, str> {
    if !raw.contains(&['+', '%'][..]) {
        return Cow::Borrowed(raw);
    }
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => Cow::Owned(decoded.into_owned()),
        Err(_) => Cow::Owned(spaced),
    }
}

fn encode_component(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}
