use catex_core::{Explorer, ExplorerConfig, FileSource, QueryState, Tab};

use super::Location;

/// Application state management
#[derive(Debug)]
pub struct AppState {
    /// Engine: config, catalogue and query state
    pub explorer: Explorer,
    /// Fragment history
    pub location: Location,
    /// Where catalogue candidates are read from
    pub source: FileSource,
}

impl AppState {
    pub fn new(config: ExplorerConfig, source: FileSource) -> Self {
        let explorer = Explorer::new(config);
        let location = Location::new(explorer.fragment());
        Self {
            explorer,
            location,
            source,
        }
    }

    /// Decode a fragment into the query state, replacing the current entry
    pub fn navigate(&mut self, fragment: &str) {
        self.explorer.navigate(fragment);
        self.commit();
    }

    /// Apply a UI mutation to the query state
    pub fn update<F>(&mut self, mutate: F)
    where
        F: FnOnce(&mut QueryState),
    {
        mutate(self.explorer.state_mut());
        self.commit();
    }

    /// Move to a tab and record it in the history
    pub fn open_tab(&mut self, tab: Tab) {
        self.explorer.switch_tab(tab);
        self.explorer.clamp_page();
        self.location.push(self.explorer.fragment());
    }

    pub fn back(&mut self) -> bool {
        match self.location.back().map(str::to_string) {
            Some(fragment) => {
                self.navigate(&fragment);
                true
            }
            None => false,
        }
    }

    pub fn forward(&mut self) -> bool {
        match self.location.forward().map(str::to_string) {
            Some(fragment) => {
                self.navigate(&fragment);
                true
            }
            None => false,
        }
    }

    /// Clamp the page and write the canonical fragment into the current entry
    pub fn commit(&mut self) {
        self.explorer.clamp_page();
        self.location.replace(self.explorer.fragment());
    }

    pub fn title(&self) -> &str {
        &self.explorer.config().title
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        AppState::new(ExplorerConfig::default(), FileSource::new())
    }

    #[test]
    fn test_update_replaces_entry() {
        let mut app = state();
        app.open_tab(Tab::Dataset("reporting".to_string()));
        app.update(|s| s.set_search("price"));
        app.update(|s| s.toggle_sort("table"));

        assert_eq!(app.location.len(), 2);
        assert_eq!(app.location.current(), "#/reporting?q=price&sort=table");
    }

    #[test]
    fn test_next_page_on_oversized_link() {
        let mut app = state();
        app.navigate("#/overview?page=18446744073709551615");
        app.update(|s| s.next_page());
        assert_eq!(app.explorer.state().page, usize::MAX);
        assert_eq!(app.location.current(), "#/overview?page=18446744073709551615");
    }

    #[test]
    fn test_back_restores_previous_tab_state() {
        let mut app = state();
        app.open_tab(Tab::Dataset("reporting".to_string()));
        app.update(|s| s.set_search("price"));
        app.open_tab(Tab::About);

        assert!(app.back());
        assert_eq!(app.explorer.state().search, "price");
        assert!(app.forward());
        assert_eq!(app.explorer.state().tab, Tab::About);
        assert!(!app.forward());
    }
}
