use crate::operations::{
    parse_direction, parse_page_move, parse_page_size, parse_tab, PageMove, ValidationError,
};
use crate::state::AppState;
use crate::ui::StatusLevel;

use super::{HandlerResult, Reply};

/// `sort KEY`: the current key flips direction, a new key sorts ascending
pub fn handle_sort(state: &mut AppState, key: &str) -> HandlerResult {
    let key = key.trim();
    if key.is_empty() {
        return Err(ValidationError::new("sort", "expected a field name"));
    }
    state.update(|s| s.toggle_sort(key));
    Ok(Reply::Render(sort_status(state), StatusLevel::Info))
}

pub fn handle_dir(state: &mut AppState, arg: &str) -> HandlerResult {
    let direction = parse_direction(arg)?;
    state.update(|s| s.set_direction(direction));
    Ok(Reply::Render(sort_status(state), StatusLevel::Info))
}

fn sort_status(state: &AppState) -> String {
    let sort = &state.explorer.state().sort;
    format!("Sorted by {} {}", sort.key, sort.direction.as_str())
}

/// `page next|prev|N`; the page is clamped to the result
pub fn handle_page(state: &mut AppState, arg: &str) -> HandlerResult {
    let movement = parse_page_move(arg)?;
    state.update(|s| match movement {
        PageMove::Next => s.next_page(),
        PageMove::Prev => s.prev_page(),
        PageMove::To(page) => s.set_page(page),
    });
    Ok(Reply::Render(
        format!("Page {}", state.explorer.state().page),
        StatusLevel::Info,
    ))
}

pub fn handle_size(state: &mut AppState, arg: &str) -> HandlerResult {
    let size = parse_page_size(arg, &state.explorer.config().page_sizes)?;
    state.update(|s| s.set_page_size(size));
    Ok(Reply::Render(
        format!("Showing {size} per page"),
        StatusLevel::Info,
    ))
}

/// `tab NAME|N` opens a tab from its defaults and adds a history entry
pub fn handle_tab(state: &mut AppState, arg: &str) -> HandlerResult {
    let tab = parse_tab(arg, &state.explorer.tabs())?;
    state.open_tab(tab);
    Ok(Reply::Render(
        format!("Opened {}", state.explorer.state().tab),
        StatusLevel::Info,
    ))
}

pub fn handle_back(state: &mut AppState) -> HandlerResult {
    if state.back() {
        Ok(Reply::Render("Back".to_string(), StatusLevel::Info))
    } else {
        Err(ValidationError::new("back", "already at the oldest entry"))
    }
}

pub fn handle_forward(state: &mut AppState) -> HandlerResult {
    if state.forward() {
        Ok(Reply::Render("Forward".to_string(), StatusLevel::Info))
    } else {
        Err(ValidationError::new("forward", "already at the newest entry"))
    }
}

/// `link` prints the shareable fragment
pub fn handle_link(state: &AppState) -> HandlerResult {
    Ok(Reply::Print(state.location.current().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::tests::loaded;
    use catex_core::{SortDirection, Tab};

    #[test]
    fn test_sort_then_dir() {
        let mut app = loaded();
        app.navigate("#/reporting");
        handle_sort(&mut app, "table").unwrap();
        handle_sort(&mut app, "table").unwrap();
        assert_eq!(app.explorer.state().sort.direction, SortDirection::Desc);
        handle_dir(&mut app, "asc").unwrap();
        assert_eq!(app.location.current(), "#/reporting?sort=table");
        assert!(handle_sort(&mut app, " ").is_err());
    }

    #[test]
    fn test_page_moves_are_clamped() {
        let mut app = loaded();
        app.navigate("#/reporting");
        handle_page(&mut app, "next").unwrap();
        handle_page(&mut app, "next").unwrap();
        assert_eq!(app.explorer.state().page, 2);
        handle_page(&mut app, "9").unwrap();
        assert_eq!(app.explorer.state().page, 2);
        handle_page(&mut app, "prev").unwrap();
        assert_eq!(app.location.current(), "#/reporting");
    }

    #[test]
    fn test_size_uses_configured_choices() {
        let mut app = loaded();
        app.navigate("#/reporting?page=2");
        handle_size(&mut app, "50").unwrap();
        assert_eq!(app.location.current(), "#/reporting?ps=50");
        assert!(handle_size(&mut app, "40").is_err());
    }

    #[test]
    fn test_flat_grammar_rejects_other_tabs() {
        let config = catex_core::ExplorerConfig {
            grammar: catex_core::UrlGrammar::Flat,
            ..catex_core::ExplorerConfig::default()
        };
        let mut app = AppState::new(config, catex_core::FileSource::new());
        let err = handle_tab(&mut app, "calculated").unwrap_err();
        assert_eq!(err.field, "tab");
        assert_eq!(app.explorer.state().tab, Tab::Dataset("reporting".to_string()));
        assert_eq!(app.location.len(), 1);
    }

    #[test]
    fn test_tab_history() {
        let mut app = loaded();
        handle_tab(&mut app, "reporting").unwrap();
        handle_tab(&mut app, "5").unwrap();
        assert_eq!(app.explorer.state().tab, Tab::About);

        handle_back(&mut app).unwrap();
        assert_eq!(
            handle_link(&app).unwrap(),
            Reply::Print("#/reporting".to_string())
        );
        handle_back(&mut app).unwrap();
        assert!(handle_back(&mut app).is_err());
        handle_forward(&mut app).unwrap();
        assert_eq!(app.explorer.state().tab, Tab::Dataset("reporting".to_string()));
    }
}
