use crate::operations::{
    parse_facet_arg, parse_facet_name, parse_min_flow, parse_switch, parse_toggle,
    ValidationError,
};
use crate::state::AppState;
use crate::ui::StatusLevel;

use super::{HandlerResult, Reply};

/// `search <text>`; no text clears the search
pub fn handle_search(state: &mut AppState, text: &str) -> HandlerResult {
    let text = text.trim();
    state.update(|s| s.set_search(text));
    let status = if text.is_empty() {
        "Search cleared".to_string()
    } else {
        format!("Searching for \"{text}\"")
    };
    Ok(Reply::Render(status, StatusLevel::Info))
}

/// `facet NAME=VALUE` checks or unchecks one value
pub fn handle_facet(state: &mut AppState, arg: &str) -> HandlerResult {
    let (key, value) = parse_facet_arg(arg, &state.explorer.active_facets())?;
    state.update(|s| s.toggle_facet_value(&key, &value));

    let verb = if state.explorer.state().is_facet_selected(&key, &value) {
        "selected"
    } else {
        "deselected"
    };
    Ok(Reply::Render(format!("{key}: {value} {verb}"), StatusLevel::Info))
}

/// `unfacet NAME [VALUE]` drops one value or the whole facet
pub fn handle_unfacet(state: &mut AppState, name: &str, value: Option<&str>) -> HandlerResult {
    let key = parse_facet_name(name, &state.explorer.active_facets())?;

    match value {
        Some(value) => {
            if !state.explorer.state().is_facet_selected(&key, value) {
                return Err(ValidationError::new(
                    "unfacet",
                    format!("{key}: {value} is not selected"),
                ));
            }
            state.update(|s| s.toggle_facet_value(&key, value));
            Ok(Reply::Render(format!("{key}: {value} deselected"), StatusLevel::Info))
        }
        None => {
            state.update(|s| s.clear_facet(&key));
            Ok(Reply::Render(format!("{key} cleared"), StatusLevel::Info))
        }
    }
}

pub fn handle_clear(state: &mut AppState) -> HandlerResult {
    state.update(|s| s.clear_filters());
    Ok(Reply::Render("Filters cleared".to_string(), StatusLevel::Info))
}

pub fn handle_min_flow(state: &mut AppState, arg: &str) -> HandlerResult {
    let min_flow = parse_min_flow(arg)?;
    state.update(|s| s.set_min_flow(min_flow));
    Ok(Reply::Render(
        format!("Minimum data flows set to {min_flow}"),
        StatusLevel::Info,
    ))
}

/// `only TOGGLE [on|off]`
pub fn handle_only(state: &mut AppState, toggle: &str, switch: Option<&str>) -> HandlerResult {
    let toggle = parse_toggle(toggle)?;
    let on = parse_switch(switch)?;
    state.update(|s| s.set_toggle(toggle, on));
    Ok(Reply::Render(
        format!("Only {}: {}", toggle.label(), if on { "on" } else { "off" }),
        StatusLevel::Info,
    ))
}
