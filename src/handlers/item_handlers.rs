use crate::operations::ValidationError;
use crate::state::AppState;
use crate::ui::{format_record_json, StatusLevel};

use super::{HandlerResult, Reply};

/// `select ID` or `select N` (row on the current page); no argument clears
pub fn handle_select(state: &mut AppState, arg: Option<&str>) -> HandlerResult {
    let Some(arg) = arg.map(str::trim).filter(|a| !a.is_empty()) else {
        state.update(|s| s.select(None));
        return Ok(Reply::Render("Selection cleared".to_string(), StatusLevel::Info));
    };

    let id = resolve_record(state, arg)?;
    state.update(|s| s.select(Some(id.as_str())));
    Ok(Reply::Render(format!("Selected {id}"), StatusLevel::Info))
}

fn resolve_record(state: &AppState, arg: &str) -> Result<String, ValidationError> {
    let explorer = &state.explorer;
    let dataset = explorer
        .active_dataset()
        .ok_or_else(|| ValidationError::new("select", "open a dataset tab first"))?;

    if let Some(record) = dataset.find(arg) {
        return Ok(record.id.clone());
    }
    arg.parse::<usize>()
        .ok()
        .and_then(|row| row.checked_sub(1))
        .and_then(|row| dataset.query(explorer.state()).records.get(row).copied())
        .map(|record| record.id.clone())
        .ok_or_else(|| ValidationError::new("select", format!("no record '{arg}' in this tab")))
}

/// `json` prints the selected record's source fields
pub fn handle_json(state: &AppState) -> HandlerResult {
    state
        .explorer
        .selected_record()
        .map(|record| Reply::Print(format_record_json(record)))
        .ok_or_else(|| ValidationError::new("json", "no record selected"))
}
