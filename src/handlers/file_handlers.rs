use catex_core::LoadOutcome;

use crate::operations::FileOperations;
use crate::state::AppState;
use crate::ui::StatusLevel;

use super::{HandlerResult, Reply};

/// `reload` fetches the catalogue again, keeping the current view
pub fn handle_reload(state: &mut AppState) -> HandlerResult {
    let reply = match FileOperations::new(state).load() {
        LoadOutcome::Applied => {
            let location = state
                .explorer
                .catalogue()
                .map(|c| c.location.clone())
                .unwrap_or_default();
            Reply::Render(format!("Reloaded {location}"), StatusLevel::Success)
        }
        LoadOutcome::Failed => Reply::Render("Reload failed".to_string(), StatusLevel::Error),
        LoadOutcome::Stale => {
            Reply::Render("Reload superseded".to_string(), StatusLevel::Warning)
        }
    };
    Ok(reply)
}
