pub mod app_state;
pub mod location;

pub use app_state::AppState;
pub use location::Location;
