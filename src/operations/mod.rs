pub mod file_ops;
pub mod validation;

pub use file_ops::FileOperations;
pub use validation::{
    parse_direction, parse_facet_arg, parse_facet_name, parse_min_flow, parse_page_move,
    parse_page_size, parse_switch, parse_tab, parse_toggle, PageMove, ValidationError,
};
