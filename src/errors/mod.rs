pub mod error_mapper;

pub use error_mapper::map_load_error;
