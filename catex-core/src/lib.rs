// Public modules
pub mod adapters;
pub mod catalogue;
pub mod classify;
pub mod codec;
pub mod config;
pub mod error;
pub mod explorer;
pub mod facets;
pub mod filtering;
pub mod grouping;
pub mod io;
pub mod models;
pub mod normalize;
pub mod overview;
pub mod pipeline;
pub mod schema_validation;
pub mod sorting;
pub mod state;
pub mod value;

// Re-export commonly used types for convenience
pub use adapters::{Adapter, Normalizable, RawEntry, SearchScope};
pub use catalogue::{Catalogue, CatalogueMeta, Dataset, Statistics};
pub use classify::{classify, classify_parts};
pub use codec::{HashCodec, UrlGrammar};
pub use config::{load_config, ExplorerConfig};
pub use error::CatalogueError;
pub use explorer::{
    AboutView, DatasetView, Explorer, LoadOutcome, LoadTicket, RequirementsView, View,
};
pub use facets::{compute_counts, facet_counts, top_n, FacetSummary};
pub use filtering::{apply_filters, has_filters, matches_filters, parse_facet_filters};
pub use grouping::{group_by_field, group_requirements, RequirementEntry, RequirementGroup};
pub use io::{fetch_with_fallback, CatalogueSource, FileSource, MemorySource};
pub use models::{Cluster, Facet, FacetCount, Field, FieldValue, NormalizedRecord};
pub use normalize::normalize;
pub use overview::{
    build_overview, format_effective_date, Bar, Chart, Kpi, Overview, StatusLevel, StatusTag,
};
pub use pipeline::{paginate, query, Kpis, Pagination, QueryResult};
pub use schema_validation::{validate_against_schema, SchemaViolation};
pub use sorting::{collate, normalize_for_sorting, sort_records};
pub use state::{QueryState, SortDirection, SortSpec, Tab, Toggle, DEFAULT_PAGE_SIZE, PAGE_SIZES};
