mod cache;
pub mod catalog;
mod dashboard;
mod error;
mod relation;
mod selection;
mod state;
mod table;
mod viewer;

pub use cache::{Clock, ManualClock, SystemClock, TtlCache};
pub use catalog::{COLLECTIONS, RELATION_QUERIES, RelationQuery};
pub use dashboard::{Dashboard, SELECTION_TTL};
pub use error::DashboardError;
pub use relation::resolve_relation;
pub use selection::{
    SelectionItem, SelectionMap, build_selection_map, choose_display_field,
    preferred_display_field,
};
pub use state::{Resolution, ViewState};
pub use table::Table;
pub use viewer::view_all;
