/*
[INPUT]:  Public API exports for jobmon-clustered-errors crate
[OUTPUT]: Module declarations and public re-exports
[POS]:    Crate root - library entry point
[UPDATE]: When adding new modules or public exports
*/

pub mod config;
pub mod paging;
pub mod panel;
pub mod query;
pub mod report;
pub mod runtime;
pub mod source;
pub mod view;

// Re-export main types for convenience
pub use config::ViewerConfig;
pub use paging::{SampleCursor, Selection};
pub use panel::{ClusteredErrorsPanel, FetchOutcome, PanelCommand};
pub use query::{DetailQueryKey, FetchState, GroupQueryKey};
pub use source::ErrorLogSource;
pub use view::SortOrder;
