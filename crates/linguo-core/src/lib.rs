/*
[INPUT]:  Public API exports for linguo-core crate
[OUTPUT]: Module declarations and public re-exports
[POS]:    Crate root - library entry point
[UPDATE]: When adding new modules or public exports
*/

pub mod action;
pub mod appeal;
pub mod config;
pub mod domain;
pub mod error;
pub mod filters;
pub mod runtime;
pub mod sorting;
pub mod status_details;
pub mod store;
pub mod workflow;

// Re-export main types for convenience
pub use action::{Action, ActionKind, AppealFunding, AsyncAction, Phase, TxMeta};
pub use appeal::{AppealState, classify};
pub use config::LinguoConfig;
pub use error::ActionError;
pub use filters::TaskFilter;
pub use runtime::Runtime;
pub use sorting::{SortContext, get_comparator, get_comparator_by_name, list_tasks};
pub use status_details::{StatusDetails, task_status_details};
pub use store::{AppState, LoadingState};
pub use workflow::TxWatchConfig;
