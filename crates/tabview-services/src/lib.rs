//! Tabview Services Layer
//!
//! Coordinates the query state of a remote table view. Nothing here renders;
//! a front end feeds gestures in and reads snapshots out.
//!
//! # Architecture
//!
//! ```text
//! Front end (tabview-cli)
//!     ↓
//! Service Layer (tabview-services) ← This crate
//!     ↓
//! QueryEngine trait (tabview-core) ← implemented by tabview-remote
//! ```
//!
//! # Components
//!
//! - [`TableBrowser`] - Owns the state of one table view and wires the pieces below
//! - [`QueryStateController`] - Immutable descriptor snapshots, page reset rules
//! - [`RemoteQueryExecutor`] - Issues descriptors and suppresses stale responses
//! - [`FilterBuilder`] - Validates filter drafts against the schema
//! - [`SortCycle`] - Header-click sort cycling
//! - [`Pagination`] - Page bounds and navigation
//! - [`InlineCellEditor`] - Single-cell edit state machine
//!
//! # Design Principles
//!
//! 1. **Snapshots, not shared state** - every update produces a new descriptor
//! 2. **No borrows across awaits** - remote calls are returned as owned pending values
//! 3. **The engine is authoritative** - edits re-fetch rather than patch rows

mod browser;
mod bulk;
mod cell_editor;
mod error;
mod executor;
mod filter_builder;
mod metrics;
mod notices;
mod pagination;
mod query_state;
mod sort_cycle;

pub use browser::TableBrowser;
pub use bulk::{PendingClear, PendingDelete, PendingExport};
pub use cell_editor::{
    CellEditSession, EditStatus, FieldUpdate, InlineCellEditor, PendingSave, SaveCompletion,
    SaveResolution,
};
pub use error::{RemoteOperation, ServiceError, ServiceResult, ValidationError};
pub use executor::{Delivery, PendingQuery, QueryCompletion, QueryTicket, RemoteQueryExecutor};
pub use filter_builder::{FilterBuilder, FilterDraft, clear_all, remove_filter};
pub use metrics::{
    MetricCategory, MetricLine, format_metric, group_metrics, group_thousands, load_metrics,
    metric_label,
};
pub use notices::{Notice, NoticeLevel};
pub use pagination::Pagination;
pub use query_state::{DescriptorUpdate, QueryStateController};
pub use sort_cycle::{SortCycle, direction_of, header_label, toggle_sort};
