pub mod client;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod gate;
pub mod logging;
pub mod registry;
pub mod selection;
pub mod view;

pub use client::{ApiClient, CollectionClient, HttpCollection, ListQuery, UnifiedJobs};
pub use config::Config;
pub use dispatcher::{BatchDispatcher, BatchEntry, BatchKind, BatchOutcome};
pub use error::{BatchError, ItemFailure, RequestFailure};
pub use gate::{ActionGate, BlockReason, Blocker};
pub use registry::Registry;
pub use selection::SelectionStore;
pub use view::JobListView;
