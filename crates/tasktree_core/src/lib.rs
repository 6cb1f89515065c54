//! Core domain logic for tasktree.
//! This crate is the single source of truth for item/tag/notification
//! invariants; transports call into `TodoService` and forward its results.

pub mod bulk;
pub mod clock;
pub mod config;
pub mod error;
pub mod integrity;
pub mod logging;
pub mod lookup;
pub mod model;
pub mod service;
pub mod store;

pub use bulk::{parse_batch, BulkRecord, ParentRef};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::EngineConfig;
pub use error::{EngineError, EngineResult, ErrorKind};
pub use integrity::{check_integrity, empty_tags, IntegrityViolation};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::item::{ItemId, ItemStatus, ItemView, Score, TodoItem};
pub use model::notification::Notification;
pub use model::tag::{Tag, TagId, TagView};
pub use service::TodoService;
pub use store::{MemoryStore, State, StateStore};

/// Minimal health-check API for transport probes.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
