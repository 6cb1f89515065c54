//! Item/tag/notification engine.
//!
//! # Responsibility
//! - Implement every mutating and listing operation over the store.
//! - Keep cross-entity references consistent after each operation.
//!
//! # Invariants
//! - Every operation validates fully before it mutates anything.
//! - `children_ids`/`parent_id` and `Tag::item_ids`/`TodoItem::tag_ids`
//!   mirror each other between operations.
//! - A tag that loses its last item is removed in the same operation.
//! - Operations run to completion one at a time (`&mut self`).

mod bulk;
mod deferred;
mod items;
mod summary;
mod tags;

pub use deferred::DeletionTimers;

use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::integrity::{check_integrity, IntegrityViolation};
use crate::lookup::{find_item_index, find_tag_index};
use crate::model::item::{ItemId, TodoItem};
use crate::model::tag::{Tag, TagId};
use crate::store::{MemoryStore, State, StateStore};
use log::debug;

/// Engine facade over a state store and a coarse clock.
pub struct TodoService<S: StateStore, C: Clock> {
    store: S,
    clock: C,
    config: EngineConfig,
    deletions: DeletionTimers,
}

impl TodoService<MemoryStore, SystemClock> {
    /// Creates an empty in-memory engine on the wall clock.
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new(), SystemClock)
    }
}

impl<S: StateStore, C: Clock> TodoService<S, C> {
    /// Creates an engine with default limits.
    pub fn new(store: S, clock: C) -> Self {
        Self::with_config(store, clock, EngineConfig::default())
    }

    /// Creates an engine with caller-provided limits.
    pub fn with_config(store: S, clock: C, config: EngineConfig) -> Self {
        Self {
            store,
            clock,
            config,
            deletions: DeletionTimers::default(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Read-only view of the live state.
    pub fn state(&self) -> &State {
        self.store.state()
    }

    /// Returns structural invariant violations in the current state.
    pub fn check_integrity(&self) -> Vec<IntegrityViolation> {
        check_integrity(self.store.state(), &self.config)
    }

    fn now_unit(&self) -> i64 {
        self.clock.now_unit()
    }
}

/// Logs a rejected operation. Only the error class is recorded.
fn log_rejection(event: &'static str, err: &EngineError) {
    debug!(
        "event={} module=service status=rejected kind={}",
        event,
        err.kind().as_str()
    );
}

/// Stores a new leaf item and links it under its parent.
///
/// Callers must have validated capacity, description, parent and
/// uniqueness beforehand.
fn insert_item(
    state: &mut State,
    description: &str,
    parent_id: Option<ItemId>,
    now_unit: i64,
) -> ItemId {
    let id = state.allocate_item_id();
    if let Some(parent_id) = parent_id {
        if let Some(parent_index) = find_item_index(state, parent_id) {
            state.items[parent_index].children_ids.push(id);
        }
    }
    state
        .items
        .push(TodoItem::new(id, description, parent_id, now_unit));
    id
}

/// Stores a new tag with no items.
fn insert_tag(state: &mut State, name: &str) -> TagId {
    let id = state.allocate_tag_id();
    state.tags.push(Tag::new(id, name));
    id
}

/// Removes `item_id` from a tag's back-references.
///
/// Returns `true` when the tag became empty and was removed.
fn detach_item_from_tag(state: &mut State, tag_id: TagId, item_id: ItemId) -> bool {
    let Some(tag_index) = find_tag_index(state, tag_id) else {
        return false;
    };
    let tag = &mut state.tags[tag_index];
    tag.item_ids.retain(|id| *id != item_id);
    if tag.item_ids.is_empty() {
        state.tags.remove(tag_index);
        return true;
    }
    false
}

/// Adds `item_id` to a tag's back-references if missing.
fn attach_item_to_tag(state: &mut State, tag_id: TagId, item_id: ItemId) {
    if let Some(tag_index) = find_tag_index(state, tag_id) {
        let tag = &mut state.tags[tag_index];
        if !tag.item_ids.contains(&item_id) {
            tag.item_ids.push(item_id);
        }
    }
}

/// Removes a tag and strips it from every item. Returns `false` if absent.
fn remove_tag(state: &mut State, tag_id: TagId) -> bool {
    let Some(tag_index) = find_tag_index(state, tag_id) else {
        return false;
    };
    state.tags.remove(tag_index);
    for item in state.items.iter_mut() {
        item.tag_ids.retain(|id| *id != tag_id);
    }
    true
}

/// Order-preserving de-duplication.
fn dedup_ids<T: Copy + PartialEq>(ids: &[T]) -> Vec<T> {
    let mut unique = Vec::with_capacity(ids.len());
    for id in ids {
        if !unique.contains(id) {
            unique.push(*id);
        }
    }
    unique
}
