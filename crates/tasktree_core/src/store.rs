//! State container for items, tags and notifications.
//!
//! # Responsibility
//! - Hold the three entity collections and both id counters.
//! - Expose whole-state read/replace access only; no business rules.
//!
//! # Invariants
//! - Collections keep insertion order ("store order").
//! - Counters only grow until `State::reset` or a wholesale replacement.

use crate::model::item::{ItemId, TodoItem};
use crate::model::notification::Notification;
use crate::model::tag::{Tag, TagId};

/// Complete in-memory snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct State {
    pub items: Vec<TodoItem>,
    pub tags: Vec<Tag>,
    pub notifications: Vec<Notification>,
    pub next_item_id: ItemId,
    pub next_tag_id: TagId,
}

impl State {
    /// Returns the next item id and advances the counter.
    pub fn allocate_item_id(&mut self) -> ItemId {
        let id = self.next_item_id;
        self.next_item_id += 1;
        id
    }

    /// Returns the next tag id and advances the counter.
    pub fn allocate_tag_id(&mut self) -> TagId {
        let id = self.next_tag_id;
        self.next_tag_id += 1;
        id
    }

    /// Empties every collection and resets both counters to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Storage seam used by the service layer.
pub trait StateStore {
    /// Returns the live state.
    fn state(&self) -> &State;
    /// Returns the live state for in-place mutation.
    fn state_mut(&mut self) -> &mut State;
    /// Replaces the whole state.
    fn set_state(&mut self, state: State);

    /// Moves the current state out, leaving an empty one behind.
    fn take_state(&mut self) -> State {
        std::mem::take(self.state_mut())
    }
}

/// Process-lifetime store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: State,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with an existing snapshot.
    pub fn with_state(state: State) -> Self {
        Self { state }
    }
}

impl StateStore for MemoryStore {
    fn state(&self) -> &State {
        &self.state
    }

    fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }

    fn set_state(&mut self, state: State) {
        self.state = state;
    }
}
