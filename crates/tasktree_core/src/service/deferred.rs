//! Deferred tag deletion.
//!
//! # Responsibility
//! - Track at most one pending single-shot deletion per tag.
//! - Fire due deletions on the same logical timeline as requests.
//!
//! # Invariants
//! - Timers never run concurrently with an operation; they fire only
//!   inside `run_due_deletions`.
//! - A timer whose tag disappeared before firing is dropped silently.

use super::{log_rejection, remove_tag, TodoService};
use crate::clock::Clock;
use crate::error::{EngineError, EngineResult};
use crate::lookup::find_tag;
use crate::model::tag::TagId;
use crate::store::StateStore;
use log::info;
use std::collections::BTreeMap;

/// Pending deletions keyed by tag, valued by due unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletionTimers {
    pending: BTreeMap<TagId, i64>,
}

impl DeletionTimers {
    /// Registers a timer. Returns `false` when one is already pending.
    pub fn schedule(&mut self, tag_id: TagId, due_unit: i64) -> bool {
        if self.pending.contains_key(&tag_id) {
            return false;
        }
        self.pending.insert(tag_id, due_unit);
        true
    }

    /// Cancels a timer. Returns `false` when none was pending.
    pub fn cancel(&mut self, tag_id: TagId) -> bool {
        self.pending.remove(&tag_id).is_some()
    }

    /// Drops a timer if present.
    pub fn forget(&mut self, tag_id: TagId) {
        self.pending.remove(&tag_id);
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// `(tag_id, due_unit)` pairs ordered by tag id.
    pub fn pending(&self) -> Vec<(TagId, i64)> {
        self.pending
            .iter()
            .map(|(tag_id, due)| (*tag_id, *due))
            .collect()
    }

    /// Removes and returns every timer due at or before `now_unit`,
    /// ordered by due unit then tag id.
    pub fn take_due(&mut self, now_unit: i64) -> Vec<TagId> {
        let mut due: Vec<(i64, TagId)> = self
            .pending
            .iter()
            .filter(|(_, due)| **due <= now_unit)
            .map(|(tag_id, due)| (*due, *tag_id))
            .collect();
        due.sort_unstable();
        for (_, tag_id) in &due {
            self.pending.remove(tag_id);
        }
        due.into_iter().map(|(_, tag_id)| tag_id).collect()
    }
}

impl<S: StateStore, C: Clock> TodoService<S, C> {
    /// Schedules deletion of a tag `delay_units` from now.
    ///
    /// # Errors
    /// - `TagNotFound` when the tag does not exist.
    /// - `InvalidDelay` when `delay_units` is negative.
    /// - `DeletionAlreadyScheduled` when a timer is already pending.
    pub fn schedule_tag_deletion(&mut self, tag_id: TagId, delay_units: i64) -> EngineResult<i64> {
        self.try_schedule_tag_deletion(tag_id, delay_units)
            .inspect_err(|err| log_rejection("tag_delete_schedule", err))
    }

    fn try_schedule_tag_deletion(&mut self, tag_id: TagId, delay_units: i64) -> EngineResult<i64> {
        if find_tag(self.store.state(), tag_id).is_none() {
            return Err(EngineError::TagNotFound(tag_id));
        }
        if delay_units < 0 {
            return Err(EngineError::InvalidDelay(delay_units));
        }
        let due_unit = self.now_unit().saturating_add(delay_units);
        if !self.deletions.schedule(tag_id, due_unit) {
            return Err(EngineError::DeletionAlreadyScheduled(tag_id));
        }
        info!(
            "event=tag_delete_schedule module=service status=ok tag_id={tag_id} due_unit={due_unit}"
        );
        Ok(due_unit)
    }

    /// Cancels a pending deletion.
    pub fn cancel_tag_deletion(&mut self, tag_id: TagId) -> EngineResult<()> {
        if !self.deletions.cancel(tag_id) {
            let err = EngineError::NoDeletionScheduled(tag_id);
            log_rejection("tag_delete_cancel", &err);
            return Err(err);
        }
        info!("event=tag_delete_cancel module=service status=ok tag_id={tag_id}");
        Ok(())
    }

    /// Pending deletions as `(tag_id, due_unit)`, ordered by tag id.
    pub fn pending_tag_deletions(&self) -> Vec<(TagId, i64)> {
        self.deletions.pending()
    }

    /// Fires every deletion due at the current unit.
    ///
    /// Returns the ids of tags actually deleted.
    pub fn run_due_deletions(&mut self) -> Vec<TagId> {
        let now_unit = self.now_unit();
        let due = self.deletions.take_due(now_unit);
        let state = self.store.state_mut();
        let deleted: Vec<TagId> = due
            .into_iter()
            .filter(|tag_id| remove_tag(state, *tag_id))
            .collect();
        if !deleted.is_empty() {
            info!(
                "event=tag_delete_fire module=service status=ok deleted_tags={}",
                deleted.len()
            );
        }
        deleted
    }
}
