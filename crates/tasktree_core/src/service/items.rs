//! Item operations: create, read, update, delete, list.
//!
//! # Invariants
//! - Update validation runs in a fixed order and stops at the first failure.
//! - Deletion walks the subtree with an explicit work-list, never recursion.

use super::{
    attach_item_to_tag, dedup_ids, detach_item_from_tag, insert_item, log_rejection, TodoService,
};
use crate::clock::Clock;
use crate::error::{EngineError, EngineResult};
use crate::lookup::{
    find_item, find_item_by_description_and_parent, find_item_index, find_tag, item_count,
};
use crate::model::item::{ItemId, ItemStatus, ItemView, Score};
use crate::model::notification::Notification;
use crate::model::tag::TagId;
use crate::store::{State, StateStore};
use log::info;

impl<S: StateStore, C: Clock> TodoService<S, C> {
    /// Creates a leaf item under an optional parent and returns its id.
    ///
    /// # Errors
    /// - `CapacityExceeded` when the store is full.
    /// - `EmptyDescription`, `ParentNotFound`, `DuplicateDescription`.
    pub fn create_item(
        &mut self,
        description: &str,
        parent_id: Option<ItemId>,
    ) -> EngineResult<ItemId> {
        self.try_create_item(description, parent_id)
            .inspect_err(|err| log_rejection("item_create", err))
    }

    fn try_create_item(
        &mut self,
        description: &str,
        parent_id: Option<ItemId>,
    ) -> EngineResult<ItemId> {
        let now_unit = self.now_unit();
        let limit = self.config.max_items;
        let state = self.store.state_mut();

        let current = item_count(state);
        if current >= limit {
            return Err(EngineError::CapacityExceeded {
                limit,
                current,
                requested: 1,
            });
        }
        if description.is_empty() {
            return Err(EngineError::EmptyDescription);
        }
        if let Some(parent_id) = parent_id {
            if find_item(state, parent_id).is_none() {
                return Err(EngineError::ParentNotFound(parent_id));
            }
        }
        if find_item_by_description_and_parent(state, description, parent_id, None).is_some() {
            return Err(EngineError::DuplicateDescription { parent_id });
        }

        let item_id = insert_item(state, description, parent_id, now_unit);
        info!(
            "event=item_create module=service status=ok item_id={} has_parent={}",
            item_id,
            parent_id.is_some()
        );
        Ok(item_id)
    }

    /// Returns the read projection of one item.
    pub fn get_item(&self, item_id: ItemId) -> EngineResult<ItemView> {
        find_item(self.store.state(), item_id)
            .map(|item| item.view())
            .ok_or(EngineError::ItemNotFound(item_id))
    }

    /// Deletes an item and its whole subtree.
    ///
    /// Each removed item is detached from its tags (emptied tags are
    /// removed too) and its notification records are purged. Returns the
    /// removed ids in visit order.
    pub fn delete_item(&mut self, item_id: ItemId) -> EngineResult<Vec<ItemId>> {
        let state = self.store.state_mut();
        let Some(root_index) = find_item_index(state, item_id) else {
            let err = EngineError::ItemNotFound(item_id);
            log_rejection("item_delete", &err);
            return Err(err);
        };

        if let Some(parent_id) = state.items[root_index].parent_id {
            if let Some(parent_index) = find_item_index(state, parent_id) {
                state.items[parent_index]
                    .children_ids
                    .retain(|child| *child != item_id);
            }
        }

        let mut pending = vec![item_id];
        let mut removed = Vec::new();
        let mut removed_tags = Vec::new();
        while let Some(current) = pending.pop() {
            let Some(index) = find_item_index(state, current) else {
                continue;
            };
            let item = state.items.remove(index);
            pending.extend(item.children_ids.iter().copied());
            for tag_id in &item.tag_ids {
                if detach_item_from_tag(state, *tag_id, current) {
                    removed_tags.push(*tag_id);
                }
            }
            state
                .notifications
                .retain(|notification| notification.item_id != current);
            removed.push(current);
        }

        for tag_id in &removed_tags {
            self.deletions.forget(*tag_id);
        }
        info!(
            "event=item_delete module=service status=ok item_id={} removed_items={} removed_tags={}",
            item_id,
            removed.len(),
            removed_tags.len()
        );
        Ok(removed)
    }

    /// Replaces an item's editable fields.
    ///
    /// Validation order: item exists, description non-empty, parent exists,
    /// no duplicate sibling, status valid, tags exist, not self-parented, no
    /// cycle, deadline valid. Effects are applied only after every check
    /// passed.
    pub fn update_item(
        &mut self,
        item_id: ItemId,
        description: &str,
        tag_ids: &[TagId],
        status: &str,
        parent_id: Option<ItemId>,
        deadline: Option<i64>,
    ) -> EngineResult<ItemView> {
        let status = validate_update(
            self.store.state(),
            item_id,
            description,
            tag_ids,
            status,
            parent_id,
            deadline,
        )
        .inspect_err(|err| log_rejection("item_update", err))?;

        let now_unit = self.now_unit();
        let tag_ids = dedup_ids(tag_ids);
        let state = self.store.state_mut();
        let index = find_item_index(state, item_id).ok_or(EngineError::ItemNotFound(item_id))?;
        let previous = state.items[index].clone();

        let mut removed_tags = Vec::new();
        for old_tag in previous.tag_ids.iter().filter(|id| !tag_ids.contains(id)) {
            if detach_item_from_tag(state, *old_tag, item_id) {
                removed_tags.push(*old_tag);
            }
        }

        if previous.parent_id != parent_id {
            if let Some(old_parent) = previous.parent_id {
                if let Some(parent_index) = find_item_index(state, old_parent) {
                    state.items[parent_index]
                        .children_ids
                        .retain(|child| *child != item_id);
                }
            }
            if let Some(new_parent) = parent_id {
                if let Some(parent_index) = find_item_index(state, new_parent) {
                    let children = &mut state.items[parent_index].children_ids;
                    if !children.contains(&item_id) {
                        children.push(item_id);
                    }
                }
            }
        }

        for notification in state
            .notifications
            .iter_mut()
            .filter(|notification| notification.item_id == item_id)
        {
            notification.item_description = description.to_string();
        }
        if previous.status != status {
            state.notifications.push(Notification {
                item_id,
                item_description: description.to_string(),
                status_before: previous.status,
                status_after: status,
                change_unit: now_unit,
            });
        }

        for new_tag in tag_ids.iter().filter(|id| !previous.tag_ids.contains(id)) {
            attach_item_to_tag(state, *new_tag, item_id);
        }

        let item = &mut state.items[index];
        item.description = description.to_string();
        item.tag_ids = tag_ids;
        item.status = status;
        item.parent_id = parent_id;
        item.deadline = deadline;
        item.last_modified_unit = now_unit;
        item.score = Score::derive(status, deadline, now_unit);
        let view = item.view();

        for tag_id in &removed_tags {
            self.deletions.forget(*tag_id);
        }
        info!(
            "event=item_update module=service status=ok item_id={} status_changed={} removed_tags={}",
            item_id,
            previous.status != status,
            removed_tags.len()
        );
        Ok(view)
    }

    /// Lists items under `parent_id` (`None` lists roots).
    ///
    /// `tag_ids` keeps only items carrying every listed tag; `status` keeps
    /// exact matches. Results are in store order.
    pub fn list_items(
        &self,
        parent_id: Option<ItemId>,
        tag_ids: Option<&[TagId]>,
        status: Option<&str>,
    ) -> EngineResult<Vec<ItemView>> {
        let state = self.store.state();
        let status = status
            .map(parse_status)
            .transpose()
            .inspect_err(|err| log_rejection("item_list", err))?;
        if let Some(tag_ids) = tag_ids {
            if tag_ids.is_empty() {
                let err = EngineError::EmptyTagFilter;
                log_rejection("item_list", &err);
                return Err(err);
            }
            if let Some(missing) = tag_ids.iter().find(|id| find_tag(state, **id).is_none()) {
                let err = EngineError::UnknownTag(*missing);
                log_rejection("item_list", &err);
                return Err(err);
            }
        }
        if let Some(parent_id) = parent_id {
            if find_item(state, parent_id).is_none() {
                let err = EngineError::ParentNotFound(parent_id);
                log_rejection("item_list", &err);
                return Err(err);
            }
        }

        Ok(state
            .items
            .iter()
            .filter(|item| item.parent_id == parent_id)
            .filter(|item| {
                tag_ids.map_or(true, |tag_ids| tag_ids.iter().all(|id| item.has_tag(*id)))
            })
            .filter(|item| status.map_or(true, |status| item.status == status))
            .map(|item| item.view())
            .collect())
    }
}

pub(super) fn parse_status(value: &str) -> EngineResult<ItemStatus> {
    value
        .parse::<ItemStatus>()
        .map_err(|err| EngineError::InvalidStatus(err.0))
}

fn validate_update(
    state: &State,
    item_id: ItemId,
    description: &str,
    tag_ids: &[TagId],
    status: &str,
    parent_id: Option<ItemId>,
    deadline: Option<i64>,
) -> EngineResult<ItemStatus> {
    if find_item(state, item_id).is_none() {
        return Err(EngineError::ItemNotFound(item_id));
    }
    if description.is_empty() {
        return Err(EngineError::EmptyDescription);
    }
    if let Some(parent_id) = parent_id {
        if find_item(state, parent_id).is_none() {
            return Err(EngineError::ParentNotFound(parent_id));
        }
    }
    if find_item_by_description_and_parent(state, description, parent_id, Some(item_id)).is_some()
    {
        return Err(EngineError::DuplicateDescription { parent_id });
    }
    let status = parse_status(status)?;
    if let Some(missing) = tag_ids.iter().find(|id| find_tag(state, **id).is_none()) {
        return Err(EngineError::UnknownTag(*missing));
    }
    if let Some(parent_id) = parent_id {
        if parent_id == item_id {
            return Err(EngineError::SelfParent(item_id));
        }
        if would_create_cycle(state, item_id, parent_id) {
            return Err(EngineError::CycleDetected { item_id, parent_id });
        }
    }
    if let Some(deadline) = deadline {
        if deadline < 0 {
            return Err(EngineError::InvalidDeadline(deadline));
        }
    }
    Ok(status)
}

/// Walks parent pointers upward from `candidate_parent`.
///
/// The walk is bounded by the item count; a chain longer than that can
/// only be a pre-existing loop and is reported as a cycle.
fn would_create_cycle(state: &State, item_id: ItemId, candidate_parent: ItemId) -> bool {
    let max_steps = state.items.len();
    let mut cursor = Some(candidate_parent);
    let mut steps = 0;
    while let Some(current) = cursor {
        if current == item_id || steps > max_steps {
            return true;
        }
        steps += 1;
        cursor = find_item(state, current).and_then(|item| item.parent_id);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::would_create_cycle;
    use crate::model::item::TodoItem;
    use crate::store::State;

    fn chain(len: u64) -> State {
        let mut state = State::default();
        for id in 0..len {
            let parent = id.checked_sub(1);
            state.items.push(TodoItem::new(id, format!("n{id}"), parent, 0));
        }
        state
    }

    #[test]
    fn cycle_walk_detects_descendant_parent() {
        let state = chain(4);
        assert!(would_create_cycle(&state, 0, 3));
        assert!(would_create_cycle(&state, 1, 2));
        assert!(!would_create_cycle(&state, 3, 0));
    }

    #[test]
    fn cycle_walk_terminates_on_corrupt_loop() {
        let mut state = chain(2);
        state.items[0].parent_id = Some(1);
        assert!(would_create_cycle(&state, 7, 0));
    }
}
