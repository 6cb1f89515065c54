//! Bulk item creation from the batch mini-language.
//!
//! # Invariants
//! - The capacity check covers the whole batch and runs before any record
//!   is validated.
//! - Every record is validated before the first item or tag is created.
//! - A record repeating an earlier record's (description, parent) pair is
//!   skipped, not rejected.

use super::items::parse_status;
use super::{attach_item_to_tag, dedup_ids, insert_item, insert_tag, log_rejection, TodoService};
use crate::bulk::{parse_batch, BulkRecord, ParentRef};
use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::lookup::{find_item, find_item_by_description_and_parent, find_tag_by_name, item_count};
use crate::model::item::{ItemId, ItemStatus, Score};
use crate::store::{State, StateStore};
use log::{debug, info};

/// A record that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PlannedItem {
    description: String,
    parent_id: Option<ItemId>,
    status: ItemStatus,
    tag_names: Vec<String>,
}

impl<S: StateStore, C: Clock> TodoService<S, C> {
    /// Creates items from batch text and returns their ids in input order.
    ///
    /// Skipped duplicate records contribute no id.
    ///
    /// # Errors
    /// - `CapacityExceeded` when stored items plus records would pass the limit.
    /// - `BulkRecord` wrapping the first record-level validation failure.
    pub fn create_items_bulk(&mut self, batch: &str) -> EngineResult<Vec<ItemId>> {
        let records = parse_batch(batch);
        let plan = plan_batch(self.store.state(), &self.config, &records)
            .inspect_err(|err| log_rejection("item_bulk_create", err))?;

        let now_unit = self.now_unit();
        let state = self.store.state_mut();
        let mut created = Vec::with_capacity(plan.len());
        let mut created_tags = 0usize;
        for planned in plan {
            let mut tag_ids = Vec::with_capacity(planned.tag_names.len());
            for name in &planned.tag_names {
                let tag_id = match find_tag_by_name(state, name) {
                    Some(tag) => tag.id,
                    None => {
                        created_tags += 1;
                        insert_tag(state, name)
                    }
                };
                tag_ids.push(tag_id);
            }
            let tag_ids = dedup_ids(&tag_ids);

            let item_id = insert_item(state, &planned.description, planned.parent_id, now_unit);
            for tag_id in &tag_ids {
                attach_item_to_tag(state, *tag_id, item_id);
            }
            if let Some(item) = state.items.last_mut() {
                item.status = planned.status;
                item.score = Score::derive(planned.status, None, now_unit);
                item.tag_ids = tag_ids;
            }
            created.push(item_id);
        }

        info!(
            "event=item_bulk_create module=service status=ok records={} created_items={} created_tags={}",
            records.len(),
            created.len(),
            created_tags
        );
        Ok(created)
    }
}

fn plan_batch(
    state: &State,
    config: &EngineConfig,
    records: &[BulkRecord],
) -> EngineResult<Vec<PlannedItem>> {
    let current = item_count(state);
    if current + records.len() > config.max_items {
        return Err(EngineError::CapacityExceeded {
            limit: config.max_items,
            current,
            requested: records.len(),
        });
    }

    let mut accepted: Vec<PlannedItem> = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        if !record.has_supported_shape() {
            return Err(EngineError::UnsupportedRecordShape {
                field_count: record.field_count,
            }
            .in_record(index));
        }
        if record.description.is_empty() {
            return Err(EngineError::EmptyDescription.in_record(index));
        }
        let parent_id = resolve_parent(&record.parent).map_err(|err| err.in_record(index))?;
        if accepted
            .iter()
            .any(|prior| prior.description == record.description && prior.parent_id == parent_id)
        {
            debug!("event=item_bulk_create module=service status=skipped record={index}");
            continue;
        }
        if let Some(parent_id) = parent_id {
            if find_item(state, parent_id).is_none() {
                return Err(EngineError::ParentNotFound(parent_id).in_record(index));
            }
        }
        if find_item_by_description_and_parent(state, &record.description, parent_id, None)
            .is_some()
        {
            return Err(EngineError::DuplicateDescription { parent_id }.in_record(index));
        }
        let status = parse_status(&record.status).map_err(|err| err.in_record(index))?;
        if let Some(name) = record
            .tag_names
            .iter()
            .find(|name| !config.is_valid_tag_name(name))
        {
            return Err(EngineError::InvalidTagName {
                length: name.chars().count(),
                max_chars: config.tag_name_max_chars,
            }
            .in_record(index));
        }

        accepted.push(PlannedItem {
            description: record.description.clone(),
            parent_id,
            status,
            tag_names: record.tag_names.clone(),
        });
    }
    Ok(accepted)
}

fn resolve_parent(parent: &ParentRef) -> EngineResult<Option<ItemId>> {
    match parent {
        ParentRef::Root => Ok(None),
        ParentRef::Id(value) => ItemId::try_from(*value)
            .map(Some)
            .map_err(|_| EngineError::InvalidParentReference(value.to_string())),
        ParentRef::Unparsable(value) => Err(EngineError::InvalidParentReference(value.clone())),
    }
}
