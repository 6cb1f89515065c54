//! Tag operations.

use super::{insert_tag, log_rejection, remove_tag, TodoService};
use crate::clock::Clock;
use crate::error::{EngineError, EngineResult};
use crate::lookup::{find_tag, find_tag_by_name};
use crate::model::tag::{TagId, TagView};
use crate::store::StateStore;
use log::info;

impl<S: StateStore, C: Clock> TodoService<S, C> {
    /// Creates a tag with no items and returns its id.
    ///
    /// # Errors
    /// - `InvalidTagName` when the name length is out of range.
    /// - `DuplicateTagName` when the exact name is taken.
    pub fn create_tag(&mut self, name: &str) -> EngineResult<TagId> {
        self.try_create_tag(name)
            .inspect_err(|err| log_rejection("tag_create", err))
    }

    fn try_create_tag(&mut self, name: &str) -> EngineResult<TagId> {
        if !self.config.is_valid_tag_name(name) {
            return Err(EngineError::InvalidTagName {
                length: name.chars().count(),
                max_chars: self.config.tag_name_max_chars,
            });
        }
        let state = self.store.state_mut();
        if find_tag_by_name(state, name).is_some() {
            return Err(EngineError::DuplicateTagName(name.to_string()));
        }

        let tag_id = insert_tag(state, name);
        info!("event=tag_create module=service status=ok tag_id={tag_id}");
        Ok(tag_id)
    }

    /// Lists `{id, name}` for every tag in store order.
    pub fn list_tags(&self) -> Vec<TagView> {
        self.store.state().tags.iter().map(|tag| tag.view()).collect()
    }

    /// Returns the name of one tag.
    pub fn get_tag_name(&self, tag_id: TagId) -> EngineResult<String> {
        find_tag(self.store.state(), tag_id)
            .map(|tag| tag.name.clone())
            .ok_or(EngineError::TagNotFound(tag_id))
    }

    /// Deletes a tag and detaches it from every item.
    ///
    /// Items are never deleted by this operation. A pending deferred
    /// deletion for the tag is cancelled.
    pub fn delete_tag(&mut self, tag_id: TagId) -> EngineResult<()> {
        if !remove_tag(self.store.state_mut(), tag_id) {
            let err = EngineError::TagNotFound(tag_id);
            log_rejection("tag_delete", &err);
            return Err(err);
        }
        self.deletions.forget(tag_id);
        info!("event=tag_delete module=service status=ok tag_id={tag_id}");
        Ok(())
    }
}
