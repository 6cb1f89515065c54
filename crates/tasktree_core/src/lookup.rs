//! Pure lookup helpers over a state snapshot.
//!
//! None of these functions mutate state. Collections are small (the item
//! ceiling is a few dozen), so linear scans are used throughout.

use crate::model::item::{ItemId, TodoItem};
use crate::model::tag::{Tag, TagId};
use crate::store::State;

pub fn find_item(state: &State, id: ItemId) -> Option<&TodoItem> {
    state.items.iter().find(|item| item.id == id)
}

pub fn find_item_index(state: &State, id: ItemId) -> Option<usize> {
    state.items.iter().position(|item| item.id == id)
}

pub fn find_tag(state: &State, id: TagId) -> Option<&Tag> {
    state.tags.iter().find(|tag| tag.id == id)
}

pub fn find_tag_index(state: &State, id: TagId) -> Option<usize> {
    state.tags.iter().position(|tag| tag.id == id)
}

/// Exact, case-sensitive name match.
pub fn find_tag_by_name<'s>(state: &'s State, name: &str) -> Option<&'s Tag> {
    state.tags.iter().find(|tag| tag.name == name)
}

/// Finds an item sharing both `description` and `parent_id`.
///
/// `exclude` skips one item id, used when an item is checked against its
/// own siblings during an update.
pub fn find_item_by_description_and_parent<'s>(
    state: &'s State,
    description: &str,
    parent_id: Option<ItemId>,
    exclude: Option<ItemId>,
) -> Option<&'s TodoItem> {
    state.items.iter().find(|item| {
        item.description == description
            && item.parent_id == parent_id
            && Some(item.id) != exclude
    })
}

pub fn item_count(state: &State) -> usize {
    state.items.len()
}
