//! Tag domain model.
//!
//! # Invariants
//! - `name` is unique across all tags (exact, case-sensitive).
//! - `item_ids` mirrors exactly the items whose `tag_ids` contain this tag.

use crate::model::item::ItemId;
use serde::{Deserialize, Serialize};

/// Process-lifetime tag identifier. Never reused until the store is cleared.
pub type TagId = u64;

/// Canonical tag record held by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    pub item_ids: Vec<ItemId>,
}

impl Tag {
    /// Creates a tag with no attached items.
    pub fn new(id: TagId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            item_ids: Vec::new(),
        }
    }

    /// Returns the `{id, name}` projection.
    pub fn view(&self) -> TagView {
        TagView {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

/// Read projection of a tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagView {
    pub id: TagId,
    pub name: String,
}
