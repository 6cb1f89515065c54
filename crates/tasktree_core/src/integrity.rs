//! Structural invariant checks over a state snapshot.
//!
//! # Responsibility
//! - Report every broken cross reference instead of stopping at the first.
//! - Stay read-only; repairs are out of scope.
//!
//! Empty tags are reported separately by `empty_tags` because `create_tag`
//! legitimately produces a tag with no items.

use crate::config::EngineConfig;
use crate::lookup::{find_item, find_tag};
use crate::model::item::ItemId;
use crate::model::tag::TagId;
use crate::store::State;
use std::collections::HashSet;
use std::fmt::{Display, Formatter};

/// One broken invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityViolation {
    TooManyItems { count: usize, limit: usize },
    DuplicateItemId(ItemId),
    DuplicateTagId(TagId),
    DuplicateTagName(String),
    IdAboveCounter { kind: &'static str, id: u64 },
    MissingParent { item_id: ItemId, parent_id: ItemId },
    ChildrenMismatch(ItemId),
    ParentCycle(ItemId),
    DuplicateSibling(ItemId),
    MissingTag { item_id: ItemId, tag_id: TagId },
    TagMirrorMismatch(TagId),
    DanglingNotification(ItemId),
}

impl Display for IntegrityViolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooManyItems { count, limit } => {
                write!(f, "{count} items stored, limit is {limit}")
            }
            Self::DuplicateItemId(id) => write!(f, "item id {id} appears twice"),
            Self::DuplicateTagId(id) => write!(f, "tag id {id} appears twice"),
            Self::DuplicateTagName(name) => write!(f, "tag name `{name}` appears twice"),
            Self::IdAboveCounter { kind, id } => {
                write!(f, "{kind} id {id} is not below its counter")
            }
            Self::MissingParent { item_id, parent_id } => {
                write!(f, "item {item_id} points at missing parent {parent_id}")
            }
            Self::ChildrenMismatch(id) => write!(f, "children of item {id} do not mirror parents"),
            Self::ParentCycle(id) => write!(f, "parent chain of item {id} loops"),
            Self::DuplicateSibling(id) => {
                write!(f, "item {id} duplicates a sibling description")
            }
            Self::MissingTag { item_id, tag_id } => {
                write!(f, "item {item_id} references missing tag {tag_id}")
            }
            Self::TagMirrorMismatch(id) => write!(f, "items of tag {id} do not mirror item tags"),
            Self::DanglingNotification(id) => {
                write!(f, "notification references missing item {id}")
            }
        }
    }
}

/// Returns every structural violation found in `state`.
pub fn check_integrity(state: &State, config: &EngineConfig) -> Vec<IntegrityViolation> {
    let mut violations = Vec::new();

    if state.items.len() > config.max_items {
        violations.push(IntegrityViolation::TooManyItems {
            count: state.items.len(),
            limit: config.max_items,
        });
    }

    let mut item_ids = HashSet::new();
    let mut sibling_keys = HashSet::new();
    for item in &state.items {
        if !item_ids.insert(item.id) {
            violations.push(IntegrityViolation::DuplicateItemId(item.id));
        }
        if item.id >= state.next_item_id {
            violations.push(IntegrityViolation::IdAboveCounter {
                kind: "item",
                id: item.id,
            });
        }
        if !sibling_keys.insert((item.description.as_str(), item.parent_id)) {
            violations.push(IntegrityViolation::DuplicateSibling(item.id));
        }
        if let Some(parent_id) = item.parent_id {
            if find_item(state, parent_id).is_none() {
                violations.push(IntegrityViolation::MissingParent {
                    item_id: item.id,
                    parent_id,
                });
            }
        }

        let mut expected_children: Vec<ItemId> = state
            .items
            .iter()
            .filter(|other| other.parent_id == Some(item.id))
            .map(|other| other.id)
            .collect();
        let mut actual_children = item.children_ids.clone();
        expected_children.sort_unstable();
        actual_children.sort_unstable();
        if expected_children != actual_children {
            violations.push(IntegrityViolation::ChildrenMismatch(item.id));
        }

        if has_parent_cycle(state, item.id) {
            violations.push(IntegrityViolation::ParentCycle(item.id));
        }

        for tag_id in &item.tag_ids {
            if find_tag(state, *tag_id).is_none() {
                violations.push(IntegrityViolation::MissingTag {
                    item_id: item.id,
                    tag_id: *tag_id,
                });
            }
        }
    }

    let mut tag_ids = HashSet::new();
    let mut tag_names = HashSet::new();
    for tag in &state.tags {
        if !tag_ids.insert(tag.id) {
            violations.push(IntegrityViolation::DuplicateTagId(tag.id));
        }
        if !tag_names.insert(tag.name.as_str()) {
            violations.push(IntegrityViolation::DuplicateTagName(tag.name.clone()));
        }
        if tag.id >= state.next_tag_id {
            violations.push(IntegrityViolation::IdAboveCounter {
                kind: "tag",
                id: tag.id,
            });
        }

        let mut expected_items: Vec<ItemId> = state
            .items
            .iter()
            .filter(|item| item.has_tag(tag.id))
            .map(|item| item.id)
            .collect();
        let mut actual_items = tag.item_ids.clone();
        expected_items.sort_unstable();
        actual_items.sort_unstable();
        if expected_items != actual_items {
            violations.push(IntegrityViolation::TagMirrorMismatch(tag.id));
        }
    }

    for notification in &state.notifications {
        if find_item(state, notification.item_id).is_none() {
            violations.push(IntegrityViolation::DanglingNotification(
                notification.item_id,
            ));
        }
    }

    violations
}

/// Tags currently attached to no item.
pub fn empty_tags(state: &State) -> Vec<TagId> {
    state
        .tags
        .iter()
        .filter(|tag| tag.item_ids.is_empty())
        .map(|tag| tag.id)
        .collect()
}

fn has_parent_cycle(state: &State, start: ItemId) -> bool {
    let mut visited = HashSet::new();
    let mut cursor = Some(start);
    while let Some(current) = cursor {
        if !visited.insert(current) {
            return true;
        }
        cursor = find_item(state, current).and_then(|item| item.parent_id);
    }
    false
}
