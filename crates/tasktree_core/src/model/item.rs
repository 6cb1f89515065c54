//! Todo item domain model.
//!
//! # Responsibility
//! - Define the canonical item record held by the store.
//! - Define status/score vocabularies and the read projection handed to callers.
//!
//! # Invariants
//! - `children_ids` mirrors exactly the items whose `parent_id` is this item.
//! - `score` is derived from `status` and `deadline` on every update.
//! - `tag_ids` holds no duplicates.

use crate::model::tag::TagId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Process-lifetime item identifier. Never reused until the store is cleared.
pub type ItemId = u64;

/// Item lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ItemStatus {
    /// Created but not started.
    Todo,
    /// Work is in progress.
    InProgress,
    /// Waiting on something else.
    Blocked,
    /// Completed.
    Done,
}

impl ItemStatus {
    /// Stable wire string for this status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "TODO",
            Self::InProgress => "INPROGRESS",
            Self::Blocked => "BLOCKED",
            Self::Done => "DONE",
        }
    }
}

impl Display for ItemStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status string did not match any known value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl Display for UnknownStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid status `{}`; expected TODO|INPROGRESS|BLOCKED|DONE",
            self.0
        )
    }
}

impl Error for UnknownStatus {}

impl FromStr for ItemStatus {
    type Err = UnknownStatus;

    /// Exact, case-sensitive match against the wire strings.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "TODO" => Ok(Self::Todo),
            "INPROGRESS" => Ok(Self::InProgress),
            "BLOCKED" => Ok(Self::Blocked),
            "DONE" => Ok(Self::Done),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Completion score derived from status and deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Score {
    /// Finished after its deadline.
    Low,
    /// Not finished yet.
    Na,
    /// Finished on time, or finished without a deadline.
    High,
}

impl Score {
    /// Derives the score for a status/deadline pair at `now_unit`.
    ///
    /// A deadline equal to `now_unit` counts as on time.
    pub fn derive(status: ItemStatus, deadline: Option<i64>, now_unit: i64) -> Self {
        if status != ItemStatus::Done {
            return Self::Na;
        }
        match deadline {
            Some(deadline) if deadline < now_unit => Self::Low,
            _ => Self::High,
        }
    }
}

/// Canonical item record held by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: ItemId,
    pub description: String,
    pub status: ItemStatus,
    pub tag_ids: Vec<TagId>,
    /// `None` means a root item.
    pub parent_id: Option<ItemId>,
    /// Child ids in attach order.
    pub children_ids: Vec<ItemId>,
    pub score: Score,
    /// Coarse timestamp (seconds) of the last create/update.
    pub last_modified_unit: i64,
    /// Unix seconds.
    pub deadline: Option<i64>,
}

impl TodoItem {
    /// Creates a fresh leaf item with default lifecycle fields.
    ///
    /// # Invariants
    /// - Starts as `Todo` with score `Na`, no tags, no children, no deadline.
    pub fn new(
        id: ItemId,
        description: impl Into<String>,
        parent_id: Option<ItemId>,
        now_unit: i64,
    ) -> Self {
        Self {
            id,
            description: description.into(),
            status: ItemStatus::Todo,
            tag_ids: Vec::new(),
            parent_id,
            children_ids: Vec::new(),
            score: Score::Na,
            last_modified_unit: now_unit,
            deadline: None,
        }
    }

    pub fn has_tag(&self, tag_id: TagId) -> bool {
        self.tag_ids.contains(&tag_id)
    }

    /// Returns the caller-facing projection of this item.
    pub fn view(&self) -> ItemView {
        ItemView {
            id: self.id,
            description: self.description.clone(),
            tag_ids: self.tag_ids.clone(),
            status: self.status,
            parent_id: self.parent_id,
            score: self.score,
        }
    }
}

/// Read projection of an item.
///
/// Internal bookkeeping (`children_ids`, `last_modified_unit`) is not exposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemView {
    pub id: ItemId,
    pub description: String,
    pub tag_ids: Vec<TagId>,
    pub status: ItemStatus,
    pub parent_id: Option<ItemId>,
    pub score: Score,
}

#[cfg(test)]
mod tests {
    use super::{ItemStatus, Score, TodoItem};

    #[test]
    fn status_parse_is_case_sensitive() {
        assert_eq!("INPROGRESS".parse::<ItemStatus>(), Ok(ItemStatus::InProgress));
        assert!("done".parse::<ItemStatus>().is_err());
        assert!("".parse::<ItemStatus>().is_err());
    }

    #[test]
    fn score_rules() {
        assert_eq!(Score::derive(ItemStatus::Blocked, Some(0), 10), Score::Na);
        assert_eq!(Score::derive(ItemStatus::Done, None, 10), Score::High);
        assert_eq!(Score::derive(ItemStatus::Done, Some(10), 10), Score::High);
        assert_eq!(Score::derive(ItemStatus::Done, Some(11), 10), Score::High);
        assert_eq!(Score::derive(ItemStatus::Done, Some(9), 10), Score::Low);
    }

    #[test]
    fn new_item_defaults() {
        let item = TodoItem::new(4, "write docs", Some(1), 77);
        assert_eq!(item.status, ItemStatus::Todo);
        assert_eq!(item.score, Score::Na);
        assert!(item.tag_ids.is_empty());
        assert!(item.children_ids.is_empty());
        assert_eq!(item.deadline, None);
        assert_eq!(item.last_modified_unit, 77);
    }
}
