//! Engine error vocabulary.
//!
//! # Responsibility
//! - Name every precondition an engine operation can reject.
//! - Map each variant onto a coarse `ErrorKind` a transport can translate.
//!
//! # Invariants
//! - Errors carry no transport vocabulary (status codes, headers).
//! - An error is only returned before any state was mutated.

use crate::model::item::ItemId;
use crate::model::tag::TagId;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type EngineResult<T> = Result<T, EngineError>;

/// Coarse error class exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or constraint-violating input.
    Validation,
    /// The operated-on entity does not exist.
    NotFound,
    /// The item ceiling would be exceeded.
    Capacity,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::Capacity => "capacity",
        }
    }
}

/// Errors from engine operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Item description is empty.
    EmptyDescription,
    /// Another item already uses this description under the same parent.
    DuplicateDescription { parent_id: Option<ItemId> },
    /// Referenced parent item does not exist.
    ParentNotFound(ItemId),
    /// An item was proposed as its own parent.
    SelfParent(ItemId),
    /// The proposed parent is a descendant of the item.
    CycleDetected { item_id: ItemId, parent_id: ItemId },
    /// Status text is not one of the known values.
    InvalidStatus(String),
    /// Deadline is not a valid unix timestamp.
    InvalidDeadline(i64),
    /// Summary page is outside the allowed window.
    InvalidPage { page: u32, max_page: u32 },
    /// Tag name length (chars) is outside the allowed range.
    InvalidTagName { length: usize, max_chars: usize },
    /// A tag with this name already exists.
    DuplicateTagName(String),
    /// An input references a tag that does not exist.
    UnknownTag(TagId),
    /// A tag filter was provided but empty.
    EmptyTagFilter,
    /// Target item does not exist.
    ItemNotFound(ItemId),
    /// Target tag does not exist.
    TagNotFound(TagId),
    /// Accepting the request would exceed the item ceiling.
    CapacityExceeded {
        limit: usize,
        current: usize,
        requested: usize,
    },
    /// Bulk record has a field count no shape accepts.
    UnsupportedRecordShape { field_count: usize },
    /// Bulk parent field is neither blank, `null`, nor an integer.
    InvalidParentReference(String),
    /// One bulk record failed validation.
    BulkRecord {
        index: usize,
        reason: Box<EngineError>,
    },
    /// A deferred deletion is already pending for this tag.
    DeletionAlreadyScheduled(TagId),
    /// No deferred deletion is pending for this tag.
    NoDeletionScheduled(TagId),
    /// Deferred deletion delay is negative.
    InvalidDelay(i64),
}

impl EngineError {
    /// Returns the coarse class used by transport adapters.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ItemNotFound(_) | Self::TagNotFound(_) | Self::NoDeletionScheduled(_) => {
                ErrorKind::NotFound
            }
            Self::CapacityExceeded { .. } => ErrorKind::Capacity,
            Self::BulkRecord { reason, .. } => reason.kind(),
            _ => ErrorKind::Validation,
        }
    }

    pub(crate) fn in_record(self, index: usize) -> Self {
        Self::BulkRecord {
            index,
            reason: Box::new(self),
        }
    }
}

impl Display for EngineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyDescription => write!(f, "description must not be empty"),
            Self::DuplicateDescription {
                parent_id: Some(parent_id),
            } => write!(
                f,
                "duplicate: an item with this description already exists under parent {parent_id}"
            ),
            Self::DuplicateDescription { parent_id: None } => write!(
                f,
                "duplicate: a root item with this description already exists"
            ),
            Self::ParentNotFound(id) => write!(f, "parentId {id} does not exist"),
            Self::SelfParent(id) => write!(f, "item {id} cannot be its own parent"),
            Self::CycleDetected { item_id, parent_id } => write!(
                f,
                "parentId creates a cycle: item {item_id} is an ancestor of {parent_id}"
            ),
            Self::InvalidStatus(value) => write!(
                f,
                "invalid status `{value}`; expected TODO|INPROGRESS|BLOCKED|DONE"
            ),
            Self::InvalidDeadline(value) => {
                write!(f, "deadline {value} is not a valid unix timestamp")
            }
            Self::InvalidPage { page, max_page } => {
                write!(f, "page {page} is invalid; expected 1..={max_page} or none")
            }
            Self::InvalidTagName { length, max_chars } => write!(
                f,
                "tag name must be 1..={max_chars} characters, got {length}"
            ),
            Self::DuplicateTagName(name) => write!(f, "tag `{name}` already exists"),
            Self::UnknownTag(id) => write!(f, "tag {id} does not exist"),
            Self::EmptyTagFilter => write!(f, "tagIds filter must not be empty"),
            Self::ItemNotFound(id) => write!(f, "item not found: {id}"),
            Self::TagNotFound(id) => write!(f, "tag not found: {id}"),
            Self::CapacityExceeded {
                limit,
                current,
                requested,
            } => write!(
                f,
                "item limit {limit} exceeded: {current} stored, {requested} requested"
            ),
            Self::UnsupportedRecordShape { field_count } => write!(
                f,
                "record has {field_count} fields; expected 2, 3 or 4"
            ),
            Self::InvalidParentReference(value) => {
                write!(f, "parent field `{value}` is not an item id")
            }
            Self::BulkRecord { index, reason } => write!(f, "record {index}: {reason}"),
            Self::DeletionAlreadyScheduled(id) => {
                write!(f, "deletion already scheduled for tag {id}")
            }
            Self::NoDeletionScheduled(id) => write!(f, "no deletion scheduled for tag {id}"),
            Self::InvalidDelay(value) => write!(f, "delay {value} must not be negative"),
        }
    }
}

impl Error for EngineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::BulkRecord { reason, .. } => Some(reason.as_ref()),
            _ => None,
        }
    }
}
