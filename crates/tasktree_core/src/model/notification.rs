//! Status-change notification record.

use crate::model::item::{ItemId, ItemStatus};
use serde::{Deserialize, Serialize};

/// One logged status transition.
///
/// `item_description` tracks the item's current description until the item
/// is deleted, at which point the record itself is purged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub item_id: ItemId,
    pub item_description: String,
    pub status_before: ItemStatus,
    pub status_after: ItemStatus,
    pub change_unit: i64,
}
