//! Bulk ingestion decoder.
//!
//! # Responsibility
//! - Split batch text into positional records.
//! - Decide each record's shape from its field count.
//!
//! # Invariants
//! - Records are separated by `|`, fields by `;`, every field is trimmed.
//! - Decoding never fails; malformed records carry enough information for
//!   the service to reject them during validation.
//!
//! Accepted shapes:
//! - `description;status`
//! - `description;null;status` (blank middle field also means no parent)
//! - `description;parentId;status`
//! - `description;tag,names;status`
//! - `description;parentId-or-null;status;tag,names`

use once_cell::sync::Lazy;
use regex::Regex;

static INTEGER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?[0-9]+$").expect("valid integer regex"));

const RECORD_SEPARATOR: char = '|';
const FIELD_SEPARATOR: char = ';';
const TAG_SEPARATOR: char = ',';
const NULL_LITERAL: &str = "null";

/// Parent slot of a decoded record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParentRef {
    /// No parent: a root item.
    Root,
    /// Integer parent id as written; may be negative or unknown.
    Id(i64),
    /// Text that is neither blank, `null`, nor an integer.
    Unparsable(String),
}

/// One decoded batch record, prior to validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkRecord {
    pub description: String,
    pub parent: ParentRef,
    pub status: String,
    pub tag_names: Vec<String>,
    /// Number of `;`-separated fields seen. Only 2, 3 and 4 are valid.
    pub field_count: usize,
}

impl BulkRecord {
    pub fn has_supported_shape(&self) -> bool {
        (2..=4).contains(&self.field_count)
    }
}

/// Decodes a whole batch into records, in input order.
pub fn parse_batch(text: &str) -> Vec<BulkRecord> {
    text.split(RECORD_SEPARATOR).map(parse_record).collect()
}

/// Decodes one record.
pub fn parse_record(raw: &str) -> BulkRecord {
    let fields: Vec<&str> = raw.split(FIELD_SEPARATOR).map(str::trim).collect();
    let field_count = fields.len();
    let description = fields.first().copied().unwrap_or_default().to_string();

    let (parent, status, tag_names) = match fields.as_slice() {
        [_, status] => (ParentRef::Root, status.to_string(), Vec::new()),
        [_, middle, status] => {
            if is_null_field(middle) {
                (ParentRef::Root, status.to_string(), Vec::new())
            } else if INTEGER_RE.is_match(middle) {
                (parse_parent(middle), status.to_string(), Vec::new())
            } else {
                (ParentRef::Root, status.to_string(), split_tag_names(middle))
            }
        }
        [_, parent, status, tags] => (
            parse_parent(parent),
            status.to_string(),
            split_tag_names(tags),
        ),
        _ => (ParentRef::Root, String::new(), Vec::new()),
    };

    BulkRecord {
        description,
        parent,
        status,
        tag_names,
        field_count,
    }
}

fn is_null_field(value: &str) -> bool {
    value.is_empty() || value == NULL_LITERAL
}

fn parse_parent(value: &str) -> ParentRef {
    if is_null_field(value) {
        return ParentRef::Root;
    }
    if !INTEGER_RE.is_match(value) {
        return ParentRef::Unparsable(value.to_string());
    }
    value
        .parse::<i64>()
        .map(ParentRef::Id)
        .unwrap_or_else(|_| ParentRef::Unparsable(value.to_string()))
}

/// Splits a comma list. A blank field means no tags; blank entries inside a
/// non-blank list are kept so validation can reject them.
fn split_tag_names(value: &str) -> Vec<String> {
    if value.is_empty() {
        return Vec::new();
    }
    value
        .split(TAG_SEPARATOR)
        .map(|name| name.trim().to_string())
        .collect()
}
