//! Engine limits.
//!
//! # Invariants
//! - `page_size` is non-zero.
//! - Summary pages cover every storable item: pages `0..=max_summary_page()`.

/// Default ceiling on live items.
pub const DEFAULT_MAX_ITEMS: usize = 50;
/// Default number of ids per summary page.
pub const DEFAULT_PAGE_SIZE: usize = 10;
/// Default upper bound on tag name length, in chars.
pub const DEFAULT_TAG_NAME_MAX_CHARS: usize = 10;

/// Limits enforced by `TodoService`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub max_items: usize,
    pub page_size: usize,
    pub tag_name_max_chars: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_items: DEFAULT_MAX_ITEMS,
            page_size: DEFAULT_PAGE_SIZE,
            tag_name_max_chars: DEFAULT_TAG_NAME_MAX_CHARS,
        }
    }
}

impl EngineConfig {
    /// Highest page number `get_summary` accepts.
    ///
    /// With the defaults this is 4: pages 0 (requested as `None`) through 4
    /// hold ten ids each.
    pub fn max_summary_page(&self) -> u32 {
        let page_size = self.page_size.max(1);
        (self.max_items.saturating_sub(1) / page_size) as u32
    }

    /// Whether `name` has an accepted length.
    pub fn is_valid_tag_name(&self, name: &str) -> bool {
        let length = name.chars().count();
        (1..=self.tag_name_max_chars).contains(&length)
    }
}
