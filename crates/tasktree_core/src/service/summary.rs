//! Summary paging, notification log and store reset.

use super::{log_rejection, TodoService};
use crate::clock::Clock;
use crate::error::{EngineError, EngineResult};
use crate::model::item::ItemId;
use crate::model::notification::Notification;
use crate::store::StateStore;
use log::info;

impl<S: StateStore, C: Clock> TodoService<S, C> {
    /// Returns one page of item ids, most recently modified first.
    ///
    /// `None` requests page 0; explicit pages run `1..=max_summary_page()`.
    /// Items modified in the same unit keep store order.
    pub fn get_summary(&self, page: Option<u32>) -> EngineResult<Vec<ItemId>> {
        let max_page = self.config.max_summary_page();
        let page = match page {
            None => 0,
            Some(page) if (1..=max_page).contains(&page) => page,
            Some(page) => {
                let err = EngineError::InvalidPage { page, max_page };
                log_rejection("summary_get", &err);
                return Err(err);
            }
        };

        let mut items: Vec<_> = self.store.state().items.iter().collect();
        items.sort_by(|a, b| b.last_modified_unit.cmp(&a.last_modified_unit));

        let page_size = self.config.page_size;
        Ok(items
            .into_iter()
            .skip(page as usize * page_size)
            .take(page_size)
            .map(|item| item.id)
            .collect())
    }

    /// Returns every notification record, oldest first.
    pub fn list_notifications(&self) -> Vec<Notification> {
        self.store.state().notifications.clone()
    }

    /// Empties the store, resets both id counters and cancels pending
    /// deferred deletions.
    pub fn clear(&mut self) {
        self.store.state_mut().reset();
        self.deletions.clear();
        info!("event=store_clear module=service status=ok");
    }
}
