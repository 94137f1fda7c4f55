/// Tab lifecycle history, newest first
use std::cell::RefCell;
use std::rc::Rc;

use crate::error::Result;
use crate::host::Host;
use crate::storage::{BoundedList, HISTORY_KEY, PersistedList};
use crate::tab_data::{HistoryAction, HistoryEntry, HistoryTab, TabId, TabRecord};

pub const HISTORY_LIMIT: usize = 100;

const HISTORY: PersistedList<HistoryEntry> = PersistedList::new(HISTORY_KEY, HISTORY_LIMIT);

/// Records tab events into a bounded log persisted under `tabHistory`
///
/// The in-memory copy is authoritative once loaded; every mutation writes the
/// whole list back in a single storage call.
pub struct HistoryRecorder<H> {
    host: Rc<H>,
    cache: RefCell<Option<BoundedList<HistoryEntry>>>,
}

impl<H: Host> HistoryRecorder<H> {
    pub fn new(host: Rc<H>) -> Self {
        HistoryRecorder {
            host,
            cache: RefCell::new(None),
        }
    }

    /// Warm the cache from storage. Failures leave an empty log.
    pub async fn load(&self) {
        if let Err(e) = self.ensure_loaded().await {
            log::error!("Error loading history: {}", e);
            self.cache
                .borrow_mut()
                .get_or_insert_with(|| BoundedList::new(HISTORY_LIMIT));
        }
    }

    pub async fn record(&self, action: HistoryAction, tab: &TabRecord) -> Result<()> {
        self.load().await;

        let entry = HistoryEntry {
            action,
            tab: HistoryTab::from(tab),
            timestamp: self.host.now_millis(),
        };
        let snapshot = self.mutate(|log| log.push_front(entry));

        HISTORY.store(self.host.local(), &snapshot).await
    }

    /// Drop every entry that refers to `tab_id`
    pub async fn forget(&self, tab_id: TabId) -> Result<()> {
        self.load().await;

        let snapshot = self.mutate(|log| {
            let dropped = log.retain(|entry| entry.tab.id != tab_id);
            log::debug!("Forgot {} history entries for tab {}", dropped, tab_id);
        });

        HISTORY.store(self.host.local(), &snapshot).await
    }

    pub async fn list(&self) -> Result<Vec<HistoryEntry>> {
        self.ensure_loaded().await?;
        Ok(self
            .cache
            .borrow()
            .as_ref()
            .map(|log| log.items().to_vec())
            .unwrap_or_default())
    }

    async fn ensure_loaded(&self) -> Result<()> {
        if self.cache.borrow().is_some() {
            return Ok(());
        }

        let stored = HISTORY.load(self.host.local()).await?;
        // An event may have filled the cache while storage was being read
        self.cache.borrow_mut().get_or_insert(stored);
        Ok(())
    }

    fn mutate<F>(&self, change: F) -> Vec<HistoryEntry>
    where
        F: FnOnce(&mut BoundedList<HistoryEntry>),
    {
        let mut cache = self.cache.borrow_mut();
        let log = cache.get_or_insert_with(|| BoundedList::new(HISTORY_LIMIT));
        change(log);
        log.items().to_vec()
    }
}
