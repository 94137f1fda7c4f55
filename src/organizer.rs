/// The background organizer, one instance per extension worker
use std::rc::Rc;

use crate::grouper::DomainGrouper;
use crate::history::HistoryRecorder;
use crate::host::Host;
use crate::session::SessionManager;
use crate::settings::Settings;
use crate::tab_data::{HistoryAction, TabChange, TabId, TabRecord};

/// Delay before grouping a new tab, so its first navigation can settle
pub const ORGANIZE_DELAY_MS: u32 = 1000;

/// Owns the history recorder, domain grouper and session manager, with one
/// handler per host event. Knows nothing about listeners or transports.
pub struct TabOrganizer<H> {
    host: Rc<H>,
    history: HistoryRecorder<H>,
    grouper: DomainGrouper<H>,
    sessions: SessionManager<H>,
}

impl<H: Host> TabOrganizer<H> {
    pub fn new(host: H) -> Self {
        let host = Rc::new(host);
        TabOrganizer {
            history: HistoryRecorder::new(host.clone()),
            grouper: DomainGrouper::new(host.clone()),
            sessions: SessionManager::new(host.clone()),
            host,
        }
    }

    /// Load persisted history; call once when the worker starts
    pub async fn start(&self) {
        self.history.load().await;
        log::info!("Tab organizer started");
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn history(&self) -> &HistoryRecorder<H> {
        &self.history
    }

    pub fn grouper(&self) -> &DomainGrouper<H> {
        &self.grouper
    }

    pub fn sessions(&self) -> &SessionManager<H> {
        &self.sessions
    }

    pub async fn on_tab_created(&self, tab: TabRecord) {
        self.record(HistoryAction::Created, &tab).await;

        if !self.auto_group_enabled().await {
            return;
        }

        self.host.sleep(ORGANIZE_DELAY_MS).await;
        match self.host.get_tab(tab.id).await {
            Ok(current) => self.grouper.organize_one(&current).await,
            Err(e) => log::debug!("Tab {} closed before it could be grouped: {}", tab.id, e),
        }
    }

    /// Only navigations (a URL in `change`) are recorded and regrouped
    pub async fn on_tab_updated(&self, tab_id: TabId, change: &TabChange, tab: TabRecord) {
        if change.url.is_none() {
            return;
        }
        log::debug!("Tab {} navigated", tab_id);

        self.record(HistoryAction::Updated, &tab).await;

        if self.auto_group_enabled().await {
            self.grouper.organize_one(&tab).await;
        }
    }

    pub async fn on_tab_removed(&self, tab_id: TabId) {
        self.record(HistoryAction::Removed, &TabRecord::removed(tab_id))
            .await;

        if let Err(e) = self.history.forget(tab_id).await {
            log::error!("Error cleaning up history for tab {}: {}", tab_id, e);
        }
    }

    async fn record(&self, action: HistoryAction, tab: &TabRecord) {
        if let Err(e) = self.history.record(action, tab).await {
            log::error!("Error recording {:?} for tab {}: {}", action, tab.id, e);
        }
    }

    async fn auto_group_enabled(&self) -> bool {
        Settings::load_or_default(self.host.sync()).await.auto_group
    }
}
