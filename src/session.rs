/// Saving and restoring window sessions
use std::rc::Rc;

use crate::domain::manageable_url;
use crate::error::{OrganizerError, Result};
use crate::host::Host;
use crate::storage::{PersistedList, SESSIONS_KEY};
use crate::tab_data::{SavedTab, SessionRecord, TabRecord};

pub const SESSION_LIMIT: usize = 20;

/// Auto-save runs every 4 hours
pub const AUTO_SAVE_INTERVAL_MS: u32 = 4 * 60 * 60 * 1000;

pub const AUTO_SAVE_NAME: &str = "Auto-saved";

const SESSIONS: PersistedList<SessionRecord> = PersistedList::new(SESSIONS_KEY, SESSION_LIMIT);

impl SavedTab {
    /// Project a host tab, or `None` if it should not be saved
    pub fn from_tab(tab: &TabRecord) -> Option<SavedTab> {
        manageable_url(tab).map(|url| SavedTab {
            url: url.to_string(),
            title: tab.title.clone(),
            fav_icon_url: tab.fav_icon_url.clone(),
        })
    }
}

pub struct SessionManager<H> {
    host: Rc<H>,
}

impl<H: Host> SessionManager<H> {
    pub fn new(host: Rc<H>) -> Self {
        SessionManager { host }
    }

    /// Snapshot the current window and store it as the newest session
    pub async fn save(&self, name: Option<&str>) -> Result<SessionRecord> {
        let result = self.save_current_window(name).await;
        if let Err(e) = &result {
            log::error!("Error saving session: {}", e);
        }
        result
    }

    async fn save_current_window(&self, name: Option<&str>) -> Result<SessionRecord> {
        let tabs = self.host.query_current_window().await?;
        let saved: Vec<SavedTab> = tabs.iter().filter_map(SavedTab::from_tab).collect();

        if saved.is_empty() {
            return Err(OrganizerError::NoSavableTabs);
        }

        let timestamp = self.host.now_millis();
        let name = match name {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("Session {}", self.host.format_local(timestamp)),
        };
        let session = SessionRecord {
            name,
            tabs: saved,
            timestamp,
        };

        SESSIONS
            .modify(self.host.local(), |sessions| {
                sessions.push_front(session.clone())
            })
            .await?;

        log::info!("Saved session '{}' with {} tabs", session.name, session.tabs.len());
        Ok(session)
    }

    /// Reopen a session in a new window
    ///
    /// A missing or empty session opens one blank window. Otherwise tabs are
    /// created one after another, in saved order.
    pub async fn restore(&self, session: Option<&SessionRecord>) -> Result<()> {
        let result = self.open_session(session).await;
        if let Err(e) = &result {
            log::error!("Error restoring session: {}", e);
        }
        result
    }

    async fn open_session(&self, session: Option<&SessionRecord>) -> Result<()> {
        let Some((first, rest)) = session.and_then(|s| s.tabs.split_first()) else {
            self.host.create_window(None).await?;
            return Ok(());
        };

        let window_id = self.host.create_window(Some(&first.url)).await?;
        for tab in rest {
            self.host.create_tab(window_id, &tab.url).await?;
        }
        Ok(())
    }

    pub async fn list(&self) -> Result<Vec<SessionRecord>> {
        Ok(SESSIONS.load(self.host.local()).await?.into_vec())
    }

    /// Remove the session at `index`; out-of-range indexes are ignored
    pub async fn delete(&self, index: i64) -> Result<()> {
        let result = SESSIONS
            .modify(self.host.local(), |sessions| {
                usize::try_from(index)
                    .ok()
                    .and_then(|index| sessions.remove_at(index))
            })
            .await;

        match result {
            Ok(removed) => {
                if removed.is_none() {
                    log::debug!("No session at index {}", index);
                }
                Ok(())
            }
            Err(e) => {
                log::error!("Error deleting session: {}", e);
                Err(e)
            }
        }
    }

    /// Periodic save under a fixed name. Never fails.
    pub async fn auto_save(&self) {
        match self.save(Some(AUTO_SAVE_NAME)).await {
            Ok(session) => log::info!("Auto-saved {} tabs", session.tabs.len()),
            Err(e) => log::error!("Error auto-saving session: {}", e),
        }
    }
}
