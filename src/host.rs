/// Seams between the organizer and the browser host
use async_trait::async_trait;
use serde_json::Value;

use crate::error::HostError;
use crate::tab_data::{GroupId, GroupStyle, TabId, TabRecord, WindowId};

#[async_trait(?Send)]
pub trait TabsApi {
    /// All tabs in the window the user is currently looking at
    async fn query_current_window(&self) -> Result<Vec<TabRecord>, HostError>;

    async fn get_tab(&self, tab_id: TabId) -> Result<TabRecord, HostError>;

    /// Move tabs into `group_id`, or into a new group when `None`.
    /// Returns the id of the group the tabs ended up in.
    async fn group_tabs(
        &self,
        tab_ids: &[TabId],
        group_id: Option<GroupId>,
    ) -> Result<GroupId, HostError>;

    async fn update_group(&self, group_id: GroupId, style: &GroupStyle) -> Result<(), HostError>;

    /// Open a new window, blank when `url` is `None`
    async fn create_window(&self, url: Option<&str>) -> Result<WindowId, HostError>;

    async fn create_tab(&self, window_id: WindowId, url: &str) -> Result<TabId, HostError>;
}

/// A key-value storage area holding JSON values
#[async_trait(?Send)]
pub trait StorageArea {
    /// `Ok(None)` when the key has never been written
    async fn get(&self, key: &str) -> Result<Option<Value>, HostError>;

    async fn set(&self, key: &str, value: Value) -> Result<(), HostError>;
}

#[async_trait(?Send)]
pub trait Clock {
    /// Milliseconds since the Unix epoch
    fn now_millis(&self) -> f64;

    /// Human-readable local date and time for a timestamp
    fn format_local(&self, millis: f64) -> String;

    async fn sleep(&self, millis: u32);
}

/// Everything the organizer runs against
///
/// `chrome::ChromeHost` implements it for the extension runtime; tests use an
/// in-memory fake.
pub trait Host: TabsApi + Clock {
    type Storage: StorageArea;

    /// Device-local area holding history and sessions
    fn local(&self) -> &Self::Storage;

    /// Synced area holding user settings
    fn sync(&self) -> &Self::Storage;
}
