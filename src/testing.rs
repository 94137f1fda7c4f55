/// In-memory host used by the unit tests
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::HostError;
use crate::host::{Clock, Host, StorageArea, TabsApi};
use crate::tab_data::{GroupId, GroupStyle, TabId, TabRecord, WindowId};

#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: RefCell<HashMap<String, Value>>,
    writes: Cell<usize>,
    fail: Cell<bool>,
}

impl MemoryStorage {
    pub fn with_value(key: &str, value: Value) -> Self {
        let storage = MemoryStorage::default();
        storage.values.borrow_mut().insert(key.to_string(), value);
        storage
    }

    pub fn put(&self, key: &str, value: Value) {
        self.values.borrow_mut().insert(key.to_string(), value);
    }

    pub fn value(&self, key: &str) -> Option<Value> {
        self.values.borrow().get(key).cloned()
    }

    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.set(fail);
    }
}

#[async_trait(?Send)]
impl StorageArea for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>, HostError> {
        if self.fail.get() {
            return Err(HostError::api("storage.get", "storage unavailable"));
        }
        Ok(self.values.borrow().get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), HostError> {
        if self.fail.get() {
            return Err(HostError::api("storage.set", "storage unavailable"));
        }
        self.values.borrow_mut().insert(key.to_string(), value);
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

/// Host calls that change browser state, in the order they were made
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    Group {
        tab_ids: Vec<TabId>,
        group_id: Option<GroupId>,
    },
    UpdateGroup {
        group_id: GroupId,
        style: GroupStyle,
    },
    CreateWindow {
        url: Option<String>,
    },
    CreateTab {
        window_id: WindowId,
        url: String,
    },
}

#[derive(Debug)]
pub struct FakeHost {
    pub tabs: RefCell<Vec<TabRecord>>,
    pub calls: RefCell<Vec<HostCall>>,
    pub local: MemoryStorage,
    pub sync: MemoryStorage,
    /// Groups the host no longer knows about
    pub stale_groups: RefCell<HashSet<GroupId>>,
    /// Tabs the host refuses to put into a new group
    pub ungroupable_tabs: RefCell<HashSet<TabId>>,
    pub fail_query: Cell<bool>,
    pub fail_create_window: Cell<bool>,
    pub sleeps: RefCell<Vec<u32>>,
    next_group: Cell<GroupId>,
    next_window: Cell<WindowId>,
    next_tab: Cell<TabId>,
    clock: Cell<f64>,
}

impl Default for FakeHost {
    fn default() -> Self {
        FakeHost {
            tabs: RefCell::new(Vec::new()),
            calls: RefCell::new(Vec::new()),
            local: MemoryStorage::default(),
            sync: MemoryStorage::default(),
            stale_groups: RefCell::new(HashSet::new()),
            ungroupable_tabs: RefCell::new(HashSet::new()),
            fail_query: Cell::new(false),
            fail_create_window: Cell::new(false),
            sleeps: RefCell::new(Vec::new()),
            next_group: Cell::new(100),
            next_window: Cell::new(10),
            next_tab: Cell::new(1000),
            clock: Cell::new(1_700_000_000_000.0),
        }
    }
}

impl FakeHost {
    pub fn with_tabs(urls: &[&str]) -> Self {
        let host = FakeHost::default();
        *host.tabs.borrow_mut() = urls
            .iter()
            .enumerate()
            .map(|(i, url)| tab(i as TabId + 1, url))
            .collect();
        host
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.borrow().clone()
    }

    pub fn group_calls(&self) -> Vec<HostCall> {
        self.calls
            .borrow()
            .iter()
            .filter(|call| matches!(call, HostCall::Group { .. }))
            .cloned()
            .collect()
    }

    pub fn styled_groups(&self) -> Vec<(GroupId, GroupStyle)> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                HostCall::UpdateGroup { group_id, style } => Some((*group_id, style.clone())),
                _ => None,
            })
            .collect()
    }
}

#[async_trait(?Send)]
impl TabsApi for FakeHost {
    async fn query_current_window(&self) -> Result<Vec<TabRecord>, HostError> {
        if self.fail_query.get() {
            return Err(HostError::api("tabs.query", "no current window"));
        }
        Ok(self.tabs.borrow().clone())
    }

    async fn get_tab(&self, tab_id: TabId) -> Result<TabRecord, HostError> {
        self.tabs
            .borrow()
            .iter()
            .find(|tab| tab.id == tab_id)
            .cloned()
            .ok_or(HostError::TabNotFound(tab_id))
    }

    async fn group_tabs(
        &self,
        tab_ids: &[TabId],
        group_id: Option<GroupId>,
    ) -> Result<GroupId, HostError> {
        self.calls.borrow_mut().push(HostCall::Group {
            tab_ids: tab_ids.to_vec(),
            group_id,
        });

        match group_id {
            Some(id) if self.stale_groups.borrow().contains(&id) => Err(HostError::api(
                "tabs.group",
                format!("No group with id: {}", id),
            )),
            Some(id) => Ok(id),
            None if tab_ids
                .iter()
                .any(|id| self.ungroupable_tabs.borrow().contains(id)) =>
            {
                Err(HostError::api("tabs.group", "Tabs cannot be edited right now"))
            }
            None => {
                let id = self.next_group.get();
                self.next_group.set(id + 1);
                Ok(id)
            }
        }
    }

    async fn update_group(&self, group_id: GroupId, style: &GroupStyle) -> Result<(), HostError> {
        self.calls.borrow_mut().push(HostCall::UpdateGroup {
            group_id,
            style: style.clone(),
        });
        Ok(())
    }

    async fn create_window(&self, url: Option<&str>) -> Result<WindowId, HostError> {
        self.calls.borrow_mut().push(HostCall::CreateWindow {
            url: url.map(str::to_string),
        });
        if self.fail_create_window.get() {
            return Err(HostError::api("windows.create", "window limit reached"));
        }
        let id = self.next_window.get();
        self.next_window.set(id + 1);
        Ok(id)
    }

    async fn create_tab(&self, window_id: WindowId, url: &str) -> Result<TabId, HostError> {
        self.calls.borrow_mut().push(HostCall::CreateTab {
            window_id,
            url: url.to_string(),
        });
        let id = self.next_tab.get();
        self.next_tab.set(id + 1);
        Ok(id)
    }
}

#[async_trait(?Send)]
impl Clock for FakeHost {
    fn now_millis(&self) -> f64 {
        let now = self.clock.get() + 1.0;
        self.clock.set(now);
        now
    }

    fn format_local(&self, millis: f64) -> String {
        format!("@{}", millis)
    }

    async fn sleep(&self, millis: u32) {
        self.sleeps.borrow_mut().push(millis);
    }
}

impl Host for FakeHost {
    type Storage = MemoryStorage;

    fn local(&self) -> &MemoryStorage {
        &self.local
    }

    fn sync(&self) -> &MemoryStorage {
        &self.sync
    }
}

pub fn tab(id: TabId, url: &str) -> TabRecord {
    TabRecord::new(id, url, &format!("Tab {}", id))
}
