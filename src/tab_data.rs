/// Data structures for Tab Organizer
use serde::{Deserialize, Serialize};

pub type TabId = i32;
pub type GroupId = i32;
pub type WindowId = i32;

/// Host value for a tab without an id (`chrome.tabs.TAB_ID_NONE`)
pub const TAB_ID_NONE: TabId = -1;

fn tab_id_none() -> TabId {
    TAB_ID_NONE
}

/// A browser tab as delivered by the host with each event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabRecord {
    #[serde(default = "tab_id_none")]
    pub id: TabId,
    #[serde(default)]
    pub window_id: Option<WindowId>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub fav_icon_url: Option<String>,
}

impl TabRecord {
    pub fn new(id: TabId, url: &str, title: &str) -> TabRecord {
        TabRecord {
            id,
            window_id: None,
            url: Some(url.to_string()),
            title: Some(title.to_string()),
            fav_icon_url: None,
        }
    }

    /// A tab known only by id, as reported by `tabs.onRemoved`
    pub fn removed(id: TabId) -> TabRecord {
        TabRecord {
            id,
            window_id: None,
            url: None,
            title: None,
            fav_icon_url: None,
        }
    }
}

/// The `changeInfo` payload of `tabs.onUpdated`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabChange {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryAction {
    Created,
    Updated,
    Removed,
}

/// The subset of a tab kept in history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryTab {
    pub id: TabId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fav_icon_url: Option<String>,
}

impl From<&TabRecord> for HistoryTab {
    fn from(tab: &TabRecord) -> HistoryTab {
        HistoryTab {
            id: tab.id,
            url: tab.url.clone(),
            title: tab.title.clone(),
            fav_icon_url: tab.fav_icon_url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub action: HistoryAction,
    pub tab: HistoryTab,
    /// Milliseconds since the Unix epoch
    pub timestamp: f64,
}

/// A saved session
///
/// Every field has a default so a partial session sent back by the popup
/// still restores (as a blank window when it has no tabs).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tabs: Vec<SavedTab>,
    #[serde(default)]
    pub timestamp: f64,
}

/// A saved tab within a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedTab {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fav_icon_url: Option<String>,
}

/// Tab group colors understood by `chrome.tabGroups`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupColor {
    Blue,
    Red,
    Yellow,
    Green,
    Pink,
    Purple,
    Cyan,
    Orange,
}

/// New groups take colors from this palette in order
pub const GROUP_PALETTE: [GroupColor; 8] = [
    GroupColor::Blue,
    GroupColor::Red,
    GroupColor::Yellow,
    GroupColor::Green,
    GroupColor::Pink,
    GroupColor::Purple,
    GroupColor::Cyan,
    GroupColor::Orange,
];

impl GroupColor {
    pub fn for_index(index: usize) -> GroupColor {
        GROUP_PALETTE[index % GROUP_PALETTE.len()]
    }
}

/// Properties applied to a freshly created group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupStyle {
    pub title: String,
    pub color: GroupColor,
    pub collapsed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_record_from_host_json() {
        let json = r#"{
            "id": 42,
            "windowId": 3,
            "url": "https://github.com/rust-lang",
            "title": "Rust",
            "favIconUrl": "https://github.com/favicon.ico",
            "pinned": false,
            "index": 0
        }"#;

        let tab: TabRecord = serde_json::from_str(json).unwrap();

        assert_eq!(tab.id, 42);
        assert_eq!(tab.window_id, Some(3));
        assert_eq!(tab.url.as_deref(), Some("https://github.com/rust-lang"));
        assert_eq!(tab.fav_icon_url.as_deref(), Some("https://github.com/favicon.ico"));
    }

    #[test]
    fn test_tab_record_missing_fields() {
        let tab: TabRecord = serde_json::from_str("{}").unwrap();

        assert_eq!(tab.id, TAB_ID_NONE);
        assert_eq!(tab.url, None);
        assert_eq!(tab.title, None);
    }

    #[test]
    fn test_history_entry_wire_format() {
        let entry = HistoryEntry {
            action: HistoryAction::Removed,
            tab: HistoryTab::from(&TabRecord::removed(9)),
            timestamp: 1698508200000.0,
        };

        let value = serde_json::to_value(&entry).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "action": "removed",
                "tab": { "id": 9 },
                "timestamp": 1698508200000.0
            })
        );
    }

    #[test]
    fn test_saved_tab_uses_camel_case() {
        let tab = SavedTab {
            url: "https://example.com".to_string(),
            title: Some("Example".to_string()),
            fav_icon_url: Some("https://example.com/icon.png".to_string()),
        };

        let value = serde_json::to_value(&tab).unwrap();

        assert_eq!(value["favIconUrl"], "https://example.com/icon.png");
    }

    #[test]
    fn test_session_record_missing_fields() {
        let session: SessionRecord = serde_json::from_str(r#"{"tabs":[]}"#).unwrap();
        assert_eq!(session.name, "");
        assert!(session.tabs.is_empty());

        let session: SessionRecord =
            serde_json::from_str(r#"{"name":"Work","timestamp":1.0}"#).unwrap();
        assert_eq!(session.name, "Work");
        assert!(session.tabs.is_empty());
    }

    #[test]
    fn test_palette_cycles() {
        assert_eq!(GroupColor::for_index(0), GroupColor::Blue);
        assert_eq!(GroupColor::for_index(7), GroupColor::Orange);
        assert_eq!(GroupColor::for_index(8), GroupColor::Blue);
        assert_eq!(GroupColor::for_index(10), GroupColor::Yellow);
    }

    #[test]
    fn test_group_color_serializes_lowercase() {
        assert_eq!(serde_json::to_value(GroupColor::Purple).unwrap(), "purple");
    }
}
