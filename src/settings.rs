/// User settings kept in chrome.storage.sync
use crate::error::Result;
use crate::host::StorageArea;

pub const AUTO_GROUP_KEY: &str = "autoGroup";
pub const COLLAPSE_GROUPS_KEY: &str = "collapseGroups";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// Group new and navigated tabs as they appear
    pub auto_group: bool,
    /// Create groups collapsed
    pub collapse_groups: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            auto_group: true,
            collapse_groups: false,
        }
    }
}

impl Settings {
    /// Read both flags; unset or non-boolean values fall back to the defaults
    pub async fn load<S: StorageArea>(store: &S) -> Result<Settings> {
        let defaults = Settings::default();
        let auto_group = store.get(AUTO_GROUP_KEY).await?;
        let collapse_groups = store.get(COLLAPSE_GROUPS_KEY).await?;

        Ok(Settings {
            auto_group: auto_group
                .and_then(|v| v.as_bool())
                .unwrap_or(defaults.auto_group),
            collapse_groups: collapse_groups
                .and_then(|v| v.as_bool())
                .unwrap_or(defaults.collapse_groups),
        })
    }

    pub async fn load_or_default<S: StorageArea>(store: &S) -> Settings {
        match Settings::load(store).await {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("Error loading settings, using defaults: {}", e);
                Settings::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryStorage;
    use futures::executor::block_on;
    use serde_json::json;

    #[test]
    fn test_defaults_when_unset() {
        let store = MemoryStorage::default();

        let settings = block_on(Settings::load(&store)).unwrap();

        assert!(settings.auto_group);
        assert!(!settings.collapse_groups);
    }

    #[test]
    fn test_reads_stored_flags() {
        let store = MemoryStorage::with_value(AUTO_GROUP_KEY, json!(false));
        store.put(COLLAPSE_GROUPS_KEY, json!(true));

        let settings = block_on(Settings::load(&store)).unwrap();

        assert_eq!(
            settings,
            Settings {
                auto_group: false,
                collapse_groups: true
            }
        );
    }

    #[test]
    fn test_non_boolean_falls_back() {
        let store = MemoryStorage::with_value(AUTO_GROUP_KEY, json!("yes"));

        let settings = block_on(Settings::load(&store)).unwrap();

        assert!(settings.auto_group);
    }

    #[test]
    fn test_load_or_default_on_failure() {
        let store = MemoryStorage::with_value(AUTO_GROUP_KEY, json!(false));
        store.set_failing(true);

        let settings = block_on(Settings::load_or_default(&store));

        assert_eq!(settings, Settings::default());
    }
}
