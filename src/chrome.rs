/// Host implementation backed by the chrome.* extension APIs
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::error::HostError;
use crate::host::{Clock, Host, StorageArea, TabsApi};
use crate::tab_data::{GroupId, GroupStyle, TabId, TabRecord, WindowId};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = ["chrome", "tabs"], js_name = query)]
    async fn tabs_query(query_info: &JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "tabs"], js_name = get)]
    async fn tabs_get(tab_id: i32) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "tabs"], js_name = group)]
    async fn tabs_group(options: &JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "tabs"], js_name = create)]
    async fn tabs_create(properties: &JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "tabGroups"], js_name = update)]
    async fn tab_groups_update(group_id: i32, properties: &JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "windows"], js_name = create)]
    async fn windows_create(properties: &JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "local"], js_name = get)]
    async fn local_get(keys: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "local"], js_name = set)]
    async fn local_set(items: &JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "sync"], js_name = get)]
    async fn sync_get(keys: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "sync"], js_name = set)]
    async fn sync_set(items: &JsValue) -> Result<JsValue, JsValue>;

    // A Date viewed through toLocaleString() with no arguments, which
    // formats in the browser's default locale
    #[wasm_bindgen(js_name = Date)]
    type LocaleDate;

    #[wasm_bindgen(method, js_name = toLocaleString)]
    fn to_locale_string(this: &LocaleDate) -> String;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryInfo {
    current_window: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GroupOptions<'a> {
    tab_ids: &'a [TabId],
    #[serde(skip_serializing_if = "Option::is_none")]
    group_id: Option<GroupId>,
}

#[derive(Serialize)]
struct WindowProperties<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TabProperties<'a> {
    url: &'a str,
    window_id: WindowId,
}

#[derive(Deserialize)]
struct Created {
    id: i32,
}

/// Serialize for the JS side; maps become plain objects
pub fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, HostError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| HostError::conversion("value for JS", e.to_string()))
}

fn from_js<T: for<'de> Deserialize<'de>>(what: &'static str, value: JsValue) -> Result<T, HostError> {
    serde_wasm_bindgen::from_value(value).map_err(|e| HostError::conversion(what, e.to_string()))
}

/// Best-effort readable message from a rejected promise
pub(crate) fn js_error_message(error: &JsValue) -> String {
    if let Some(error) = error.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    error.as_string().unwrap_or_else(|| format!("{:?}", error))
}

fn api_error(operation: &'static str) -> impl FnOnce(JsValue) -> HostError {
    move |error| HostError::api(operation, js_error_message(&error))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AreaName {
    Local,
    Sync,
}

#[derive(Debug, Clone, Copy)]
pub struct ChromeStorage {
    area: AreaName,
}

impl ChromeStorage {
    pub fn new(area: AreaName) -> Self {
        ChromeStorage { area }
    }
}

#[async_trait(?Send)]
impl StorageArea for ChromeStorage {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, HostError> {
        let items = match self.area {
            AreaName::Local => local_get(key).await,
            AreaName::Sync => sync_get(key).await,
        }
        .map_err(api_error("storage.get"))?;

        let value = js_sys::Reflect::get(&items, &JsValue::from_str(key))
            .map_err(api_error("storage.get"))?;
        if value.is_undefined() {
            return Ok(None);
        }
        from_js("stored value", value).map(Some)
    }

    async fn set(&self, key: &str, value: serde_json::Value) -> Result<(), HostError> {
        let items = js_sys::Object::new();
        js_sys::Reflect::set(&items, &JsValue::from_str(key), &to_js(&value)?)
            .map_err(api_error("storage.set"))?;

        match self.area {
            AreaName::Local => local_set(&items).await,
            AreaName::Sync => sync_set(&items).await,
        }
        .map_err(api_error("storage.set"))?;
        Ok(())
    }
}

/// The extension runtime as seen from the background worker
pub struct ChromeHost {
    local: ChromeStorage,
    sync: ChromeStorage,
}

impl ChromeHost {
    pub fn new() -> Self {
        ChromeHost {
            local: ChromeStorage::new(AreaName::Local),
            sync: ChromeStorage::new(AreaName::Sync),
        }
    }
}

impl Default for ChromeHost {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl TabsApi for ChromeHost {
    async fn query_current_window(&self) -> Result<Vec<TabRecord>, HostError> {
        let query = to_js(&QueryInfo {
            current_window: true,
        })?;
        let tabs = tabs_query(&query).await.map_err(api_error("tabs.query"))?;
        from_js("tabs", tabs)
    }

    async fn get_tab(&self, tab_id: TabId) -> Result<TabRecord, HostError> {
        let tab = tabs_get(tab_id)
            .await
            .map_err(|_| HostError::TabNotFound(tab_id))?;
        from_js("tab", tab)
    }

    async fn group_tabs(
        &self,
        tab_ids: &[TabId],
        group_id: Option<GroupId>,
    ) -> Result<GroupId, HostError> {
        let options = to_js(&GroupOptions { tab_ids, group_id })?;
        let group = tabs_group(&options).await.map_err(api_error("tabs.group"))?;
        from_js("group id", group)
    }

    async fn update_group(&self, group_id: GroupId, style: &GroupStyle) -> Result<(), HostError> {
        tab_groups_update(group_id, &to_js(style)?)
            .await
            .map_err(api_error("tabGroups.update"))?;
        Ok(())
    }

    async fn create_window(&self, url: Option<&str>) -> Result<WindowId, HostError> {
        let properties = to_js(&WindowProperties { url })?;
        let window = windows_create(&properties)
            .await
            .map_err(api_error("windows.create"))?;
        from_js::<Created>("window", window).map(|created| created.id)
    }

    async fn create_tab(&self, window_id: WindowId, url: &str) -> Result<TabId, HostError> {
        let properties = to_js(&TabProperties { url, window_id })?;
        let tab = tabs_create(&properties)
            .await
            .map_err(api_error("tabs.create"))?;
        from_js::<Created>("tab", tab).map(|created| created.id)
    }
}

#[async_trait(?Send)]
impl Clock for ChromeHost {
    fn now_millis(&self) -> f64 {
        js_sys::Date::now()
    }

    fn format_local(&self, millis: f64) -> String {
        js_sys::Date::new(&JsValue::from_f64(millis))
            .unchecked_ref::<LocaleDate>()
            .to_locale_string()
    }

    async fn sleep(&self, millis: u32) {
        let mut scheduled = Ok(0);
        let promise = js_sys::Promise::new(&mut |resolve, _reject| {
            scheduled = worker_scope()
                .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, millis as i32);
        });
        if let Err(e) = scheduled {
            log::error!("Error scheduling timer: {}", js_error_message(&e));
            return;
        }
        let _ = JsFuture::from(promise).await;
    }
}

impl Host for ChromeHost {
    type Storage = ChromeStorage;

    fn local(&self) -> &ChromeStorage {
        &self.local
    }

    fn sync(&self) -> &ChromeStorage {
        &self.sync
    }
}

/// The service worker's global scope, home of setTimeout/setInterval
pub(crate) fn worker_scope() -> web_sys::WorkerGlobalScope {
    js_sys::global().unchecked_into()
}
