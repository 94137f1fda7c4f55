/// Entry points the service worker script forwards browser events to
use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{future_to_promise, spawn_local};

use crate::chrome::{ChromeHost, js_error_message, to_js, worker_scope};
use crate::organizer::TabOrganizer;
use crate::router::{self, Command, Request};
use crate::session::AUTO_SAVE_INTERVAL_MS;
use crate::tab_data::{TabChange, TabId, TabRecord};

type Organizer = Rc<TabOrganizer<ChromeHost>>;

thread_local! {
    static ORGANIZER: RefCell<Option<Organizer>> = const { RefCell::new(None) };
}

/// Create the organizer and start the auto-save timer. Later calls are ignored.
///
/// The chrome.* listeners live in `extension/background.js`; they wait for
/// this to run and then call the `handle_*` functions below.
pub fn start() {
    if ORGANIZER.with(|cell| cell.borrow().is_some()) {
        return;
    }

    let organizer: Organizer = Rc::new(TabOrganizer::new(ChromeHost::new()));
    ORGANIZER.with(|cell| *cell.borrow_mut() = Some(organizer.clone()));
    schedule_auto_save(&organizer);

    spawn_local(async move {
        organizer.start().await;
    });
}

fn organizer() -> Option<Organizer> {
    let organizer = ORGANIZER.with(|cell| cell.borrow().clone());
    if organizer.is_none() {
        log::warn!("Event received before the organizer started");
    }
    organizer
}

fn parse_tab(value: JsValue) -> Option<TabRecord> {
    match serde_wasm_bindgen::from_value(value) {
        Ok(tab) => Some(tab),
        Err(e) => {
            log::error!("Unreadable tab from host: {}", e);
            None
        }
    }
}

#[wasm_bindgen]
pub fn handle_tab_created(tab: JsValue) {
    let Some(organizer) = organizer() else { return };
    let Some(tab) = parse_tab(tab) else { return };
    spawn_local(async move { organizer.on_tab_created(tab).await });
}

#[wasm_bindgen]
pub fn handle_tab_updated(tab_id: TabId, change: JsValue, tab: JsValue) {
    let Some(organizer) = organizer() else { return };
    let change: TabChange = serde_wasm_bindgen::from_value(change).unwrap_or_default();
    let Some(tab) = parse_tab(tab) else { return };
    spawn_local(async move { organizer.on_tab_updated(tab_id, &change, tab).await });
}

#[wasm_bindgen]
pub fn handle_tab_removed(tab_id: TabId) {
    let Some(organizer) = organizer() else { return };
    spawn_local(async move { organizer.on_tab_removed(tab_id).await });
}

#[wasm_bindgen]
pub fn handle_command(name: String) {
    let Some(command) = Command::parse(&name) else {
        log::debug!("Ignoring unknown command {}", name);
        return;
    };
    let Some(organizer) = organizer() else { return };
    spawn_local(async move { router::handle_command(&organizer, command).await });
}

/// Answer a popup request
///
/// Returns a promise of the reply, or `None` when the message is not a
/// request this worker understands.
#[wasm_bindgen]
pub fn handle_message(message: JsValue) -> Option<js_sys::Promise> {
    let request: Request = match serde_wasm_bindgen::from_value(message) {
        Ok(request) => request,
        Err(e) => {
            log::debug!("Ignoring message: {}", e);
            return None;
        }
    };
    let organizer = organizer()?;

    Some(future_to_promise(async move {
        let response = router::dispatch(&organizer, request).await;
        to_js(&response).map_err(|e| {
            log::error!("Error encoding reply: {}", e);
            JsValue::from_str(&e.to_string())
        })
    }))
}

fn schedule_auto_save(organizer: &Organizer) {
    let organizer = organizer.clone();
    let tick = Closure::<dyn FnMut()>::new(move || {
        let organizer = organizer.clone();
        spawn_local(async move { organizer.sessions().auto_save().await });
    });

    match worker_scope().set_interval_with_callback_and_timeout_and_arguments_0(
        tick.as_ref().unchecked_ref(),
        AUTO_SAVE_INTERVAL_MS as i32,
    ) {
        Ok(_) => tick.forget(),
        Err(e) => log::error!("Error scheduling auto-save: {}", js_error_message(&e)),
    }
}
