/// Tab Organizer - Chrome Extension background worker
/// Built with Rust + WASM

pub mod background;
pub mod chrome;
pub mod domain;
pub mod error;
pub mod grouper;
pub mod history;
pub mod host;
pub mod organizer;
pub mod router;
pub mod session;
pub mod settings;
pub mod storage;
pub mod tab_data;

#[cfg(test)]
mod testing;

use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Re-export domain classification for the popup
#[wasm_bindgen]
pub fn classify_domain(url: &str) -> String {
    domain::classify_domain(url)
}

// Create the organizer once the service worker has loaded the module
#[wasm_bindgen]
pub fn start_background() {
    background::start();
}
