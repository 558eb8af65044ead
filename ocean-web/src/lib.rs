#![forbid(unsafe_code)]
//! Browser bindings for the Ocean Adventure game suite.
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
pub mod bindings;
pub mod clock;
pub mod dom;
pub mod loader;
pub mod logger;
pub mod reveal;
pub mod storage;

pub use clock::BrowserClock;
pub use loader::{WebDataError, WebDataLoader, suite_config};
pub use storage::{LocalStore, WebStorageError};

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    if let Err(err) = logger::init(log::LevelFilter::Info) {
        dom::console_error(&format!("logger already installed: {err}"));
    }
    if let Err(err) = suite_config() {
        log::error!("embedded configuration is unusable: {err}");
    }
}
