//! Functions the rest of the page calls from JavaScript.

use js_sys::Array;
use wasm_bindgen::prelude::*;
use web_sys::window;

use crate::config::AppConfig;
use crate::services::fields::DomFields;
use crate::services::storage::{self, BrowserStorage, StorageKind};
use crate::services::tab_cache::{clear_notice, TabCache};

fn to_js(e: anyhow::Error) -> JsValue {
    js_sys::Error::new(&format!("{:#}", e)).into()
}

fn browser_cache() -> Result<TabCache<BrowserStorage, DomFields>, JsValue> {
    TabCache::browser(&AppConfig::from_browser()).map_err(to_js)
}

/// `storage_type` is `"localStorage"` or `"sessionStorage"`.
#[wasm_bindgen(js_name = storageAvailable)]
pub fn storage_available(storage_type: &str) -> bool {
    StorageKind::from_name(storage_type)
        .map(storage::storage_available)
        .unwrap_or(false)
}

#[wasm_bindgen(js_name = restoreFromLocalStorage)]
pub fn restore_from_local_storage(tab_name: &str) -> Result<bool, JsValue> {
    browser_cache()?.restore(tab_name).map_err(to_js)
}

#[wasm_bindgen(js_name = writeToLocalStorage)]
pub fn write_to_local_storage(tab_name: &str) -> Result<(), JsValue> {
    browser_cache()?.write(tab_name).map(|_| ()).map_err(to_js)
}

#[wasm_bindgen(js_name = clearLocalStorage)]
pub fn clear_local_storage() -> Result<u32, JsValue> {
    let count = browser_cache()?.clear_all();
    if let Some(window) = window() {
        window.alert_with_message(&clear_notice(count))?;
    }
    Ok(count as u32)
}

/// `[air_temp, air_pressure]`, both as strings.
#[wasm_bindgen(js_name = fetchConfigTabValues)]
pub fn fetch_config_tab_values() -> Result<Array, JsValue> {
    let values = browser_cache()?.fetch_config_values().map_err(to_js)?;
    Ok(values
        .as_array()
        .iter()
        .map(|v| JsValue::from_str(v))
        .collect())
}
