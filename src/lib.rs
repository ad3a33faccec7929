mod app;
mod components;
mod utils;

pub mod bindings;
pub mod config;
pub mod models;
pub mod services;
pub mod tab_config;
pub mod trace;

use wasm_bindgen::prelude::*;
use app::App;
use config::AppConfig;

#[wasm_bindgen(start)]
pub fn run_app() {
    utils::set_panic_hook();
    utils::init_logging(&AppConfig::from_browser());
    yew::Renderer::<App>::new().render();
}
