use yew::prelude::*;

use crate::components::{cache_controls::CacheControls, tab_panel::TabPanel};
use crate::config::AppConfig;
use crate::services::storage::storage_available;
use crate::services::tab_cache::TabCache;
use crate::tab_config::{self, humanize, CONFIGURATION_TAB};

const GLOBAL_STYLES: &str = r#"
    :root {
        --bg-app: #ffffff;
        --border-color: #e5e5e5;
        --text-primary: #333;
        --text-secondary: #666;
        --accent-color: #10a37f;
        --danger-color: #ef4444;
    }

    * { box-sizing: border-box; }
    body { margin: 0; font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Helvetica, Arial, sans-serif; color: var(--text-primary); }

    .app-container { max-width: 640px; margin: 0 auto; padding: 20px; }
    .tab-bar { display: flex; gap: 4px; border-bottom: 1px solid var(--border-color); margin-bottom: 15px; }
    .tab-button { cursor: pointer; border: none; background: none; padding: 8px 12px; color: var(--text-secondary); }
    .tab-button.active { color: var(--text-primary); border-bottom: 2px solid var(--accent-color); }

    .field-row { display: flex; align-items: center; gap: 10px; }
    .form-label { width: 200px; font-size: 0.85rem; font-weight: 600; color: var(--text-secondary); }
    .form-input { flex-grow: 1; padding: 8px; border: 1px solid var(--border-color); border-radius: 6px; margin-bottom: 10px; }

    .btn { cursor: pointer; border: 1px solid var(--border-color); background: white; padding: 8px 12px; border-radius: 6px; font-size: 0.9rem; }
    .btn-danger { color: var(--danger-color); border-color: var(--danger-color); }
    .actions { margin-top: 20px; display: flex; flex-direction: column; gap: 8px; }
    .notice, .error { color: var(--danger-color); font-size: 0.85rem; }
    .air-summary { font-size: 0.85rem; color: var(--text-secondary); }
"#;

#[function_component(App)]
pub fn app() -> Html {
    let config = use_state(AppConfig::from_browser);
    let available = use_state(|| storage_available(config.storage));
    let active_tab = use_state(|| tab_config::tab_names().next().unwrap_or(CONFIGURATION_TAB));
    // Bumped on every write or clear so the air summary is re-read
    let revision = use_state(|| 0u32);

    let air = if *available {
        TabCache::browser(&config)
            .and_then(|cache| cache.fetch_config_values())
            .ok()
    } else {
        None
    };

    let on_written = {
        let revision = revision.clone();
        Callback::from(move |_: ()| revision.set(*revision + 1))
    };

    let on_cleared = {
        let revision = revision.clone();
        Callback::from(move |count: usize| {
            log::info!("Cleared cached values for {} tabs", count);
            revision.set(*revision + 1);
        })
    };

    html! {
        <>
            <style>{ GLOBAL_STYLES }</style>
            <div class="app-container">
                if !*available {
                    <div class="notice">
                        { format!("{} is not available, field values will not be remembered", config.storage.name()) }
                    </div>
                }

                <div class="tab-bar">
                    { for tab_config::tab_names().map(|tab| {
                        let active_tab = active_tab.clone();
                        let class = if tab == *active_tab { "tab-button active" } else { "tab-button" };
                        html! {
                            <button class={class} onclick={Callback::from(move |_| active_tab.set(tab))}>
                                { humanize(tab) }
                            </button>
                        }
                    })}
                </div>

                <TabPanel
                    key={*active_tab}
                    tab={*active_tab}
                    config={(*config).clone()}
                    persist={*available}
                    on_written={on_written}
                />

                if let Some(air) = air {
                    <div class="air-summary">
                        { format!("Air temperature {} °C, air pressure {} atm", air.air_temp, air.air_pressure) }
                    </div>
                }

                if *available {
                    <CacheControls config={(*config).clone()} on_cleared={on_cleared} />
                }
            </div>
        </>
    }
}
