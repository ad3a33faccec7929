use yew::prelude::*;

use crate::config::AppConfig;
use crate::services::tab_cache::{clear_notice, TabCache};

#[derive(Properties, PartialEq)]
pub struct CacheControlsProps {
    pub config: AppConfig,
    pub on_cleared: Callback<usize>,
}

#[function_component(CacheControls)]
pub fn cache_controls(props: &CacheControlsProps) -> Html {
    let status = use_state(String::new);

    let on_clear_click = {
        let config = props.config.clone();
        let on_cleared = props.on_cleared.clone();
        let status = status.clone();
        Callback::from(move |_: MouseEvent| match TabCache::browser(&config) {
            Ok(cache) => {
                let count = cache.clear_all();
                status.set(clear_notice(count));
                on_cleared.emit(count);
            }
            Err(e) => status.set(format!("{:#}", e)),
        })
    };

    html! {
        <div class="actions">
            <button class="btn btn-danger" onclick={on_clear_click}>{ "Clear Cached Values" }</button>
            if !status.is_empty() { <div class="status">{ &*status }</div> }
        </div>
    }
}
