use crate::config::AppConfig;

pub fn set_panic_hook() {
    // When the `console_error_panic_hook` feature is enabled, we can call the
    // `set_panic_hook` function at least once during initialization, and then
    // we will get better error messages if our code ever panics.
    //
    // For more details see
    // https://github.com/rustwasm/console_error_panic_hook#readme
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Routes the `log` facade to the browser console.
pub fn init_logging(config: &AppConfig) {
    if let Some(level) = config.level_filter().to_level() {
        if console_log::init_with_level(level).is_err() {
            web_sys::console::warn_1(&"Logger already initialised".into());
        }
    }
}
