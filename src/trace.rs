use crate::config::TraceConfig;
use std::fmt::Display;

/// Traces are switched per module, so they must get past the default
/// `info` console filter on their own.
pub const TRACE_LEVEL: log::Level = log::Level::Info;

/// Per-module boundary tracing on top of the `log` facade.
#[derive(Clone, Debug)]
pub struct Trace {
    module: &'static str,
    enabled: bool,
}

impl Trace {
    pub fn new(module: &'static str, config: &TraceConfig) -> Self {
        Self { module, enabled: config.is_enabled(module) }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Logs entry into `fn_name` now and exit when the guard drops.
    pub fn boundary(&self, fn_name: &'static str, arg: Option<&str>) -> Boundary {
        if self.enabled {
            match arg {
                Some(arg) => log::log!(target: self.module, TRACE_LEVEL, "--> {}({})", fn_name, arg),
                None => log::log!(target: self.module, TRACE_LEVEL, "--> {}()", fn_name),
            }
        }
        Boundary { module: self.module, fn_name, enabled: self.enabled }
    }

    pub fn info(&self, fn_name: &str, msg: impl Display) {
        if self.enabled {
            log::log!(target: self.module, TRACE_LEVEL, "    {}: {}", fn_name, msg);
        }
    }
}

pub struct Boundary {
    module: &'static str,
    fn_name: &'static str,
    enabled: bool,
}

impl Drop for Boundary {
    fn drop(&mut self) {
        if self.enabled {
            log::log!(target: self.module, TRACE_LEVEL, "<-- {}", self.fn_name);
        }
    }
}
