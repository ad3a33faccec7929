use serde::{Deserialize, Serialize};

use crate::services::storage::{BrowserStorage, KeyValueStore, StorageKind};

/// Storage key holding an optional JSON override of [`AppConfig`].
pub const KEY_APP_CONFIG: &str = "porous_absorber_app_config";

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageKind,
    pub log_level: String,
    pub trace: TraceConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageKind::Local,
            log_level: "info".to_string(),
            trace: TraceConfig::default(),
        }
    }
}

impl AppConfig {
    /// Defaults, overridden by whatever the store holds under [`KEY_APP_CONFIG`].
    /// A missing or malformed override leaves the defaults in place.
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        match store.get_item(KEY_APP_CONFIG) {
            Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|e| {
                log::warn!("Ignoring malformed {}: {}", KEY_APP_CONFIG, e);
                Self::default()
            }),
            _ => Self::default(),
        }
    }

    /// The override is always read from `localStorage`, whichever store the
    /// tab cache is told to use.
    pub fn from_browser() -> Self {
        BrowserStorage::open(StorageKind::Local)
            .map(|storage| Self::load(&storage))
            .unwrap_or_default()
    }

    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

/// Which modules emit boundary traces.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug, Default)]
#[serde(default)]
pub struct TraceConfig {
    pub all: bool,
    pub modules: Vec<String>,
}

impl TraceConfig {
    pub fn is_enabled(&self, module: &str) -> bool {
        self.all || self.modules.iter().any(|m| m == module)
    }
}
