use anyhow::{anyhow, Context, Result};
use std::collections::BTreeMap;

use crate::config::AppConfig;
use crate::models::{CachedField, ConfigValues};
use crate::services::fields::{DomFields, FieldAccess};
use crate::services::storage::{BrowserStorage, KeyValueStore};
use crate::tab_config::{self, FieldDescriptor, CONFIGURATION_TAB};
use crate::trace::Trace;

/// What the user is told after [`TabCache::clear_all`].
pub fn clear_notice(count: usize) -> String {
    format!("All cached data for {} tabs has been removed from local storage", count)
}

/// Per-tab field cache: each tab's values live under the tab's name as a JSON
/// array of `{ "id", "value" }` records in field order.
pub struct TabCache<S, F> {
    store: S,
    fields: F,
    trace: Trace,
}

impl TabCache<BrowserStorage, DomFields> {
    /// The cache over the page's own storage and document.
    pub fn browser(config: &AppConfig) -> Result<Self> {
        let store = BrowserStorage::open(config.storage)?;
        let fields = DomFields::current()?;
        Ok(Self::new(store, fields, config))
    }
}

impl<S: KeyValueStore, F: FieldAccess> TabCache<S, F> {
    pub fn new(store: S, fields: F, config: &AppConfig) -> Self {
        Self { store, fields, trace: Trace::new("tab_cache", &config.trace) }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn fields(&self) -> &F {
        &self.fields
    }

    pub fn into_fields(self) -> F {
        self.fields
    }

    fn tab_fields(tab: &str) -> Result<&'static [FieldDescriptor]> {
        tab_config::tab(tab).ok_or_else(|| anyhow!("Unknown tab \"{}\"", tab))
    }

    fn cached(&self, tab: &str) -> Result<Option<Vec<CachedField>>> {
        self.store
            .get_json(tab)
            .with_context(|| format!("Cached values for tab \"{}\" are unreadable", tab))
    }

    /// Pushes a tab's cached values back into its fields.
    ///
    /// Returns `false` when nothing is cached for the tab.
    pub fn restore(&self, tab: &str) -> Result<bool> {
        let _bnd = self.trace.boundary("restore", Some(tab));
        let descriptors = Self::tab_fields(tab)?;

        let Some(cached) = self.cached(tab)? else {
            self.trace.info("restore", format!("No values for {} found in storage", tab));
            return Ok(false);
        };

        self.trace.info("restore", format!("Cached values for tab \"{}\" found in storage", tab));

        if cached.len() > descriptors.len() {
            log::warn!(
                "Tab \"{}\" has {} cached values but only {} fields, ignoring the rest",
                tab,
                cached.len(),
                descriptors.len()
            );
        }

        for (field, descriptor) in cached.iter().zip(descriptors) {
            self.trace.info("restore", format!("     {}={}", field.id, field.value));
            self.fields
                .set(&field.id, descriptor.kind, &field.value)
                .with_context(|| format!("Restoring {} on tab \"{}\"", field.id, tab))?;
        }

        Ok(true)
    }

    /// Stores the tab's current field values, substituting each field's
    /// default where the page has no value.
    pub fn write(&self, tab: &str) -> Result<Vec<CachedField>> {
        let _bnd = self.trace.boundary("write", Some(tab));
        let descriptors = Self::tab_fields(tab)?;

        let values: Vec<CachedField> = descriptors
            .iter()
            .map(|descriptor| {
                let value = self
                    .fields
                    .get(descriptor)
                    .unwrap_or_else(|| descriptor.default_value());
                CachedField::new(descriptor.id, value)
            })
            .collect();

        let json = self
            .store
            .set_json(tab, &values)
            .with_context(|| format!("Writing tab \"{}\" to storage", tab))?;
        self.trace.info("write", format!("Writing {} to storage", json));

        Ok(values)
    }

    /// Removes every tab's cached entry and returns how many tabs there are.
    pub fn clear_all(&self) -> usize {
        let _bnd = self.trace.boundary("clear_all", None);
        let mut count = 0;

        for tab in tab_config::tab_names() {
            if let Err(e) = self.store.remove_item(tab) {
                log::warn!("Could not remove cached values for \"{}\": {}", tab, e);
            }
            count += 1;
        }

        count
    }

    /// All cached configuration values keyed by field id, as strings.
    pub fn fetch_config_tab_values(&self) -> Result<BTreeMap<String, String>> {
        let cached = self
            .cached(CONFIGURATION_TAB)?
            .ok_or_else(|| anyhow!("No cached \"{}\" values in storage", CONFIGURATION_TAB))?;

        Ok(cached
            .into_iter()
            .map(|field| (field.id, field.value.to_string()))
            .collect())
    }

    pub fn fetch_config_values(&self) -> Result<ConfigValues> {
        let mut values = self.fetch_config_tab_values()?;
        let mut take = |id: &str| {
            values
                .remove(id)
                .ok_or_else(|| anyhow!("Cached configuration has no \"{}\" value", id))
        };

        Ok(ConfigValues { air_temp: take("air_temp")?, air_pressure: take("air_pressure")? })
    }
}
