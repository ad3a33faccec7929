use anyhow::Result;
use std::collections::HashMap;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::config::AppConfig;
use crate::models::FieldValue;
use crate::services::fields::{read_input, MemoryFields};
use crate::services::storage::{BrowserStorage, KeyValueStore};
use crate::services::tab_cache::TabCache;
use crate::tab_config::{self, FieldDescriptor, FieldKind};

type FieldValues = HashMap<String, FieldValue>;

/// What the panel shows for `field`: its value, or its default when unset.
fn shown_value(values: &FieldValues, field: &FieldDescriptor) -> FieldValue {
    values
        .get(field.id)
        .cloned()
        .unwrap_or_else(|| field.default_value())
}

/// Values after the user changed `field`'s input. An unusable entry drops
/// the value so the default is stored and shown.
fn with_input(values: &FieldValues, field: &FieldDescriptor, raw: &str, checked: bool) -> FieldValues {
    let mut next = values.clone();
    match read_input(field.kind, raw, checked) {
        Some(value) => next.insert(field.id.to_string(), value),
        None => next.remove(field.id),
    };
    next
}

fn restored<S: KeyValueStore>(store: S, config: &AppConfig, tab: &str, values: FieldValues) -> Result<FieldValues> {
    let cache = TabCache::new(store, MemoryFields::from_values(values), config);
    cache.restore(tab)?;
    Ok(cache.into_fields().into_values())
}

fn persisted<S: KeyValueStore>(store: S, config: &AppConfig, tab: &str, values: FieldValues) -> Result<()> {
    TabCache::new(store, MemoryFields::from_values(values), config).write(tab)?;
    Ok(())
}

#[derive(Properties, PartialEq, Clone)]
pub struct TabPanelProps {
    pub tab: &'static str,
    pub config: AppConfig,
    /// False when storage failed the availability probe.
    pub persist: bool,
    pub on_written: Callback<()>,
}

#[function_component(TabPanel)]
pub fn tab_panel(props: &TabPanelProps) -> Html {
    let error_msg = use_state(String::new);
    let values = use_state(FieldValues::new);
    let fields = tab_config::tab(props.tab).unwrap_or_default();

    {
        let config = props.config.clone();
        let err = error_msg.clone();
        let values = values.clone();
        let persist = props.persist;
        use_effect_with(props.tab, move |tab| {
            if persist {
                let outcome = BrowserStorage::open(config.storage)
                    .map_err(anyhow::Error::from)
                    .and_then(|store| restored(store, &config, tab, (*values).clone()));
                match outcome {
                    Ok(restored) => values.set(restored),
                    Err(e) => err.set(format!("{:#}", e)),
                }
            }
        });
    }

    let on_field_change = |field: FieldDescriptor| {
        let config = props.config.clone();
        let err = error_msg.clone();
        let values = values.clone();
        let on_written = props.on_written.clone();
        let tab = props.tab;
        let persist = props.persist;
        Callback::from(move |e: Event| {
            let next = match field.kind {
                FieldKind::Select(_) => {
                    let select: HtmlSelectElement = e.target_unchecked_into();
                    with_input(&values, &field, &select.value(), false)
                }
                _ => {
                    let input: HtmlInputElement = e.target_unchecked_into();
                    with_input(&values, &field, &input.value(), input.checked())
                }
            };
            values.set(next.clone());

            if !persist {
                return;
            }
            let outcome = BrowserStorage::open(config.storage)
                .map_err(anyhow::Error::from)
                .and_then(|store| persisted(store, &config, tab, next));
            match outcome {
                Ok(()) => {
                    err.set(String::new());
                    on_written.emit(());
                }
                Err(e) => err.set(format!("{:#}", e)),
            }
        })
    };

    html! {
        <div class="tab-panel">
            { for fields.iter().map(|field| {
                debug_assert!(field.is_consistent(), "{} has a default its kind cannot show", field.id);
                let value = shown_value(&values, field);
                let onchange = on_field_change(*field);
                let input = match field.kind {
                    FieldKind::Checkbox => html! {
                        <input type="checkbox" id={field.id} checked={value.as_bool()} {onchange} />
                    },
                    FieldKind::Number => html! {
                        <input class="form-input" type="number" step="any" id={field.id} value={value.to_string()} {onchange} />
                    },
                    FieldKind::Select(options) => {
                        let selected = value.to_string();
                        html! {
                            <select class="form-input" id={field.id} {onchange}>
                                { for options.iter().map(|option| html! {
                                    <option value={*option} selected={*option == selected}>{ *option }</option>
                                })}
                            </select>
                        }
                    }
                };
                html! {
                    <div class="field-row">
                        <label class="form-label">{ field.label() }</label>
                        { input }
                    </div>
                }
            })}
            if !error_msg.is_empty() { <div class="error">{ &*error_msg }</div> }
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::storage::MemoryStorage;

    fn field(tab: &str, id: &str) -> FieldDescriptor {
        *tab_config::tab(tab)
            .unwrap()
            .iter()
            .find(|f| f.id == id)
            .unwrap()
    }

    #[test]
    fn unset_fields_show_their_default() {
        let values = FieldValues::new();
        assert_eq!(shown_value(&values, &field("porous_absorber", "air_gap_input")), FieldValue::Number(100.0));
        assert_eq!(shown_value(&values, &field("configuration", "subdivision")), FieldValue::Text("1".into()));
    }

    #[test]
    fn earlier_edits_survive_later_writes() {
        let store = MemoryStorage::new();
        let config = AppConfig::default();
        let air_gap = field("porous_absorber", "air_gap_input");
        let angle = field("porous_absorber", "angle_input");

        let values = with_input(&FieldValues::new(), &air_gap, "50", false);
        persisted(&store, &config, "porous_absorber", values.clone()).unwrap();
        assert_eq!(shown_value(&values, &air_gap), FieldValue::Number(50.0));

        let values = with_input(&values, &angle, "45", false);
        persisted(&store, &config, "porous_absorber", values.clone()).unwrap();

        let stored = store.get_item("porous_absorber").unwrap().unwrap();
        assert!(stored.contains(r#"{"id":"air_gap_input","value":50}"#), "{}", stored);
        assert!(stored.contains(r#"{"id":"angle_input","value":45}"#), "{}", stored);
    }

    #[test]
    fn restored_values_are_shown() {
        let store = MemoryStorage::new();
        let config = AppConfig::default();
        store
            .set_item("configuration", r#"[{"id":"air_temp","value":25},{"id":"air_pressure","value":0.95}]"#)
            .unwrap();

        let values = restored(&store, &config, "configuration", FieldValues::new()).unwrap();
        assert_eq!(shown_value(&values, &field("configuration", "air_temp")), FieldValue::Number(25.0));
        assert_eq!(shown_value(&values, &field("configuration", "graph_start_freq")), FieldValue::Number(62.5));
    }

    #[test]
    fn cleared_input_falls_back_to_default() {
        let air_gap = field("porous_absorber", "air_gap_input");
        let values = with_input(&FieldValues::new(), &air_gap, "75", false);
        let values = with_input(&values, &air_gap, "", false);
        assert_eq!(shown_value(&values, &air_gap), FieldValue::Number(100.0));
    }

    #[test]
    fn checkbox_and_select_inputs() {
        let smooth = field("configuration", "smooth_curve");
        let subdivision = field("configuration", "subdivision");
        let values = with_input(&FieldValues::new(), &smooth, "on", true);
        let values = with_input(&values, &subdivision, "3", false);
        assert!(shown_value(&values, &smooth).as_bool());
        assert_eq!(shown_value(&values, &subdivision).to_string(), "3");
    }
}
