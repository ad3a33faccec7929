use anyhow::{anyhow, Result};
use std::cell::RefCell;
use std::collections::HashMap;
use wasm_bindgen::JsCast;
use web_sys::{window, Document, Element, HtmlInputElement, HtmlSelectElement};

use crate::models::FieldValue;
use crate::tab_config::{FieldDescriptor, FieldKind};

/// Reads and writes the current value of a named field on the page.
pub trait FieldAccess {
    /// `None` when the field is absent or holds nothing usable.
    fn get(&self, field: &FieldDescriptor) -> Option<FieldValue>;
    fn set(&self, id: &str, kind: FieldKind, value: &FieldValue) -> Result<()>;
}

/// Fields are the document's elements, looked up by id.
pub struct DomFields {
    document: Document,
}

impl DomFields {
    pub fn current() -> Result<Self> {
        let document = window()
            .and_then(|w| w.document())
            .ok_or_else(|| anyhow!("No document available"))?;
        Ok(Self { document })
    }

    fn element(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }
}

/// What an input showing `raw` (and `checked`, for checkboxes) holds for a
/// field of `kind`. `None` means the field's default applies.
pub fn read_input(kind: FieldKind, raw: &str, checked: bool) -> Option<FieldValue> {
    match kind {
        FieldKind::Checkbox => Some(FieldValue::Bool(checked)),
        FieldKind::Number => raw.trim().parse::<f64>().ok().map(FieldValue::Number),
        FieldKind::Select(_) => (!raw.is_empty()).then(|| FieldValue::Text(raw.to_string())),
    }
}

impl FieldAccess for DomFields {
    fn get(&self, field: &FieldDescriptor) -> Option<FieldValue> {
        let element = self.element(field.id)?;

        match element.dyn_into::<HtmlSelectElement>() {
            Ok(select) => read_input(field.kind, &select.value(), false),
            Err(element) => {
                let input = element.dyn_into::<HtmlInputElement>().ok()?;
                read_input(field.kind, &input.value(), input.checked())
            }
        }
    }

    fn set(&self, id: &str, kind: FieldKind, value: &FieldValue) -> Result<()> {
        let element = self
            .element(id)
            .ok_or_else(|| anyhow!("No element with id \"{}\"", id))?;

        if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
            select.set_value(&value.to_string());
            return Ok(());
        }

        let input = element
            .dyn_ref::<HtmlInputElement>()
            .ok_or_else(|| anyhow!("Element \"{}\" is not an input field", id))?;

        match kind {
            FieldKind::Checkbox => input.set_checked(value.as_bool()),
            FieldKind::Number | FieldKind::Select(_) => input.set_value(&value.to_string()),
        }
        Ok(())
    }
}

/// Map-backed fields, used off-page and as the yew panel's own field state.
#[derive(Default, Debug)]
pub struct MemoryFields {
    values: RefCell<HashMap<String, FieldValue>>,
}

impl MemoryFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_values(values: HashMap<String, FieldValue>) -> Self {
        Self { values: RefCell::new(values) }
    }

    pub fn into_values(self) -> HashMap<String, FieldValue> {
        self.values.into_inner()
    }

    pub fn insert(&self, id: &str, value: impl Into<FieldValue>) {
        self.values.borrow_mut().insert(id.to_string(), value.into());
    }

    pub fn remove(&self, id: &str) {
        self.values.borrow_mut().remove(id);
    }

    pub fn value(&self, id: &str) -> Option<FieldValue> {
        self.values.borrow().get(id).cloned()
    }
}

impl FieldAccess for MemoryFields {
    fn get(&self, field: &FieldDescriptor) -> Option<FieldValue> {
        self.value(field.id)
    }

    fn set(&self, id: &str, kind: FieldKind, value: &FieldValue) -> Result<()> {
        let value = match kind {
            FieldKind::Checkbox => FieldValue::Bool(value.as_bool()),
            FieldKind::Select(_) => FieldValue::Text(value.to_string()),
            FieldKind::Number => value.clone(),
        };
        self.values.borrow_mut().insert(id.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkbox_values_are_normalised() {
        let fields = MemoryFields::new();
        fields.set("smooth_curve", FieldKind::Checkbox, &FieldValue::Text("true".into())).unwrap();
        fields.set("show_diagram", FieldKind::Checkbox, &FieldValue::Number(0.0)).unwrap();
        assert_eq!(fields.value("smooth_curve"), Some(FieldValue::Bool(true)));
        assert_eq!(fields.value("show_diagram"), Some(FieldValue::Bool(false)));
    }

    #[test]
    fn number_values_pass_through() {
        let fields = MemoryFields::new();
        fields.set("air_temp", FieldKind::Number, &FieldValue::Text("21.5".into())).unwrap();
        assert_eq!(fields.value("air_temp"), Some(FieldValue::Text("21.5".into())));
    }

    #[test]
    fn select_values_are_stored_as_text() {
        let fields = MemoryFields::new();
        fields.set("subdivision", FieldKind::Select(&["1", "3"]), &FieldValue::Number(3.0)).unwrap();
        assert_eq!(fields.value("subdivision"), Some(FieldValue::Text("3".into())));
    }

    #[test]
    fn reads_raw_input_text() {
        assert_eq!(read_input(FieldKind::Number, " 62.5 ", false), Some(FieldValue::Number(62.5)));
        assert_eq!(read_input(FieldKind::Number, "", false), None);
        assert_eq!(read_input(FieldKind::Number, "abc", false), None);
        assert_eq!(read_input(FieldKind::Checkbox, "on", true), Some(FieldValue::Bool(true)));
        assert_eq!(read_input(FieldKind::Select(&["2"]), "2", false), Some(FieldValue::Text("2".into())));
        assert_eq!(read_input(FieldKind::Select(&["2"]), "", false), None);
    }
}
