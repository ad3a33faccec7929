use crate::models::FieldValue;

pub const CONFIGURATION_TAB: &str = "configuration";

/// How a field's value is read from and written to the page.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FieldKind {
    /// Numeric `<input>` or range slider.
    Number,
    /// `<input type="checkbox">`, value is its checked state.
    Checkbox,
    /// `<select>` offering the listed values.
    Select(&'static [&'static str]),
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum FieldDefault {
    Number(f64),
    Bool(bool),
    Text(&'static str),
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct FieldDescriptor {
    pub id: &'static str,
    pub kind: FieldKind,
    pub default: FieldDefault,
}

impl FieldDescriptor {
    const fn number(id: &'static str, default: f64) -> Self {
        Self { id, kind: FieldKind::Number, default: FieldDefault::Number(default) }
    }

    const fn checkbox(id: &'static str, default: bool) -> Self {
        Self { id, kind: FieldKind::Checkbox, default: FieldDefault::Bool(default) }
    }

    const fn select(id: &'static str, options: &'static [&'static str], default: &'static str) -> Self {
        Self { id, kind: FieldKind::Select(options), default: FieldDefault::Text(default) }
    }

    /// The default has the shape the field's kind reads and writes.
    pub fn is_consistent(&self) -> bool {
        match (self.kind, self.default) {
            (FieldKind::Number, FieldDefault::Number(_)) => true,
            (FieldKind::Checkbox, FieldDefault::Bool(_)) => true,
            (FieldKind::Select(options), FieldDefault::Text(default)) => options.contains(&default),
            _ => false,
        }
    }

    pub fn default_value(&self) -> FieldValue {
        match self.default {
            FieldDefault::Number(n) => FieldValue::Number(n),
            FieldDefault::Bool(b) => FieldValue::Bool(b),
            FieldDefault::Text(s) => FieldValue::Text(s.to_string()),
        }
    }

    /// Human readable label derived from the element id.
    pub fn label(&self) -> String {
        humanize(self.id.trim_end_matches("_input"))
    }
}

/// `"slotted_panel"` becomes `"Slotted panel"`.
pub fn humanize(name: &str) -> String {
    let mut text = name.replace('_', " ");
    if let Some(first) = text.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    text
}

const POROUS_ABSORBER: &[FieldDescriptor] = &[
    FieldDescriptor::number("absorber_thickness_input", 30.0),
    FieldDescriptor::number("absorber_flow_resistivity_input", 20000.0),
    FieldDescriptor::number("air_gap_input", 100.0),
    FieldDescriptor::number("angle_input", 0.0),
];

const SLOTTED_PANEL: &[FieldDescriptor] = &[
    FieldDescriptor::number("panel_thickness_input", 10.0),
    FieldDescriptor::number("slot_distance_input", 10.0),
    FieldDescriptor::number("slot_width_input", 2.0),
    FieldDescriptor::number("absorber_thickness_input", 30.0),
    FieldDescriptor::number("absorber_flow_resistivity_input", 20000.0),
    FieldDescriptor::number("air_gap_input", 100.0),
];

const PERFORATED_PANEL: &[FieldDescriptor] = &[
    FieldDescriptor::number("panel_thickness_input", 10.0),
    FieldDescriptor::number("repeat_distance_input", 10.0),
    FieldDescriptor::number("hole_radius_input", 2.0),
    FieldDescriptor::number("absorber_thickness_input", 30.0),
    FieldDescriptor::number("absorber_flow_resistivity_input", 20000.0),
    FieldDescriptor::number("air_gap_input", 100.0),
];

const MICROPERFORATED_PANEL: &[FieldDescriptor] = &[
    FieldDescriptor::number("panel_thickness_input", 1.0),
    FieldDescriptor::number("repeat_distance_input", 5.0),
    FieldDescriptor::number("hole_radius_input", 0.4),
    FieldDescriptor::number("air_gap_input", 100.0),
    FieldDescriptor::number("angle_input", 0.0),
];

const CONFIGURATION: &[FieldDescriptor] = &[
    FieldDescriptor::number("air_temp", 20.0),
    FieldDescriptor::number("air_pressure", 1.0),
    FieldDescriptor::number("graph_start_freq", 62.5),
    FieldDescriptor::checkbox("smooth_curve", false),
    FieldDescriptor::select("subdivision", &["1", "2", "3", "6"], "1"),
    FieldDescriptor::checkbox("show_diagram", true),
];

/// Every tab that caches its fields, in display order.
pub const TAB_CONFIG: &[(&str, &[FieldDescriptor])] = &[
    ("porous_absorber", POROUS_ABSORBER),
    ("slotted_panel", SLOTTED_PANEL),
    ("perforated_panel", PERFORATED_PANEL),
    ("microperforated_panel", MICROPERFORATED_PANEL),
    (CONFIGURATION_TAB, CONFIGURATION),
];

pub fn tab(name: &str) -> Option<&'static [FieldDescriptor]> {
    TAB_CONFIG
        .iter()
        .find(|(tab_name, _)| *tab_name == name)
        .map(|(_, fields)| *fields)
}

pub fn tab_names() -> impl Iterator<Item = &'static str> {
    TAB_CONFIG.iter().map(|(name, _)| *name)
}
