use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// A single form field value as held in the page and in storage.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    #[serde(serialize_with = "serialize_number")]
    Number(f64),
    Text(String),
}

// Whole numbers go out as integers so caches written by the page scripts and by
// us look the same ("20", not "20.0").
fn serialize_number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

impl FieldValue {
    /// How a checkbox reads this value.
    pub fn as_bool(&self) -> bool {
        match self {
            FieldValue::Bool(b) => *b,
            FieldValue::Number(n) => *n != 0.0,
            FieldValue::Text(s) => s == "true",
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

/// One stored record of a tab's cache entry.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct CachedField {
    pub id: String,
    pub value: FieldValue,
}

impl CachedField {
    pub fn new(id: impl Into<String>, value: FieldValue) -> Self {
        Self { id: id.into(), value }
    }
}

/// Air temperature and pressure taken from the cached configuration tab.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct ConfigValues {
    pub air_temp: String,
    pub air_pressure: String,
}

impl ConfigValues {
    /// Temperature first, then pressure.
    pub fn as_array(&self) -> [&str; 2] {
        [&self.air_temp, &self.air_pressure]
    }
}
