//! Declarative configuration schema.
//!
//! A schema is the list of user-tunable settings an edit service exposes to
//! its host. It is plain data: the host renders it, fills in values and hands
//! the resolved values back through a [`ConfigStore`](super::ConfigStore).

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Value type of a configuration field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Number,
    Boolean,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Number => write!(f, "number"),
            FieldKind::Boolean => write!(f, "boolean"),
        }
    }
}

/// A single resolved or default configuration value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Number(f64),
    Boolean(bool),
}

impl ConfigValue {
    /// The schema kind this value belongs to.
    #[must_use]
    pub fn kind(&self) -> FieldKind {
        match self {
            ConfigValue::Number(_) => FieldKind::Number,
            ConfigValue::Boolean(_) => FieldKind::Boolean,
        }
    }

    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match *self {
            ConfigValue::Number(n) => Some(n),
            ConfigValue::Boolean(_) => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            ConfigValue::Boolean(b) => Some(b),
            ConfigValue::Number(_) => None,
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Number(n) => write!(f, "{n}"),
            ConfigValue::Boolean(b) => write!(f, "{b}"),
        }
    }
}

/// Schema entry describing one setting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigField {
    pub title: &'static str,
    pub description: &'static str,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    pub default: ConfigValue,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
}

impl ConfigField {
    /// Creates a number field with the given default and no bounds.
    #[must_use]
    pub fn number(title: &'static str, description: &'static str, default: f64) -> Self {
        Self {
            title,
            description,
            kind: FieldKind::Number,
            minimum: None,
            maximum: None,
            default: ConfigValue::Number(default),
            required: false,
        }
    }

    /// Creates a boolean field with the given default.
    #[must_use]
    pub fn boolean(title: &'static str, description: &'static str, default: bool) -> Self {
        Self {
            title,
            description,
            kind: FieldKind::Boolean,
            minimum: None,
            maximum: None,
            default: ConfigValue::Boolean(default),
            required: false,
        }
    }

    #[must_use]
    pub fn minimum(mut self, minimum: f64) -> Self {
        self.minimum = Some(minimum);
        self
    }

    #[must_use]
    pub fn maximum(mut self, maximum: f64) -> Self {
        self.maximum = Some(maximum);
        self
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Checks a value against this field's type and bounds.
    ///
    /// Returns a human-readable reason when the value is rejected.
    pub fn check(&self, value: &ConfigValue) -> Result<(), String> {
        if value.kind() != self.kind {
            return Err(format!("expected a {}, got {}", self.kind, value));
        }
        if let ConfigValue::Number(n) = *value {
            if !n.is_finite() {
                return Err(format!("{n} is not a finite number"));
            }
            if let Some(min) = self.minimum {
                if n < min {
                    return Err(format!("{n} is below the minimum of {min}"));
                }
            }
            if let Some(max) = self.maximum {
                if n > max {
                    return Err(format!("{n} is above the maximum of {max}"));
                }
            }
        }
        Ok(())
    }
}

/// Ordered mapping from setting key to schema entry.
///
/// Serializes as a JSON object in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigSchema {
    fields: Vec<(&'static str, ConfigField)>,
}

impl ConfigSchema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field; a later field with the same key replaces the earlier one.
    #[must_use]
    pub fn field(mut self, key: &'static str, field: ConfigField) -> Self {
        if let Some(slot) = self.fields.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = field;
        } else {
            self.fields.push((key, field));
        }
        self
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ConfigField> {
        self.fields.iter().find(|(k, _)| *k == key).map(|(_, f)| f)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &ConfigField)> {
        self.fields.iter().map(|(k, f)| (*k, f))
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(k, _)| *k)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for ConfigSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, field) in &self.fields {
            map.serialize_entry(key, field)?;
        }
        map.end()
    }
}
