//! Resolved configuration values for one service invocation.

use super::schema::{ConfigSchema, ConfigValue};
use crate::error::{CoreError, CoreResult};

use log::debug;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Key/value settings matching a [`ConfigSchema`].
///
/// A store produced by [`ConfigStore::resolve`] holds a value for every
/// schema key, each one checked against the field's type and bounds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigStore {
    values: BTreeMap<String, ConfigValue>,
}

impl ConfigStore {
    /// Resolves schema defaults plus overrides into a complete store.
    ///
    /// Unknown keys, type mismatches and out-of-bound numbers are rejected.
    pub fn resolve(
        schema: &ConfigSchema,
        overrides: impl IntoIterator<Item = (String, ConfigValue)>,
    ) -> CoreResult<Self> {
        let mut values: BTreeMap<String, ConfigValue> = schema
            .iter()
            .map(|(key, field)| (key.to_string(), field.default))
            .collect();

        for (key, value) in overrides {
            let field = schema.get(&key).ok_or_else(|| {
                let known: Vec<_> = schema.keys().collect();
                CoreError::Config(format!(
                    "unknown setting '{key}' (expected one of: {})",
                    known.join(", ")
                ))
            })?;
            field
                .check(&value)
                .map_err(|reason| CoreError::Config(format!("{key}: {reason}")))?;
            debug!("Config override {key} = {value}");
            values.insert(key, value);
        }

        // Defaults are trusted, but a required field must still hold a valid value.
        for (key, field) in schema.iter().filter(|(_, f)| f.required) {
            if let Some(value) = values.get(key) {
                field
                    .check(value)
                    .map_err(|reason| CoreError::Config(format!("{key}: {reason}")))?;
            }
        }

        Ok(Self { values })
    }

    /// Parses a flat JSON object of overrides, e.g. `{"slowDownPercent": 0.25}`.
    pub fn overrides_from_json_str(json: &str) -> CoreResult<Vec<(String, ConfigValue)>> {
        let map: BTreeMap<String, ConfigValue> = serde_json::from_str(json)?;
        Ok(map.into_iter().collect())
    }

    /// Reads overrides from a JSON file.
    pub fn overrides_from_json_file(path: &Path) -> CoreResult<Vec<(String, ConfigValue)>> {
        let contents = fs::read_to_string(path).map_err(|e| {
            CoreError::Config(format!(
                "failed to read config file '{}': {e}",
                path.display()
            ))
        })?;
        Self::overrides_from_json_str(&contents)
    }

    /// Builds a store directly from values, without schema checks.
    ///
    /// Hosts that enforce the schema themselves hand their values over this way.
    #[must_use]
    pub fn from_values(values: impl IntoIterator<Item = (String, ConfigValue)>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.values.get(key)
    }

    /// Reads a number setting.
    pub fn number(&self, key: &str) -> CoreResult<f64> {
        match self.values.get(key) {
            Some(value) => value
                .as_number()
                .ok_or_else(|| CoreError::Config(format!("{key}: expected a number, got {value}"))),
            None => Err(CoreError::Config(format!("missing setting '{key}'"))),
        }
    }

    /// Reads a boolean setting.
    pub fn boolean(&self, key: &str) -> CoreResult<bool> {
        match self.values.get(key) {
            Some(value) => value
                .as_bool()
                .ok_or_else(|| CoreError::Config(format!("{key}: expected a boolean, got {value}"))),
            None => Err(CoreError::Config(format!("missing setting '{key}'"))),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}
