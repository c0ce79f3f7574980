//! Layout instance configuration

use layout_options_host::LAYOUT_REGION;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key holding the entity field a layout is embedded in.
pub const FIELD_NAME_KEY: &str = "field_name";

/// Persisted configuration of one layout instance.
///
/// Layout-level option values are stored at the top level; region values
/// under the region name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayoutConfiguration(Map<String, Value>);

impl LayoutConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Stored value of `option_id` for `region`.
    pub fn get(&self, region: &str, option_id: &str) -> Option<&Value> {
        if region == LAYOUT_REGION {
            self.0.get(option_id)
        } else {
            self.0.get(region).and_then(|r| r.get(option_id))
        }
    }

    /// Store `value` for `option_id` in `region`.
    pub fn set(&mut self, region: &str, option_id: &str, value: Value) {
        if region == LAYOUT_REGION {
            self.0.insert(option_id.to_string(), value);
            return;
        }

        let entry = self
            .0
            .entry(region.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        if let Value::Object(values) = entry {
            values.insert(option_id.to_string(), value);
        }
    }

    pub fn with(mut self, region: &str, option_id: &str, value: Value) -> Self {
        self.set(region, option_id, value);
        self
    }

    pub fn field_name(&self) -> Option<&str> {
        self.0
            .get(FIELD_NAME_KEY)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn set_field_name(&mut self, field_name: &str) {
        self.0
            .insert(FIELD_NAME_KEY.to_string(), Value::String(field_name.to_string()));
    }

    pub fn label(&self) -> Option<&str> {
        self.0.get("label").and_then(Value::as_str)
    }
}

impl From<Map<String, Value>> for LayoutConfiguration {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
