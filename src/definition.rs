//! Option definitions and the attribute schema they are checked against
//!
//! A definition is the mapping declared under
//! `layout_option_definitions.<optionId>` after any rule overrides have
//! been merged in. Accessors are lenient: a missing or mistyped attribute
//! reads as its neutral value and is reported by [`AttributeSchema::validate`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::value::{is_empty_value, value_to_string};

/// One option definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionDefinition(Map<String, Value>);

impl OptionDefinition {
    pub fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Non-mapping values read as an empty definition.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Attribute value; a present null counts as unset.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    pub fn is_set(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn title(&self) -> String {
        self.get("title").map(value_to_string).unwrap_or_default()
    }

    pub fn description(&self) -> String {
        self.get("description").map(value_to_string).unwrap_or_default()
    }

    pub fn plugin_id(&self) -> Option<&str> {
        self.get("plugin").and_then(Value::as_str).filter(|s| !s.is_empty())
    }

    /// Declared default, or `""` when none.
    pub fn default_value(&self) -> Value {
        self.get("default")
            .cloned()
            .unwrap_or_else(|| Value::String(String::new()))
    }

    /// Truthiness of a flag attribute; missing is false.
    pub fn flag(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| !is_empty_value(v))
    }

    /// Whether the option applies to the layout as a whole.
    pub fn layout(&self) -> bool {
        self.flag("layout")
    }

    /// Whether the option applies to individual regions.
    pub fn regions(&self) -> bool {
        self.flag("regions")
    }

    pub fn weight(&self) -> Option<i64> {
        self.get("weight").and_then(Value::as_i64)
    }

    /// Region names the option is restricted to, when restricted.
    pub fn allowed_regions(&self) -> Option<Vec<String>> {
        self.get("allowed_regions").map(|v| match v {
            Value::Array(items) => items.iter().map(value_to_string).collect(),
            Value::Object(map) => map.values().map(value_to_string).collect(),
            scalar => vec![value_to_string(scalar)],
        })
    }

    /// Choices as `(value, label)` pairs.
    ///
    /// A mapping is read as value → label; a list uses each entry as both.
    pub fn options(&self) -> Vec<(String, String)> {
        match self.get("options") {
            Some(Value::Object(map)) => map
                .iter()
                .map(|(value, label)| (value.clone(), value_to_string(label)))
                .collect(),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    let value = value_to_string(item);
                    (value.clone(), value)
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl From<Map<String, Value>> for OptionDefinition {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Expected type of a definition attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    String,
    Boolean,
    Integer,
    Array,
    /// Any value; presence is still required unless optional.
    Mixed,
    /// A plugin id; presence is checked by the registry.
    Plugin,
}

impl AttributeType {
    pub fn name(self) -> &'static str {
        match self {
            AttributeType::String => "string",
            AttributeType::Boolean => "boolean",
            AttributeType::Integer => "integer",
            AttributeType::Array => "array",
            AttributeType::Mixed => "mixed",
            AttributeType::Plugin => "plugin",
        }
    }

    fn accepts(self, value: &Value) -> bool {
        match self {
            AttributeType::String => value.is_string(),
            AttributeType::Boolean => value.is_boolean(),
            AttributeType::Integer => value.is_i64() || value.is_u64(),
            AttributeType::Array => value.is_array() || value.is_object(),
            AttributeType::Mixed | AttributeType::Plugin => true,
        }
    }
}

/// Attributes a plugin variant expects its definitions to carry.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSchema {
    attributes: Vec<(String, AttributeType)>,
    optional: Vec<String>,
}

impl AttributeSchema {
    /// Attributes every option plugin understands.
    pub fn base() -> Self {
        Self {
            attributes: vec![
                ("title".to_string(), AttributeType::String),
                ("description".to_string(), AttributeType::String),
                ("plugin".to_string(), AttributeType::Plugin),
                ("default".to_string(), AttributeType::Mixed),
                ("layout".to_string(), AttributeType::Boolean),
                ("regions".to_string(), AttributeType::Boolean),
                ("weight".to_string(), AttributeType::Integer),
                ("allowed_regions".to_string(), AttributeType::Array),
            ],
            optional: vec!["weight".to_string(), "allowed_regions".to_string()],
        }
    }

    /// Add a required attribute.
    pub fn with(mut self, key: &str, ty: AttributeType) -> Self {
        self.attributes.push((key.to_string(), ty));
        self
    }

    /// Add an attribute that may be left out.
    pub fn with_optional(mut self, key: &str, ty: AttributeType) -> Self {
        self.optional.push(key.to_string());
        self.with(key, ty)
    }

    pub fn attribute(&self, key: &str) -> Option<AttributeType> {
        self.attributes
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, ty)| *ty)
    }

    pub fn is_optional(&self, key: &str) -> bool {
        self.optional.iter().any(|k| k == key)
    }

    /// Check `definition`, collecting every violation.
    ///
    /// Returns `None` when the definition is valid, or the problems joined
    /// with `"; "`.
    pub fn validate(&self, definition: &OptionDefinition) -> Option<String> {
        let mut problems = Vec::new();
        for (key, ty) in &self.attributes {
            match definition.get(key) {
                None if self.is_optional(key) => {}
                None => problems.push(format!("Missing the {} attribute", key)),
                Some(value) if !ty.accepts(value) => problems.push(format!(
                    "Attribute {}'s value is not {} type",
                    key,
                    ty.name()
                )),
                Some(_) => {}
            }
        }

        if problems.is_empty() {
            None
        } else {
            Some(problems.join("; "))
        }
    }
}
