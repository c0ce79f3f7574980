//! Layout option declarations
//!
//! - `extension`: installed modules and themes, and the order they provide
//!   declarations in
//! - `discovery`: finding and parsing `<provider>.layout_options.yml`
//! - `loader`: merging every source into one cached [`Schema`]

mod discovery;
mod extension;
mod loader;

pub use discovery::{
    Declaration, DeclarationDiscovery, DeclarationSource, DiscoveryError, StaticDiscovery,
    YamlDiscovery, DECLARATION_NAME,
};
pub use extension::{Extension, ExtensionKind, ExtensionList};
pub use loader::{SchemaLoader, LOAD_ERROR_MESSAGE};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::deep_merge;
use crate::definition::OptionDefinition;

/// Top-level key holding option definitions.
pub const DEFINITIONS_KEY: &str = "layout_option_definitions";

/// Top-level key holding option rules.
pub const RULES_KEY: &str = "layout_options";

/// Rule section that applies to every layout.
pub const GLOBAL_RULES: &str = "global";

/// The merged declaration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema(Map<String, Value>);

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Non-mapping values read as an empty schema.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }

    /// Deep merge `document` over this schema.
    pub fn merge(self, document: Value) -> Self {
        Self::from_value(deep_merge(Value::Object(self.0), document))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    fn section(&self, key: &str) -> Option<&Map<String, Value>> {
        self.0.get(key).and_then(Value::as_object)
    }

    /// Raw definition entries, in declaration order.
    pub fn definition_entries(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.section(DEFINITIONS_KEY)
            .into_iter()
            .flat_map(|m| m.iter().map(|(k, v)| (k.as_str(), v)))
    }

    /// Every base definition, in declaration order.
    pub fn definitions(&self) -> Vec<(String, OptionDefinition)> {
        self.definition_entries()
            .map(|(id, v)| (id.to_string(), OptionDefinition::from_value(v.clone())))
            .collect()
    }

    /// Base definition of one option.
    pub fn definition(&self, option_id: &str) -> Option<OptionDefinition> {
        self.section(DEFINITIONS_KEY)
            .and_then(|m| m.get(option_id))
            .map(|v| OptionDefinition::from_value(v.clone()))
    }

    /// Every rule section keyed by `global`, layout id, or field name.
    pub fn rules(&self) -> Map<String, Value> {
        self.section(RULES_KEY).cloned().unwrap_or_default()
    }

    /// One rule section, when present and a mapping.
    pub fn rule_section(&self, key: &str) -> Option<&Map<String, Value>> {
        self.section(RULES_KEY)
            .and_then(|m| m.get(key))
            .and_then(Value::as_object)
    }
}
