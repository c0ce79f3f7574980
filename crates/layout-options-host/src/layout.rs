//! Layout definitions and the host's base layout behaviour.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::form::FormState;
use crate::render::{RegionContent, RenderElement, RenderTree};

/// A named placement slot within a layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionInfo {
    pub name: String,
    pub label: String,
}

/// Which implementation renders a layout template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutImplementation {
    /// The host's stock layout implementation.
    HostDefault,
    /// The layout options orchestrator.
    LayoutOptions,
    /// Any other implementation, by name.
    Custom(String),
}

/// A layout template: an id, its provider, and an ordered set of regions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutDefinition {
    pub id: String,
    pub provider: String,

    #[serde(default)]
    pub label: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_hook: Option<String>,

    #[serde(default = "default_implementation")]
    pub implementation: LayoutImplementation,

    #[serde(default)]
    pub regions: Vec<RegionInfo>,
}

fn default_implementation() -> LayoutImplementation {
    LayoutImplementation::HostDefault
}

impl LayoutDefinition {
    pub fn new(id: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            provider: provider.into(),
            label: String::new(),
            theme_hook: None,
            implementation: LayoutImplementation::HostDefault,
            regions: Vec::new(),
        }
    }

    /// Builder-style region declaration.
    pub fn with_region(mut self, name: impl Into<String>, label: impl Into<String>) -> Self {
        self.regions.push(RegionInfo {
            name: name.into(),
            label: label.into(),
        });
        self
    }

    pub fn with_implementation(mut self, implementation: LayoutImplementation) -> Self {
        self.implementation = implementation;
        self
    }

    /// Region names in declaration order.
    pub fn region_names(&self) -> Vec<&str> {
        self.regions.iter().map(|r| r.name.as_str()).collect()
    }

    pub fn has_region(&self, name: &str) -> bool {
        self.regions.iter().any(|r| r.name == name)
    }
}

/// Behaviour of the host's base layout that the orchestrator extends.
pub trait BaseLayout {
    /// Configuration every layout instance starts with.
    fn default_configuration(&self) -> Map<String, Value> {
        let mut configuration = Map::new();
        configuration.insert("label".to_string(), Value::String(String::new()));
        configuration
    }

    /// Render regions into a tree carrying the configuration as settings.
    fn build(
        &self,
        layout: &LayoutDefinition,
        regions: &RegionContent,
        configuration: &Map<String, Value>,
    ) -> RenderTree {
        let mut tree = RenderTree {
            layout_id: layout.id.clone(),
            theme_hook: layout.theme_hook.clone(),
            settings: Value::Object(configuration.clone()),
            ..Default::default()
        };
        for (name, content) in regions {
            tree.regions.insert(
                name.clone(),
                RenderElement {
                    content: content.clone(),
                    ..Default::default()
                },
            );
        }
        tree
    }

    /// Apply the base layout's own submitted values.
    fn submit_configuration(
        &self,
        mut configuration: Map<String, Value>,
        state: &FormState,
    ) -> Map<String, Value> {
        let label = state.value("label").cloned().unwrap_or(Value::Null);
        configuration.insert("label".to_string(), label);
        configuration
    }
}

/// The stock base layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultLayout;

impl BaseLayout for DefaultLayout {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn two_col() -> LayoutDefinition {
        LayoutDefinition::new("two_col", "layout_discovery")
            .with_region("left", "Left")
            .with_region("right", "Right")
    }

    #[test]
    fn test_region_names_in_order() {
        assert_eq!(two_col().region_names(), vec!["left", "right"]);
        assert!(two_col().has_region("right"));
        assert!(!two_col().has_region("layout"));
    }

    #[test]
    fn test_default_configuration_has_label() {
        let configuration = DefaultLayout.default_configuration();
        assert_eq!(configuration.get("label"), Some(&json!("")));
    }

    #[test]
    fn test_build_copies_regions_and_settings() {
        let mut regions = RegionContent::new();
        regions.insert("left".to_string(), json!({"markup": "<p>Left</p>"}));
        let mut configuration = Map::new();
        configuration.insert("css_id".to_string(), json!("main"));

        let tree = DefaultLayout.build(&two_col(), &regions, &configuration);

        assert_eq!(tree.layout_id, "two_col");
        assert_eq!(tree.settings["css_id"], "main");
        assert!(tree.region("left").is_some());
        assert!(tree.region("right").is_none());
    }

    #[test]
    fn test_submit_copies_label() {
        let state = FormState::with_values(json!({"label": "Hero"}));
        let configuration = DefaultLayout.submit_configuration(Map::new(), &state);
        assert_eq!(configuration["label"], "Hero");

        let configuration = DefaultLayout.submit_configuration(Map::new(), &FormState::new());
        assert!(configuration["label"].is_null());
    }
}
