//! Option plugins
//!
//! Each plugin variant owns one option id and takes part in four phases of
//! a layout's life: seeding defaults, building and validating the
//! configuration form, storing submitted values, and rendering. The shared
//! behaviour lives in the default methods of [`OptionPlugin`]; a variant
//! supplies its form widget and its render step.

mod attribute;
mod class_checkboxes;
mod class_radios;
mod class_select;
mod class_string;
mod css;
mod elements;
mod id;

pub use attribute::process_attribute_option_build;
pub use class_checkboxes::ClassCheckboxesOption;
pub use class_radios::ClassRadiosOption;
pub use class_select::ClassSelectOption;
pub use class_string::ClassStringOption;
pub use css::is_valid_css_identifier;
pub use id::IdAttributeOption;

use std::iter;

use layout_options_host::{
    FormElement, FormState, LayoutDefinition, RegionContent, RenderTree, Translator,
    LAYOUT_REGION, LAYOUT_SETTINGS_KEY,
};
use serde_json::Value;

use crate::definition::{AttributeSchema, OptionDefinition};
use crate::layout::LayoutConfiguration;
use crate::registry::PluginInfo;
use crate::value::{is_empty_value, normalized_values};

/// The layout a plugin is working on, and the host services it may use.
#[derive(Clone, Copy)]
pub struct LayoutContext<'a> {
    pub layout: &'a LayoutDefinition,
    pub translator: &'a dyn Translator,
}

impl<'a> LayoutContext<'a> {
    pub fn new(layout: &'a LayoutDefinition, translator: &'a dyn Translator) -> Self {
        Self { layout, translator }
    }

    /// `"layout"` followed by the layout's region names.
    pub fn regions(&self) -> Vec<&'a str> {
        iter::once(LAYOUT_REGION)
            .chain(self.layout.regions.iter().map(|r| r.name.as_str()))
            .collect()
    }

    pub fn translate(&self, source: &str) -> String {
        self.translator.translate(source)
    }
}

/// State every plugin instance carries.
#[derive(Debug, Clone)]
pub struct OptionBase {
    info: PluginInfo,
    option_id: String,
    definition: OptionDefinition,
}

impl OptionBase {
    pub fn new(info: PluginInfo, option_id: impl Into<String>, definition: OptionDefinition) -> Self {
        Self {
            info,
            option_id: option_id.into(),
            definition,
        }
    }

    pub fn info(&self) -> &PluginInfo {
        &self.info
    }

    pub fn option_id(&self) -> &str {
        &self.option_id
    }

    pub fn definition(&self) -> &OptionDefinition {
        &self.definition
    }

    pub fn set_definition(&mut self, definition: OptionDefinition) {
        self.definition = definition;
    }

    /// Whether the option applies to `region`.
    ///
    /// The layout itself is governed by `layout`. Regions need `regions`
    /// and, when `allowed_regions` is set, membership in it.
    pub fn is_allowed(&self, region: &str) -> bool {
        if region == LAYOUT_REGION {
            return self.definition.layout();
        }
        if !self.definition.regions() {
            return false;
        }
        match self.definition.allowed_regions() {
            Some(allowed) => allowed.iter().any(|r| r == region),
            None => true,
        }
    }
}

/// Submitted value for `key` in `region`.
///
/// Values are nested under `layout_settings` when the form is embedded in a
/// larger form, and under the region name for regions.
pub fn form_value(state: &FormState, region: &str, key: &str) -> Option<Value> {
    let mut path = Vec::with_capacity(3);
    if state.has_value(LAYOUT_SETTINGS_KEY) {
        path.push(LAYOUT_SETTINGS_KEY);
    }
    if region != LAYOUT_REGION {
        path.push(region);
    }
    path.push(key);
    state.value_at(&path).cloned()
}

/// Behaviour of one option plugin variant.
pub trait OptionPlugin {
    fn base(&self) -> &OptionBase;

    fn base_mut(&mut self) -> &mut OptionBase;

    /// Add this option's widget for `region` to `form`.
    fn process_form_option(
        &self,
        cx: &LayoutContext<'_>,
        region: &str,
        form: FormElement,
        state: &FormState,
        default: Value,
    ) -> FormElement;

    /// Apply a stored, non-empty `value` for `region` to the render tree.
    fn process_option_build(
        &self,
        regions: &RegionContent,
        build: RenderTree,
        region: &str,
        value: &Value,
    ) -> RenderTree;

    fn plugin_id(&self) -> &str {
        &self.base().info().id
    }

    fn label(&self) -> &str {
        &self.base().info().label
    }

    fn description(&self) -> &str {
        &self.base().info().description
    }

    fn option_id(&self) -> &str {
        self.base().option_id()
    }

    fn definition(&self) -> &OptionDefinition {
        self.base().definition()
    }

    fn set_definition(&mut self, definition: OptionDefinition) {
        self.base_mut().set_definition(definition);
    }

    fn is_allowed(&self, region: &str) -> bool {
        self.base().is_allowed(region)
    }

    /// Seed the declared default into every allowed region.
    fn add_defaults(
        &self,
        cx: &LayoutContext<'_>,
        mut configuration: LayoutConfiguration,
    ) -> LayoutConfiguration {
        let default = self.definition().default_value();
        for region in cx.regions() {
            if self.is_allowed(region) {
                configuration.set(region, self.option_id(), default.clone());
            }
        }
        configuration
    }

    /// Add the widget for `region`, pre-filled from `configuration`.
    fn add_option_form_element(
        &self,
        cx: &LayoutContext<'_>,
        region: &str,
        configuration: &LayoutConfiguration,
        form: FormElement,
        state: &FormState,
    ) -> FormElement {
        if !self.is_allowed(region) {
            return form;
        }
        let default = configuration
            .get(region, self.option_id())
            .cloned()
            .unwrap_or(Value::Null);
        self.process_form_option(cx, region, form, state, default)
    }

    /// Check submitted values, flagging errors on `state`.
    fn validate_form_option(&self, _cx: &LayoutContext<'_>, _form: &FormElement, _state: &mut FormState) {}

    /// Store the normalized submitted value for every allowed region.
    fn submit_form_option(
        &self,
        cx: &LayoutContext<'_>,
        mut configuration: LayoutConfiguration,
        _form: &FormElement,
        state: &FormState,
    ) -> LayoutConfiguration {
        for region in cx.regions() {
            if self.is_allowed(region) {
                let raw = form_value(state, region, self.option_id()).unwrap_or(Value::Null);
                configuration.set(region, self.option_id(), normalized_values(raw));
            }
        }
        configuration
    }

    /// Apply every allowed, non-empty stored value to the render tree.
    fn build_option(
        &self,
        cx: &LayoutContext<'_>,
        configuration: &LayoutConfiguration,
        regions: &RegionContent,
        mut build: RenderTree,
    ) -> RenderTree {
        for region in cx.regions() {
            if !self.is_allowed(region) {
                continue;
            }
            if let Some(value) = configuration.get(region, self.option_id()) {
                if !is_empty_value(value) {
                    build = self.process_option_build(regions, build, region, value);
                }
            }
        }
        build
    }

    /// Attributes this variant expects in its definition.
    fn definition_attributes(&self) -> AttributeSchema {
        AttributeSchema::base()
    }

    /// Problems with `definition`, or `None` when it is valid.
    fn validate_option_definition(&self, definition: &OptionDefinition) -> Option<String> {
        self.definition_attributes().validate(definition)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use layout_options_host::{LayoutDefinition, PassthroughTranslator};
    use serde_json::Value;

    use super::OptionPlugin;
    use crate::definition::OptionDefinition;
    use crate::registry::PluginTable;

    pub static TRANSLATOR: PassthroughTranslator = PassthroughTranslator;

    pub fn layout() -> LayoutDefinition {
        LayoutDefinition::new("layout_twocol", "layout_discovery")
            .with_region("first", "First")
            .with_region("second", "Second")
    }

    pub fn plugin(option_id: &str, definition: Value) -> Box<dyn OptionPlugin> {
        PluginTable::builtin()
            .create(option_id, &OptionDefinition::from_value(definition))
            .unwrap()
    }
}
