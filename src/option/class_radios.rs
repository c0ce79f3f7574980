//! `class` attribute from a group of radio buttons.

use layout_options_host::{FormElement, FormState, RegionContent, RenderTree};
use serde_json::Value;

use super::{process_attribute_option_build, LayoutContext, OptionBase, OptionPlugin};
use crate::definition::{AttributeSchema, AttributeType};
use crate::registry::PluginInfo;

pub struct ClassRadiosOption {
    base: OptionBase,
}

impl ClassRadiosOption {
    pub const PLUGIN_ID: &'static str = "layout_options_class_radios";

    pub fn info() -> PluginInfo {
        PluginInfo::new(
            Self::PLUGIN_ID,
            "Layout Class attribute option (Radio buttons)",
            "A layout configuration option that adds an class attributes to layout and/or regions",
            Self::create,
        )
    }

    fn create(base: OptionBase) -> Box<dyn OptionPlugin> {
        Box::new(Self { base })
    }
}

impl OptionPlugin for ClassRadiosOption {
    fn base(&self) -> &OptionBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut OptionBase {
        &mut self.base
    }

    fn process_form_option(
        &self,
        cx: &LayoutContext<'_>,
        region: &str,
        form: FormElement,
        _state: &FormState,
        default: Value,
    ) -> FormElement {
        self.base.create_radios_element(cx, region, form, default)
    }

    fn validate_form_option(&self, cx: &LayoutContext<'_>, _form: &FormElement, state: &mut FormState) {
        self.base.validate_css_identifier(cx, state, true);
    }

    fn process_option_build(
        &self,
        regions: &RegionContent,
        build: RenderTree,
        region: &str,
        value: &Value,
    ) -> RenderTree {
        process_attribute_option_build("class", regions, build, region, value)
    }

    fn definition_attributes(&self) -> AttributeSchema {
        AttributeSchema::base()
            .with("options", AttributeType::Array)
            .with_optional("inline", AttributeType::Boolean)
    }
}
