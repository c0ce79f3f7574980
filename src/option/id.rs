//! `id` attribute on the layout and regions.

use layout_options_host::{FormElement, FormState, RegionContent, RenderTree};
use serde_json::Value;

use super::{process_attribute_option_build, LayoutContext, OptionBase, OptionPlugin};
use crate::registry::PluginInfo;

/// Text field whose value becomes the element's `id`.
pub struct IdAttributeOption {
    base: OptionBase,
}

impl IdAttributeOption {
    pub const PLUGIN_ID: &'static str = "layout_options_id";

    pub fn info() -> PluginInfo {
        PluginInfo::new(
            Self::PLUGIN_ID,
            "Layout Id Attribute option",
            "A layout configuration option that adds an id attributes to layout and/or regions",
            Self::create,
        )
    }

    fn create(base: OptionBase) -> Box<dyn OptionPlugin> {
        Box::new(Self { base })
    }
}

impl OptionPlugin for IdAttributeOption {
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
        self.base.create_text_element(cx, region, form, default)
    }

    fn validate_form_option(&self, cx: &LayoutContext<'_>, _form: &FormElement, state: &mut FormState) {
        self.base.validate_css_identifier(cx, state, false);
    }

    fn process_option_build(
        &self,
        regions: &RegionContent,
        build: RenderTree,
        region: &str,
        value: &Value,
    ) -> RenderTree {
        process_attribute_option_build("id", regions, build, region, value)
    }
}
