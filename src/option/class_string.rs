//! Free-text `class` attribute.

use layout_options_host::{FormElement, FormState, RegionContent, RenderTree};
use serde_json::Value;

use super::{process_attribute_option_build, LayoutContext, OptionBase, OptionPlugin};
use crate::registry::PluginInfo;

/// Text field holding whitespace-separated classes.
pub struct ClassStringOption {
    base: OptionBase,
}

impl ClassStringOption {
    pub const PLUGIN_ID: &'static str = "layout_options_class_string";

    pub fn info() -> PluginInfo {
        PluginInfo::new(
            Self::PLUGIN_ID,
            "Layout Class attribute option (String)",
            "A layout configuration option that adds an class attributes to layout and/or regions",
            Self::create,
        )
    }

    fn create(base: OptionBase) -> Box<dyn OptionPlugin> {
        Box::new(Self { base })
    }
}

impl OptionPlugin for ClassStringOption {
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
}
