//! `class` attribute picked from a drop-down.

use layout_options_host::{FormElement, FormState, RegionContent, RenderTree};
use serde_json::Value;

use super::{process_attribute_option_build, LayoutContext, OptionBase, OptionPlugin};
use crate::definition::{AttributeSchema, AttributeType};
use crate::registry::PluginInfo;

pub struct ClassSelectOption {
    base: OptionBase,
}

impl ClassSelectOption {
    pub const PLUGIN_ID: &'static str = "layout_options_class_select";

    pub fn info() -> PluginInfo {
        PluginInfo::new(
            Self::PLUGIN_ID,
            "Layout Class attribute option (Select)",
            "A layout configuration option that adds an class attributes to layout and/or regions",
            Self::create,
        )
    }

    fn create(base: OptionBase) -> Box<dyn OptionPlugin> {
        Box::new(Self { base })
    }
}

impl OptionPlugin for ClassSelectOption {
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
        self.base.create_select_element(cx, region, form, default)
    }

    fn validate_form_option(&self, cx: &LayoutContext<'_>, _form: &FormElement, state: &mut FormState) {
        let multi = self.definition().flag("multi");
        self.base.validate_css_identifier(cx, state, multi);
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
            .with("multi", AttributeType::Boolean)
            .with("options", AttributeType::Array)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{layout, plugin, TRANSLATOR};
    use super::*;
    use serde_json::json;

    fn definition(multi: bool) -> Value {
        json!({
            "title": "Background color",
            "description": "Background color",
            "plugin": "layout_options_class_select",
            "default": "",
            "layout": true,
            "regions": false,
            "multi": multi,
            "options": {"bg-red": "Red", "bg-blue": "Blue"},
        })
    }

    #[test]
    fn test_requires_multi_and_options() {
        let option = plugin("layout_options_bg", definition(false));
        assert_eq!(option.validate_option_definition(option.definition()), None);

        let mut incomplete = definition(false);
        incomplete.as_object_mut().unwrap().remove("multi");
        let incomplete = crate::definition::OptionDefinition::from_value(incomplete);
        assert_eq!(
            option.validate_option_definition(&incomplete).as_deref(),
            Some("Missing the multi attribute")
        );
    }

    #[test]
    fn test_multi_controls_identifier_check() {
        let layout = layout();
        let cx = LayoutContext::new(&layout, &TRANSLATOR);
        let values = json!({"layout_options_bg": "bg-red bg-blue"});

        let mut single = FormState::with_values(values.clone());
        plugin("layout_options_bg", definition(false)).validate_form_option(&cx, &FormElement::default(), &mut single);
        assert!(single.has_any_errors());

        let mut multi = FormState::with_values(values);
        plugin("layout_options_bg", definition(true)).validate_form_option(&cx, &FormElement::default(), &mut multi);
        assert!(!multi.has_any_errors());
    }
}
