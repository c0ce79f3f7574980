//! Form widgets built from an option definition.
//!
//! Layout-level widgets go at the top of the form under the option id;
//! region widgets go under the region's container.

use layout_options_host::{ElementKind, FormElement, SelectOption, LAYOUT_REGION};
use serde_json::Value;

use super::{LayoutContext, OptionBase};
use crate::value::is_empty_value;

const INLINE_CLASS: &str = "container-inline";

impl OptionBase {
    /// Single-line text input.
    pub fn create_text_element(
        &self,
        cx: &LayoutContext<'_>,
        region: &str,
        form: FormElement,
        default: Value,
    ) -> FormElement {
        let mut element = self.element(cx, ElementKind::Textfield);
        element.default_value = Some(if is_empty_value(&default) {
            Value::String(String::new())
        } else {
            default
        });
        self.place(region, form, element)
    }

    /// Drop-down with a "- None -" choice, multi-select when `multi` is set.
    pub fn create_select_element(
        &self,
        cx: &LayoutContext<'_>,
        region: &str,
        form: FormElement,
        default: Value,
    ) -> FormElement {
        let mut element = self.element(cx, ElementKind::Select);
        element.options = self.translated_options(cx);
        element.empty_option = Some(cx.translate("- None -"));
        element.empty_value = Some(String::new());
        element.default_value = Some(default);
        element.multiple = self.definition().flag("multi");
        self.place(region, form, element)
    }

    pub fn create_checkbox_element(
        &self,
        cx: &LayoutContext<'_>,
        region: &str,
        form: FormElement,
        default: Value,
    ) -> FormElement {
        let element = self.choice_element(cx, ElementKind::Checkboxes, default);
        self.place(region, form, element)
    }

    pub fn create_radios_element(
        &self,
        cx: &LayoutContext<'_>,
        region: &str,
        form: FormElement,
        default: Value,
    ) -> FormElement {
        let element = self.choice_element(cx, ElementKind::Radios, default);
        self.place(region, form, element)
    }

    /// Choices with their labels translated.
    pub fn translated_options(&self, cx: &LayoutContext<'_>) -> Vec<SelectOption> {
        self.definition()
            .options()
            .into_iter()
            .map(|(value, label)| SelectOption::new(value, cx.translate(&label)))
            .collect()
    }

    fn choice_element(&self, cx: &LayoutContext<'_>, kind: ElementKind, default: Value) -> FormElement {
        let mut element = self.element(cx, kind);
        element.options = self.translated_options(cx);
        element.default_value = Some(default);
        if self.definition().flag("inline") {
            element.attributes.push("class", INLINE_CLASS);
        }
        element
    }

    fn element(&self, cx: &LayoutContext<'_>, kind: ElementKind) -> FormElement {
        let definition = self.definition();
        let title = definition.title();
        let description = definition.description();
        FormElement {
            title: (!title.is_empty()).then(|| cx.translate(&title)),
            description: (!description.is_empty()).then(|| cx.translate(&description)),
            weight: definition.weight(),
            ..FormElement::new(kind)
        }
    }

    fn place(&self, region: &str, mut form: FormElement, element: FormElement) -> FormElement {
        if region == LAYOUT_REGION {
            form.insert(self.option_id(), element);
        } else {
            form.children
                .entry(region.to_string())
                .or_default()
                .insert(self.option_id(), element);
        }
        form
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{layout, plugin, TRANSLATOR};
    use super::*;
    use layout_options_host::CatalogTranslator;
    use serde_json::json;

    fn select_definition() -> Value {
        json!({
            "title": "Background color",
            "description": "Pick one",
            "plugin": "layout_options_class_select",
            "default": "",
            "layout": true,
            "regions": true,
            "multi": false,
            "weight": 3,
            "options": {"bg-red": "Red", "bg-blue": "Blue"},
        })
    }

    #[test]
    fn test_text_element_at_top_level() {
        let layout = layout();
        let cx = LayoutContext::new(&layout, &TRANSLATOR);
        let option = plugin(
            "layout_options_id",
            json!({"title": "Layout Id", "plugin": "layout_options_id", "layout": true}),
        );

        let form = option.base().create_text_element(&cx, "layout", FormElement::default(), Value::Null);
        let element = form.child("layout_options_id").unwrap();
        assert_eq!(element.kind, Some(ElementKind::Textfield));
        assert_eq!(element.title.as_deref(), Some("Layout Id"));
        assert_eq!(element.description, None);
        assert_eq!(element.default_value, Some(json!("")));
    }

    #[test]
    fn test_select_element_in_region() {
        let layout = layout();
        let translator = CatalogTranslator::new()
            .with_entry("Red", "Rouge")
            .with_entry("- None -", "- Aucun -");
        let cx = LayoutContext::new(&layout, &translator);
        let option = plugin("layout_options_bg", select_definition());

        let mut form = FormElement::default();
        form.insert("first", FormElement::details("First region"));
        let form = option.base().create_select_element(&cx, "first", form, json!("bg-blue"));

        let element = form.get_path(&["first", "layout_options_bg"]).unwrap();
        assert_eq!(element.kind, Some(ElementKind::Select));
        assert_eq!(
            element.options,
            vec![SelectOption::new("bg-red", "Rouge"), SelectOption::new("bg-blue", "Blue")]
        );
        assert_eq!(element.empty_option.as_deref(), Some("- Aucun -"));
        assert_eq!(element.empty_value.as_deref(), Some(""));
        assert_eq!(element.default_value, Some(json!("bg-blue")));
        assert_eq!(element.weight, Some(3));
        assert!(!element.multiple);
        assert_eq!(form.child("first").unwrap().title.as_deref(), Some("First region"));
    }

    #[test]
    fn test_inline_checkboxes() {
        let layout = layout();
        let cx = LayoutContext::new(&layout, &TRANSLATOR);
        let option = plugin(
            "layout_options_flags",
            json!({
                "title": "Flags",
                "plugin": "layout_options_class_checkboxes",
                "layout": true,
                "inline": true,
                "options": ["wide", "dark"],
            }),
        );

        let form = option
            .base()
            .create_checkbox_element(&cx, "layout", FormElement::default(), json!(["wide"]));
        let element = form.child("layout_options_flags").unwrap();
        assert_eq!(element.kind, Some(ElementKind::Checkboxes));
        assert_eq!(element.attributes.get("class"), Some(&["container-inline".to_string()][..]));
        assert_eq!(element.options.len(), 2);
    }

    #[test]
    fn test_radios_without_inline() {
        let layout = layout();
        let cx = LayoutContext::new(&layout, &TRANSLATOR);
        let option = plugin(
            "layout_options_width",
            json!({
                "title": "Width",
                "plugin": "layout_options_class_radios",
                "regions": true,
                "options": {"narrow": "Narrow"},
            }),
        );

        let form = option
            .base()
            .create_radios_element(&cx, "second", FormElement::default(), json!("narrow"));
        let element = form.get_path(&["second", "layout_options_width"]).unwrap();
        assert_eq!(element.kind, Some(ElementKind::Radios));
        assert!(element.attributes.is_empty());
    }
}
