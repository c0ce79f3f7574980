//! Defaults, configuration form, submission, and render of a fixture layout.

mod fixtures;

use std::rc::Rc;

use fixtures::{layout_onecol, layout_twocol, site_layout};
use layout_options::schema::StaticDiscovery;
use layout_options::{LayoutConfiguration, LayoutOptions, LayoutServices, Schema};
use layout_options_host::{
    ElementKind, FormElement, FormState, LayoutDefinition, MemoryMessenger, MessageType,
    RegionContent,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

const ID: &str = "layout_options_id";
const CLASSES: &str = "layout_options_classes";
const BG: &str = "layout_options_bg_color";
const WIDTH: &str = "layout_options_width";
const FLAGS: &str = "layout_options_flags";

fn landing_state(values: Value) -> FormState {
    FormState::with_values(values).embedded_in_entity_form(vec![
        "field_landing_layout".to_string(),
        "widget".to_string(),
    ])
}

#[test]
fn test_default_configuration() {
    let (mut layout, messenger) = site_layout(layout_twocol());
    let configuration = layout.default_configuration();

    assert_eq!(configuration.label(), Some(""));
    assert_eq!(configuration.get("layout", ID), Some(&json!("")));
    assert_eq!(configuration.get("first", ID), None);
    assert_eq!(configuration.get("second", ID), Some(&json!("")));

    assert_eq!(configuration.get("layout", WIDTH), None);
    assert_eq!(configuration.get("first", WIDTH), Some(&json!("width-normal")));
    assert_eq!(configuration.get("second", WIDTH), None);

    for region in ["layout", "first", "second"] {
        assert_eq!(configuration.get(region, CLASSES), Some(&json!("")));
        assert_eq!(configuration.get(region, BG), Some(&json!("")));
        assert_eq!(configuration.get(region, FLAGS), None);
    }
    assert!(messenger.is_empty());
}

#[test]
fn test_set_configuration_fills_in_defaults() {
    let (mut layout, _) = site_layout(layout_twocol());
    layout.set_configuration(LayoutConfiguration::new().with("first", BG, json!("bg-dark")));

    let configuration = layout.configuration();
    assert_eq!(configuration.get("first", BG), Some(&json!("bg-dark")));
    assert_eq!(configuration.get("first", WIDTH), Some(&json!("width-normal")));
    assert_eq!(configuration.label(), Some(""));
}

#[test]
fn test_configuration_form() {
    let (mut layout, messenger) = site_layout(layout_twocol());
    layout.set_configuration(LayoutConfiguration::new());
    let form = layout.build_configuration_form(FormElement::default(), &FormState::new());

    assert_eq!(form.keys(), vec!["first", BG, CLASSES, ID, "second"]);
    assert!(form.child("field_name").is_none());

    let first = form.child("first").unwrap();
    assert_eq!(first.kind, Some(ElementKind::Details));
    assert_eq!(first.title.as_deref(), Some("First region"));
    assert_eq!(first.keys(), vec![BG, CLASSES, WIDTH]);
    assert_eq!(form.child("second").unwrap().keys(), vec![BG, CLASSES, ID]);

    let width = first.child(WIDTH).unwrap();
    assert_eq!(width.kind, Some(ElementKind::Radios));
    assert_eq!(width.default_value, Some(json!("width-normal")));
    assert_eq!(width.attributes.get("class").unwrap(), &["container-inline".to_string()][..]);
    // Empty descriptions are left out.
    assert_eq!(width.description, None);

    let bg = form.child(BG).unwrap();
    assert_eq!(bg.kind, Some(ElementKind::Select));
    assert_eq!(bg.title.as_deref(), Some("Theme background"));
    assert_eq!(bg.weight, Some(20));
    assert_eq!(bg.empty_option.as_deref(), Some("- None -"));
    assert!(!bg.multiple);
    let values: Vec<&str> = bg.options.iter().map(|o| o.value.as_str()).collect();
    assert_eq!(values, vec!["bg-white", "bg-dark", "bg-primary"]);

    let id = form.child(ID).unwrap();
    assert_eq!(id.kind, Some(ElementKind::Textfield));
    assert_eq!(id.default_value, Some(json!("")));
    assert!(messenger.is_empty());
}

#[test]
fn test_entity_form_adds_field_options() {
    let (mut layout, _) = site_layout(layout_twocol());
    let form = layout.build_configuration_form(FormElement::default(), &landing_state(json!({})));

    let field_name = form.child("field_name").unwrap();
    assert_eq!(field_name.kind, Some(ElementKind::Value));
    assert_eq!(field_name.value, Some(json!("field_landing_layout")));

    let flags = form.child(FLAGS).unwrap();
    assert_eq!(flags.kind, Some(ElementKind::Checkboxes));
    assert!(flags.attributes.is_empty());

    // Classes are restricted to the layout for this field.
    assert!(form.child(CLASSES).is_some());
    assert_eq!(form.get_path(&["first", CLASSES]), None);
    assert_eq!(form.child("first").unwrap().keys(), vec![BG, WIDTH]);
}

#[test]
fn test_validate_configuration_form() {
    let (mut layout, _) = site_layout(layout_twocol());
    let form = FormElement::default();
    let mut state = FormState::with_values(json!({
        ID: "two words",
        CLASSES: "one  two",
        BG: "b@d",
        "first": {WIDTH: "width-narrow"},
        "second": {ID: "fine"},
    }));

    layout.validate_configuration_form(&form, &mut state);

    assert_eq!(state.error(ID), Some("Invalid CSS identifier."));
    assert_eq!(state.error(BG), Some("Invalid CSS identifier."));
    assert_eq!(state.error(CLASSES), None);
    assert_eq!(state.error(WIDTH), None);
}

#[test]
fn test_validate_uses_field_rules() {
    let (mut layout, _) = site_layout(layout_twocol());
    let mut state = FormState::with_values(json!({
        "field_name": "field_landing_layout",
        FLAGS: ["is boxed!"],
    }));
    layout.validate_configuration_form(&FormElement::default(), &mut state);
    assert_eq!(state.error(FLAGS), Some("Invalid CSS identifier."));

    let (mut layout, _) = site_layout(layout_twocol());
    let mut state = FormState::with_values(json!({FLAGS: ["is boxed!"]}));
    layout.validate_configuration_form(&FormElement::default(), &mut state);
    assert!(!state.has_any_errors());
}

fn submitted() -> FormState {
    FormState::with_values(json!({
        "label": "Landing",
        "field_name": "field_landing_layout",
        "layout_settings": {
            ID: "<main>",
            CLASSES: "a b",
            BG: "bg-dark",
            FLAGS: {"is-boxed": "is-boxed", "is-sticky": 0},
            "first": {WIDTH: "width-narrow", BG: ""},
            "second": {ID: "side"},
        },
    }))
}

#[test]
fn test_submit_configuration_form() {
    let (mut layout, _) = site_layout(layout_twocol());
    layout.submit_configuration_form(&FormElement::default(), &submitted());

    let configuration = layout.configuration();
    assert_eq!(configuration.label(), Some("Landing"));
    assert_eq!(configuration.field_name(), Some("field_landing_layout"));
    assert_eq!(configuration.get("layout", ID), Some(&json!("&lt;main&gt;")));
    assert_eq!(configuration.get("second", ID), Some(&json!("side")));
    assert_eq!(configuration.get("layout", CLASSES), Some(&json!("a b")));
    assert_eq!(configuration.get("first", CLASSES), None);
    assert_eq!(configuration.get("layout", FLAGS), Some(&json!(["is-boxed"])));
    assert_eq!(configuration.get("first", WIDTH), Some(&json!("width-narrow")));
    assert_eq!(configuration.get("first", BG), Some(&json!("")));
    assert_eq!(configuration.get("second", BG), Some(&Value::Null));
}

#[test]
fn test_build_applies_stored_values() {
    let (mut layout, _) = site_layout(layout_twocol());
    layout.submit_configuration_form(&FormElement::default(), &submitted());

    let mut regions = RegionContent::new();
    regions.insert("first".to_string(), json!({"markup": "Main"}));
    regions.insert("second".to_string(), json!({"markup": "Aside"}));
    let build = layout.build(&regions);

    assert_eq!(build.layout_id, "layout_twocol");
    assert_eq!(build.attributes.get("id").unwrap(), &["&lt;main&gt;".to_string()][..]);
    assert_eq!(
        build.attributes.get("class").unwrap(),
        &["a b", "bg-dark", "is-boxed"].map(String::from)[..]
    );

    let first = build.region("first").unwrap();
    assert_eq!(first.content, json!({"markup": "Main"}));
    assert_eq!(first.attributes.get("class").unwrap(), &["width-narrow".to_string()][..]);
    assert_eq!(first.attributes.get("id"), None);

    let second = build.region("second").unwrap();
    assert_eq!(second.attributes.get("id").unwrap(), &["side".to_string()][..]);
    assert_eq!(second.attributes.get("class"), None);
}

#[test]
fn test_build_skips_missing_regions() {
    let (mut layout, _) = site_layout(layout_twocol());
    layout.submit_configuration_form(&FormElement::default(), &submitted());

    let mut regions = RegionContent::new();
    regions.insert("first".to_string(), json!({"markup": "Main"}));
    let build = layout.build(&regions);

    assert!(build.region("second").is_none());
    assert_eq!(build.attributes.get("id").unwrap().len(), 1);
}

#[test]
fn test_onecol_without_region_options() {
    let (mut layout, _) = site_layout(layout_onecol());
    let effective = layout.parse_layout_options(Some("layout_onecol"), None);
    assert_eq!(effective.ids(), vec![ID]);

    let form = layout.build_configuration_form(FormElement::default(), &FormState::new());
    assert_eq!(form.keys(), vec!["content", ID]);
    assert_eq!(form.child("content").unwrap().keys(), vec![ID]);
}

fn static_layout(document: Value, definition: LayoutDefinition) -> (LayoutOptions, Rc<MemoryMessenger>) {
    let messenger = Rc::new(MemoryMessenger::new());
    let layout = LayoutOptions::new(
        definition,
        Box::new(StaticDiscovery::new().with_document("demo_module", document)),
        LayoutServices::new(messenger.clone()),
    );
    (layout, messenger)
}

#[test]
fn test_region_without_widgets_is_removed() {
    let (mut layout, _) = static_layout(
        json!({
            "layout_option_definitions": {
                "wrapper_id": {
                    "title": "Wrapper id",
                    "description": "",
                    "plugin": "id",
                    "default": "",
                    "layout": true,
                    "regions": false,
                },
            },
            "layout_options": {"global": {"wrapper_id": {}}},
        }),
        LayoutDefinition::new("demo", "demo_module").with_region("left", "Left"),
    );

    let form = layout.build_configuration_form(FormElement::default(), &FormState::new());
    assert_eq!(form.keys(), vec!["wrapper_id"]);
}

#[test]
fn test_definitions_are_validated_once_after_load() {
    let (mut layout, messenger) = static_layout(
        json!({
            "layout_option_definitions": {
                "bad_select": {
                    "title": "Bad select",
                    "description": "",
                    "plugin": "class_select",
                    "default": "",
                    "layout": true,
                    "regions": true,
                },
            },
            "layout_options": {"global": {"bad_select": {}}},
        }),
        LayoutDefinition::new("demo", "demo_module").with_region("left", "Left"),
    );

    layout.parse_layout_options(Some("demo"), None);
    layout.parse_layout_options(Some("demo"), None);
    assert_eq!(
        messenger.messages_by_type(MessageType::Error),
        vec!["Layout option definition, 'bad_select', has these problems: Missing the multi attribute; Missing the options attribute"]
    );
}

#[test]
fn test_validate_definitions_reports_each_problem() {
    let (mut layout, messenger) = static_layout(json!({}), LayoutDefinition::new("demo", "demo_module"));
    let schema = Schema::from_value(json!({
        "layout_option_definitions": {
            "ghost": {"title": "Ghost", "plugin": "nope"},
            "wrong_types": {
                "title": "Wrong types",
                "description": "",
                "plugin": "layout_options_class_string",
                "default": "",
                "layout": "yes",
                "regions": true,
            },
            "fine": {
                "title": "Fine",
                "description": "",
                "plugin": "layout_options_class_string",
                "default": "",
                "layout": true,
                "regions": true,
            },
        },
    }));

    assert!(layout.validate_definitions(&schema));
    assert_eq!(
        messenger.messages_by_type(MessageType::Error),
        vec![
            "Option definition, ghost (Ghost), uses an unknown plugin id 'nope'",
            "Layout option definition, 'wrong_types', has these problems: Attribute layout's value is not boolean type",
        ]
    );

    messenger.drain();
    let valid = Schema::from_value(json!({
        "layout_option_definitions": {"fine": schema.definition("fine").unwrap().into_value()},
    }));
    assert!(!layout.validate_definitions(&valid));
    assert!(messenger.is_empty());
}
