//! Effective option resolution
//!
//! Rules are read from the `global`, layout-id, and field-name sections of
//! `layout_options`, each overriding the previous one, and every mentioned
//! option's rule is then deep-merged over its base definition.

use serde_json::{Map, Value};
use tracing::debug;

use crate::config::{deep_merge, merge_maps};
use crate::definition::OptionDefinition;
use crate::schema::{Schema, GLOBAL_RULES};

/// Options that apply to one layout (and optionally one field), in order of
/// first mention.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectiveOptionSet {
    options: Vec<(String, OptionDefinition)>,
}

impl EffectiveOptionSet {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionDefinition)> {
        self.options.iter().map(|(id, def)| (id.as_str(), def))
    }

    pub fn ids(&self) -> Vec<&str> {
        self.options.iter().map(|(id, _)| id.as_str()).collect()
    }

    pub fn get(&self, option_id: &str) -> Option<&OptionDefinition> {
        self.options
            .iter()
            .find(|(id, _)| id == option_id)
            .map(|(_, def)| def)
    }

    pub fn contains(&self, option_id: &str) -> bool {
        self.get(option_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

/// Resolve the options in effect for `layout_id` and `field_name`.
///
/// A rule entry set to null is treated as not mentioned. Rules for ids
/// without a base definition are kept as they are.
pub fn resolve(schema: &Schema, layout_id: Option<&str>, field_name: Option<&str>) -> EffectiveOptionSet {
    let mut rules = section(schema, Some(GLOBAL_RULES));
    for key in [layout_id, field_name] {
        let overrides = section(schema, key);
        if !overrides.is_empty() {
            rules = merge_maps(rules, overrides);
        }
    }

    let options: Vec<(String, OptionDefinition)> = rules
        .into_iter()
        .filter(|(_, rule)| !rule.is_null())
        .map(|(option_id, rule)| {
            let rule = match rule {
                Value::Object(_) => rule,
                _ => Value::Object(Map::new()),
            };
            let merged = match schema.definition(&option_id) {
                Some(base) => deep_merge(base.into_value(), rule),
                None => rule,
            };
            (option_id, OptionDefinition::from_value(merged))
        })
        .collect();

    debug!(
        target: "layout_options",
        layout = layout_id.unwrap_or_default(),
        field = field_name.unwrap_or_default(),
        options = options.len(),
        "Resolved layout options"
    );

    EffectiveOptionSet { options }
}

fn section(schema: &Schema, key: Option<&str>) -> Map<String, Value> {
    key.filter(|k| !k.is_empty())
        .and_then(|k| schema.rule_section(k))
        .cloned()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema(value: Value) -> Schema {
        Schema::from_value(value)
    }

    #[test]
    fn test_precedence_field_over_layout_over_global() {
        let schema = schema(json!({
            "layout_option_definitions": {"A": {"x": 0, "y": 0, "z": 5}},
            "layout_options": {
                "global": {"A": {"x": 1}},
                "L": {"A": {"x": 2, "y": 3}},
                "F": {"A": {"y": 4}},
            }
        }));

        let effective = resolve(&schema, Some("L"), Some("F"));
        assert_eq!(
            effective.get("A").unwrap().as_map(),
            json!({"x": 2, "y": 4, "z": 5}).as_object().unwrap()
        );
    }

    #[test]
    fn test_only_mentioned_options() {
        let schema = schema(json!({
            "layout_option_definitions": {"a": {"title": "A"}, "b": {"title": "B"}},
            "layout_options": {"global": {"a": {}}}
        }));
        assert_eq!(resolve(&schema, None, None).ids(), vec!["a"]);
    }

    #[test]
    fn test_unmatched_sections_are_ignored() {
        let schema = schema(json!({
            "layout_option_definitions": {"a": {"title": "A"}},
            "layout_options": {"global": {"a": {}}, "other_layout": {"a": {"title": "Other"}}}
        }));
        let effective = resolve(&schema, Some("layout_twocol"), Some("field_missing"));
        assert_eq!(effective.get("a").unwrap().title(), "A");
    }

    #[test]
    fn test_order_of_first_mention() {
        let schema = schema(json!({
            "layout_option_definitions": {"a": {}, "b": {}, "c": {}},
            "layout_options": {
                "global": {"b": {}},
                "L": {"c": {}, "b": {"weight": 1}},
                "F": {"a": {}},
            }
        }));
        assert_eq!(resolve(&schema, Some("L"), Some("F")).ids(), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_null_rule_is_not_mentioned() {
        let schema = schema(json!({
            "layout_option_definitions": {"a": {}, "b": {}},
            "layout_options": {"global": {"a": {}, "b": {}}, "L": {"b": null}}
        }));
        assert_eq!(resolve(&schema, Some("L"), None).ids(), vec!["a"]);
    }

    #[test]
    fn test_rule_without_definition_is_kept() {
        let schema = schema(json!({
            "layout_options": {"global": {"ghost": {"title": "Ghost"}}}
        }));
        let effective = resolve(&schema, None, None);
        assert_eq!(effective.get("ghost").unwrap().title(), "Ghost");
        assert_eq!(effective.get("ghost").unwrap().plugin_id(), None);
    }

    #[test]
    fn test_scalar_rule_mentions_without_overrides() {
        let schema = schema(json!({
            "layout_option_definitions": {"a": {"title": "A"}},
            "layout_options": {"global": {"a": true}}
        }));
        assert_eq!(resolve(&schema, None, None).get("a").unwrap().title(), "A");
    }

    #[test]
    fn test_lists_in_rules_replace() {
        let schema = schema(json!({
            "layout_option_definitions": {"a": {"allowed_regions": ["first", "second"]}},
            "layout_options": {"global": {"a": {"allowed_regions": ["second"]}}}
        }));
        let effective = resolve(&schema, None, None);
        assert_eq!(
            effective.get("a").unwrap().allowed_regions(),
            Some(vec!["second".to_string()])
        );
    }

    #[test]
    fn test_resolution_is_pure() {
        let schema = schema(json!({
            "layout_option_definitions": {"a": {"title": "A"}},
            "layout_options": {"global": {"a": {"title": "Changed"}}}
        }));
        let before = schema.clone();
        let first = resolve(&schema, None, None);
        let second = resolve(&schema, None, None);
        assert_eq!(first, second);
        assert_eq!(schema, before);
    }

    #[test]
    fn test_empty_schema() {
        assert!(resolve(&Schema::new(), Some("L"), Some("F")).is_empty());
    }
}
