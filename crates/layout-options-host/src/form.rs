//! Form descriptor tree and submitted form state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::render::Attributes;

/// Widget type of a form element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Textfield,
    Select,
    Checkboxes,
    Radios,
    /// Collapsible container.
    Details,
    /// Hidden value carried through submission.
    Value,
}

/// One entry of a select/checkboxes/radios options list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// A node of the form descriptor tree.
///
/// The root of a configuration form is a `FormElement` with no kind; options
/// are children keyed by option id, regions are `Details` children keyed by
/// region name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormElement {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ElementKind>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,

    /// Fixed value for `Value` elements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub empty_option: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub empty_value: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<i64>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub multiple: bool,

    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<bool>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub children: BTreeMap<String, FormElement>,
}

impl FormElement {
    /// Create an element of the given widget type.
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind: Some(kind),
            ..Default::default()
        }
    }

    /// Create a collapsible container with a title.
    pub fn details(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::new(ElementKind::Details)
        }
    }

    /// Create a hidden value element.
    pub fn hidden_value(value: Value) -> Self {
        Self {
            value: Some(value),
            ..Self::new(ElementKind::Value)
        }
    }

    pub fn child(&self, key: &str) -> Option<&FormElement> {
        self.children.get(key)
    }

    pub fn child_mut(&mut self, key: &str) -> Option<&mut FormElement> {
        self.children.get_mut(key)
    }

    /// Insert a child, returning the element previously stored under `key`.
    pub fn insert(&mut self, key: impl Into<String>, element: FormElement) -> Option<FormElement> {
        self.children.insert(key.into(), element)
    }

    pub fn remove(&mut self, key: &str) -> Option<FormElement> {
        self.children.remove(key)
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Child keys in sorted order.
    pub fn keys(&self) -> Vec<&str> {
        self.children.keys().map(String::as_str).collect()
    }

    /// Look up a nested descendant.
    pub fn get_path(&self, path: &[&str]) -> Option<&FormElement> {
        let mut current = self;
        for key in path {
            current = current.children.get(*key)?;
        }
        Some(current)
    }
}

/// Submitted values and validation errors of one form submission.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    values: Map<String, Value>,
    errors: BTreeMap<String, String>,
    entity_form_parents: Option<Vec<String>>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a state from submitted values. Non-object values yield an empty state.
    pub fn with_values(values: Value) -> Self {
        let mut state = Self::new();
        if let Value::Object(map) = values {
            state.values = map;
        }
        state
    }

    /// Mark the form as embedded in an entity form at the given parent path.
    ///
    /// The first parent is the name of the field holding the layout.
    pub fn embedded_in_entity_form(mut self, parents: Vec<String>) -> Self {
        self.entity_form_parents = Some(parents);
        self
    }

    pub fn entity_form_parents(&self) -> Option<&[String]> {
        self.entity_form_parents.as_deref()
    }

    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn set_values(&mut self, values: Map<String, Value>) {
        self.values = values;
    }

    pub fn set_value(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    /// Top-level value, if present.
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Nested value at `path`.
    pub fn value_at(&self, path: &[&str]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        let mut current = self.values.get(*first)?;
        for key in rest {
            current = current.get(*key)?;
        }
        Some(current)
    }

    /// True when `key` exists and is not null.
    pub fn has_value(&self, key: &str) -> bool {
        matches!(self.values.get(key), Some(v) if !v.is_null())
    }

    /// Flag an error on a named element. The first error per name is kept.
    pub fn set_error_by_name(&mut self, name: impl Into<String>, message: impl Into<String>) {
        self.errors.entry(name.into()).or_insert_with(|| message.into());
    }

    pub fn error(&self, name: &str) -> Option<&str> {
        self.errors.get(name).map(String::as_str)
    }

    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    pub fn has_any_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
