//! Render tree produced by a layout and mutated by options.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Rendered region content keyed by region name.
pub type RegionContent = BTreeMap<String, Value>;

/// HTML attribute bag: attribute name to its ordered list of values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(BTreeMap<String, Vec<String>>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.0.get(name).map(Vec::as_slice)
    }

    /// Append one value to the named attribute, creating it if absent.
    pub fn push(&mut self, name: &str, value: impl Into<String>) {
        self.0.entry(name.to_string()).or_default().push(value.into());
    }

    /// Append values to the named attribute, preserving order and duplicates.
    pub fn extend<I, S>(&mut self, name: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0
            .entry(name.to_string())
            .or_default()
            .extend(values.into_iter().map(Into::into));
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl<const N: usize> From<[(&str, &[&str]); N]> for Attributes {
    fn from(entries: [(&str, &[&str]); N]) -> Self {
        let mut attributes = Attributes::new();
        for (name, values) in entries {
            attributes.extend(name, values.iter().copied());
        }
        attributes
    }
}

/// One rendered region.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderElement {
    #[serde(default)]
    pub content: Value,

    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
}

/// Render tree for one layout instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderTree {
    pub layout_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_hook: Option<String>,

    /// The layout configuration the tree was built from.
    #[serde(default)]
    pub settings: Value,

    /// Layout-wide attributes.
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,

    #[serde(default)]
    pub regions: BTreeMap<String, RenderElement>,
}

impl RenderTree {
    pub fn region(&self, name: &str) -> Option<&RenderElement> {
        self.regions.get(name)
    }

    /// Region element for `name`, created empty if absent.
    pub fn region_entry(&mut self, name: &str) -> &mut RenderElement {
        self.regions.entry(name.to_string()).or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_creates_attribute() {
        let mut attributes = Attributes::new();
        attributes.push("id", "main");
        assert_eq!(attributes.get("id"), Some(&["main".to_string()][..]));
    }

    #[test]
    fn test_extend_keeps_duplicates_and_order() {
        let mut attributes = Attributes::from([("class", &["a", "b"][..])]);
        attributes.extend("class", ["b", "c"]);
        assert_eq!(
            attributes.get("class").unwrap(),
            &["a", "b", "b", "c"].map(String::from)[..]
        );
    }

    #[test]
    fn test_region_entry_inserts_once() {
        let mut tree = RenderTree::default();
        tree.region_entry("left").attributes.push("class", "x");
        tree.region_entry("left").attributes.push("class", "y");
        assert_eq!(tree.regions.len(), 1);
        assert_eq!(tree.region("left").unwrap().attributes.get("class").unwrap().len(), 2);
    }
}
