//! Layout Options - declarative settings for page layouts
//!
//! Site builders declare option definitions and rules in
//! `<provider>.layout_options.yml` files. This crate merges those
//! declarations, resolves which options apply to a layout (and the entity
//! field it is embedded in), and drives the option plugins that add form
//! widgets, store submitted values, and decorate the rendered output.

pub mod config;
pub mod definition;
pub mod layout;
pub mod option;
pub mod registry;
pub mod rules;
pub mod schema;
pub mod value;

pub use definition::{AttributeSchema, AttributeType, OptionDefinition};
pub use layout::{validate_definitions, LayoutConfiguration, LayoutOptions, LayoutServices};
pub use option::{LayoutContext, OptionBase, OptionPlugin};
pub use registry::{OptionRegistry, PluginInfo, PluginTable, RegistryError};
pub use rules::{resolve, EffectiveOptionSet};
pub use schema::{Schema, SchemaLoader, YamlDiscovery};
