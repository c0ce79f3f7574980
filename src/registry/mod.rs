//! Option plugin registry
//!
//! - [`PluginTable`]: plugin id → constructor, with the built-in variants
//!   registered by default
//! - [`OptionRegistry`]: one plugin instance per option id, cached for the
//!   lifetime of the orchestrator

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use layout_options_host::Messenger;
use tracing::{debug, warn};

use crate::definition::OptionDefinition;
use crate::option::{
    ClassCheckboxesOption, ClassRadiosOption, ClassSelectOption, ClassStringOption,
    IdAttributeOption, OptionBase, OptionPlugin,
};

/// Prefix shared by the built-in plugin ids.
pub const PLUGIN_ID_PREFIX: &str = "layout_options_";

/// Builds a plugin instance around its base state.
pub type PluginConstructor = fn(OptionBase) -> Box<dyn OptionPlugin>;

/// Registration metadata for one plugin variant.
#[derive(Clone)]
pub struct PluginInfo {
    pub id: String,
    pub label: String,
    pub description: String,
    constructor: PluginConstructor,
}

impl PluginInfo {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        description: impl Into<String>,
        constructor: PluginConstructor,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            description: description.into(),
            constructor,
        }
    }
}

impl fmt::Debug for PluginInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginInfo")
            .field("id", &self.id)
            .field("label", &self.label)
            .finish()
    }
}

/// Available plugin variants.
#[derive(Debug, Clone, Default)]
pub struct PluginTable {
    plugins: BTreeMap<String, PluginInfo>,
}

impl PluginTable {
    /// A table with no variants.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in variants.
    pub fn builtin() -> Self {
        let mut table = Self::empty();
        table.register(IdAttributeOption::info());
        table.register(ClassStringOption::info());
        table.register(ClassSelectOption::info());
        table.register(ClassCheckboxesOption::info());
        table.register(ClassRadiosOption::info());
        table
    }

    /// Add or replace a variant.
    pub fn register(&mut self, info: PluginInfo) {
        self.plugins.insert(info.id.clone(), info);
    }

    /// Look a variant up by id. `class_select` finds
    /// `layout_options_class_select`.
    pub fn get(&self, plugin_id: &str) -> Option<&PluginInfo> {
        self.plugins
            .get(plugin_id)
            .or_else(|| self.plugins.get(&format!("{}{}", PLUGIN_ID_PREFIX, plugin_id)))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.plugins.keys().map(String::as_str)
    }

    /// Construct a plugin for `option_id` from its definition.
    pub fn create(
        &self,
        option_id: &str,
        definition: &OptionDefinition,
    ) -> Result<Box<dyn OptionPlugin>, RegistryError> {
        let plugin_id = definition
            .plugin_id()
            .ok_or_else(|| RegistryError::MissingPluginId {
                option_id: option_id.to_string(),
                title: definition.title(),
            })?;
        let info = self.get(plugin_id).ok_or_else(|| RegistryError::UnknownPlugin {
            option_id: option_id.to_string(),
            title: definition.title(),
            plugin_id: plugin_id.to_string(),
        })?;

        let base = OptionBase::new(info.clone(), option_id, definition.clone());
        Ok((info.constructor)(base))
    }
}

/// Plugin instances keyed by option id.
pub struct OptionRegistry {
    table: PluginTable,
    cache: BTreeMap<String, Box<dyn OptionPlugin>>,
    messenger: Rc<dyn Messenger>,
}

impl OptionRegistry {
    pub fn new(table: PluginTable, messenger: Rc<dyn Messenger>) -> Self {
        Self {
            table,
            cache: BTreeMap::new(),
            messenger,
        }
    }

    pub fn table(&self) -> &PluginTable {
        &self.table
    }

    pub fn messenger(&self) -> &dyn Messenger {
        self.messenger.as_ref()
    }

    /// The plugin for `option_id`, creating it on first use.
    ///
    /// A cached instance has its definition replaced with `definition`.
    /// `bypass_cache` drops any cached instance and builds a fresh one.
    /// Failures are reported and yield `None`.
    pub fn get_or_create(
        &mut self,
        option_id: &str,
        definition: &OptionDefinition,
        bypass_cache: bool,
    ) -> Option<&mut dyn OptionPlugin> {
        if bypass_cache {
            self.cache.remove(option_id);
        }

        if !self.cache.contains_key(option_id) {
            match self.table.create(option_id, definition) {
                Ok(plugin) => {
                    debug!(target: "layout_options", option = option_id, plugin = plugin.plugin_id(), "Created option plugin");
                    self.cache.insert(option_id.to_string(), plugin);
                }
                Err(e) => {
                    warn!(target: "layout_options", option = option_id, error = %e, "Option plugin unavailable");
                    self.messenger.add_error(&e.to_string());
                    return None;
                }
            }
        }

        let plugin = self.cache.get_mut(option_id)?;
        plugin.set_definition(definition.clone());
        Some(plugin.as_mut())
    }

    pub fn contains(&self, option_id: &str) -> bool {
        self.cache.contains_key(option_id)
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Drop every cached instance.
    pub fn clear(&mut self) {
        debug!(target: "layout_options", cached = self.cache.len(), "Cleared option plugin cache");
        self.cache.clear();
    }
}

/// Plugin lookup errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegistryError {
    #[error("Option definition, {option_id} ({title}), does not define a plugin id")]
    MissingPluginId { option_id: String, title: String },

    #[error("Option definition, {option_id} ({title}), uses an unknown plugin id '{plugin_id}'")]
    UnknownPlugin {
        option_id: String,
        title: String,
        plugin_id: String,
    },
}
