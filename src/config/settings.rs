//! Persisted `layout_options.settings` record
//!
//! A single key, `layout_overrides`, maps `"{provider}__{layoutId}"` to 0 or
//! 1 and decides which stock layout templates are rendered through the
//! layout options orchestrator.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use layout_options_host::{LayoutDefinition, LayoutImplementation, Messenger};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

/// Name of the settings record.
pub const SETTINGS_NAME: &str = "layout_options.settings";

/// Key identifying a layout template in `layout_overrides`.
pub fn override_key(provider: &str, layout_id: &str) -> String {
    format!("{}__{}", provider, layout_id)
}

/// Layout template that may be switched to the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EligibleLayout {
    pub key: String,
    pub provider: String,
    pub layout_id: String,
}

/// The settings record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutOptionsSettings {
    #[serde(default)]
    pub layout_overrides: BTreeMap<String, u8>,
}

impl LayoutOptionsSettings {
    pub fn is_overridden(&self, provider: &str, layout_id: &str) -> bool {
        self.layout_overrides
            .get(&override_key(provider, layout_id))
            .is_some_and(|v| *v != 0)
    }

    /// Layouts that use the stock implementation, plus layouts already overridden.
    pub fn eligible_layouts(&self, definitions: &[LayoutDefinition]) -> Vec<EligibleLayout> {
        definitions
            .iter()
            .filter(|d| {
                d.implementation == LayoutImplementation::HostDefault
                    || self.is_overridden(&d.provider, &d.id)
            })
            .map(|d| EligibleLayout {
                key: override_key(&d.provider, &d.id),
                provider: d.provider.clone(),
                layout_id: d.id.clone(),
            })
            .collect()
    }

    /// Switch overridden stock layouts to the orchestrator.
    pub fn apply_overrides(&self, definitions: &mut [LayoutDefinition]) {
        for definition in definitions.iter_mut() {
            if definition.implementation == LayoutImplementation::HostDefault
                && self.is_overridden(&definition.provider, &definition.id)
            {
                definition.implementation = LayoutImplementation::LayoutOptions;
            }
        }
    }
}

/// Persistence of the settings record.
pub trait SettingsStore {
    fn load(&self) -> Result<LayoutOptionsSettings, SettingsError>;
    fn save(&self, settings: &LayoutOptionsSettings) -> Result<(), SettingsError>;
}

/// Host hook that drops every cached plugin definition.
pub trait DefinitionCacheClearer {
    fn clear_cached_definitions(&self);
}

/// Store the submitted overrides and invalidate cached plugin definitions.
///
/// A submitted value of integer `0` means "off"; anything else means "on".
pub fn save_overrides(
    store: &dyn SettingsStore,
    submitted: &Map<String, Value>,
    clearer: &dyn DefinitionCacheClearer,
    messenger: &dyn Messenger,
) -> Result<LayoutOptionsSettings, SettingsError> {
    let mut settings = store.load()?;
    settings.layout_overrides = submitted
        .iter()
        .map(|(key, value)| {
            let enabled = if value.as_i64() == Some(0) { 0 } else { 1 };
            (key.clone(), enabled)
        })
        .collect();
    store.save(&settings)?;

    clearer.clear_cached_definitions();
    messenger.add_status("Plugin cache cleared.");
    info!(target: "layout_options", overrides = settings.layout_overrides.len(), "Layout overrides saved");

    Ok(settings)
}

/// Settings record kept in a TOML file.
#[derive(Debug, Clone)]
pub struct TomlSettingsStore {
    path: PathBuf,
}

impl TomlSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for TomlSettingsStore {
    /// A missing file is an empty record.
    fn load(&self) -> Result<LayoutOptionsSettings, SettingsError> {
        if !self.path.exists() {
            return Ok(LayoutOptionsSettings::default());
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(toml::from_str(&content)?)
    }

    fn save(&self, settings: &LayoutOptionsSettings) -> Result<(), SettingsError> {
        let content = toml::to_string(settings)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

/// In-memory settings record.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    settings: RefCell<LayoutOptionsSettings>,
}

impl MemorySettingsStore {
    pub fn new(settings: LayoutOptionsSettings) -> Self {
        Self {
            settings: RefCell::new(settings),
        }
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Result<LayoutOptionsSettings, SettingsError> {
        Ok(self.settings.borrow().clone())
    }

    fn save(&self, settings: &LayoutOptionsSettings) -> Result<(), SettingsError> {
        *self.settings.borrow_mut() = settings.clone();
        Ok(())
    }
}

/// Settings persistence errors
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to access settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse settings TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}
