//! Configuration layers
//!
//! - `merge`: the deep-merge primitive shared by schema loading and rule
//!   resolution
//! - `site`: where a site's extensions live (builtin → site file → CLI)
//! - `settings`: the persisted `layout_overrides` record

mod merge;
mod settings;
mod site;

pub use merge::{deep_merge, merge_layers, merge_maps};
pub use settings::{
    override_key, save_overrides, DefinitionCacheClearer, EligibleLayout, LayoutOptionsSettings,
    MemorySettingsStore, SettingsError, SettingsStore, TomlSettingsStore, SETTINGS_NAME,
};
pub use site::{ConfigOrigin, ConfigSource, EffectiveSiteConfig, SiteConfig, SiteConfigError, SITE_CONFIG_FILE};
