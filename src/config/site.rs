//! Site configuration with provenance
//!
//! Tells the loader where a site's extensions live, which of them are
//! installed, and which theme is active. Built from three layers:
//! builtin defaults → `layout-options.toml` in the site root → CLI flags.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use super::merge::merge_layers;

/// File name of the site configuration, relative to the site root.
pub const SITE_CONFIG_FILE: &str = "layout-options.toml";

/// Origin of a configuration layer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ConfigOrigin {
    Builtin,
    Site,
    Cli,
}

/// A contributing layer with provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSource {
    pub origin: ConfigOrigin,

    /// File path (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// SHA-256 digest of raw file bytes (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

/// Merged site settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Machine name of the active theme.
    #[serde(default)]
    pub active_theme: Option<String>,

    /// Directory holding module extensions, relative to the root.
    pub modules_dir: String,

    /// Directory holding theme extensions, relative to the root.
    pub themes_dir: String,

    /// Settings record file, relative to the root.
    pub settings_file: String,

    /// Installed extensions; empty means every discovered extension.
    #[serde(default)]
    pub installed: Vec<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            active_theme: None,
            modules_dir: "modules".to_string(),
            themes_dir: "themes".to_string(),
            settings_file: "layout_options.settings.toml".to_string(),
            installed: Vec::new(),
        }
    }
}

impl SiteConfig {
    fn to_value(&self) -> Value {
        serde_json::json!({
            "active_theme": self.active_theme,
            "modules_dir": self.modules_dir,
            "themes_dir": self.themes_dir,
            "settings_file": self.settings_file,
            "installed": self.installed,
        })
    }

    /// Whether `name` counts as installed.
    pub fn is_installed(&self, name: &str) -> bool {
        self.installed.is_empty() || self.installed.iter().any(|n| n == name)
    }
}

/// Site configuration resolved for one root directory.
#[derive(Debug, Clone)]
pub struct EffectiveSiteConfig {
    pub root: PathBuf,
    pub site: SiteConfig,
    /// Contributing layers in precedence order
    pub sources: Vec<ConfigSource>,
}

impl EffectiveSiteConfig {
    /// Build the effective configuration for `root`.
    ///
    /// `config_path` defaults to `<root>/layout-options.toml`; a missing
    /// default file is skipped, a missing explicit file is an error.
    pub fn build(
        root: &Path,
        config_path: Option<&Path>,
        cli_overrides: Option<Value>,
    ) -> Result<Self, SiteConfigError> {
        let mut layers = vec![SiteConfig::default().to_value()];
        let mut sources = vec![ConfigSource {
            origin: ConfigOrigin::Builtin,
            path: None,
            digest: None,
        }];

        let (path, explicit) = match config_path {
            Some(p) => (p.to_path_buf(), true),
            None => (root.join(SITE_CONFIG_FILE), false),
        };
        if path.exists() {
            let (value, digest) = Self::load_toml_file(&path)?;
            layers.push(value);
            sources.push(ConfigSource {
                origin: ConfigOrigin::Site,
                path: Some(path.to_string_lossy().to_string()),
                digest: Some(digest),
            });
        } else if explicit {
            return Err(SiteConfigError::NotFound(path));
        }

        if let Some(cli) = cli_overrides {
            layers.push(cli);
            sources.push(ConfigSource {
                origin: ConfigOrigin::Cli,
                path: None,
                digest: None,
            });
        }

        let merged = merge_layers(layers);
        let site: SiteConfig = serde_json::from_value(merged)
            .map_err(|e| SiteConfigError::Invalid(e.to_string()))?;

        Ok(Self {
            root: root.to_path_buf(),
            site,
            sources,
        })
    }

    pub fn modules_path(&self) -> PathBuf {
        self.root.join(&self.site.modules_dir)
    }

    pub fn themes_path(&self) -> PathBuf {
        self.root.join(&self.site.themes_dir)
    }

    pub fn settings_path(&self) -> PathBuf {
        self.root.join(&self.site.settings_file)
    }

    /// Load and parse a TOML file, returning the value and digest
    fn load_toml_file(path: &Path) -> Result<(Value, String), SiteConfigError> {
        let bytes = fs::read(path)?;

        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let digest = hex::encode(hasher.finalize());

        let contents = String::from_utf8(bytes)
            .map_err(|e| SiteConfigError::Invalid(format!("Invalid UTF-8: {}", e)))?;
        let toml_value: toml::Value = toml::from_str(&contents)?;

        Ok((toml_to_json(toml_value), digest))
    }
}

/// Convert TOML Value to JSON Value
fn toml_to_json(toml: toml::Value) -> Value {
    match toml {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(arr) => Value::Array(arr.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

/// Site configuration errors
#[derive(Debug, thiserror::Error)]
pub enum SiteConfigError {
    #[error("Failed to read site config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Site config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid site config: {0}")]
    Invalid(String),
}
