//! Installed extensions and provider order
//!
//! Extensions announce themselves with a `<name>.info.yml` manifest. Modules
//! provide declarations first, in dependency order, then the active theme's
//! base-theme chain from the root ancestor down, then the active theme.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use walkdir::WalkDir;

use super::discovery::DiscoveryError;

const INFO_SUFFIX: &str = ".info.yml";

/// Kind of extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtensionKind {
    Module,
    Theme,
    Profile,
}

/// A discovered extension.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Extension {
    /// Machine name, taken from the manifest file name.
    pub name: String,
    /// Human-readable name from the manifest.
    pub label: Option<String>,
    pub kind: ExtensionKind,
    /// Directory holding the manifest.
    pub path: PathBuf,
    pub dependencies: Vec<String>,
    pub weight: i64,
    pub base_theme: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InfoFile {
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "type")]
    kind: ExtensionKind,
    #[serde(default)]
    dependencies: Vec<String>,
    #[serde(default)]
    weight: i64,
    /// `false` means "no base theme".
    #[serde(rename = "base theme", default)]
    base_theme: Option<serde_yaml::Value>,
}

impl Extension {
    pub fn new(name: impl Into<String>, kind: ExtensionKind, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            label: None,
            kind,
            path: path.into(),
            dependencies: Vec::new(),
            weight: 0,
            base_theme: None,
        }
    }

    pub fn with_dependencies(mut self, dependencies: &[&str]) -> Self {
        self.dependencies = dependencies.iter().map(|d| d.to_string()).collect();
        self
    }

    pub fn with_weight(mut self, weight: i64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_base_theme(mut self, base_theme: impl Into<String>) -> Self {
        self.base_theme = Some(base_theme.into());
        self
    }

    /// Read a `<name>.info.yml` manifest.
    pub fn from_manifest(path: &Path) -> Result<Self, DiscoveryError> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let name = file_name
            .strip_suffix(INFO_SUFFIX)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| DiscoveryError::Manifest {
                path: path.to_path_buf(),
                reason: "file name is not <name>.info.yml".to_string(),
            })?;

        let content = fs::read_to_string(path).map_err(|source| DiscoveryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let info: InfoFile = serde_yaml::from_str(&content).map_err(|e| DiscoveryError::Manifest {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            name: name.to_string(),
            label: info.name,
            kind: info.kind,
            path: path.parent().map(Path::to_path_buf).unwrap_or_default(),
            dependencies: info.dependencies,
            weight: info.weight,
            base_theme: info
                .base_theme
                .and_then(|v| v.as_str().map(str::to_string)),
        })
    }

    /// Machine names this extension depends on.
    pub fn dependency_names(&self) -> impl Iterator<Item = &str> {
        self.dependencies.iter().map(|d| dependency_name(d))
    }
}

/// `"drupal:layout_discovery (>=8.x)"` → `"layout_discovery"`.
fn dependency_name(dependency: &str) -> &str {
    let name = dependency
        .split_once(':')
        .map_or(dependency, |(_, name)| name);
    name.split(|c: char| c.is_whitespace() || c == '(')
        .next()
        .unwrap_or(name)
        .trim()
}

/// Every extension found under a site's extension directories.
#[derive(Debug, Clone, Default)]
pub struct ExtensionList {
    extensions: Vec<Extension>,
}

impl ExtensionList {
    pub fn new(extensions: Vec<Extension>) -> Self {
        Self { extensions }
    }

    /// Walk `directories` for `*.info.yml` manifests. Missing directories
    /// are skipped; the first extension seen under a name wins.
    pub fn scan(directories: &[PathBuf]) -> Result<Self, DiscoveryError> {
        let mut extensions: Vec<Extension> = Vec::new();

        for directory in directories {
            if !directory.is_dir() {
                debug!(target: "layout_options", path = %directory.display(), "Extension directory not found");
                continue;
            }

            for entry in WalkDir::new(directory)
                .follow_links(false)
                .sort_by(|a, b| a.file_name().cmp(b.file_name()))
            {
                let entry = entry?;
                let is_manifest = entry.file_type().is_file()
                    && entry
                        .file_name()
                        .to_str()
                        .is_some_and(|n| n.ends_with(INFO_SUFFIX));
                if !is_manifest {
                    continue;
                }

                let extension = Extension::from_manifest(entry.path())?;
                if extensions.iter().any(|e| e.name == extension.name) {
                    warn!(
                        target: "layout_options",
                        name = %extension.name,
                        path = %entry.path().display(),
                        "Duplicate extension ignored"
                    );
                    continue;
                }
                extensions.push(extension);
            }
        }

        Ok(Self { extensions })
    }

    pub fn get(&self, name: &str) -> Option<&Extension> {
        self.extensions.iter().find(|e| e.name == name)
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// Declaration providers, lowest precedence first.
    ///
    /// Only installed extensions take part. Themes other than the active
    /// theme and its base themes are left out.
    pub fn provider_order(
        &self,
        active_theme: Option<&str>,
        is_installed: impl Fn(&str) -> bool,
    ) -> Vec<&Extension> {
        let modules: Vec<&Extension> = self
            .extensions
            .iter()
            .filter(|e| e.kind != ExtensionKind::Theme && is_installed(&e.name))
            .collect();

        let mut providers = order_modules(modules);
        providers.extend(self.theme_chain(active_theme, &is_installed));
        providers
    }

    /// Active theme and its ancestors, root ancestor first.
    fn theme_chain(
        &self,
        active_theme: Option<&str>,
        is_installed: &impl Fn(&str) -> bool,
    ) -> Vec<&Extension> {
        let mut chain = Vec::new();
        let mut seen = BTreeSet::new();
        let mut current = active_theme;

        while let Some(name) = current {
            if !seen.insert(name) {
                warn!(target: "layout_options", theme = name, "Base theme cycle");
                break;
            }
            match self.get(name) {
                Some(theme) if theme.kind == ExtensionKind::Theme && is_installed(name) => {
                    chain.push(theme);
                    current = theme.base_theme.as_deref();
                }
                _ => {
                    warn!(target: "layout_options", theme = name, "Theme not installed");
                    break;
                }
            }
        }

        chain.reverse();
        chain
    }
}

/// Dependencies before dependents; otherwise by (weight, name).
fn order_modules(mut pending: Vec<&Extension>) -> Vec<&Extension> {
    pending.sort_by(|a, b| (a.weight, &a.name).cmp(&(b.weight, &b.name)));

    let known: BTreeSet<&str> = pending.iter().map(|m| m.name.as_str()).collect();
    for module in &pending {
        for dependency in module.dependency_names().filter(|d| !known.contains(d)) {
            debug!(
                target: "layout_options",
                module = %module.name,
                dependency,
                "Dependency not among installed extensions"
            );
        }
    }

    let mut placed: BTreeSet<&str> = BTreeSet::new();
    let mut ordered = Vec::with_capacity(pending.len());

    while !pending.is_empty() {
        let ready = pending.iter().position(|m| {
            m.dependency_names()
                .all(|d| placed.contains(d) || !known.contains(d))
        });
        match ready {
            Some(index) => {
                let module = pending.remove(index);
                placed.insert(module.name.as_str());
                ordered.push(module);
            }
            None => {
                let names: Vec<&str> = pending.iter().map(|m| m.name.as_str()).collect();
                warn!(target: "layout_options", modules = ?names, "Module dependency cycle");
                ordered.append(&mut pending);
            }
        }
    }

    ordered
}
