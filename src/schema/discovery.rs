//! Declaration source discovery
//!
//! Each provider may ship one `<provider>.layout_options.yml` next to its
//! manifest. Sources are returned in provider order so later documents
//! override earlier ones when merged.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use tracing::debug;

use super::extension::ExtensionList;
use crate::config::EffectiveSiteConfig;

/// Base name of declaration files.
pub const DECLARATION_NAME: &str = "layout_options";

/// Where a declaration document came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeclarationSource {
    pub provider: String,

    /// File path (None for in-memory sources)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// SHA-256 digest of raw file bytes (None for in-memory sources)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

/// A parsed declaration document with its provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub source: DeclarationSource,
    pub document: Value,
}

/// Produces every declaration document, lowest precedence first.
pub trait DeclarationDiscovery {
    fn find_all(&self) -> Result<Vec<Declaration>, DiscoveryError>;
}

/// Reads `<provider>.<name>.yml` from each provider directory.
#[derive(Debug, Clone)]
pub struct YamlDiscovery {
    name: String,
    directories: Vec<(String, PathBuf)>,
}

impl YamlDiscovery {
    /// `directories` pairs each provider name with its directory, in
    /// provider order.
    pub fn new(name: impl Into<String>, directories: Vec<(String, PathBuf)>) -> Self {
        Self {
            name: name.into(),
            directories,
        }
    }

    /// Discovery over the installed extensions of a site.
    pub fn for_site(config: &EffectiveSiteConfig) -> Result<Self, DiscoveryError> {
        let extensions = ExtensionList::scan(&[config.modules_path(), config.themes_path()])?;
        let directories = extensions
            .provider_order(config.site.active_theme.as_deref(), |name| {
                config.site.is_installed(name)
            })
            .into_iter()
            .map(|e| (e.name.clone(), e.path.clone()))
            .collect();
        Ok(Self::new(DECLARATION_NAME, directories))
    }

    pub fn file_name(&self, provider: &str) -> String {
        format!("{}.{}.yml", provider, self.name)
    }

    pub fn providers(&self) -> impl Iterator<Item = &str> {
        self.directories.iter().map(|(p, _)| p.as_str())
    }

    fn read(&self, provider: &str, path: &Path) -> Result<Declaration, DiscoveryError> {
        let bytes = fs::read(path).map_err(|source| DiscoveryError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let digest = hex::encode(hasher.finalize());

        let yaml: serde_yaml::Value =
            serde_yaml::from_slice(&bytes).map_err(|source| DiscoveryError::Yaml {
                path: path.to_path_buf(),
                source,
            })?;
        let document = match yaml_to_json(yaml) {
            Value::Null => Value::Object(Map::new()),
            doc @ Value::Object(_) => doc,
            _ => return Err(DiscoveryError::NotAMapping(path.to_path_buf())),
        };

        Ok(Declaration {
            source: DeclarationSource {
                provider: provider.to_string(),
                path: Some(path.to_string_lossy().to_string()),
                digest: Some(digest),
            },
            document,
        })
    }
}

impl DeclarationDiscovery for YamlDiscovery {
    fn find_all(&self) -> Result<Vec<Declaration>, DiscoveryError> {
        let mut declarations = Vec::new();
        for (provider, directory) in &self.directories {
            let path = directory.join(self.file_name(provider));
            if !path.is_file() {
                continue;
            }
            debug!(target: "layout_options", provider = %provider, path = %path.display(), "Reading declarations");
            declarations.push(self.read(provider, &path)?);
        }
        Ok(declarations)
    }
}

/// Declarations held in memory, for embedders and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticDiscovery {
    documents: Vec<(String, Value)>,
}

impl StaticDiscovery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, provider: impl Into<String>, document: Value) -> Self {
        self.documents.push((provider.into(), document));
        self
    }
}

impl DeclarationDiscovery for StaticDiscovery {
    fn find_all(&self) -> Result<Vec<Declaration>, DiscoveryError> {
        self.documents
            .iter()
            .map(|(provider, document)| match document {
                Value::Object(_) => Ok(Declaration {
                    source: DeclarationSource {
                        provider: provider.clone(),
                        path: None,
                        digest: None,
                    },
                    document: document.clone(),
                }),
                _ => Err(DiscoveryError::NotAMapping(PathBuf::from(provider))),
            })
            .collect()
    }
}

/// Convert YAML Value to JSON Value. Non-string mapping keys are
/// stringified so numeric option values survive.
fn yaml_to_json(yaml: serde_yaml::Value) -> Value {
    match yaml {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Number(i.into())
            } else if let Some(u) = n.as_u64() {
                Value::Number(u.into())
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or(Value::Null)
            }
        }
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(seq) => Value::Array(seq.into_iter().map(yaml_to_json).collect()),
        serde_yaml::Value::Mapping(mapping) => Value::Object(
            mapping
                .into_iter()
                .map(|(k, v)| (yaml_key(k), yaml_to_json(v)))
                .collect(),
        ),
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

fn yaml_key(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Null => String::new(),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

/// Declaration discovery errors
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Declaration document is not a mapping: {0}")]
    NotAMapping(PathBuf),

    #[error("Invalid extension manifest {path}: {reason}")]
    Manifest { path: PathBuf, reason: String },

    #[error("Failed to walk extension directories: {0}")]
    Walk(#[from] walkdir::Error),
}
