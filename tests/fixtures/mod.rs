//! Test fixtures for integration tests
//!
//! This module provides:
//! - A miniature site with two modules, a base theme, an active sub-theme,
//!   and an inactive theme, each shipping `layout_options.yml` declarations
//! - A site whose only declaration file is malformed YAML
//! - Layout definitions matching the stock one- and two-column layouts

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::rc::Rc;

use layout_options::config::EffectiveSiteConfig;
use layout_options::{LayoutOptions, LayoutServices, YamlDiscovery};
use layout_options_host::{LayoutDefinition, MemoryMessenger};

/// Path to the fixture site
pub fn site_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/site")
}

/// Path to the site with a malformed declaration file
pub fn broken_site_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/broken_site")
}

/// Effective configuration of a fixture site, as the CLI builds it.
pub fn site_config(root: &Path) -> EffectiveSiteConfig {
    EffectiveSiteConfig::build(root, None, None).expect("fixture site config should load")
}

/// Declaration discovery over a fixture site.
pub fn site_discovery(root: &Path) -> YamlDiscovery {
    YamlDiscovery::for_site(&site_config(root)).expect("fixture extensions should scan")
}

/// Provider names contributing to the fixture site, in merge order.
pub const SITE_PROVIDERS: [&str; 4] = [
    "layout_options",
    "layout_options_test",
    "test_layout_options_base",
    "test_layout_options_theme",
];

pub fn layout_twocol() -> LayoutDefinition {
    LayoutDefinition::new("layout_twocol", "layout_discovery")
        .with_region("first", "First")
        .with_region("second", "Second")
}

pub fn layout_onecol() -> LayoutDefinition {
    LayoutDefinition::new("layout_onecol", "layout_discovery").with_region("content", "Content")
}

/// Orchestrator for `definition` over the fixture site, with its messenger.
pub fn site_layout(definition: LayoutDefinition) -> (LayoutOptions, Rc<MemoryMessenger>) {
    let messenger = Rc::new(MemoryMessenger::new());
    let layout = LayoutOptions::new(
        definition,
        Box::new(site_discovery(&site_path())),
        LayoutServices::new(messenger.clone()),
    );
    (layout, messenger)
}
