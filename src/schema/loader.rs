//! Schema loading and caching

use std::rc::Rc;

use layout_options_host::Messenger;
use tracing::{debug, error};

use super::discovery::{DeclarationDiscovery, DeclarationSource};
use super::Schema;

/// User-facing message when any declaration source cannot be read.
pub const LOAD_ERROR_MESSAGE: &str = "Error reading layout_options.yml files.  See the log for details";

/// Merges every declaration source into one [`Schema`], once.
///
/// A failed load is reported, yields an empty schema, and is retried on the
/// next call.
pub struct SchemaLoader {
    discovery: Box<dyn DeclarationDiscovery>,
    messenger: Rc<dyn Messenger>,
    schema: Schema,
    sources: Vec<DeclarationSource>,
    loaded: bool,
}

impl SchemaLoader {
    pub fn new(discovery: Box<dyn DeclarationDiscovery>, messenger: Rc<dyn Messenger>) -> Self {
        Self {
            discovery,
            messenger,
            schema: Schema::default(),
            sources: Vec::new(),
            loaded: false,
        }
    }

    /// The merged schema, loading it on first use.
    pub fn load(&mut self) -> &Schema {
        if self.loaded {
            debug!(target: "layout_options", "Using cached layout options schema");
            return &self.schema;
        }

        match self.discovery.find_all() {
            Ok(declarations) => {
                let mut schema = Schema::default();
                let mut sources = Vec::with_capacity(declarations.len());
                for declaration in declarations {
                    schema = schema.merge(declaration.document);
                    sources.push(declaration.source);
                }
                debug!(target: "layout_options", sources = sources.len(), "Loaded layout options schema");
                self.schema = schema;
                self.sources = sources;
                self.loaded = true;
            }
            Err(e) => {
                error!(target: "layout_options", error = %e, "Failed to read layout option declarations");
                self.messenger.add_error(LOAD_ERROR_MESSAGE);
                self.schema = Schema::default();
                self.sources.clear();
            }
        }
        &self.schema
    }

    /// The cached schema, or an empty one before a successful load.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Whether a successful load is cached.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Sources merged into the cached schema, in merge order.
    pub fn sources(&self) -> &[DeclarationSource] {
        &self.sources
    }

    /// Drop the cached schema so the next load reads every source again.
    pub fn invalidate(&mut self) {
        self.loaded = false;
    }
}
