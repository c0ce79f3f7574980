//! Layout options orchestrator
//!
//! [`LayoutOptions`] is the layout implementation that hands every phase of
//! a layout's life to the option plugins effective for it: default
//! configuration, configuration form build/validate/submit, and render.
//! The configuration is passed through each plugin by value and stored
//! back once every plugin has seen it.

mod configuration;

pub use configuration::{LayoutConfiguration, FIELD_NAME_KEY};

use std::mem;
use std::rc::Rc;

use layout_options_host::{
    BaseLayout, DefaultLayout, FormElement, FormState, LayoutDefinition, Messenger,
    PassthroughTranslator, RegionContent, RenderTree, Translator, LAYOUT_REGION,
};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::config::deep_merge;
use crate::definition::OptionDefinition;
use crate::option::{LayoutContext, OptionPlugin};
use crate::registry::{OptionRegistry, PluginTable};
use crate::rules::{self, EffectiveOptionSet};
use crate::schema::{DeclarationDiscovery, Schema, SchemaLoader};

/// Host collaborators used by [`LayoutOptions`].
pub struct LayoutServices {
    pub messenger: Rc<dyn Messenger>,
    pub translator: Rc<dyn Translator>,
    pub plugins: PluginTable,
    pub base_layout: Box<dyn BaseLayout>,
}

impl LayoutServices {
    /// Built-in plugins, untranslated strings, and the stock base layout.
    pub fn new(messenger: Rc<dyn Messenger>) -> Self {
        Self {
            messenger,
            translator: Rc::new(PassthroughTranslator),
            plugins: PluginTable::builtin(),
            base_layout: Box::new(DefaultLayout),
        }
    }

    pub fn with_translator(mut self, translator: Rc<dyn Translator>) -> Self {
        self.translator = translator;
        self
    }

    pub fn with_plugins(mut self, plugins: PluginTable) -> Self {
        self.plugins = plugins;
        self
    }

    pub fn with_base_layout(mut self, base_layout: Box<dyn BaseLayout>) -> Self {
        self.base_layout = base_layout;
        self
    }
}

/// A layout whose settings are contributed by option plugins.
pub struct LayoutOptions {
    definition: LayoutDefinition,
    configuration: LayoutConfiguration,
    loader: SchemaLoader,
    registry: OptionRegistry,
    base_layout: Box<dyn BaseLayout>,
    translator: Rc<dyn Translator>,
    messenger: Rc<dyn Messenger>,
}

impl LayoutOptions {
    /// Create the orchestrator for one layout. The configuration starts
    /// empty; use [`LayoutOptions::set_configuration`] to load stored values.
    pub fn new(
        definition: LayoutDefinition,
        discovery: Box<dyn DeclarationDiscovery>,
        services: LayoutServices,
    ) -> Self {
        Self {
            definition,
            configuration: LayoutConfiguration::new(),
            loader: SchemaLoader::new(discovery, services.messenger.clone()),
            registry: OptionRegistry::new(services.plugins, services.messenger.clone()),
            base_layout: services.base_layout,
            translator: services.translator,
            messenger: services.messenger,
        }
    }

    pub fn layout_definition(&self) -> &LayoutDefinition {
        &self.definition
    }

    pub fn messenger(&self) -> &dyn Messenger {
        self.messenger.as_ref()
    }

    pub fn configuration(&self) -> &LayoutConfiguration {
        &self.configuration
    }

    /// Store `configuration` merged over [`LayoutOptions::default_configuration`].
    pub fn set_configuration(&mut self, configuration: LayoutConfiguration) {
        let defaults = self.default_configuration();
        let merged = deep_merge(
            Value::Object(defaults.into_map()),
            Value::Object(configuration.into_map()),
        );
        self.configuration = match merged {
            Value::Object(map) => LayoutConfiguration::from_map(map),
            _ => LayoutConfiguration::new(),
        };
    }

    /// Base layout defaults, then every effective option's declared default.
    pub fn default_configuration(&mut self) -> LayoutConfiguration {
        let mut configuration = LayoutConfiguration::from_map(self.base_layout.default_configuration());
        let effective = self.effective_options(None);
        self.each_plugin(&effective, |plugin, cx| {
            configuration = plugin.add_defaults(cx, mem::take(&mut configuration));
        });
        configuration
    }

    /// The merged schema, validating its definitions after a fresh load.
    pub fn layout_options_schema(&mut self) -> &Schema {
        self.ensure_schema();
        self.loader.schema()
    }

    /// Every base definition in the schema.
    pub fn layout_definitions(&mut self) -> Vec<(String, OptionDefinition)> {
        self.layout_options_schema().definitions()
    }

    /// One base definition.
    pub fn option_definition(&mut self, option_id: &str) -> Option<OptionDefinition> {
        self.layout_options_schema().definition(option_id)
    }

    /// Every rule section.
    pub fn layout_rules(&mut self) -> Map<String, Value> {
        self.layout_options_schema().rules()
    }

    /// Options effective for `layout_id` and `field_name`.
    pub fn parse_layout_options(
        &mut self,
        layout_id: Option<&str>,
        field_name: Option<&str>,
    ) -> EffectiveOptionSet {
        self.ensure_schema();
        rules::resolve(self.loader.schema(), layout_id, field_name)
    }

    /// The plugin for `option_id`; see [`OptionRegistry::get_or_create`].
    pub fn option_plugin(
        &mut self,
        option_id: &str,
        definition: &OptionDefinition,
        bypass_cache: bool,
    ) -> Option<&mut dyn OptionPlugin> {
        self.registry.get_or_create(option_id, definition, bypass_cache)
    }

    /// Check every base definition in `schema` against its plugin.
    ///
    /// Returns true when any problem was found.
    pub fn validate_definitions(&mut self, schema: &Schema) -> bool {
        validate_definitions(&mut self.registry, schema)
    }

    pub fn clear_plugin_cache(&mut self) {
        self.registry.clear();
    }

    /// Add option widgets for the layout and each region.
    ///
    /// When the form is embedded in an entity form, the first parent is the
    /// field name and is carried along as a hidden `field_name` value.
    /// Region containers left without widgets are removed.
    pub fn build_configuration_form(&mut self, mut form: FormElement, state: &FormState) -> FormElement {
        let field = state
            .entity_form_parents()
            .and_then(|parents| parents.first())
            .cloned();
        if let Some(field) = &field {
            form.insert(FIELD_NAME_KEY, FormElement::hidden_value(Value::String(field.clone())));
        }

        let effective = self.effective_options(field.as_deref());
        let configuration = self.configuration.clone();

        self.each_plugin(&effective, |plugin, cx| {
            form = plugin.add_option_form_element(cx, LAYOUT_REGION, &configuration, mem::take(&mut form), state);
        });

        let regions: Vec<(String, String)> = self
            .definition
            .regions
            .iter()
            .map(|r| {
                let title = self.translator.format("@region region", &[("@region", r.label.as_str())]);
                (r.name.clone(), title)
            })
            .collect();

        for (region, title) in regions {
            form.insert(region.clone(), FormElement::details(title));
            self.each_plugin(&effective, |plugin, cx| {
                form = plugin.add_option_form_element(cx, &region, &configuration, mem::take(&mut form), state);
            });
            if form.child(&region).is_some_and(|c| !c.has_children()) {
                form.remove(&region);
            }
        }

        form
    }

    /// Let every effective plugin flag errors on `state`.
    pub fn validate_configuration_form(&mut self, form: &FormElement, state: &mut FormState) {
        let field = state
            .value(FIELD_NAME_KEY)
            .and_then(Value::as_str)
            .map(str::to_string);
        let effective = self.effective_options(field.as_deref());
        self.each_plugin(&effective, |plugin, cx| plugin.validate_form_option(cx, form, state));
    }

    /// Store the base layout's values, the field name, and every effective
    /// option's submitted values.
    pub fn submit_configuration_form(&mut self, form: &FormElement, state: &FormState) {
        let current = mem::take(&mut self.configuration).into_map();
        let mut configuration =
            LayoutConfiguration::from_map(self.base_layout.submit_configuration(current, state));

        let field = state
            .value(FIELD_NAME_KEY)
            .and_then(Value::as_str)
            .map(str::to_string);
        if let Some(field) = &field {
            configuration.set_field_name(field);
        }

        let effective = self.effective_options(field.as_deref());
        self.each_plugin(&effective, |plugin, cx| {
            configuration = plugin.submit_form_option(cx, mem::take(&mut configuration), form, state);
        });

        debug!(target: "layout_options", layout = %self.definition.id, "Stored layout configuration");
        self.configuration = configuration;
    }

    /// Render `regions` through the base layout, then apply every option.
    pub fn build(&mut self, regions: &RegionContent) -> RenderTree {
        let mut build = self
            .base_layout
            .build(&self.definition, regions, self.configuration.as_map());

        let field = self.configuration.field_name().map(str::to_string);
        let effective = self.effective_options(field.as_deref());
        let configuration = self.configuration.clone();
        self.each_plugin(&effective, |plugin, cx| {
            build = plugin.build_option(cx, &configuration, regions, mem::take(&mut build));
        });
        build
    }

    fn ensure_schema(&mut self) {
        if self.loader.is_loaded() {
            return;
        }
        self.loader.load();
        if self.loader.is_loaded() {
            validate_definitions(&mut self.registry, self.loader.schema());
        }
    }

    fn effective_options(&mut self, field_name: Option<&str>) -> EffectiveOptionSet {
        let layout_id = self.definition.id.clone();
        self.parse_layout_options(Some(&layout_id), field_name)
    }

    /// Visit the plugin of every effective option that has one.
    fn each_plugin<F>(&mut self, effective: &EffectiveOptionSet, mut visit: F)
    where
        F: FnMut(&dyn OptionPlugin, &LayoutContext<'_>),
    {
        let cx = LayoutContext::new(&self.definition, self.translator.as_ref());
        for (option_id, definition) in effective.iter() {
            if let Some(plugin) = self.registry.get_or_create(option_id, definition, false) {
                visit(&*plugin, &cx);
            }
        }
    }
}

/// Check every base definition in `schema` against a fresh plugin
/// instance, reporting problems through the registry's messenger.
///
/// Returns true when any problem was found.
pub fn validate_definitions(registry: &mut OptionRegistry, schema: &Schema) -> bool {
    let mut problems_found = false;

    for (option_id, definition) in schema.definitions() {
        let Some(plugin) = registry.get_or_create(&option_id, &definition, true) else {
            problems_found = true;
            continue;
        };
        let Some(problems) = plugin.validate_option_definition(&definition) else {
            continue;
        };

        problems_found = true;
        warn!(target: "layout_options", option = %option_id, problems = %problems, "Invalid option definition");
        registry.messenger().add_error(&format!(
            "Layout option definition, '{}', has these problems: {}",
            option_id, problems
        ));
    }

    problems_found
}
