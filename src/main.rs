//! Layout Options CLI
//!
//! Entry point for the `layout-options` command-line tool.

use std::path::PathBuf;
use std::process;
use std::rc::Rc;

use clap::{Parser, Subcommand};
use layout_options::config::{EffectiveSiteConfig, SettingsStore, TomlSettingsStore};
use layout_options::{
    resolve, validate_definitions, LayoutOptions, LayoutServices, OptionRegistry, PluginTable,
    SchemaLoader, YamlDiscovery,
};
use layout_options_host::{LayoutDefinition, MemoryMessenger, MessageType};
use serde::Serialize;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "layout-options")]
#[command(about = "Inspect layout option declarations of a site", version)]
struct Cli {
    /// Site root directory
    #[arg(long, short = 'r', default_value = ".", global = true)]
    root: PathBuf,

    /// Active theme (overrides the site config)
    #[arg(long, short = 't', global = true)]
    theme: Option<String>,

    /// Path to site config file (default: <root>/layout-options.toml)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Enable verbose debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the merged declaration schema
    Schema {
        /// Also list the contributing source files
        #[arg(long)]
        sources: bool,
    },

    /// Print the options effective for a layout
    Resolve {
        /// Layout id, e.g. layout_twocol
        #[arg(long, short = 'l')]
        layout: String,

        /// Entity field the layout is embedded in
        #[arg(long, short = 'f')]
        field: Option<String>,
    },

    /// Validate every option definition
    Validate,

    /// Print the default configuration of a layout
    Defaults {
        /// Layout id, e.g. layout_twocol
        #[arg(long, short = 'l')]
        layout: String,

        /// Region names of the layout (comma-separated)
        #[arg(long, value_delimiter = ',')]
        regions: Vec<String>,
    },

    /// Print the stored layout overrides record
    Overrides {
        /// Also report whether <provider>__<layout> is overridden
        #[arg(long)]
        check: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let (config, discovery) = match open_site(&cli) {
        Ok(site) => site,
        Err(e) => {
            eprintln!("Error loading site: {}", e);
            process::exit(1);
        }
    };

    match cli.command {
        Commands::Schema { sources } => run_schema(discovery, sources),
        Commands::Resolve { layout, field } => run_resolve(discovery, &layout, field.as_deref()),
        Commands::Validate => run_validate(discovery),
        Commands::Defaults { layout, regions } => run_defaults(discovery, &layout, &regions),
        Commands::Overrides { check } => run_overrides(&config, check.as_deref()),
    }
}

fn open_site(cli: &Cli) -> Result<(EffectiveSiteConfig, YamlDiscovery), String> {
    let cli_overrides = cli
        .theme
        .as_ref()
        .map(|theme| serde_json::json!({ "active_theme": theme }));
    let config = EffectiveSiteConfig::build(&cli.root, cli.config.as_deref(), cli_overrides)
        .map_err(|e| e.to_string())?;
    debug!(root = %config.root.display(), theme = ?config.site.active_theme, "Site configuration loaded");

    let discovery = YamlDiscovery::for_site(&config).map_err(|e| e.to_string())?;
    Ok((config, discovery))
}

fn run_schema(discovery: YamlDiscovery, with_sources: bool) {
    let messenger = Rc::new(MemoryMessenger::new());
    let mut loader = SchemaLoader::new(Box::new(discovery), messenger.clone());
    let schema = loader.load().to_value();
    exit_on_errors(&messenger);

    if with_sources {
        print_json(&serde_json::json!({
            "sources": loader.sources(),
            "schema": schema,
        }));
    } else {
        print_json(&schema);
    }
}

fn run_resolve(discovery: YamlDiscovery, layout_id: &str, field: Option<&str>) {
    let messenger = Rc::new(MemoryMessenger::new());
    let mut loader = SchemaLoader::new(Box::new(discovery), messenger.clone());
    let effective = resolve(loader.load(), Some(layout_id), field);
    exit_on_errors(&messenger);

    let output: serde_json::Map<String, serde_json::Value> = effective
        .iter()
        .map(|(id, def)| (id.to_string(), def.clone().into_value()))
        .collect();
    print_json(&output);
}

fn run_validate(discovery: YamlDiscovery) {
    let messenger = Rc::new(MemoryMessenger::new());
    let mut loader = SchemaLoader::new(Box::new(discovery), messenger.clone());
    loader.load();
    exit_on_errors(&messenger);

    let mut registry = OptionRegistry::new(PluginTable::builtin(), messenger.clone());
    let problems = validate_definitions(&mut registry, loader.schema());

    for message in messenger.messages_by_type(MessageType::Error) {
        eprintln!("{}", message);
    }
    if problems {
        process::exit(1);
    }
    println!(
        "Option definitions valid: {}",
        loader.schema().definitions().len()
    );
}

fn run_defaults(discovery: YamlDiscovery, layout_id: &str, regions: &[String]) {
    let messenger = Rc::new(MemoryMessenger::new());
    let definition = regions
        .iter()
        .fold(LayoutDefinition::new(layout_id, "layout_options"), |def, region| {
            def.with_region(region.as_str(), region.as_str())
        });

    let mut layout = LayoutOptions::new(
        definition,
        Box::new(discovery),
        LayoutServices::new(messenger.clone()),
    );
    let configuration = layout.default_configuration();

    for message in messenger.messages_by_type(MessageType::Error) {
        eprintln!("{}", message);
    }
    print_json(&configuration);
}

fn run_overrides(config: &EffectiveSiteConfig, check: Option<&str>) {
    let store = TomlSettingsStore::new(config.settings_path());
    let settings = match store.load() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading {}: {}", store.path().display(), e);
            process::exit(1);
        }
    };

    let Some(key) = check else {
        print_json(&settings);
        return;
    };
    let Some((provider, layout_id)) = key.split_once("__") else {
        eprintln!("Expected <provider>__<layout>, got '{}'", key);
        process::exit(1);
    };
    print_json(&serde_json::json!({
        "key": key,
        "overridden": settings.is_overridden(provider, layout_id),
    }));
}

/// Print collected error messages and exit when there are any.
fn exit_on_errors(messenger: &MemoryMessenger) {
    let errors = messenger.messages_by_type(MessageType::Error);
    if errors.is_empty() {
        return;
    }
    for error in errors {
        eprintln!("{}", error);
    }
    process::exit(1);
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            process::exit(1);
        }
    }
}
