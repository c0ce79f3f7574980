//! Layout Options host boundary types
//!
//! Defines the structures exchanged between the layout options engine and
//! the host framework: form descriptor trees and form state, render trees,
//! layout definitions, and the small host services the engine consumes
//! (translation, HTML escaping, CSS identifier cleaning, user messages).

pub mod form;
pub mod html;
pub mod layout;
pub mod messenger;
pub mod render;
pub mod translate;

pub use form::{ElementKind, FormElement, FormState, SelectOption};
pub use html::{clean_css_identifier, escape};
pub use layout::{BaseLayout, DefaultLayout, LayoutDefinition, LayoutImplementation, RegionInfo};
pub use messenger::{Message, MessageType, MemoryMessenger, Messenger};
pub use render::{Attributes, RegionContent, RenderElement, RenderTree};
pub use translate::{CatalogTranslator, PassthroughTranslator, Translator};

/// Name of the pseudo-region that stands for the whole layout.
pub const LAYOUT_REGION: &str = "layout";

/// Form value key under which an embedding entity form nests layout settings.
pub const LAYOUT_SETTINGS_KEY: &str = "layout_settings";
