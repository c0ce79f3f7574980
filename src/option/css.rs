//! CSS identifier checks on submitted values.

use layout_options_host::{clean_css_identifier, FormState};
use serde_json::Value;

use super::{form_value, LayoutContext, OptionBase};
use crate::value::{elements, is_empty_value, value_to_string};

/// Whether every identifier in `value` survives cleaning unchanged.
///
/// With `multi`, each whitespace-separated word is checked; otherwise the
/// trimmed text must be a single identifier. Lists are checked per element.
pub fn is_valid_css_identifier(value: &Value, multi: bool) -> bool {
    elements(value)
        .into_iter()
        .filter(|v| !is_empty_value(v))
        .map(value_to_string)
        .all(|text| {
            if multi {
                text.split_whitespace().all(is_clean)
            } else {
                is_clean(text.trim())
            }
        })
}

fn is_clean(identifier: &str) -> bool {
    clean_css_identifier(identifier) == identifier
}

impl OptionBase {
    /// Flag "Invalid CSS identifier." on the option when any allowed
    /// region's submitted value fails [`is_valid_css_identifier`].
    pub fn validate_css_identifier(&self, cx: &LayoutContext<'_>, state: &mut FormState, multi: bool) {
        for region in cx.regions() {
            if !self.is_allowed(region) {
                continue;
            }
            let Some(value) = form_value(state, region, self.option_id()) else {
                continue;
            };
            if !is_empty_value(&value) && !is_valid_css_identifier(&value, multi) {
                state.set_error_by_name(self.option_id(), cx.translate("Invalid CSS identifier."));
            }
        }
    }
}
