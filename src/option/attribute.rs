//! Render step shared by the attribute-setting variants.

use layout_options_host::{RegionContent, RenderTree, LAYOUT_REGION};
use serde_json::Value;

use crate::value::{elements, value_to_string};

/// Append `value` to the `attribute` HTML attribute of the layout wrapper
/// or of a region. Regions absent from `regions` are left alone.
pub fn process_attribute_option_build(
    attribute: &str,
    regions: &RegionContent,
    mut build: RenderTree,
    region: &str,
    value: &Value,
) -> RenderTree {
    let attributes = if region == LAYOUT_REGION {
        &mut build.attributes
    } else if regions.contains_key(region) {
        &mut build.region_entry(region).attributes
    } else {
        return build;
    };

    attributes.extend(attribute, elements(value).into_iter().map(value_to_string));
    build
}
