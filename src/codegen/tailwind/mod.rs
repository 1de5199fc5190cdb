//! CSS declaration -> Tailwind utility classes.
//!
//! Mapping is pure and order-independent: [`css_prop_to_tailwind`] turns one
//! declaration into zero or more classes, an empty string when the property
//! has no Tailwind counterpart.

pub mod classes;
mod layout;
pub mod scale;
pub mod v4;
mod visual;

use crate::alt_node::StyleMap;

pub use classes::{finalize, split_classes};
pub use scale::DEFAULT_TOLERANCE;

/// Map one CSS property/value pair. Property names are matched
/// case-insensitively with dashes ignored (`flex-direction` == `flexDirection`).
pub fn css_prop_to_tailwind(property: &str, value: &str) -> String {
    let prop: String = property
        .chars()
        .filter(|c| *c != '-')
        .map(|c| c.to_ascii_lowercase())
        .collect();
    let value = value.trim();
    if value.is_empty() {
        return String::new();
    }
    layout::map(&prop, value)
        .or_else(|| visual::map(&prop, value))
        .unwrap_or_default()
}

/// Classes for every declaration of a style map, in map order.
pub fn style_classes(styles: &StyleMap) -> Vec<String> {
    styles
        .iter()
        .flat_map(|(property, value)| split_classes(&css_prop_to_tailwind(property, &value.to_string())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_names_are_normalized() {
        assert_eq!(css_prop_to_tailwind("flex-direction", "column"), "flex-col");
        assert_eq!(css_prop_to_tailwind("flexDirection", "column"), "flex-col");
        assert_eq!(css_prop_to_tailwind("Background-Color", "#FF0000"), "bg-[#FF0000]");
    }

    #[test]
    fn unknown_properties_and_empty_values_map_to_nothing() {
        assert_eq!(css_prop_to_tailwind("cursor", "pointer"), "");
        assert_eq!(css_prop_to_tailwind("width", "  "), "");
    }

    #[test]
    fn style_map_expands_multi_class_values() {
        let styles: StyleMap = [
            ("padding", "8px 16px"),
            ("border", "1px solid rgba(0, 0, 0, 1)"),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            style_classes(&styles),
            vec!["py-2", "px-4", "border", "border-solid", "border-black"]
        );
    }
}
