//! Naming, escaping and attribute helpers shared by the generators.

use std::collections::{BTreeSet, HashSet};

use indexmap::IndexMap;

use crate::alt_node::{AltNode, Presence};

const LAYER_NAME_WORDS: usize = 4;

/// Escape text for markup, then turn newlines into `<br/>`.
pub fn text_content(raw: &str) -> String {
    escape_text(raw)
        .replace("\n\n", "<br/><br/>")
        .replace('\n', "<br/>")
}

/// `& < >` plus the JSX braces.
pub fn escape_text(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('{', "&#123;")
        .replace('}', "&#125;")
}

pub fn escape_attribute(raw: &str) -> String {
    raw.replace('&', "&amp;").replace('"', "&quot;")
}

/// `_Default icon & shape` -> `default-icon-and-shape`.
pub fn format_layer_name(name: &str) -> String {
    let trimmed = name.trim_start_matches(['_', '#']);
    let replaced = trimmed.replace('&', "and").replace(['/', '\\'], "-");
    let cleaned: String = replaced
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace() || *c == '-')
        .map(|c| if c.is_whitespace() { '-' } else { c })
        .collect();
    cleaned
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
        .to_ascii_lowercase()
}

/// First few words of the formatted layer name; text layers are often
/// named after their whole content.
pub fn truncate_layer_name(name: &str) -> String {
    let formatted = format_layer_name(name);
    formatted
        .split('-')
        .take(LAYER_NAME_WORDS)
        .collect::<Vec<_>>()
        .join("-")
}

fn data_key(key: &str) -> String {
    let mut out = String::new();
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else if c.is_ascii_alphabetic() {
            out.push(c);
        } else if c.is_whitespace() {
            out.push('-');
        }
    }
    out.split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// `data-layer`, `data-node-id` and component properties as `data-*`.
pub fn data_attributes(node: &AltNode<'_>) -> IndexMap<String, String> {
    let mut attrs = IndexMap::new();
    attrs.insert("data-layer".to_string(), truncate_layer_name(&node.name));
    attrs.insert("data-node-id".to_string(), node.id.clone());
    for key in node.source.component_property_references.keys() {
        let key = data_key(key);
        if !key.is_empty() {
            attrs.insert(format!("data-{}", key), "true".to_string());
        }
    }
    for (key, property) in &node.source.component_properties {
        let key = data_key(key);
        if key.is_empty() {
            continue;
        }
        let value = match &property.value {
            serde_json::Value::String(s) if !s.is_empty() => s.clone(),
            serde_json::Value::Bool(b) => b.to_string(),
            serde_json::Value::Number(n) => n.to_string(),
            _ => "true".to_string(),
        };
        attrs.insert(format!("data-{}", key), value);
    }
    attrs
}

pub fn data_attribute_string(node: &AltNode<'_>) -> String {
    data_attributes(node)
        .iter()
        .map(|(key, value)| format!("{}=\"{}\"", key, escape_attribute(value)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn words(value: &str) -> Vec<&str> {
    value
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase(),
        None => String::new(),
    }
}

/// Component name: `button-primary` -> `ButtonPrimary`, `123` -> `Component123`.
pub fn pascal_case(value: &str) -> String {
    let joined: String = words(value).into_iter().map(capitalize).collect();
    match joined.chars().next() {
        None => "Component".to_string(),
        Some(c) if c.is_ascii_digit() => format!("Component{}", joined),
        Some(_) => joined,
    }
}

/// `Hero Image` -> `heroImage`; empty names become `prop`.
pub fn camel_case(value: &str) -> String {
    let joined: String = words(value)
        .into_iter()
        .enumerate()
        .map(|(i, w)| if i == 0 { w.to_ascii_lowercase() } else { capitalize(w) })
        .collect();
    if joined.is_empty() {
        "prop".to_string()
    } else {
        joined
    }
}

/// `cardTitle_01` -> `card-title-01`.
pub fn kebab_case(value: &str) -> String {
    let mut out = String::new();
    let mut prev_lower = false;
    for c in value.chars() {
        if c.is_ascii_uppercase() && prev_lower {
            out.push('-');
        }
        if c.is_whitespace() || c == '_' || c == '-' {
            if !out.ends_with('-') {
                out.push('-');
            }
            prev_lower = false;
            continue;
        }
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        }
        prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
    }
    let trimmed = out.trim_matches('-');
    if trimmed.is_empty() {
        "component".to_string()
    } else {
        trimmed.to_string()
    }
}

/// camelCase identifier unique within `used`: `title`, `title2`, `title3`...
pub fn unique_identifier(name: &str, used: &mut HashSet<String>) -> String {
    let mut base = camel_case(name);
    if base.starts_with(|c: char| c.is_ascii_digit()) {
        base = format!("prop{}", base);
    }
    if used.insert(base.clone()) {
        return base;
    }
    let mut counter = 2;
    loop {
        let candidate = format!("{}{}", base, counter);
        if used.insert(candidate.clone()) {
            return candidate;
        }
        counter += 1;
    }
}

/// Breakpoint visibility for a node that exists only at some widths.
pub fn visibility_classes(presence: &Presence) -> &'static [&'static str] {
    match (presence.mobile, presence.tablet, presence.desktop) {
        (true, true, true) => &[],
        (true, false, false) => &["md:hidden"],
        (false, true, false) => &["hidden", "md:block", "lg:hidden"],
        (false, false, true) => &["hidden", "lg:block"],
        (true, true, false) => &["lg:hidden"],
        (false, true, true) => &["hidden", "md:block"],
        (true, false, true) => &["md:hidden", "lg:block"],
        (false, false, false) => &["hidden"],
    }
}

/// Stylesheet URL loading every font family used by visible text, with
/// the weights it is used at.
pub fn google_fonts_url(root: &AltNode<'_>) -> Option<String> {
    let mut fonts: IndexMap<String, BTreeSet<u32>> = IndexMap::new();
    root.walk(&mut |node| {
        let Some(family) = node.styles.get_string("font-family") else {
            return;
        };
        let family = family
            .split(',')
            .next()
            .unwrap_or_default()
            .trim_matches(|c: char| c == '\'' || c == '"' || c.is_whitespace())
            .to_string();
        if family.is_empty() {
            return;
        }
        let weight = node
            .styles
            .get_string("font-weight")
            .and_then(|w| w.parse::<f64>().ok())
            .map(|w| w.round() as u32)
            .unwrap_or(400);
        fonts.entry(family).or_default().insert(weight);
    });
    if fonts.is_empty() {
        return None;
    }
    let families = fonts
        .iter()
        .map(|(family, weights)| {
            let encoded: String = url::form_urlencoded::byte_serialize(family.as_bytes()).collect();
            let weights = weights
                .iter()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join(";");
            format!("family={}:wght@{}", encoded, weights)
        })
        .collect::<Vec<_>>()
        .join("&");
    Some(format!("https://fonts.googleapis.com/css2?{}&display=swap", families))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_newlines_become_breaks() {
        assert_eq!(text_content("Line1\nLine2"), "Line1<br/>Line2");
        assert_eq!(text_content("A\n\nB"), "A<br/><br/>B");
        assert_eq!(text_content("a < b {x}"), "a &lt; b &#123;x&#125;");
    }

    #[test]
    fn layer_names_are_formatted_and_truncated() {
        assert_eq!(format_layer_name("_Default icon & shape"), "default-icon-and-shape");
        assert_eq!(format_layer_name("Button/Primary"), "button-primary");
        assert_eq!(format_layer_name("#Header 01"), "header-01");
        assert_eq!(
            truncate_layer_name("The quick brown fox jumps over"),
            "the-quick-brown-fox"
        );
    }

    #[test]
    fn case_conversions() {
        assert_eq!(pascal_case("button-primary"), "ButtonPrimary");
        assert_eq!(pascal_case("123 Button"), "Component123Button");
        assert_eq!(pascal_case("!!"), "Component");
        assert_eq!(camel_case("Hero Image"), "heroImage");
        assert_eq!(camel_case(""), "prop");
        assert_eq!(kebab_case("cardTitle_01"), "card-title-01");
        assert_eq!(kebab_case("Label"), "label");
    }

    #[test]
    fn unique_identifiers_get_numeric_suffixes() {
        let mut used = HashSet::new();
        assert_eq!(unique_identifier("Title", &mut used), "title");
        assert_eq!(unique_identifier("title", &mut used), "title2");
        assert_eq!(unique_identifier("Title", &mut used), "title3");
        assert_eq!(unique_identifier("9 lives", &mut used), "prop9Lives");
    }

    #[test]
    fn visibility_for_partial_presence() {
        let tablet_only = Presence { mobile: false, tablet: true, desktop: false };
        assert_eq!(visibility_classes(&tablet_only), &["hidden", "md:block", "lg:hidden"]);
    }
}
