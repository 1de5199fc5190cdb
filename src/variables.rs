//! External design-variable map and CSS custom-property naming.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::alt_node::format_number;
use crate::figma::Color;
use crate::{FcgError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VariableKind {
    Color,
    Spacing,
    FontSize,
    BorderRadius,
    Size,
    #[default]
    #[serde(other)]
    Other,
}

/// One resolved design token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    #[serde(default)]
    pub value: Value,
    #[serde(rename = "type", default)]
    pub kind: VariableKind,
}

impl Variable {
    /// Value as written into a `:root` definition.
    pub fn css_value(&self) -> String {
        match (&self.value, self.kind) {
            (Value::String(s), _) => s.clone(),
            (Value::Number(n), kind) => {
                let number = n.as_f64().unwrap_or_default();
                match kind {
                    VariableKind::Spacing
                    | VariableKind::FontSize
                    | VariableKind::BorderRadius
                    | VariableKind::Size => format!("{}px", format_number(number)),
                    VariableKind::Color | VariableKind::Other => format_number(number),
                }
            }
            (Value::Object(map), _) => {
                if let Some(color) = color_from_value(&self.value) {
                    let opacity = map.get("opacity").and_then(Value::as_f64).unwrap_or(1.0);
                    return color.to_css(color.a * opacity);
                }
                match map.get("value") {
                    Some(Value::String(s)) => s.clone(),
                    Some(other) if !other.is_null() => other.to_string(),
                    _ => "unset".to_string(),
                }
            }
            (Value::Bool(b), _) => b.to_string(),
            (Value::Null, _) | (Value::Array(_), _) => "unset".to_string(),
        }
    }
}

fn color_from_value(value: &Value) -> Option<Color> {
    let candidate = value.get("color").unwrap_or(value);
    if candidate.get("r").is_some() {
        serde_json::from_value(candidate.clone()).ok()
    } else {
        None
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableMap {
    entries: IndexMap<String, Variable>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum VariableFile {
    Wrapped { variables: IndexMap<String, Variable> },
    Bare(IndexMap<String, Variable>),
}

impl VariableMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts `{ "<id>": {...} }` or `{ "variables": { "<id>": {...} } }`.
    pub fn from_json(value: Value) -> Result<Self> {
        let file: VariableFile = serde_json::from_value(value)?;
        let entries = match file {
            VariableFile::Wrapped { variables } => variables,
            VariableFile::Bare(entries) => entries,
        };
        Ok(Self { entries })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| {
            FcgError::Config(format!(
                "Failed to read variables file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(serde_json::from_str(&raw)?)
    }

    pub fn insert(&mut self, id: impl Into<String>, variable: Variable) {
        self.entries.insert(id.into(), variable);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Full id, then short id (`125:11`), then any key ending in the short id.
    pub fn lookup(&self, id: &str) -> Option<&Variable> {
        if let Some(found) = self.entries.get(id) {
            return Some(found);
        }
        let short = short_id(id)?;
        self.entries.get(short).or_else(|| {
            self.entries
                .iter()
                .find(|(key, _)| short_id(key) == Some(short))
                .map(|(_, v)| v)
        })
    }

    /// CSS custom-property name (without the leading `--`).
    pub fn css_name(&self, id: &str) -> String {
        if let Some(variable) = self.lookup(id).filter(|v| !v.name.is_empty()) {
            let sanitized = sanitize_css_name(&variable.name);
            if !sanitized.is_empty() {
                return sanitized;
            }
        }
        match short_id(id) {
            Some(short) => format!("var-{}", short.replace(':', "-")),
            None => format!("var-{}", id_hash(id)),
        }
    }

    /// `var(--name, fallback)`.
    pub fn var_expr(&self, id: &str, fallback: &str) -> String {
        format!("var(--{}, {})", self.css_name(id), fallback)
    }

    /// `:root { --name: value; }` block, or an empty string for an empty map.
    pub fn root_definitions(&self) -> String {
        if self.entries.is_empty() {
            return String::new();
        }
        let mut lines = vec![":root {".to_string()];
        for id in self.entries.keys() {
            if let Some(variable) = self.entries.get(id) {
                lines.push(format!("  --{}: {};", self.css_name(id), variable.css_value()));
            }
        }
        lines.push("}".to_string());
        lines.join("\n")
    }
}

/// `Colors/Brand Primary` -> `colors-brand-primary`.
pub fn sanitize_css_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_dash = false;
    for ch in name.chars() {
        let mapped = match ch {
            '/' | ' ' | '\t' => Some('-'),
            c if c.is_ascii_alphanumeric() || c == '-' || c == '_' => Some(c.to_ascii_lowercase()),
            _ => None,
        };
        if let Some(c) = mapped {
            if c == '-' && last_dash {
                continue;
            }
            last_dash = c == '-';
            out.push(c);
        }
    }
    out.trim_matches('-').to_string()
}

/// Trailing `\d+:\d+` of a variable id.
fn short_id(id: &str) -> Option<&str> {
    let tail = id.rsplit(['/', ' ']).next().unwrap_or(id);
    let tail = tail.strip_prefix("VariableID:").unwrap_or(tail);
    let (left, right) = tail.split_once(':')?;
    let numeric = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    (numeric(left) && numeric(right)).then_some(tail)
}

fn id_hash(id: &str) -> String {
    let hash = id
        .encode_utf16()
        .fold(0i32, |acc, unit| {
            acc.wrapping_shl(5).wrapping_sub(acc).wrapping_add(unit as i32)
        });
    format!("{:x}", (hash as i64).abs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> VariableMap {
        VariableMap::from_json(json!({
            "variables": {
                "125:11": { "name": "Colors/Brand Primary", "value": "#ff0000", "type": "color" },
                "VariableID:abc/7:3": { "name": "Spacing/Small", "value": 8, "type": "spacing" }
            }
        }))
        .expect("variables")
    }

    #[test]
    fn lookup_accepts_full_and_short_ids() {
        let map = sample();
        assert!(map.lookup("VariableID:710641395bac/125:11").is_some());
        assert!(map.lookup("125:11").is_some());
        assert!(map.lookup("VariableID:zzz/7:3").is_some());
        assert!(map.lookup("VariableID:zzz/9:9").is_none());
    }

    #[test]
    fn css_name_is_sanitized_or_derived_from_id() {
        let map = sample();
        assert_eq!(map.css_name("VariableID:x/125:11"), "colors-brand-primary");
        assert_eq!(map.css_name("VariableID:x/42:17"), "var-42-17");
        assert!(map.css_name("opaque-id").starts_with("var-"));
    }

    #[test]
    fn var_expr_wraps_fallback() {
        let map = sample();
        assert_eq!(
            map.var_expr("125:11", "rgba(255, 0, 0, 1)"),
            "var(--colors-brand-primary, rgba(255, 0, 0, 1))"
        );
    }

    #[test]
    fn root_definitions_format_values_by_kind() {
        let defs = sample().root_definitions();
        assert!(defs.starts_with(":root {"));
        assert!(defs.contains("  --colors-brand-primary: #ff0000;"));
        assert!(defs.contains("  --spacing-small: 8px;"));
        assert!(defs.ends_with('}'));
        assert_eq!(VariableMap::new().root_definitions(), "");
    }

    #[test]
    fn color_object_values_become_css_colors() {
        let variable = Variable {
            name: "overlay".into(),
            value: json!({ "color": { "r": 0, "g": 0, "b": 0, "a": 1 }, "opacity": 0.5 }),
            kind: VariableKind::Color,
        };
        assert_eq!(variable.css_value(), "rgba(0, 0, 0, 0.5)");
    }

    #[test]
    fn bare_map_is_accepted() {
        let map = VariableMap::from_json(json!({ "1:2": { "name": "Radius/M", "value": 4, "type": "borderRadius" } }))
            .expect("bare map");
        assert_eq!(map.len(), 1);
        assert_eq!(map.css_name("1:2"), "radius-m");
    }
}
