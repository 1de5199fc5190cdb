//! Declarative style rules layered on top of the extracted styles.
//!
//! A rule matches a node when every selector key is present on the source
//! node with an equal value (or one of a list of values). A missing key is a
//! non-match. Matching rules are folded in declaration order; on a property
//! collision the higher priority wins and equal priorities go to the later
//! rule.

mod conflicts;

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::alt_node::{AltNode, StyleMap, StyleValue};
use crate::codegen::Framework;
use crate::error::{FcgError, Result};
use crate::figma::DesignNode;

pub use conflicts::{severity_for, ConflictSeverity, RuleConflict};

/// Property key carrying raw utility classes instead of a CSS declaration.
pub const CLASS_NAME_KEY: &str = "className";

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub priority: i32,
    /// `None` applies to every framework.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework: Option<Framework>,
    #[serde(default)]
    pub selector: IndexMap<String, Value>,
    #[serde(default)]
    pub properties: StyleMap,
}

impl Rule {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            enabled: true,
            priority: 0,
            framework: None,
            selector: IndexMap::new(),
            properties: StyleMap::new(),
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn for_framework(mut self, framework: Framework) -> Self {
        self.framework = Some(framework);
        self
    }

    pub fn select(mut self, key: impl Into<String>, value: Value) -> Self {
        self.selector.insert(key.into(), value);
        self
    }

    pub fn emit(mut self, key: impl Into<String>, value: impl Into<StyleValue>) -> Self {
        self.properties.set(key, value);
        self
    }

    /// The v4 generator consumes v3 rules as well; its class output is
    /// migrated afterwards.
    pub fn applies_to(&self, framework: Framework) -> bool {
        match self.framework {
            None => true,
            Some(target) if target == framework => true,
            Some(Framework::ReactTailwind) => framework == Framework::ReactTailwindV4,
            Some(_) => false,
        }
    }

    pub fn matches(&self, node: &DesignNode) -> bool {
        self.enabled
            && self.selector.iter().all(|(key, expected)| {
                let Some(actual) = selector_value(node, key) else {
                    return false;
                };
                match expected {
                    Value::Array(options) if !actual.is_array() => {
                        options.iter().any(|option| values_equal(option, &actual))
                    }
                    _ => values_equal(expected, &actual),
                }
            })
    }
}

/// Raw attribute, else one of the derived keys `type` and `name`.
fn selector_value(node: &DesignNode, key: &str) -> Option<Value> {
    if let Some(value) = node.attribute(key) {
        return Some(value.clone());
    }
    match key {
        "type" => Some(Value::String(node.type_name.clone())),
        "name" => Some(Value::String(node.name.clone())),
        _ => None,
    }
}

fn values_equal(expected: &Value, actual: &Value) -> bool {
    match (expected, actual) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        _ => expected == actual,
    }
}

/// Result of evaluating every rule against one node.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleEvaluation {
    pub properties: StyleMap,
    /// Property key -> id of the rule that set it.
    pub provenance: IndexMap<String, String>,
    pub matched_rules: Vec<String>,
    pub conflicts: Vec<RuleConflict>,
}

impl RuleEvaluation {
    pub fn is_empty(&self) -> bool {
        self.matched_rules.is_empty()
    }

    /// Space-separated utility classes emitted through `className`.
    pub fn class_name(&self) -> Option<String> {
        self.properties
            .get_string(CLASS_NAME_KEY)
            .filter(|classes| !classes.trim().is_empty())
    }

    /// Emitted properties that are CSS declarations (everything but `className`).
    pub fn css_properties(&self) -> impl Iterator<Item = (&String, &StyleValue)> {
        self.properties.iter().filter(|(key, _)| *key != CLASS_NAME_KEY)
    }
}

/// Evaluations keyed by AltNode id.
pub type ResolvedProperties = IndexMap<String, RuleEvaluation>;

pub fn evaluate(node: &AltNode<'_>, rules: &[Rule], framework: Framework) -> RuleEvaluation {
    let mut evaluation = RuleEvaluation::default();
    let mut contributors: IndexMap<String, Vec<usize>> = IndexMap::new();
    let mut winning_priority: IndexMap<String, i32> = IndexMap::new();

    for (index, rule) in rules.iter().enumerate() {
        if !rule.applies_to(framework) || !rule.matches(node.source) {
            continue;
        }
        evaluation.matched_rules.push(rule.id.clone());

        for (key, value) in rule.properties.iter() {
            contributors.entry(key.clone()).or_default().push(index);
            if winning_priority.get(key).is_some_and(|current| *current > rule.priority) {
                continue;
            }
            winning_priority.insert(key.clone(), rule.priority);
            evaluation.properties.set(key.clone(), value.clone());
            evaluation.provenance.insert(key.clone(), rule.id.clone());
        }
    }

    evaluation.conflicts = conflicts::collect(&contributors, &evaluation.provenance, rules);
    if !evaluation.matched_rules.is_empty() {
        debug!(
            node_id = %node.id,
            matched = evaluation.matched_rules.len(),
            conflicts = evaluation.conflicts.len(),
            "rules evaluated"
        );
    }
    evaluation
}

/// Evaluate every node of the tree; nodes without a match still get an
/// (empty) entry so lookups by id never miss.
pub fn evaluate_tree(root: &AltNode<'_>, rules: &[Rule], framework: Framework) -> ResolvedProperties {
    let mut resolved = ResolvedProperties::new();
    root.walk(&mut |node| {
        resolved.insert(node.id.clone(), evaluate(node, rules, framework));
    });
    let matched = resolved.values().filter(|e| !e.is_empty()).count();
    info!(nodes = resolved.len(), matched, rules = rules.len(), "rule evaluation complete");
    resolved
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RuleDocument {
    List(Vec<Value>),
    Wrapped { rules: Vec<Value> },
}

/// Parse a rule document that is either a list or `{ "rules": [...] }`.
/// Entries that fail to parse are skipped with a warning.
pub fn parse_rules(document: Value) -> Result<Vec<Rule>> {
    let entries = match serde_json::from_value::<RuleDocument>(document) {
        Ok(RuleDocument::List(entries)) | Ok(RuleDocument::Wrapped { rules: entries }) => entries,
        Err(_) => {
            return Err(FcgError::rules(
                "rule file must be a list of rules or an object with a `rules` list",
            ))
        }
    };

    let mut rules = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<Rule>(entry) {
            Ok(rule) => rules.push(rule),
            Err(e) => warn!(index, error = %e, "skipping unreadable rule entry"),
        }
    }
    Ok(rules)
}

pub fn parse_rules_json(text: &str) -> Result<Vec<Rule>> {
    parse_rules(serde_json::from_str(text)?)
}

pub fn parse_rules_yaml(text: &str) -> Result<Vec<Rule>> {
    parse_rules(serde_yaml::from_str(text)?)
}

/// Load rules from disk; `.yaml`/`.yml` files are read as YAML, anything else as JSON.
pub fn load_rules(path: &Path) -> Result<Vec<Rule>> {
    let text = std::fs::read_to_string(path)?;
    let is_yaml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));
    let rules = if is_yaml {
        parse_rules_yaml(&text)?
    } else {
        parse_rules_json(&text)?
    };
    info!(path = %path.display(), count = rules.len(), "loaded rules");
    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{HiddenMode, TransformSession};
    use serde_json::json;

    fn node(value: Value) -> DesignNode {
        DesignNode::from_value(value).expect("node")
    }

    #[test]
    fn absent_selector_key_never_matches() {
        let rule = Rule::new("row").select("layoutMode", json!("HORIZONTAL"));
        let text = node(json!({ "id": "1", "type": "TEXT", "characters": "x" }));
        assert!(!rule.matches(&text), "a node without layoutMode must not match");

        let row = node(json!({ "id": "2", "type": "FRAME", "layoutMode": "HORIZONTAL" }));
        assert!(rule.matches(&row));
    }

    #[test]
    fn list_selectors_and_numeric_equality() {
        let rule = Rule::new("r")
            .select("type", json!(["FRAME", "COMPONENT"]))
            .select("itemSpacing", json!(8.0));
        assert!(rule.matches(&node(json!({ "id": "1", "type": "COMPONENT", "itemSpacing": 8 }))));
        assert!(!rule.matches(&node(json!({ "id": "2", "type": "TEXT", "itemSpacing": 8 }))));
        assert!(!rule.matches(&node(json!({ "id": "3", "type": "FRAME", "itemSpacing": 4 }))));
    }

    #[test]
    fn flattened_text_style_keys_are_selectable() {
        let rule = Rule::new("heading").select("fontSize", json!(32));
        let heading = node(json!({ "id": "1", "type": "TEXT", "style": { "fontSize": 32 } }));
        assert!(rule.matches(&heading));
    }

    #[test]
    fn disabled_rules_do_not_match() {
        let mut rule = Rule::new("off").select("type", json!("FRAME"));
        rule.enabled = false;
        assert!(!rule.matches(&node(json!({ "id": "1", "type": "FRAME" }))));
    }

    #[test]
    fn v4_accepts_v3_rules_but_not_the_reverse() {
        let v3 = Rule::new("a").for_framework(Framework::ReactTailwind);
        let v4 = Rule::new("b").for_framework(Framework::ReactTailwindV4);
        let any = Rule::new("c");
        assert!(v3.applies_to(Framework::ReactTailwindV4));
        assert!(!v4.applies_to(Framework::ReactTailwind));
        assert!(!v3.applies_to(Framework::HtmlCss));
        assert!(any.applies_to(Framework::HtmlCss));
    }

    #[test]
    fn priority_wins_and_ties_go_to_later_rule() {
        let source = node(json!({ "id": "1", "name": "Card", "type": "FRAME" }));
        let alt = TransformSession::new(HiddenMode::Drop)
            .transform(&source)
            .expect("frame");
        let rules = vec![
            Rule::new("high").with_priority(10).select("type", json!("FRAME")).emit("display", "grid"),
            Rule::new("low").select("type", json!("FRAME")).emit("display", "flex").emit("gap", "4px"),
            Rule::new("tie").select("name", json!("Card")).emit("gap", "8px"),
        ];
        let evaluation = evaluate(&alt, &rules, Framework::HtmlCss);

        assert_eq!(evaluation.matched_rules, vec!["high", "low", "tie"]);
        assert!(evaluation.properties.is("display", "grid"));
        assert!(evaluation.properties.is("gap", "8px"));
        assert_eq!(evaluation.provenance.get("display").map(String::as_str), Some("high"));
        assert_eq!(evaluation.provenance.get("gap").map(String::as_str), Some("tie"));

        let display = evaluation
            .conflicts
            .iter()
            .find(|c| c.property == "display")
            .expect("display conflict");
        assert_eq!(display.winner, "high");
        assert_eq!(display.overridden, vec!["low"]);
        assert_eq!(display.severity, ConflictSeverity::Major);
    }

    #[test]
    fn evaluate_tree_has_an_entry_per_node() {
        let source = node(json!({
            "id": "1", "type": "FRAME", "children": [{ "id": "2", "type": "TEXT", "characters": "a" }]
        }));
        let alt = TransformSession::new(HiddenMode::Drop)
            .transform(&source)
            .expect("tree");
        let rules = vec![Rule::new("text").select("type", json!("TEXT")).emit(CLASS_NAME_KEY, "font-bold")];
        let resolved = evaluate_tree(&alt, &rules, Framework::ReactTailwind);

        assert_eq!(resolved.len(), 2);
        assert!(resolved["1"].is_empty());
        assert_eq!(resolved["2"].class_name().as_deref(), Some("font-bold"));
        assert_eq!(resolved["2"].css_properties().count(), 0);
    }

    #[test]
    fn rule_documents_accept_list_wrapped_and_yaml() {
        let list = parse_rules_json(r#"[{ "id": "a", "properties": { "gap": "4px" } }]"#).expect("list");
        assert_eq!(list.len(), 1);
        assert!(list[0].enabled);

        let wrapped = parse_rules_json(r#"{ "rules": [{ "id": "a" }, { "name": "missing id" }] }"#)
            .expect("wrapped");
        assert_eq!(wrapped.len(), 1, "entries without an id are skipped");

        let yaml = parse_rules_yaml(
            "rules:\n  - id: y\n    priority: 3\n    framework: html-css\n    selector:\n      type: TEXT\n",
        )
        .expect("yaml");
        assert_eq!(yaml[0].priority, 3);
        assert_eq!(yaml[0].framework, Some(Framework::HtmlCss));

        assert!(parse_rules_json(r#""nope""#).is_err());
    }
}
