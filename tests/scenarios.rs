//! End-to-end runs through the public API: JSON export -> AltNode tree -> code.

use fcg_lib::rules::parse_rules_yaml;
use fcg_lib::transform::HiddenMode;
use fcg_lib::{
    evaluate_tree, generate, root_node_from_json, AltNode, DesignNode, Framework, GeneratedCode,
    GenerateRequest, NoAssets, Rule, TransformSession,
};
use serde_json::{json, Value};

fn design(value: Value) -> DesignNode {
    root_node_from_json(value, None).expect("design node")
}

fn tree(node: &DesignNode) -> AltNode<'_> {
    TransformSession::new(HiddenMode::Drop)
        .transform(node)
        .expect("tree renders")
}

async fn generate_with(root: &AltNode<'_>, framework: Framework, rules: &[Rule]) -> GeneratedCode {
    let resolved = evaluate_tree(root, rules, framework);
    let request = GenerateRequest::new(root, framework)
        .with_rules(rules)
        .with_resolved(&resolved);
    generate(&request, &NoAssets).await
}

fn red_box() -> Value {
    json!({
        "id": "1:1", "name": "Box", "type": "FRAME",
        "absoluteBoundingBox": { "x": 0, "y": 0, "width": 100, "height": 100 },
        "fills": [{ "type": "SOLID", "color": { "r": 1, "g": 0, "b": 0, "a": 1 } }]
    })
}

#[tokio::test]
async fn red_box_encodes_its_fill_in_every_framework() {
    let node = design(red_box());
    let root = tree(&node);

    let react = generate_with(&root, Framework::ReactTailwind, &[]).await;
    assert!(react.code.contains("bg-[#FF0000]"), "{}", react.code);
    assert_eq!(react.code.matches("data-node-id").count(), 1);

    let html = generate_with(&root, Framework::HtmlCss, &[]).await;
    assert!(
        html.css.as_deref().unwrap_or_default().contains("background: rgba(255, 0, 0, 1);"),
        "{:?}",
        html.css
    );
    assert_eq!(html.code.matches("data-node-id").count(), 1);
    assert!(html.warnings.is_empty(), "{:?}", html.warnings);
}

#[test]
fn wrapper_with_one_child_takes_the_child_name() {
    let node = design(json!({
        "document": {
            "id": "1", "name": "Wrapper", "type": "GROUP",
            "children": [{ "id": "2", "name": "Card", "type": "FRAME" }]
        }
    }));
    let root = tree(&node);

    assert_eq!(root.name, "Card");
    assert_eq!(root.unique_name, "Card");
    assert_eq!(root.node_count(), 1);
}

#[test]
fn sibling_labels_get_suffixed_unique_names() {
    let node = design(json!({
        "nodes": { "1:1": { "document": {
            "id": "1:1", "name": "Form", "type": "FRAME",
            "children": [
                { "id": "1:2", "name": "Label", "type": "TEXT", "characters": "First" },
                { "id": "1:3", "name": "Label", "type": "TEXT", "characters": "Second" }
            ]
        }}}
    }));
    let root = tree(&node);

    assert_eq!(root.children[0].unique_name, "Label");
    assert_eq!(root.children[1].unique_name, "Label_01");
}

#[tokio::test]
async fn multi_line_text_keeps_one_break() {
    let node = design(json!({
        "id": "1:1", "name": "Card", "type": "FRAME",
        "absoluteBoundingBox": { "x": 0, "y": 0, "width": 200, "height": 100 },
        "children": [{ "id": "1:2", "name": "Body", "type": "TEXT", "characters": "Line1\nLine2" }]
    }));
    let root = tree(&node);

    for framework in Framework::ALL {
        let output = generate_with(&root, framework, &[]).await;
        assert_eq!(output.code.matches("<br/>").count(), 1, "{}", output.code);
        assert!(output.code.contains("Line1<br/>Line2"), "{}", output.code);
    }
}

#[tokio::test]
async fn opacity_survives_with_no_rules_loaded() {
    let mut value = red_box();
    value["opacity"] = json!(0.5);
    let node = design(value);
    let root = tree(&node);

    let react = generate_with(&root, Framework::ReactTailwindV4, &[]).await;
    assert!(react.code.contains("opacity-50"), "{}", react.code);

    let html = generate_with(&root, Framework::HtmlCss, &[]).await;
    assert!(html.code.contains("opacity: 0.5;"), "{}", html.code);
}

#[tokio::test]
async fn yaml_rules_override_extracted_styles_and_report_conflicts() {
    let rules = parse_rules_yaml(
        r#"
rules:
  - id: frames-rounded
    selector: { type: FRAME }
    properties: { border-radius: 4px }
  - id: box-pill
    priority: 10
    selector: { name: Box }
    properties: { border-radius: 9999px, className: shadow-md }
  - id: html-only
    framework: html-css
    selector: { type: FRAME }
    properties: { cursor: pointer }
"#,
    )
    .expect("rules parse");
    let node = design(red_box());
    let root = tree(&node);

    let resolved = evaluate_tree(&root, &rules, Framework::ReactTailwind);
    let evaluation = resolved.get("1:1").expect("root evaluated");
    assert_eq!(evaluation.matched_rules, vec!["frames-rounded", "box-pill"]);
    assert_eq!(
        evaluation.provenance.get("border-radius").map(String::as_str),
        Some("box-pill")
    );
    assert_eq!(evaluation.conflicts.len(), 1);

    let react = generate_with(&root, Framework::ReactTailwind, &rules).await;
    assert!(react.code.contains("rounded-full"), "{}", react.code);
    assert!(react.code.contains("shadow-md"), "{}", react.code);
    assert!(!react.code.contains("cursor"), "{}", react.code);

    let html = generate_with(&root, Framework::HtmlCss, &rules).await;
    assert!(html.code.contains("cursor: pointer;"), "{}", html.code);
    assert!(html.code.contains("border-radius: 9999px;"), "{}", html.code);
}
