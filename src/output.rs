use crate::codegen::{Framework, GeneratedCode};
use crate::error::ErrorPayload;
use crate::resource::ResourceKind;
use crate::rules::RuleEvaluation;
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;

/// Schema version for output payloads.
pub const FCG_OUTPUT_VERSION: &str = "0.1.0";

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum FcgOutput {
    Generate(GenerateOutput),
    Transform(TransformOutput),
    Explain(ExplainOutput),
    Error(ErrorOutput),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDescriptor {
    pub kind: ResourceKind,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateOutput {
    pub version: String,
    pub input: ResourceDescriptor,
    pub framework: Framework,
    pub result: GeneratedCode,
    /// Files written under `--out-dir`, component first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub written: Vec<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformOutput {
    pub version: String,
    pub input: ResourceDescriptor,
    pub node_count: usize,
    pub tree: Value,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplainOutput {
    pub version: String,
    pub input: ResourceDescriptor,
    pub framework: Framework,
    pub rule_count: usize,
    pub node_count: usize,
    /// Only nodes matched by at least one rule.
    pub nodes: Vec<NodeExplanation>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeExplanation {
    pub node_id: String,
    pub name: String,
    #[serde(flatten)]
    pub evaluation: RuleEvaluation,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorOutput {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub error: ErrorPayload,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::GenerationMetadata;
    use crate::error::FcgError;
    use crate::rules::RuleConflict;
    use crate::rules::ConflictSeverity;

    fn file_input() -> ResourceDescriptor {
        ResourceDescriptor {
            kind: ResourceKind::File,
            value: "card.json".to_string(),
        }
    }

    #[test]
    fn generate_output_serializes() {
        let output = FcgOutput::Generate(GenerateOutput {
            version: FCG_OUTPUT_VERSION.to_string(),
            input: file_input(),
            framework: Framework::HtmlCss,
            result: GeneratedCode {
                code: "<div></div>".to_string(),
                format: Framework::HtmlCss,
                language: "html".to_string(),
                css: Some(String::new()),
                assets: Vec::new(),
                metadata: GenerationMetadata {
                    component_name: "Card".to_string(),
                    node_id: "1:2".to_string(),
                    generated_at: "2024-01-01T00:00:00Z".to_string(),
                },
                google_fonts_url: None,
                warnings: Vec::new(),
            },
            written: vec![PathBuf::from("out/Card.html")],
        });

        let json = serde_json::to_string(&output).expect("serialize generate output");
        assert!(json.contains("\"mode\":\"generate\""));
        assert!(json.contains("\"framework\":\"html-css\""));
        assert!(json.contains("\"kind\":\"file\""));
        assert!(json.contains("\"componentName\":\"Card\""));
        assert!(json.contains("\"written\":[\"out/Card.html\"]"));
    }

    #[test]
    fn explain_output_flattens_evaluation() {
        let mut evaluation = RuleEvaluation::default();
        evaluation.matched_rules = vec!["a".to_string(), "b".to_string()];
        evaluation.provenance.insert("opacity".to_string(), "b".to_string());
        evaluation.conflicts.push(RuleConflict {
            property: "opacity".to_string(),
            winner: "b".to_string(),
            overridden: vec!["a".to_string()],
            severity: ConflictSeverity::Minor,
        });
        let output = FcgOutput::Explain(ExplainOutput {
            version: FCG_OUTPUT_VERSION.to_string(),
            input: file_input(),
            framework: Framework::ReactTailwind,
            rule_count: 2,
            node_count: 3,
            nodes: vec![NodeExplanation {
                node_id: "1:2".to_string(),
                name: "Title".to_string(),
                evaluation,
            }],
        });

        let value = serde_json::to_value(&output).expect("serialize explain output");
        assert_eq!(value["mode"], "explain");
        let node = &value["nodes"][0];
        assert_eq!(node["nodeId"], "1:2");
        assert_eq!(node["matchedRules"][1], "b");
        assert_eq!(node["provenance"]["opacity"], "b");
        assert_eq!(node["conflicts"][0]["severity"], "minor");
    }

    #[test]
    fn error_output_carries_payload() {
        let payload = FcgError::rules("bad selector").to_payload();
        let output = FcgOutput::Error(ErrorOutput {
            version: FCG_OUTPUT_VERSION.to_string(),
            message: Some(payload.message.clone()),
            error: payload,
        });

        let value = serde_json::to_value(&output).expect("serialize error output");
        assert_eq!(value["mode"], "error");
        assert_eq!(value["error"]["category"], "rules");
        assert!(value["error"]["remediation"].is_string());
    }
}
