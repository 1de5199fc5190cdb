use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::ParseError;

use crate::resource::ResourceParseError;

#[derive(Debug, Error)]
pub enum FcgError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] ParseError),

    #[error("Figma API error (status: {status:?}): {message}")]
    FigmaApi {
        status: Option<StatusCode>,
        message: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Rule error: {0}")]
    Rules(String),

    #[error("Asset error: {0}")]
    Asset(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unexpected error: {0}")]
    Unknown(String),
}

impl FcgError {
    pub fn figma_api(status: Option<StatusCode>, message: impl Into<String>) -> Self {
        FcgError::FigmaApi {
            status,
            message: message.into(),
        }
    }

    pub fn rules(message: impl Into<String>) -> Self {
        FcgError::Rules(message.into())
    }

    pub fn asset(message: impl Into<String>) -> Self {
        FcgError::Asset(message.into())
    }

    pub fn to_payload(&self) -> ErrorPayload {
        match self {
            FcgError::Io(e) => ErrorPayload::new(
                ErrorCategory::Config,
                e.to_string(),
                "Check file paths/permissions.",
            ),
            FcgError::Network(e) => ErrorPayload::new(
                ErrorCategory::Network,
                e.to_string(),
                "Check connectivity/proxy/VPN and retry.",
            ),
            FcgError::InvalidUrl(e) => ErrorPayload::new(
                ErrorCategory::Config,
                e.to_string(),
                "Verify the Figma URL (e.g., https://www.figma.com/design/<FILE_KEY>/...?node-id=1-2).",
            ),
            FcgError::FigmaApi { status, message } => ErrorPayload::new(
                ErrorCategory::Figma,
                format!("Figma API error (status {:?}): {}", status, message),
                "Check FIGMA_TOKEN/URL and rate limits; retry after waiting.",
            ),
            FcgError::Serialization(e) => ErrorPayload::new(
                ErrorCategory::Config,
                e.to_string(),
                "Check that the input is a Figma node, file or nodes response in JSON form.",
            ),
            FcgError::Yaml(e) => ErrorPayload::new(
                ErrorCategory::Rules,
                e.to_string(),
                "Check the YAML rule file syntax (a list of rules or a `rules:` key).",
            ),
            FcgError::Rules(msg) => ErrorPayload::new(
                ErrorCategory::Rules,
                msg.to_string(),
                "Each rule needs an `id`, a `selector` map and a `properties` map; run with --verbose for details.",
            ),
            FcgError::Asset(msg) => ErrorPayload::new(
                ErrorCategory::Asset,
                msg.to_string(),
                "Provide FIGMA_TOKEN for remote assets or pass --assets with pre-resolved URLs.",
            ),
            FcgError::Config(msg) => {
                let lower = msg.to_ascii_lowercase();
                if lower.contains("figma_token") || lower.contains("figma token") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Set FIGMA_TOKEN (or FIGMA_OAUTH_TOKEN) before running Figma inputs.",
                    )
                } else if lower.contains("node-id") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Include a Figma node-id in the URL (e.g., ?node-id=1-2).",
                    )
                } else if lower.contains("file key") && lower.contains("figma") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Use a Figma URL with a file key: https://www.figma.com/design/<FILE_KEY>/... with node-id.",
                    )
                } else if lower.contains("unsupported framework") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Use one of: react-tailwind, react-tailwind-v4, html-css.",
                    )
                } else if lower.contains("unsupported file extension") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Use a supported input type (json) or a Figma URL.",
                    )
                } else if lower.contains("file not found") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Verify the file exists; use an absolute path or run from the working directory (supported: json).",
                    )
                } else {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Check flags/paths (e.g., --framework, --rules) and required tokens.",
                    )
                }
            }
            FcgError::Unknown(msg) => ErrorPayload::new(
                ErrorCategory::Unknown,
                msg.to_string(),
                "Re-run with --verbose; file an issue if persistent.",
            ),
        }
    }
}

impl From<ResourceParseError> for FcgError {
    fn from(err: ResourceParseError) -> Self {
        FcgError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FcgError>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Config,
    Network,
    Figma,
    Rules,
    Asset,
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub category: ErrorCategory,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

impl ErrorPayload {
    pub fn new(category: ErrorCategory, message: String, remediation: impl Into<String>) -> Self {
        Self {
            category,
            message,
            remediation: Some(remediation.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_payload_uses_default_remediation_for_other_messages() {
        let err = FcgError::Config("Some other config issue".to_string());
        let payload = err.to_payload();
        assert_eq!(payload.category, ErrorCategory::Config);
        let remediation = payload.remediation.unwrap_or_default();
        assert!(
            remediation.contains("Check flags/paths"),
            "expected default remediation for generic config errors"
        );
    }

    #[test]
    fn config_payload_includes_figma_token_remediation() {
        let err = FcgError::Config("FIGMA_TOKEN environment variable is required".to_string());
        let remediation = err.to_payload().remediation.unwrap_or_default();
        assert!(
            remediation.contains("FIGMA_TOKEN"),
            "expected FIGMA token remediation, got: {remediation}"
        );
    }

    #[test]
    fn config_payload_includes_node_id_hint() {
        let err = FcgError::Config("Figma URL missing node-id in query".to_string());
        let remediation = err.to_payload().remediation.unwrap_or_default();
        assert!(
            remediation.to_ascii_lowercase().contains("node-id"),
            "expected node-id remediation, got: {remediation}"
        );
    }

    #[test]
    fn config_payload_lists_frameworks_for_unknown_framework() {
        let err = FcgError::Config("Unsupported framework 'vue'".to_string());
        let remediation = err.to_payload().remediation.unwrap_or_default();
        assert!(
            remediation.contains("react-tailwind-v4") && remediation.contains("html-css"),
            "expected framework list, got: {remediation}"
        );
    }

    #[test]
    fn rules_payload_uses_rules_category() {
        let payload = FcgError::rules("rule 'x' has no selector").to_payload();
        assert_eq!(payload.category, ErrorCategory::Rules);
        assert!(payload.message.contains("rule 'x'"));
    }

    #[test]
    fn asset_payload_mentions_assets_flag() {
        let payload = FcgError::asset("no credentials for image fetch").to_payload();
        assert_eq!(payload.category, ErrorCategory::Asset);
        let remediation = payload.remediation.unwrap_or_default();
        assert!(remediation.contains("--assets"), "got: {remediation}");
    }

    #[test]
    fn resource_errors_become_config_errors() {
        let err: FcgError = ResourceParseError::FileNotFound {
            path: "missing.json".to_string(),
        }
        .into();
        assert!(matches!(err, FcgError::Config(_)));
        let remediation = err.to_payload().remediation.unwrap_or_default();
        assert!(
            remediation.contains("absolute path"),
            "expected file path remediation, got: {remediation}"
        );
    }
}
