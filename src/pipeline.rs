use std::path::{Path, PathBuf};

use tracing::{debug, info};

use fcg_lib::figma::map_figma_error;
use fcg_lib::transform::HiddenMode;
use fcg_lib::{
    load_rules, parse_resource, root_node_from_json, AltNode, AssetResolver, Config, DesignNode,
    FcgError, FigmaAssetResolver, FigmaAuth, FigmaClient, GeneratedCode, NoAssets,
    ParsedResource, ResourceDescriptor, ResourceKind, ResponsiveOverlays, Rule, StaticAssets,
    TransformSession, VariableMap,
};

/// A design tree read from disk or fetched from Figma.
pub struct LoadedDesign {
    pub resource: ParsedResource,
    pub root: DesignNode,
    /// Present for Figma inputs; reused to resolve assets.
    pub client: Option<FigmaClient>,
}

impl LoadedDesign {
    pub fn descriptor(&self) -> ResourceDescriptor {
        ResourceDescriptor {
            kind: self.resource.kind,
            value: self.resource.value.clone(),
        }
    }

    /// Transform the design tree, optionally attaching responsive overlays.
    pub fn transform<'a>(
        &'a self,
        session: &mut TransformSession,
        responsive: Option<&ResponsiveOverlays>,
    ) -> Result<AltNode<'a>, FcgError> {
        let mut tree = session.transform(&self.root).ok_or_else(|| {
            FcgError::Config(format!(
                "Root node {} produced no output (hidden or empty); try --hidden preserve",
                self.root.id
            ))
        })?;
        if let Some(overlays) = responsive {
            let applied = overlays.apply(&mut tree);
            debug!(applied, "responsive overlays attached");
        }
        info!(nodes = tree.node_count(), "design transformed");
        Ok(tree)
    }
}

/// Parse `--input` and load its design tree.
pub async fn load_design(input: &str, config: &Config) -> Result<LoadedDesign, FcgError> {
    let resource = parse_resource(input)?;
    match resource.kind {
        ResourceKind::File => {
            let raw = std::fs::read_to_string(&resource.value)?;
            let value = serde_json::from_str(&raw).map_err(|e| {
                FcgError::Config(format!("Input {} is not valid JSON: {}", resource.value, e))
            })?;
            let root = root_node_from_json(value, None)?;
            debug!(path = %resource.value, root = %root.id, "loaded design from file");
            Ok(LoadedDesign {
                resource,
                root,
                client: None,
            })
        }
        ResourceKind::Figma => {
            let figma_info = resource
                .figma_info
                .as_ref()
                .ok_or_else(|| FcgError::Config("Missing Figma file key".to_string()))?;
            let auth = FigmaAuth::from_env().ok_or_else(|| {
                FcgError::Config(
                    "Figma token missing; set FIGMA_TOKEN or FIGMA_OAUTH_TOKEN".to_string(),
                )
            })?;
            let client = FigmaClient::from_settings(auth, &config.figma).map_err(map_figma_error)?;

            let document = match &figma_info.node_id {
                Some(node_id) => {
                    info!(file_key = %figma_info.file_key, node_id = %node_id, "fetching Figma node");
                    let response = client
                        .get_file_nodes(&figma_info.file_key, &[node_id.as_str()])
                        .await
                        .map_err(map_figma_error)?;
                    response
                        .nodes
                        .into_iter()
                        .find(|(id, _)| id == node_id)
                        .and_then(|(_, wrapper)| wrapper)
                        .map(|wrapper| wrapper.document)
                        .ok_or_else(|| {
                            FcgError::figma_api(
                                None,
                                format!("Node {} not found; check the node-id", node_id),
                            )
                        })?
                }
                None => {
                    info!(file_key = %figma_info.file_key, "fetching Figma file");
                    client
                        .get_file(&figma_info.file_key)
                        .await
                        .map_err(map_figma_error)?
                        .document
                }
            };
            let root = DesignNode::from_value(document)?;
            Ok(LoadedDesign {
                resource,
                root,
                client: Some(client),
            })
        }
    }
}

pub fn load_variables(path: Option<&Path>) -> Result<VariableMap, FcgError> {
    match path {
        Some(path) => {
            let variables = VariableMap::load(path)?;
            debug!(count = variables.len(), "loaded design variables");
            Ok(variables)
        }
        None => Ok(VariableMap::new()),
    }
}

pub fn load_rule_file(path: Option<&Path>) -> Result<Vec<Rule>, FcgError> {
    path.map(load_rules).transpose().map(Option::unwrap_or_default)
}

pub fn load_responsive(path: Option<&Path>) -> Result<Option<ResponsiveOverlays>, FcgError> {
    path.map(ResponsiveOverlays::load).transpose()
}

/// Session with the hidden-node policy from the resolved settings.
pub fn transform_session(config: &Config, hidden: HiddenMode, variables: VariableMap) -> TransformSession {
    TransformSession::new(hidden)
        .with_icon_thresholds(config.icons)
        .with_variables(variables)
}

/// An assets file wins; Figma inputs resolve remotely; everything else uses placeholders.
pub fn asset_resolver(
    design: &LoadedDesign,
    assets: Option<&Path>,
) -> Result<Box<dyn AssetResolver>, FcgError> {
    if let Some(path) = assets {
        return Ok(Box::new(StaticAssets::load(path)?));
    }
    match (&design.client, &design.resource.figma_info) {
        (Some(client), Some(info)) => Ok(Box::new(FigmaAssetResolver::new(
            client.clone(),
            info.file_key.clone(),
        ))),
        _ => Ok(Box::new(NoAssets)),
    }
}

/// Write `<Component>.<ext>` plus exported assets; returns the written paths.
pub fn write_component(
    out_dir: &Path,
    generated: &GeneratedCode,
    extension: &str,
) -> Result<Vec<PathBuf>, FcgError> {
    std::fs::create_dir_all(out_dir)?;
    let mut written = Vec::with_capacity(generated.assets.len() + 1);

    let component = out_dir.join(format!(
        "{}.{}",
        generated.metadata.component_name, extension
    ));
    std::fs::write(&component, &generated.code)?;
    written.push(component);

    for asset in &generated.assets {
        let path = out_dir.join(asset.path.trim_start_matches("./"));
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, &asset.content)?;
        written.push(path);
    }
    info!(dir = %out_dir.display(), files = written.len(), "component written");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fcg_lib::codegen::{AssetKind, GeneratedAsset, GenerationMetadata};
    use fcg_lib::Framework;

    fn generated() -> GeneratedCode {
        GeneratedCode {
            code: "export function Card() {}".into(),
            format: Framework::ReactTailwind,
            language: "tsx".into(),
            css: None,
            assets: vec![GeneratedAsset {
                filename: "starIcon.svg".into(),
                path: "./img/starIcon.svg".into(),
                content: "<svg/>".into(),
                kind: AssetKind::Svg,
            }],
            metadata: GenerationMetadata {
                component_name: "Card".into(),
                node_id: "1:2".into(),
                generated_at: "2024-01-01T00:00:00Z".into(),
            },
            google_fonts_url: None,
            warnings: Vec::new(),
        }
    }

    #[test]
    fn write_component_places_assets_next_to_component() {
        let dir = tempfile::tempdir().expect("tempdir");
        let out = dir.path().join("out");

        let written = write_component(&out, &generated(), "tsx").expect("write");

        assert_eq!(written.len(), 2);
        assert_eq!(
            std::fs::read_to_string(out.join("Card.tsx")).expect("component"),
            "export function Card() {}"
        );
        assert_eq!(
            std::fs::read_to_string(out.join("img").join("starIcon.svg")).expect("asset"),
            "<svg/>"
        );
    }

    #[tokio::test]
    async fn load_design_accepts_nodes_response_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nodes.json");
        std::fs::write(
            &path,
            r#"{ "nodes": { "1:2": { "document": { "id": "1:2", "name": "Card", "type": "FRAME" } } } }"#,
        )
        .expect("write input");

        let design = load_design(path.to_str().expect("utf8 path"), &Config::default())
            .await
            .expect("load design");
        assert_eq!(design.root.id, "1:2");
        assert!(design.client.is_none());
        assert!(matches!(design.descriptor().kind, ResourceKind::File));
    }

    #[tokio::test]
    async fn figma_inputs_require_a_token() {
        std::env::remove_var("FIGMA_TOKEN");
        std::env::remove_var("FIGMA_OAUTH_TOKEN");
        let result = load_design(
            "https://www.figma.com/design/abc123/Site?node-id=1-2",
            &Config::default(),
        )
        .await;
        let Err(err) = result else {
            panic!("expected missing token error");
        };
        assert!(err.to_string().contains("FIGMA_TOKEN"), "got: {err}");
    }

    #[test]
    fn missing_rule_file_is_an_error_but_no_path_is_empty() {
        assert!(load_rule_file(None).expect("no rules").is_empty());
        assert!(load_rule_file(Some(Path::new("/tmp/fcg-missing-rules.json"))).is_err());
    }
}
