//! Asset resolution for generation.
//!
//! Generators never fetch anything while walking the tree. Before emission,
//! [`collect_refs`] gathers every image reference and SVG node id once, and
//! [`resolve`] asks an [`AssetResolver`] for both lists in two batched calls.
//! Anything missing afterwards is rendered with a placeholder.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use futures::future::join_all;
use indexmap::IndexSet;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::alt_node::AltNode;
use crate::error::{FcgError, Result};
use crate::figma::{map_figma_error, FigmaClient, ImageFormat};

use super::{is_rendered, svg};

/// Image URL used when an image reference cannot be resolved.
pub fn placeholder_image_url(width: f64, height: f64) -> String {
    let w = if width >= 1.0 { width.round() } else { 300.0 };
    let h = if height >= 1.0 { height.round() } else { 200.0 };
    format!("https://placehold.co/{}x{}", w, h)
}

/// Everything the tree needs resolved, without duplicates, in tree order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetRefs {
    pub image_refs: IndexSet<String>,
    pub svg_node_ids: IndexSet<String>,
}

impl AssetRefs {
    pub fn is_empty(&self) -> bool {
        self.image_refs.is_empty() && self.svg_node_ids.is_empty()
    }
}

pub fn collect_refs(root: &AltNode<'_>) -> AssetRefs {
    let mut refs = AssetRefs::default();
    collect_into(root, &mut refs);
    refs
}

fn collect_into(node: &AltNode<'_>, refs: &mut AssetRefs) {
    if !is_rendered(node) {
        return;
    }
    if svg::is_svg_node(node) {
        refs.svg_node_ids.insert(node.id.clone());
        return;
    }
    for layer in &node.fills {
        if let Some(image_ref) = layer.image_ref() {
            refs.image_refs.insert(image_ref.to_string());
        }
    }
    if let Some(image) = &node.image {
        refs.image_refs.insert(image.image_ref.clone());
    }
    if let Some(mask) = &node.mask_image_ref {
        refs.image_refs.insert(mask.clone());
    }
    for child in &node.children {
        collect_into(child, refs);
    }
}

/// Source of image URLs and SVG documents.
#[async_trait]
pub trait AssetResolver: Send + Sync {
    /// `imageRef -> URL` for the refs that could be resolved.
    async fn image_urls(&self, image_refs: &[String]) -> Result<HashMap<String, String>>;

    /// `node id -> SVG document` for the nodes that could be exported.
    async fn svg_contents(&self, node_ids: &[String]) -> Result<HashMap<String, String>>;
}

/// Resolves nothing; every asset falls back to its placeholder.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAssets;

#[async_trait]
impl AssetResolver for NoAssets {
    async fn image_urls(&self, _image_refs: &[String]) -> Result<HashMap<String, String>> {
        Ok(HashMap::new())
    }

    async fn svg_contents(&self, _node_ids: &[String]) -> Result<HashMap<String, String>> {
        Ok(HashMap::new())
    }
}

/// Pre-resolved maps, typically produced by an earlier export.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StaticAssets {
    #[serde(default)]
    pub images: HashMap<String, String>,
    #[serde(default)]
    pub svgs: HashMap<String, String>,
}

impl StaticAssets {
    /// Load `{ "images": { ref: url }, "svgs": { nodeId: "<svg ...>" } }`.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            FcgError::asset(format!("Failed to read assets file {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            FcgError::asset(format!("Invalid assets file {}: {}", path.display(), e))
        })
    }
}

fn pick(map: &HashMap<String, String>, keys: &[String]) -> HashMap<String, String> {
    keys.iter()
        .filter_map(|key| map.get(key).map(|value| (key.clone(), value.clone())))
        .collect()
}

#[async_trait]
impl AssetResolver for StaticAssets {
    async fn image_urls(&self, image_refs: &[String]) -> Result<HashMap<String, String>> {
        Ok(pick(&self.images, image_refs))
    }

    async fn svg_contents(&self, node_ids: &[String]) -> Result<HashMap<String, String>> {
        Ok(pick(&self.svgs, node_ids))
    }
}

/// Resolves assets through the Figma REST API for one file.
#[derive(Debug, Clone)]
pub struct FigmaAssetResolver {
    client: FigmaClient,
    file_key: String,
}

impl FigmaAssetResolver {
    pub fn new(client: FigmaClient, file_key: impl Into<String>) -> Self {
        Self {
            client,
            file_key: file_key.into(),
        }
    }
}

#[async_trait]
impl AssetResolver for FigmaAssetResolver {
    async fn image_urls(&self, image_refs: &[String]) -> Result<HashMap<String, String>> {
        let fills = self
            .client
            .get_image_fills(&self.file_key)
            .await
            .map_err(map_figma_error)?;
        Ok(pick(&fills, image_refs))
    }

    async fn svg_contents(&self, node_ids: &[String]) -> Result<HashMap<String, String>> {
        let urls = self
            .client
            .export_images(&self.file_key, node_ids, ImageFormat::Svg, 1.0)
            .await
            .map_err(map_figma_error)?;

        let downloads = urls.into_iter().map(|(node_id, url)| async move {
            let result = self.client.download_text(&url).await;
            (node_id, result)
        });

        let mut contents = HashMap::new();
        for (node_id, result) in join_all(downloads).await {
            match result {
                Ok(svg) => {
                    contents.insert(node_id, svg);
                }
                Err(e) => warn!(node_id = %node_id, error = %e, "SVG download failed"),
            }
        }
        Ok(contents)
    }
}

/// Outcome of the batched resolution, plus what could not be resolved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedAssets {
    pub images: HashMap<String, String>,
    pub svgs: HashMap<String, String>,
    pub warnings: Vec<String>,
}

impl ResolvedAssets {
    pub fn image_url(&self, image_ref: &str) -> Option<&str> {
        self.images.get(image_ref).map(String::as_str)
    }

    pub fn svg(&self, node_id: &str) -> Option<&str> {
        self.svgs.get(node_id).map(String::as_str)
    }
}

/// Resolve every collected ref. Failures degrade to warnings, never errors.
pub async fn resolve(refs: &AssetRefs, resolver: &dyn AssetResolver) -> ResolvedAssets {
    let mut resolved = ResolvedAssets::default();

    if !refs.image_refs.is_empty() {
        let wanted: Vec<String> = refs.image_refs.iter().cloned().collect();
        match resolver.image_urls(&wanted).await {
            Ok(images) => resolved.images = images,
            Err(e) => {
                warn!(error = %e, count = wanted.len(), "image URL resolution failed");
                resolved
                    .warnings
                    .push(format!("Image URLs could not be resolved: {}", e));
            }
        }
        for image_ref in wanted.iter().filter(|r| !resolved.images.contains_key(*r)) {
            warn!(image_ref = %image_ref, "image unresolved, using placeholder");
            resolved
                .warnings
                .push(format!("Image {} unresolved; placeholder used", image_ref));
        }
    }

    if !refs.svg_node_ids.is_empty() {
        let wanted: Vec<String> = refs.svg_node_ids.iter().cloned().collect();
        match resolver.svg_contents(&wanted).await {
            Ok(svgs) => resolved.svgs = svgs,
            Err(e) => {
                warn!(error = %e, count = wanted.len(), "SVG export failed");
                resolved
                    .warnings
                    .push(format!("SVG export failed, rebuilding vectors locally: {}", e));
            }
        }
        let missing = wanted
            .iter()
            .filter(|id| !resolved.svgs.contains_key(*id))
            .count();
        if missing > 0 {
            debug!(missing, "SVGs without export will be rebuilt from geometry");
        }
    }

    info!(
        images = resolved.images.len(),
        svgs = resolved.svgs.len(),
        warnings = resolved.warnings.len(),
        "assets resolved"
    );
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingResolver;

    #[async_trait]
    impl AssetResolver for FailingResolver {
        async fn image_urls(&self, _refs: &[String]) -> Result<HashMap<String, String>> {
            Err(FcgError::asset("offline"))
        }

        async fn svg_contents(&self, _ids: &[String]) -> Result<HashMap<String, String>> {
            Err(FcgError::asset("offline"))
        }
    }

    fn refs(images: &[&str], svgs: &[&str]) -> AssetRefs {
        AssetRefs {
            image_refs: images.iter().map(|s| s.to_string()).collect(),
            svg_node_ids: svgs.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn placeholder_uses_node_size() {
        assert_eq!(placeholder_image_url(120.4, 80.0), "https://placehold.co/120x80");
        assert_eq!(placeholder_image_url(0.0, 0.0), "https://placehold.co/300x200");
    }

    #[tokio::test]
    async fn static_assets_resolve_only_requested_refs() {
        let assets = StaticAssets {
            images: HashMap::from([
                ("abc".to_string(), "https://cdn/abc.png".to_string()),
                ("unused".to_string(), "https://cdn/unused.png".to_string()),
            ]),
            svgs: HashMap::new(),
        };
        let resolved = resolve(&refs(&["abc", "missing"], &[]), &assets).await;
        assert_eq!(resolved.image_url("abc"), Some("https://cdn/abc.png"));
        assert!(resolved.image_url("unused").is_none());
        assert_eq!(resolved.warnings.len(), 1, "only the missing ref warns");
        assert!(resolved.warnings[0].contains("missing"));
    }

    #[tokio::test]
    async fn resolver_failures_become_warnings() {
        let resolved = resolve(&refs(&["abc"], &["1:2"]), &FailingResolver).await;
        assert!(resolved.images.is_empty());
        assert!(resolved.svgs.is_empty());
        assert_eq!(resolved.warnings.len(), 3, "{:?}", resolved.warnings);
    }

    #[test]
    fn preserved_hidden_nodes_request_no_assets() {
        let source = crate::figma::DesignNode::from_value(serde_json::json!({
            "id": "1:1", "name": "Gallery", "type": "FRAME",
            "children": [
                { "id": "1:2", "name": "Shown", "type": "RECTANGLE",
                  "fills": [{ "type": "IMAGE", "imageRef": "shown-ref" }] },
                { "id": "1:3", "name": "Hidden", "type": "RECTANGLE", "visible": false,
                  "fills": [{ "type": "IMAGE", "imageRef": "hidden-ref" }] },
                { "id": "1:4", "name": "HiddenIcon", "type": "VECTOR", "visible": false }
            ]
        }))
        .expect("node");
        let root = crate::transform::TransformSession::new(crate::transform::HiddenMode::Preserve)
            .transform(&source)
            .expect("tree");
        assert_eq!(root.children.len(), 3);

        let collected = collect_refs(&root);
        assert_eq!(collected, refs(&["shown-ref"], &[]));
    }

    #[tokio::test]
    async fn nothing_to_resolve_makes_no_calls() {
        let resolved = resolve(&AssetRefs::default(), &FailingResolver).await;
        assert!(resolved.warnings.is_empty());
    }
}
