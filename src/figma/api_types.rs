//! Figma API response types for parsing JSON from the Figma REST API.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

/// Supported image export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpg,
    Svg,
}

impl ImageFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpg => "jpg",
            ImageFormat::Svg => "svg",
        }
    }
}

/// A Figma file response from the files endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FigmaFile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub last_modified: Option<String>,
    /// Raw document; parsed into [`super::DesignNode`] by the caller.
    #[serde(default)]
    pub document: Value,
}

/// Response from the nodes endpoint. Entries keep the requested order.
#[derive(Debug, Deserialize)]
pub struct FigmaNodesResponse {
    #[serde(default)]
    pub nodes: IndexMap<String, Option<FigmaNodeWrapper>>,
}

/// Wrapper containing the document for a node.
#[derive(Debug, Deserialize)]
pub struct FigmaNodeWrapper {
    pub document: Value,
}

/// Response from the images export endpoint (`null` for nodes that failed to render).
#[derive(Debug, Deserialize)]
pub struct FigmaImageExport {
    #[serde(default)]
    pub images: HashMap<String, Option<String>>,
    #[serde(default)]
    pub err: Option<String>,
}

/// Response from the image-fills endpoint: `imageRef -> URL`.
#[derive(Debug, Deserialize)]
pub struct FigmaImageFills {
    #[serde(default)]
    pub meta: FigmaImageFillsMeta,
}

#[derive(Debug, Default, Deserialize)]
pub struct FigmaImageFillsMeta {
    #[serde(default)]
    pub images: HashMap<String, String>,
}
