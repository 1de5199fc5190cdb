//! Figma integration: the source design-node model and the REST client.
//!
//! This module provides:
//! - [`DesignNode`] - Parsed node tree (tagged union over node kinds)
//! - [`Paint`], [`Color`], [`Effect`] - Paint and effect descriptors
//! - [`FigmaClient`] - HTTP client for the Figma REST API
//! - [`root_node_from_json`] - Accepts bare nodes, file responses and nodes responses

pub mod api_types;
pub mod client;
mod lenient;
pub mod node;
pub mod paint;


pub use api_types::{FigmaFile, FigmaImageExport, FigmaNodesResponse, ImageFormat};
pub use client::{map_figma_error, FigmaAuth, FigmaClient, FigmaError};
pub use node::{
    AutoLayout, AxisAlign, BlendMode, BoundVariable, Constraint, Constraints, CornerRadii,
    DesignNode, HtmlTag, LayoutAlign, LayoutMode, LayoutWrap, NodeKind, NodeType, PaintStyle,
    Positioning, Sizing, TextData, TypeStyle,
};
pub use paint::{Color, ColorStop, Effect, EffectType, Gradient, Paint, PaintKind, Rect, Vector2};

use serde_json::Value;

use crate::{FcgError, Result};

/// Pick the design node out of an exported JSON document.
///
/// Accepts a bare node (`{ "id", "type", ... }`), a file response
/// (`{ "document": ... }`) or a nodes response (`{ "nodes": { "<id>": { "document": ... } } }`).
/// For nodes responses `node_id` selects the entry; otherwise the first one is used.
pub fn root_node_from_json(value: Value, node_id: Option<&str>) -> Result<DesignNode> {
    let Value::Object(mut map) = value else {
        return Err(FcgError::Config(
            "Input JSON must be an object (a Figma node, file or nodes response)".to_string(),
        ));
    };

    if let Some(Value::Object(mut nodes)) = map.remove("nodes") {
        let entry = match node_id {
            Some(id) => nodes.remove(id).ok_or_else(|| {
                FcgError::figma_api(None, format!("Node {} not found in nodes response", id))
            })?,
            None => nodes
                .into_iter()
                .next()
                .map(|(_, entry)| entry)
                .ok_or_else(|| FcgError::Config("Nodes response contains no nodes".to_string()))?,
        };
        let document = match entry {
            Value::Object(mut wrapper) => wrapper.remove("document").ok_or_else(|| {
                FcgError::figma_api(None, "Nodes response entry has no document")
            })?,
            _ => {
                return Err(FcgError::figma_api(
                    None,
                    "Nodes response entry is null; check the node-id",
                ))
            }
        };
        return Ok(DesignNode::from_value(document)?);
    }

    if let Some(document) = map.remove("document") {
        return Ok(DesignNode::from_value(document)?);
    }

    Ok(DesignNode::from_value(Value::Object(map))?)
}
