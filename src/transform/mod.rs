//! Design tree -> AltNode tree.
//!
//! A [`TransformSession`] owns everything that must stay consistent within one
//! run (the unique-name counter, the variable map, the hidden-node policy), so
//! independent runs never share state.
//!
//! Per node, style extraction runs as a sequence of passes over the AltNode:
//! the catch-all fallback pass first, then layout, fills, strokes, effects and
//! text, then shape special cases. Each pass writes only the keys it owns.

mod effects;
mod fallbacks;
mod group;
mod layout;
pub mod naming;
mod paint;
mod text;


use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::alt_node::{format_number, AltNode};
use crate::config::IconThresholds;
use crate::figma::paint::Rect;
use crate::figma::{DesignNode, LayoutMode, NodeType, Sizing};
use crate::variables::VariableMap;

pub use group::{GroupOutcome, StylePatch};
pub use naming::{sanitize_identifier, NameRegistry};

/// What to do with `visible: false` nodes. One policy per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HiddenMode {
    /// Hidden nodes and their subtrees are left out.
    Drop,
    /// Hidden nodes are kept with `visible = false`.
    Preserve,
}

/// Layout context a parent hands to its children.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ParentContext {
    pub layout_mode: Option<LayoutMode>,
    pub bounds: Option<Rect>,
    pub sizing_horizontal: Option<Sizing>,
    pub sizing_vertical: Option<Sizing>,
}

impl ParentContext {
    /// Context of the tree root: no parent at all.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn of(node: &DesignNode) -> Self {
        Self {
            layout_mode: Some(node.layout_mode()),
            bounds: node.bounds,
            sizing_horizontal: node.layout_child.sizing_horizontal,
            sizing_vertical: node.layout_child.sizing_vertical,
        }
    }

    /// Parent lays its children out with auto-layout (flex or grid).
    pub fn is_auto_layout(&self) -> bool {
        self.layout_mode.is_some_and(LayoutMode::is_auto_layout)
    }
}

#[derive(Debug, Clone)]
pub struct TransformSession {
    names: NameRegistry,
    variables: VariableMap,
    hidden: HiddenMode,
    icons: IconThresholds,
}

impl TransformSession {
    pub fn new(hidden: HiddenMode) -> Self {
        Self {
            names: NameRegistry::new(),
            variables: VariableMap::new(),
            hidden,
            icons: IconThresholds::default(),
        }
    }

    pub fn with_variables(mut self, variables: VariableMap) -> Self {
        self.variables = variables;
        self
    }

    pub fn with_icon_thresholds(mut self, icons: IconThresholds) -> Self {
        self.icons = icons;
        self
    }

    pub fn variables(&self) -> &VariableMap {
        &self.variables
    }

    /// Forget every name handed out so far.
    pub fn reset(&mut self) {
        self.names.reset();
    }

    /// Transform a whole tree. `None` means the root contributes nothing.
    pub fn transform<'src>(&mut self, root: &'src DesignNode) -> Option<AltNode<'src>> {
        self.transform_node(root, 0.0, &ParentContext::root())
    }

    /// Transform one node given its ancestors' cumulative rotation (degrees)
    /// and its parent's layout context.
    pub fn transform_node<'src>(
        &mut self,
        node: &'src DesignNode,
        parent_rotation: f64,
        parent: &ParentContext,
    ) -> Option<AltNode<'src>> {
        if !self.keeps(node) {
            return None;
        }

        if node.node_type == NodeType::Group {
            return group::inline_group(self, node, parent_rotation, parent).into_node();
        }

        let unique_name = self.names.unique_name(&node.name);
        let mut alt = AltNode::new(node, unique_name, node.node_type);
        alt.cumulative_rotation = parent_rotation + node.rotation_degrees();

        fallbacks::apply(node, &mut alt, &self.variables);
        layout::apply(node, &mut alt, parent);
        paint::apply_fills(node, &mut alt, &self.variables);
        paint::apply_strokes(node, &mut alt, &self.variables);
        effects::apply(node, &mut alt);
        text::apply(node, &mut alt);
        fallbacks::apply_shape(node, &mut alt);
        paint::apply_vector_payload(node, &mut alt);

        let own_rotation = node.rotation_degrees();
        if own_rotation != 0.0 {
            alt.styles
                .set("transform", format!("rotate({}deg)", format_number(own_rotation)));
        }
        alt.is_icon = self.is_icon(node);
        if alt.is_icon {
            debug!(node_id = %node.id, name = %node.name, "node detected as icon");
        }

        if !node.node_type.is_vector() {
            let context = ParentContext::of(node);
            let rotation = alt.cumulative_rotation;
            alt.children = node
                .children()
                .iter()
                .filter_map(|child| self.transform_node(child, rotation, &context))
                .collect();
            stacking_fixups(node, &mut alt);
        }

        Some(alt)
    }

    pub(crate) fn keeps(&self, node: &DesignNode) -> bool {
        node.visible || self.hidden == HiddenMode::Preserve
    }

    pub(crate) fn next_name(&mut self, raw: &str) -> String {
        self.names.unique_name(raw)
    }

    fn is_icon(&self, node: &DesignNode) -> bool {
        if node.node_type.is_vector() {
            return true;
        }
        let bounds = node.bounds_or_zero();
        let fits = |limit: f64| bounds.width <= limit && bounds.height <= limit;
        if !fits(self.icons.max_export_size) {
            return false;
        }
        node.has_export_settings
            || (node.node_type.is_component() && fits(self.icons.max_component_size))
    }
}

/// Parent-side fixups on freshly built children: reversed paint order and
/// relative stacking contexts around absolutely positioned children.
fn stacking_fixups(node: &DesignNode, alt: &mut AltNode<'_>) {
    let reverse = node.auto_layout().is_some_and(|l| l.reverse_z_index);
    let count = alt.children.len();
    if reverse && count > 1 {
        for (index, child) in alt.children.iter_mut().enumerate() {
            child.styles.set("z-index", (count - index) as f64);
        }
    }

    let has_absolute_child = alt.children.iter().any(AltNode::is_absolute);
    let image_with_children = alt.image.is_some() && count > 0;
    if (has_absolute_child || image_with_children) && !alt.is_absolute() {
        alt.styles.set("position", "relative");
        for child in alt.children.iter_mut().filter(|c| !c.is_absolute()) {
            child.styles.set("position", "relative");
        }
    }
}
