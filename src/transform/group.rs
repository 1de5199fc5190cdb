//! GROUP nodes never reach the output as-is.
//!
//! An empty group disappears, a single-child group is replaced by its child
//! (with the group's position and opacity carried over as a [`StylePatch`]),
//! and a multi-child group becomes a synthetic stacking grid.

use tracing::debug;

use super::layout::absolute_offsets;
use super::{ParentContext, TransformSession};
use crate::alt_node::{format_number, px, AltNode, StyleMap, StyleValue};
use crate::figma::paint::Rect;
use crate::figma::{Constraint, DesignNode, NodeType};

/// Style delta computed by a parent and applied once to a built child.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StylePatch {
    set: Vec<(String, StyleValue)>,
    remove: Vec<String>,
}

impl StylePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<StyleValue>) {
        let key = key.into();
        self.set.retain(|(k, _)| *k != key);
        self.set.push((key, value.into()));
    }

    pub fn remove(&mut self, key: impl Into<String>) {
        self.remove.push(key.into());
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty() && self.remove.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&StyleValue> {
        self.set.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Removals first, then assignments.
    pub fn apply(&self, styles: &mut StyleMap) {
        for key in &self.remove {
            styles.remove(key);
        }
        for (key, value) in &self.set {
            styles.set(key.clone(), value.clone());
        }
    }
}

/// Result of inlining one GROUP node.
#[derive(Debug)]
pub enum GroupOutcome<'src> {
    /// Nothing to render.
    Empty,
    /// The group is replaced by its only child.
    Inlined {
        child: AltNode<'src>,
        patch: StylePatch,
    },
    /// Synthetic container stacking several children.
    Stacked(AltNode<'src>),
}

impl<'src> GroupOutcome<'src> {
    pub fn into_node(self) -> Option<AltNode<'src>> {
        match self {
            GroupOutcome::Empty => None,
            GroupOutcome::Inlined { mut child, patch } => {
                patch.apply(&mut child.styles);
                Some(child)
            }
            GroupOutcome::Stacked(node) => Some(node),
        }
    }
}

pub(super) fn inline_group<'src>(
    session: &mut TransformSession,
    group: &'src DesignNode,
    parent_rotation: f64,
    parent: &ParentContext,
) -> GroupOutcome<'src> {
    let candidates: Vec<&'src DesignNode> = group
        .children()
        .iter()
        .filter(|child| session.keeps(child))
        .collect();
    let rotation = parent_rotation + group.rotation_degrees();

    match candidates.as_slice() {
        [] => {
            debug!(node_id = %group.id, "dropping empty group");
            GroupOutcome::Empty
        }
        [only] => {
            let only = *only;
            let Some(child) = session.transform_node(only, rotation, parent) else {
                return GroupOutcome::Empty;
            };
            debug!(node_id = %group.id, child = %child.unique_name, "inlining single-child group");
            GroupOutcome::Inlined {
                child,
                patch: single_child_patch(group, only, parent),
            }
        }
        many => stack_children(session, group, many, rotation, parent),
    }
}

fn single_child_patch(group: &DesignNode, child: &DesignNode, parent: &ParentContext) -> StylePatch {
    let mut patch = StylePatch::new();

    if group.is_absolute() {
        patch.set("position", "absolute");
        let own = group.rotation_degrees();
        match (own != 0.0, group.bounds, parent.bounds) {
            (true, Some(bounds), Some(parent_bounds)) => {
                patch.set("left", px(bounds.x - parent_bounds.x));
                patch.set("top", px(bounds.y - parent_bounds.y));
                patch.set("transform", composed_rotation(own, child.rotation_degrees()));
                if let Some(size) = group.size {
                    patch.set("width", px(size.x));
                    patch.set("height", px(size.y));
                }
            }
            _ => {
                if let Some(transform) = group.relative_transform {
                    patch.set("left", px(transform[0][2]));
                    patch.set("top", px(transform[1][2]));
                }
            }
        }
    }

    if group.opacity != 1.0 {
        patch.set("opacity", group.opacity);
    }

    patch
}

/// The group turns first, then the child inside it.
fn composed_rotation(group: f64, child: f64) -> String {
    if child == 0.0 {
        format!("rotate({}deg)", format_number(group))
    } else {
        format!(
            "rotate({}deg) rotate({}deg)",
            format_number(group),
            format_number(child)
        )
    }
}

fn stack_children<'src>(
    session: &mut TransformSession,
    group: &'src DesignNode,
    children: &[&'src DesignNode],
    rotation: f64,
    parent: &ParentContext,
) -> GroupOutcome<'src> {
    let unique_name = session.next_name(&group.name);
    let mut node = AltNode::new(group, unique_name, NodeType::Group);
    node.cumulative_rotation = rotation;
    node.styles.set("display", "inline-grid");
    node.styles.set("grid-template-columns", "max-content");
    node.styles.set("grid-template-rows", "max-content");
    node.styles.set("place-items", "start");

    if !parent.is_auto_layout() || group.is_absolute() {
        if let (Some(bounds), Some(parent_bounds)) = (group.bounds, parent.bounds) {
            node.styles.set("position", "absolute");
            node.styles.set("width", px(bounds.width));
            node.styles.set("height", px(bounds.height));
            for (key, value) in absolute_offsets(bounds, parent_bounds, group.constraints.unwrap_or_default()) {
                node.styles.set(key, value);
            }
        }
    }
    if group.opacity != 1.0 {
        node.styles.set("opacity", group.opacity);
    }

    let (mask_ref, rest) = match children.split_first() {
        Some((first, rest)) if first.is_mask => (
            first.fills().iter().find_map(|p| p.image_ref()).map(str::to_string),
            rest,
        ),
        _ => (None, children),
    };

    let context = ParentContext {
        layout_mode: None,
        bounds: group.bounds,
        sizing_horizontal: parent.sizing_horizontal,
        sizing_vertical: parent.sizing_vertical,
    };
    for &source in rest {
        let Some(mut child) = session.transform_node(source, rotation, &context) else {
            continue;
        };
        if mask_ref.is_some() {
            child.mask_image_ref = mask_ref.clone();
        }
        stacked_child_patch(source, group.bounds).apply(&mut child.styles);
        if !child.is_absolute() && child.children.iter().any(AltNode::is_absolute) {
            child.styles.set("position", "relative");
        }
        node.children.push(child);
    }

    if node.children.is_empty() {
        return GroupOutcome::Empty;
    }
    debug!(
        node_id = %group.id,
        children = node.children.len(),
        "stacking multi-child group"
    );
    GroupOutcome::Stacked(node)
}

/// Children share grid cell `1 / 1`; right/bottom-pinned children stay absolute.
fn stacked_child_patch(child: &DesignNode, group_bounds: Option<Rect>) -> StylePatch {
    let mut patch = StylePatch::new();
    let constraints = child.constraints.unwrap_or_default();
    let pinned = constraints.horizontal == Constraint::Max || constraints.vertical == Constraint::Max;

    if let (true, Some(bounds), Some(group_bounds)) = (pinned, child.bounds, group_bounds) {
        for key in ["left", "top", "right", "bottom"] {
            patch.remove(key);
        }
        patch.set("position", "absolute");
        for (key, value) in absolute_offsets(bounds, group_bounds, constraints) {
            patch.set(key, value);
        }
        return patch;
    }

    for key in ["position", "top", "left", "right", "bottom", "translate"] {
        patch.remove(key);
    }
    patch.set("grid-area", "1 / 1");
    if let (Some(bounds), Some(group_bounds)) = (child.bounds, group_bounds) {
        let dx = (bounds.x - group_bounds.x).round();
        let dy = (bounds.y - group_bounds.y).round();
        if dx > 0.0 {
            patch.set("margin-left", px(dx));
        }
        if dy > 0.0 {
            patch.set("margin-top", px(dy));
        }
    }
    patch
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_applies_removals_before_assignments() {
        let mut styles: StyleMap = [("position", "absolute"), ("top", "4px")].into_iter().collect();
        let mut patch = StylePatch::new();
        patch.remove("position");
        patch.remove("top");
        patch.set("position", "relative");
        patch.apply(&mut styles);

        assert!(styles.is("position", "relative"));
        assert!(!styles.contains_key("top"));
    }

    #[test]
    fn patch_set_replaces_earlier_value() {
        let mut patch = StylePatch::new();
        patch.set("opacity", 0.5);
        patch.set("opacity", 0.25);
        assert_eq!(patch.get("opacity"), Some(&StyleValue::Num(0.25)));
        assert!(!patch.is_empty());
    }
}
