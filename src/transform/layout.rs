//! Auto-layout, positioning and sizing.

use super::ParentContext;
use crate::alt_node::{format_number, px, AltNode, StyleValue};
use crate::figma::paint::{PaintKind, Rect, ScaleMode};
use crate::figma::{AxisAlign, Constraint, Constraints, DesignNode, LayoutMode, LayoutWrap, NodeType, Sizing};

pub(super) fn apply(node: &DesignNode, alt: &mut AltNode<'_>, parent: &ParentContext) {
    container_layout(node, alt, parent);
    positioning(node, alt, parent);
    grid_spans(node, alt);
    sizing(node, alt, parent);
}

fn container_layout(node: &DesignNode, alt: &mut AltNode<'_>, parent: &ParentContext) {
    let Some(layout) = node.auto_layout() else {
        return;
    };
    let styles = &mut alt.styles;

    match layout.mode {
        LayoutMode::Grid => {
            styles.set("display", "grid");
            if let Some(grid) = &layout.grid {
                let template = |sizing: &Option<String>, count: u32| {
                    sizing
                        .clone()
                        .or_else(|| (count > 0).then(|| format!("repeat({}, minmax(0, 1fr))", count)))
                };
                if let Some(columns) = template(&grid.columns_sizing, grid.columns) {
                    styles.set("grid-template-columns", columns);
                }
                if let Some(rows) = template(&grid.rows_sizing, grid.rows) {
                    styles.set("grid-template-rows", rows);
                }
                if grid.column_gap > 0.0 {
                    styles.set("column-gap", px(grid.column_gap));
                }
                if grid.row_gap > 0.0 {
                    styles.set("row-gap", px(grid.row_gap));
                }
            }
        }
        LayoutMode::Horizontal | LayoutMode::Vertical => {
            let display = if parent.layout_mode == Some(layout.mode) {
                "flex"
            } else {
                "inline-flex"
            };
            styles.set("display", display);
            let direction = if layout.mode == LayoutMode::Horizontal {
                "row"
            } else {
                "column"
            };
            styles.set("flex-direction", direction);
            if let Some(justify) = axis_keyword(layout.primary_align) {
                styles.set("justify-content", justify);
            }
            if let Some(align) = axis_keyword(layout.counter_align) {
                styles.set("align-items", align);
            }
            if layout.wrap == LayoutWrap::Wrap {
                styles.set("flex-wrap", "wrap");
            }
        }
        LayoutMode::None | LayoutMode::Unknown => {}
    }

    let p = layout.padding;
    if !p.is_zero() {
        let value = if p.top == p.bottom && p.left == p.right {
            if p.top == p.left {
                px(p.top)
            } else {
                format!("{} {}", px(p.top), px(p.right))
            }
        } else {
            format!("{} {} {} {}", px(p.top), px(p.right), px(p.bottom), px(p.left))
        };
        styles.set("padding", value);
    }
}

fn axis_keyword(align: AxisAlign) -> Option<&'static str> {
    match align {
        AxisAlign::Min => Some("flex-start"),
        AxisAlign::Center => Some("center"),
        AxisAlign::Max => Some("flex-end"),
        AxisAlign::SpaceBetween => Some("space-between"),
        AxisAlign::Baseline => Some("baseline"),
        AxisAlign::Unknown => None,
    }
}

fn positioning(node: &DesignNode, alt: &mut AltNode<'_>, parent: &ParentContext) {
    let (Some(bounds), Some(parent_bounds)) = (node.bounds, parent.bounds) else {
        return;
    };
    let free_positioned = !parent.is_auto_layout() && node.constraints.is_some();
    if !node.is_absolute() && !free_positioned {
        return;
    }
    alt.styles.set("position", "absolute");
    for (key, value) in absolute_offsets(bounds, parent_bounds, node.constraints.unwrap_or_default()) {
        alt.styles.set(key, value);
    }
}

/// Offsets pinning `bounds` inside `parent` according to the constraints.
///
/// MIN pins left/top, MAX pins right/bottom, CENTER uses `calc(50% +/- Xpx)`
/// with a -50% translate, STRETCH pins both sides and SCALE uses percentages.
pub(crate) fn absolute_offsets(
    bounds: Rect,
    parent: Rect,
    constraints: Constraints,
) -> Vec<(&'static str, StyleValue)> {
    let mut out = Vec::new();
    let x = bounds.x - parent.x;
    let y = bounds.y - parent.y;
    let right = parent.width - x - bounds.width;
    let bottom = parent.height - y - bounds.height;

    let center_x = axis_offsets(
        &mut out,
        constraints.horizontal,
        ("left", "right"),
        x,
        right,
        bounds.width,
        parent.width,
    );
    let center_y = axis_offsets(
        &mut out,
        constraints.vertical,
        ("top", "bottom"),
        y,
        bottom,
        bounds.height,
        parent.height,
    );

    let translate = match (center_x, center_y) {
        (true, true) => Some("-50% -50%"),
        (true, false) => Some("-50% 0"),
        (false, true) => Some("0 -50%"),
        (false, false) => None,
    };
    if let Some(translate) = translate {
        out.push(("translate", translate.into()));
    }
    out
}

/// Pushes the offsets for one axis; returns true for a centered axis.
fn axis_offsets(
    out: &mut Vec<(&'static str, StyleValue)>,
    constraint: Constraint,
    (start_key, end_key): (&'static str, &'static str),
    start: f64,
    end: f64,
    size: f64,
    parent_size: f64,
) -> bool {
    match constraint {
        Constraint::Center => {
            let offset = start + size / 2.0 - parent_size / 2.0;
            let sign = if offset >= 0.0 { "+" } else { "-" };
            out.push((
                start_key,
                format!("calc(50% {} {:.2}px)", sign, offset.abs()).into(),
            ));
            return true;
        }
        Constraint::Max => out.push((end_key, px(end).into())),
        Constraint::Stretch => {
            out.push((start_key, px(start).into()));
            out.push((end_key, px(end).into()));
        }
        Constraint::Scale if parent_size > 0.0 => {
            out.push((
                start_key,
                format!("{}%", format_number(start / parent_size * 100.0)).into(),
            ));
        }
        Constraint::Min | Constraint::Scale | Constraint::Unknown => {
            out.push((start_key, px(start).into()))
        }
    }
    false
}

fn grid_spans(node: &DesignNode, alt: &mut AltNode<'_>) {
    let anchor = |key: &str| {
        node.attribute(key)
            .and_then(|v| v.as_u64())
            .unwrap_or(0)
    };
    if let Some(span) = node.layout_child.grid_column_span.filter(|s| *s > 1) {
        alt.styles.set(
            "grid-column",
            format!("{} / span {}", anchor("gridColumnAnchorIndex") + 1, span),
        );
    }
    if let Some(span) = node.layout_child.grid_row_span.filter(|s| *s > 1) {
        alt.styles.set(
            "grid-row",
            format!("{} / span {}", anchor("gridRowAnchorIndex") + 1, span),
        );
    }
}

fn sizing(node: &DesignNode, alt: &mut AltNode<'_>, parent: &ParentContext) {
    let Some(bounds) = node.bounds else {
        return;
    };
    let child = &node.layout_child;
    let rotated_size = node.size.filter(|_| node.rotation != 0.0);
    let hugs_content = !node.children().is_empty() || node.node_type == NodeType::Text;

    let width = if child.grow > 0.0 {
        None
    } else {
        Some(match child.sizing_horizontal {
            Some(Sizing::Fill) => "100%".to_string(),
            Some(Sizing::Hug) if hugs_content => "auto".to_string(),
            _ => match rotated_size {
                Some(size) => px(size.x),
                None => px(bounds.width),
            },
        })
    };
    if let Some(width) = width {
        alt.styles.set("width", width);
    }

    let cropped_image = node.fills().iter().any(|p| {
        matches!(&p.kind, PaintKind::Image(image) if image.scale_mode == ScaleMode::Fill)
    });
    let parent_hugs = parent.sizing_vertical == Some(Sizing::Hug);
    let height = match child.sizing_vertical {
        Some(Sizing::Fill) if cropped_image || parent_hugs => px(bounds.height),
        Some(Sizing::Fill) => "100%".to_string(),
        Some(Sizing::Hug) if hugs_content => "auto".to_string(),
        _ => match rotated_size {
            Some(size) => px(size.y),
            None => px(bounds.height),
        },
    };
    alt.styles.set("height", height);

    if child.grow == 1.0 {
        if child.sizing_vertical != Some(Sizing::Fill) {
            alt.styles.set("min-height", "1px");
        }
        if child.sizing_horizontal != Some(Sizing::Fill) {
            alt.styles.set("min-width", "1px");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f64, y: f64, width: f64, height: f64) -> Rect {
        Rect { x, y, width, height }
    }

    #[test]
    fn min_constraints_pin_left_and_top() {
        let offsets = absolute_offsets(rect(110.0, 220.0, 10.0, 10.0), rect(100.0, 200.0, 100.0, 100.0), Constraints::default());
        assert_eq!(offsets, vec![("left", "10px".into()), ("top", "20px".into())]);
    }

    #[test]
    fn max_constraints_pin_right_and_bottom() {
        let constraints = Constraints {
            horizontal: Constraint::Max,
            vertical: Constraint::Max,
        };
        let offsets = absolute_offsets(rect(80.0, 70.0, 10.0, 20.0), rect(0.0, 0.0, 100.0, 100.0), constraints);
        assert_eq!(offsets, vec![("right", "10px".into()), ("bottom", "10px".into())]);
    }

    #[test]
    fn center_constraints_use_calc_and_translate() {
        let constraints = Constraints {
            horizontal: Constraint::Center,
            vertical: Constraint::Min,
        };
        let offsets = absolute_offsets(rect(40.0, 0.0, 10.0, 10.0), rect(0.0, 0.0, 100.0, 100.0), constraints);
        assert_eq!(offsets[0], ("left", "calc(50% - 5.00px)".into()));
        assert_eq!(offsets[1], ("top", "0px".into()));
        assert_eq!(offsets[2], ("translate", "-50% 0".into()));
    }

    #[test]
    fn scale_constraint_uses_percentages() {
        let constraints = Constraints {
            horizontal: Constraint::Scale,
            vertical: Constraint::Stretch,
        };
        let offsets = absolute_offsets(rect(25.0, 10.0, 50.0, 80.0), rect(0.0, 0.0, 100.0, 100.0), constraints);
        assert_eq!(offsets[0], ("left", "25%".into()));
        assert_eq!(offsets[1], ("top", "10px".into()));
        assert_eq!(offsets[2], ("bottom", "10px".into()));
    }
}
