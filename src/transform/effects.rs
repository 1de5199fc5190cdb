//! Shadows and blurs.

use crate::alt_node::{px, AltNode};
use crate::figma::paint::{Color, Effect, EffectType};
use crate::figma::DesignNode;

pub(super) fn apply(node: &DesignNode, alt: &mut AltNode<'_>) {
    let visible: Vec<&Effect> = node.effects.iter().filter(|e| e.visible).collect();
    if visible.is_empty() {
        return;
    }

    let drop_shadows: Vec<&Effect> = visible
        .iter()
        .copied()
        .filter(|e| e.effect_type == EffectType::DropShadow)
        .collect();

    if node.has_image_fill() && !drop_shadows.is_empty() {
        // box-shadow would outline the box, not the image content
        let filter = drop_shadows
            .iter()
            .map(|e| {
                format!(
                    "drop-shadow({} {} {} {})",
                    px(e.offset.x),
                    px(e.offset.y),
                    px(e.radius),
                    shadow_color(e)
                )
            })
            .collect::<Vec<_>>()
            .join(" ");
        alt.styles.set("filter", filter);
    } else {
        let shadows = visible
            .iter()
            .filter_map(|e| match e.effect_type {
                EffectType::DropShadow => Some(box_shadow(e, false)),
                EffectType::InnerShadow => Some(box_shadow(e, true)),
                _ => None,
            })
            .collect::<Vec<_>>();
        if !shadows.is_empty() {
            alt.styles.set("box-shadow", shadows.join(", "));
        }
    }

    for effect in &visible {
        match effect.effect_type {
            EffectType::LayerBlur if effect.radius > 0.0 => {
                let blur = format!("blur({})", px(effect.radius));
                let filter = match alt.styles.get_string("filter") {
                    Some(existing) => format!("{} {}", existing, blur),
                    None => blur,
                };
                alt.styles.set("filter", filter);
            }
            EffectType::BackgroundBlur if effect.radius > 0.0 => {
                alt.styles
                    .set("backdrop-filter", format!("blur({})", px(effect.radius)));
            }
            _ => {}
        }
    }
}

fn shadow_color(effect: &Effect) -> String {
    let color = effect.color.unwrap_or(Color::default());
    color.to_css_rgba(color.a)
}

fn box_shadow(effect: &Effect, inset: bool) -> String {
    format!(
        "{}{} {} {} {} {}",
        if inset { "inset " } else { "" },
        px(effect.offset.x),
        px(effect.offset.y),
        px(effect.radius),
        px(effect.spread),
        shadow_color(effect)
    )
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::alt_node::AltNode;
    use crate::figma::DesignNode;

    fn run(value: serde_json::Value) -> crate::alt_node::StyleMap {
        let node = DesignNode::from_value(value).expect("node");
        let mut alt = AltNode::new(&node, "Node".into(), node.node_type);
        super::apply(&node, &mut alt);
        alt.styles
    }

    #[test]
    fn shadows_become_box_shadow_list() {
        let styles = run(json!({
            "id": "1", "type": "FRAME",
            "effects": [
                { "type": "DROP_SHADOW", "offset": { "x": 0, "y": 4 }, "radius": 8,
                  "color": { "r": 0, "g": 0, "b": 0, "a": 0.25 } },
                { "type": "INNER_SHADOW", "offset": { "x": 1, "y": 1 }, "radius": 2, "spread": 1 },
                { "type": "DROP_SHADOW", "visible": false, "radius": 40 }
            ]
        }));
        assert_eq!(
            styles.get_string("box-shadow").as_deref(),
            Some("0px 4px 8px 0px rgba(0, 0, 0, 0.25), inset 1px 1px 2px 1px rgba(0, 0, 0, 1)")
        );
    }

    #[test]
    fn image_fill_uses_drop_shadow_filter_and_blurs_append() {
        let styles = run(json!({
            "id": "1", "type": "RECTANGLE",
            "fills": [{ "type": "IMAGE", "imageRef": "abc" }],
            "effects": [
                { "type": "DROP_SHADOW", "offset": { "x": 2, "y": 2 }, "radius": 4 },
                { "type": "LAYER_BLUR", "radius": 3 },
                { "type": "BACKGROUND_BLUR", "radius": 10 }
            ]
        }));
        assert_eq!(
            styles.get_string("filter").as_deref(),
            Some("drop-shadow(2px 2px 4px rgba(0, 0, 0, 1)) blur(3px)")
        );
        assert_eq!(styles.get_string("backdrop-filter").as_deref(), Some("blur(10px)"));
        assert!(!styles.contains_key("box-shadow"));
    }
}
