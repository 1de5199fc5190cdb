//! Plain HTML markup plus a stylesheet with one rule per node.

use crate::alt_node::{
    px, AltNode, FillLayerKind, FlexDirection, NegativeSpacing, Presence, StyleMap,
};
use crate::figma::node::HtmlTag;

use super::assets::{placeholder_image_url, ResolvedAssets};
use super::helpers::{data_attribute_string, escape_attribute, kebab_case, text_content};
use super::tailwind::split_classes;
use super::{is_rendered, node_styles, svg, GenerateRequest, Rendered};

const TABLET_MIN_WIDTH: u32 = 768;
const DESKTOP_MIN_WIDTH: u32 = 1024;

struct CssRule {
    selector: String,
    styles: StyleMap,
}

#[derive(Default)]
struct Stylesheet {
    base: Vec<CssRule>,
    tablet: Vec<CssRule>,
    desktop: Vec<CssRule>,
}

fn declarations(styles: &StyleMap, indent: &str) -> String {
    styles
        .iter()
        .map(|(key, value)| format!("{}{}: {};", indent, key, value))
        .collect::<Vec<_>>()
        .join("\n")
}

fn rule_block(rule: &CssRule, indent: &str) -> String {
    format!(
        "{indent}.{} {{\n{}\n{indent}}}",
        rule.selector,
        declarations(&rule.styles, &format!("{}  ", indent)),
    )
}

impl Stylesheet {
    fn push(rules: &mut Vec<CssRule>, selector: &str, styles: StyleMap) {
        if !styles.is_empty() {
            rules.push(CssRule {
                selector: selector.to_string(),
                styles,
            });
        }
    }

    fn render(&self, root_variables: Option<String>) -> String {
        let mut blocks: Vec<String> = Vec::new();
        blocks.extend(root_variables);
        blocks.extend(self.base.iter().map(|rule| rule_block(rule, "")));
        for (min_width, rules) in [(TABLET_MIN_WIDTH, &self.tablet), (DESKTOP_MIN_WIDTH, &self.desktop)] {
            if rules.is_empty() {
                continue;
            }
            let body = rules
                .iter()
                .map(|rule| rule_block(rule, "  "))
                .collect::<Vec<_>>()
                .join("\n\n");
            blocks.push(format!("@media (min-width: {}px) {{\n{}\n}}", min_width, body));
        }
        blocks.join("\n\n")
    }
}

/// Several paints, or an image behind children, need one element per layer.
fn is_layered(node: &AltNode<'_>) -> bool {
    let has_image = node.fills.iter().any(|layer| layer.image_ref().is_some());
    node.fills.len() > 1 || (has_image && !node.children.is_empty())
}

/// `display` changes for a node that exists only at some breakpoints:
/// `Some(shown)` where a breakpoint differs from the one below it.
fn presence_toggles(presence: &Presence) -> [Option<bool>; 3] {
    [
        (!presence.mobile).then_some(false),
        (presence.tablet != presence.mobile).then_some(presence.tablet),
        (presence.desktop != presence.tablet).then_some(presence.desktop),
    ]
}

struct HtmlRenderer<'r, 'a, 'src> {
    request: &'r GenerateRequest<'a, 'src>,
    assets: &'r ResolvedAssets,
    sheet: Stylesheet,
    warnings: Vec<String>,
}

pub(super) fn render(request: &GenerateRequest<'_, '_>, assets: &ResolvedAssets) -> Rendered {
    let mut renderer = HtmlRenderer {
        request,
        assets,
        sheet: Stylesheet::default(),
        warnings: Vec::new(),
    };
    let mut html = String::new();
    renderer.element(request.root, 0, None, &mut html);
    let html = html.trim_end().to_string();
    let css = renderer.sheet.render(request.root_variables());

    Rendered {
        code: format!("<!-- HTML -->\n{}\n\n/* CSS */\n{}", html, css),
        css: Some(css),
        assets: Vec::new(),
        warnings: renderer.warnings,
    }
}

impl<'r, 'a, 'src> HtmlRenderer<'r, 'a, 'src> {
    fn image_url(&self, node: &AltNode<'_>, image_ref: &str) -> String {
        match self.assets.image_url(image_ref) {
            Some(url) => url.to_string(),
            None => {
                let bounds = node.source.bounds_or_zero();
                placeholder_image_url(bounds.width, bounds.height)
            }
        }
    }

    fn svg_src(&mut self, node: &AltNode<'_>) -> String {
        if let Some(exported) = self.assets.svg(&node.id) {
            return svg::data_url(exported);
        }
        if let Some(data) = &node.svg {
            return svg::data_url(&svg::reconstruct(data));
        }
        let bounds = node.source.bounds_or_zero();
        self.warnings
            .push(format!("SVG for node {} unavailable; placeholder used", node.id));
        svg::data_url(&svg::placeholder(bounds.width, bounds.height))
    }

    /// Register the stylesheet rules for one node.
    ///
    /// `spacing` is the parent's negative item spacing and whether this node
    /// is the last child (which keeps its margin).
    fn register(
        &mut self,
        node: &AltNode<'_>,
        class: &str,
        mut styles: StyleMap,
        spacing: Option<(NegativeSpacing, bool)>,
    ) {
        if let Some(image) = node.fills.iter().find_map(|layer| layer.image_ref()) {
            if styles.contains_key("background-image") {
                styles.set("background-image", format!("url({})", self.image_url(node, image)));
            }
        }
        if let Some((spacing, false)) = spacing {
            let side = match spacing.direction {
                FlexDirection::Row => "margin-right",
                FlexDirection::Column => "margin-bottom",
            };
            styles.set(side, px(spacing.value));
        }
        if let Some(url) = node
            .mask_image_ref
            .as_deref()
            .and_then(|mask| self.assets.image_url(mask))
        {
            let image = format!("url('{}')", url);
            for prefix in ["-webkit-", ""] {
                styles.set(format!("{}mask-image", prefix), image.clone());
                styles.set(format!("{}mask-size", prefix), "contain");
                styles.set(format!("{}mask-repeat", prefix), "no-repeat");
                styles.set(format!("{}mask-position", prefix), "center");
            }
        }

        let display = styles.get_string("display").unwrap_or_else(|| "block".to_string());
        let mut tablet = StyleMap::new();
        let mut desktop = StyleMap::new();
        if let Some(responsive) = &node.responsive {
            if let Some(md) = &responsive.md {
                tablet.merge(md);
            }
            if let Some(lg) = &responsive.lg {
                desktop.merge(lg);
            }
        }
        if let Some(presence) = node.presence.filter(Presence::is_partial) {
            let [mobile, md, lg] = presence_toggles(&presence);
            let value = |shown: bool| if shown { display.clone() } else { "none".to_string() };
            if let Some(shown) = mobile {
                styles.set("display", value(shown));
            }
            if let Some(shown) = md {
                tablet.set("display", value(shown));
            }
            if let Some(shown) = lg {
                desktop.set("display", value(shown));
            }
        }

        Stylesheet::push(&mut self.sheet.base, class, styles);
        Stylesheet::push(&mut self.sheet.tablet, class, tablet);
        Stylesheet::push(&mut self.sheet.desktop, class, desktop);
    }

    /// Decorative stack with one absolutely positioned element per paint layer.
    fn fill_layers(&mut self, node: &AltNode<'_>, class: &str, depth: usize, out: &mut String) {
        let indent = "  ".repeat(depth);
        let inner = "  ".repeat(depth + 1);
        let rounded = node
            .styles
            .get_string("border-radius")
            .is_some_and(|r| r != "0px" && r != "0");

        let wrapper = format!("{}-fills", class);
        let mut wrapper_styles: StyleMap = [
            ("position", "absolute"),
            ("inset", "0"),
            ("pointer-events", "none"),
        ]
        .into_iter()
        .collect();
        if rounded {
            wrapper_styles.set("overflow", "hidden");
            wrapper_styles.set("border-radius", "inherit");
        }
        Stylesheet::push(&mut self.sheet.base, &wrapper, wrapper_styles);
        out.push_str(&format!("{indent}<div class=\"{wrapper}\" aria-hidden=\"true\">\n"));

        for (index, layer) in node.fills.iter().enumerate() {
            let layer_class = format!("{}-fill-{}", class, index + 1);
            let mut styles: StyleMap = [("position", "absolute"), ("inset", "0")].into_iter().collect();
            if rounded {
                styles.set("border-radius", "inherit");
            }
            match &layer.kind {
                FillLayerKind::Image { image_ref, scale_mode } => {
                    styles.set("width", "100%");
                    styles.set("height", "100%");
                    styles.set("object-fit", scale_mode.object_fit());
                    if layer.opacity < 1.0 {
                        styles.set("opacity", layer.opacity);
                    }
                    let src = escape_attribute(&self.image_url(node, image_ref));
                    out.push_str(&format!(
                        "{inner}<img class=\"{layer_class}\" alt=\"\" src=\"{src}\" />\n"
                    ));
                }
                FillLayerKind::Solid { color } => {
                    styles.set("background-color", color.to_css_rgba(color.a * layer.opacity));
                    out.push_str(&format!("{inner}<div class=\"{layer_class}\"></div>\n"));
                }
                FillLayerKind::Gradient { css } => {
                    styles.set("background-image", css.clone());
                    out.push_str(&format!("{inner}<div class=\"{layer_class}\"></div>\n"));
                }
            }
            Stylesheet::push(&mut self.sheet.base, &layer_class, styles);
        }
        out.push_str(&format!("{indent}</div>\n"));
    }

    fn element(
        &mut self,
        node: &AltNode<'_>,
        depth: usize,
        spacing: Option<(NegativeSpacing, bool)>,
        out: &mut String,
    ) {
        if !is_rendered(node) {
            return;
        }
        let indent = "  ".repeat(depth);
        let class = kebab_case(&node.unique_name);
        let resolved = node_styles(self.request, node);
        let mut class_attr = class.clone();
        if let Some(extra) = &resolved.rule_classes {
            for extra in split_classes(extra) {
                class_attr.push(' ');
                class_attr.push_str(&extra);
            }
        }
        let data = data_attribute_string(node);
        let alt = escape_attribute(&node.name);

        if svg::is_svg_node(node) {
            let src = self.svg_src(node);
            self.register(node, &class, resolved.styles, spacing);
            out.push_str(&format!(
                "{indent}<img class=\"{class_attr}\" {data} alt=\"{alt}\" src=\"{src}\" />\n"
            ));
            return;
        }

        let single_image = node.children.is_empty() && node.fills.len() == 1;
        if let (true, Some(image_ref)) = (single_image, node.fills.first().and_then(|l| l.image_ref())) {
            let src = escape_attribute(&self.image_url(node, image_ref));
            let mut styles = resolved.styles;
            styles.remove("background-image");
            styles.remove("background-size");
            if let Some(image) = &node.image {
                styles.set("object-fit", image.scale_mode.object_fit());
            }
            self.register(node, &class, styles, spacing);
            out.push_str(&format!(
                "{indent}<img class=\"{class_attr}\" {data} alt=\"{alt}\" src=\"{src}\" />\n"
            ));
            return;
        }

        let layered = !node.is_text() && is_layered(node);
        let mut styles = resolved.styles;
        if layered {
            styles.remove("background-image");
            styles.remove("background-size");
            if !styles.contains_key("position") {
                styles.set("position", "relative");
            }
        }
        self.register(node, &class, styles, spacing);
        let tag = match node.tag {
            HtmlTag::Svg => "div",
            tag => tag.as_str(),
        };

        if node.is_text() {
            let content = node.characters().map(text_content).unwrap_or_default();
            out.push_str(&format!(
                "{indent}<{tag} class=\"{class_attr}\" {data}>{content}</{tag}>\n"
            ));
            return;
        }
        if node.children.is_empty() && !layered {
            out.push_str(&format!("{indent}<{tag} class=\"{class_attr}\" {data}></{tag}>\n"));
            return;
        }
        out.push_str(&format!("{indent}<{tag} class=\"{class_attr}\" {data}>\n"));
        if layered {
            self.fill_layers(node, &class, depth + 1, out);
        }
        let count = node.children.len();
        for (index, child) in node.children.iter().enumerate() {
            let spacing = node.negative_spacing.map(|s| (s, index + 1 == count));
            self.element(child, depth + 1, spacing, out);
        }
        out.push_str(&format!("{indent}</{tag}>\n"));
    }
}
