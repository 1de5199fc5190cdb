//! Visual utilities: colors, borders, radii, typography, effects.

use super::scale::{arbitrary, escape_arbitrary, parse_px};
use crate::alt_node::format_number;

/// Uppercase hex -> Tailwind color name.
const PALETTE: [(&str, &str); 26] = [
    ("#FFFFFF", "white"),
    ("#000000", "black"),
    ("#F9FAFB", "gray-50"),
    ("#F3F4F6", "gray-100"),
    ("#E5E7EB", "gray-200"),
    ("#D1D5DB", "gray-300"),
    ("#9CA3AF", "gray-400"),
    ("#6B7280", "gray-500"),
    ("#4B5563", "gray-600"),
    ("#374151", "gray-700"),
    ("#1F2937", "gray-800"),
    ("#111827", "gray-900"),
    ("#FEE2E2", "red-100"),
    ("#FECACA", "red-200"),
    ("#FCA5A5", "red-300"),
    ("#F87171", "red-400"),
    ("#EF4444", "red-500"),
    ("#DC2626", "red-600"),
    ("#B91C1C", "red-700"),
    ("#DBEAFE", "blue-100"),
    ("#BFDBFE", "blue-200"),
    ("#93C5FD", "blue-300"),
    ("#60A5FA", "blue-400"),
    ("#3B82F6", "blue-500"),
    ("#2563EB", "blue-600"),
    ("#1D4ED8", "blue-700"),
];

pub(super) fn map(prop: &str, value: &str) -> Option<String> {
    let class = match prop {
        "background" | "backgroundcolor" => background(value),
        "backgroundimage" => arbitrary("bg", value),
        "backgroundsize" => match value {
            "cover" | "contain" | "auto" => format!("bg-{}", value),
            other => format!("bg-[length:{}]", escape_arbitrary(other)),
        },
        "color" => color_class("text", value),
        "border" => border(value),
        "borderwidth" => border_width("border", value),
        "bordertopwidth" => border_width("border-t", value),
        "borderrightwidth" => border_width("border-r", value),
        "borderbottomwidth" => border_width("border-b", value),
        "borderleftwidth" => border_width("border-l", value),
        "bordercolor" => color_class("border", value),
        "borderstyle" => border_style(value).to_string(),
        "borderradius" => radius("rounded", value),
        "bordertopleftradius" => radius("rounded-tl", value),
        "bordertoprightradius" => radius("rounded-tr", value),
        "borderbottomrightradius" => radius("rounded-br", value),
        "borderbottomleftradius" => radius("rounded-bl", value),
        "transform" => transform(value),
        "opacity" => opacity(value),
        "fontfamily" => font_family(value),
        "fontweight" => font_weight(value),
        "fontstyle" => match value {
            "italic" => "italic",
            "normal" => "not-italic",
            _ => "",
        }
        .to_string(),
        "fontvariant" => format!("[font-variant:{}]", escape_arbitrary(value)),
        "fontsize" => font_size(value),
        "lineheight" => line_height(value),
        "letterspacing" => arbitrary("tracking", value),
        "texttransform" => match value {
            "uppercase" | "lowercase" | "capitalize" => value,
            "none" => "normal-case",
            _ => "",
        }
        .to_string(),
        "textdecoration" => match value {
            "underline" | "line-through" => value,
            "none" => "no-underline",
            _ => "",
        }
        .to_string(),
        "textalign" => match value {
            "left" | "center" | "right" | "justify" => format!("text-{}", value),
            _ => String::new(),
        },
        "verticalalign" => match value {
            "baseline" | "text-top" | "text-bottom" => format!("align-{}", value),
            _ => String::new(),
        },
        "textindent" => arbitrary("indent", value),
        "filter" => blur_or_arbitrary("blur", "filter", value),
        "backdropfilter" => blur_or_arbitrary("backdrop-blur", "backdrop-filter", value),
        "mixblendmode" => mix_blend(value),
        "boxshadow" => match value {
            "none" => "shadow-none".to_string(),
            other => arbitrary("shadow", other),
        },
        "outline" => outline(value),
        "outlineoffset" => arbitrary("outline-offset", value),
        "clippath" => format!("[clip-path:{}]", escape_arbitrary(value)),
        _ => return None,
    };
    Some(class)
}

/// `(#RRGGBB, alpha)` for hex and `rgb[a](...)` colors.
fn parse_color(value: &str) -> Option<(String, f64)> {
    let value = value.trim();
    if let Some(hex) = value.strip_prefix('#') {
        let expanded = match hex.len() {
            3 => hex.chars().flat_map(|c| [c, c]).collect(),
            6 => hex.to_string(),
            _ => return None,
        };
        if !expanded.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        return Some((format!("#{}", expanded.to_ascii_uppercase()), 1.0));
    }

    let inner = value
        .strip_prefix("rgba(")
        .or_else(|| value.strip_prefix("rgb("))?
        .strip_suffix(')')?;
    let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
    let channel = |i: usize| parts.get(i)?.parse::<f64>().ok().map(|c| c.round().clamp(0.0, 255.0) as u8);
    let (r, g, b) = (channel(0)?, channel(1)?, channel(2)?);
    let alpha = match parts.get(3) {
        Some(a) => a.parse::<f64>().ok()?,
        None => 1.0,
    };
    Some((format!("#{:02X}{:02X}{:02X}", r, g, b), alpha))
}

/// Named palette color, arbitrary hex, or arbitrary `rgba(...)` when translucent.
pub(crate) fn color_class(prefix: &str, value: &str) -> String {
    if value.starts_with("var(") {
        return match prefix {
            "text" => format!("text-[color:{}]", escape_arbitrary(value)),
            _ => arbitrary(prefix, value),
        };
    }
    match value {
        "transparent" | "white" | "black" | "current" => return format!("{}-{}", prefix, value),
        _ => {}
    }
    match parse_color(value) {
        Some((_, alpha)) if alpha < 1.0 => arbitrary(prefix, value),
        Some((hex, _)) => match PALETTE.iter().find(|(h, _)| *h == hex) {
            Some((_, name)) => format!("{}-{}", prefix, name),
            None => format!("{}-[{}]", prefix, hex),
        },
        None => arbitrary(prefix, value),
    }
}

fn background(value: &str) -> String {
    if value.contains("gradient(") || value.starts_with("url(") {
        return arbitrary("bg", value);
    }
    color_class("bg", value)
}

/// `Npx style color` shorthand.
fn border(value: &str) -> String {
    if value == "none" || value == "0" || value == "0px" {
        return "border-0".to_string();
    }
    let mut parts = value.splitn(3, ' ');
    let width = parts.next().unwrap_or_default();
    let style = parts.next().unwrap_or("solid");
    let color = parts.next().unwrap_or_default().trim();

    let mut classes = vec![border_width("border", width), border_style(style).to_string()];
    if !color.is_empty() {
        classes.push(color_class("border", color));
    }
    classes.retain(|c| !c.is_empty());
    classes.join(" ")
}

fn border_width(prefix: &str, value: &str) -> String {
    match parse_px(value).map(f64::round) {
        Some(w) if w == 1.0 => prefix.to_string(),
        Some(w) if w == 0.0 || w == 2.0 || w == 4.0 || w == 8.0 => {
            format!("{}-{}", prefix, format_number(w))
        }
        Some(w) => format!("{}-[{}px]", prefix, format_number(w)),
        None => arbitrary(prefix, value),
    }
}

fn border_style(value: &str) -> &'static str {
    match value {
        "solid" => "border-solid",
        "dashed" => "border-dashed",
        "dotted" => "border-dotted",
        "double" => "border-double",
        "none" => "border-none",
        _ => "",
    }
}

fn radius(prefix: &str, value: &str) -> String {
    if value == "50%" {
        return format!("{}-full", prefix);
    }
    let Some(px) = parse_px(value) else {
        return arbitrary(prefix, value);
    };
    let rounded = px.round();
    let suffix = match rounded as i64 {
        0 => "-none",
        2 => "-sm",
        4 => "",
        6 => "-md",
        8 => "-lg",
        12 => "-xl",
        16 => "-2xl",
        24 => "-3xl",
        r if r >= 9999 => "-full",
        _ => return format!("{}-[{}px]", prefix, format_number(rounded)),
    };
    format!("{}{}", prefix, suffix)
}

fn transform(value: &str) -> String {
    let degrees = value
        .strip_prefix("rotate(")
        .and_then(|rest| rest.strip_suffix("deg)"))
        .and_then(|deg| deg.trim().parse::<f64>().ok());
    let Some(degrees) = degrees else {
        return format!("[transform:{}]", escape_arbitrary(value));
    };
    let rounded = degrees.round();
    let magnitude = rounded.abs() as i64;
    if magnitude == 0 {
        return String::new();
    }
    let sign = if rounded < 0.0 { "-" } else { "" };
    match magnitude {
        1 | 2 | 3 | 6 | 12 | 45 | 90 | 180 => format!("{}rotate-{}", sign, magnitude),
        _ => format!("rotate-[{}deg]", format_number(rounded)),
    }
}

/// Quartile buckets of the opacity scale.
fn opacity(value: &str) -> String {
    let Ok(opacity) = value.parse::<f64>() else {
        return arbitrary("opacity", value);
    };
    let bucket = if opacity <= 0.125 {
        0
    } else if opacity <= 0.375 {
        25
    } else if opacity <= 0.625 {
        50
    } else if opacity <= 0.875 {
        75
    } else {
        100
    };
    format!("opacity-{}", bucket)
}

fn font_family(value: &str) -> String {
    let family = value
        .split(',')
        .next()
        .unwrap_or_default()
        .trim()
        .trim_matches(|c| c == '\'' || c == '"');
    if family.is_empty() {
        return String::new();
    }
    format!("font-['{}']", family.replace(' ', "_"))
}

fn font_weight(value: &str) -> String {
    let name = match value {
        "100" => "thin",
        "200" => "extralight",
        "300" => "light",
        "400" => "normal",
        "500" => "medium",
        "600" => "semibold",
        "700" => "bold",
        "800" => "extrabold",
        "900" => "black",
        other => return arbitrary("font", other),
    };
    format!("font-{}", name)
}

fn font_size(value: &str) -> String {
    let Some(px) = parse_px(value) else {
        return arbitrary("text", value);
    };
    let rounded = px.round();
    let name = match rounded as i64 {
        12 => "xs",
        14 => "sm",
        16 => "base",
        18 => "lg",
        20 => "xl",
        24 => "2xl",
        30 => "3xl",
        36 => "4xl",
        48 => "5xl",
        60 => "6xl",
        72 => "7xl",
        96 => "8xl",
        128 => "9xl",
        _ => return format!("text-[{}px]", format_number(rounded)),
    };
    format!("text-{}", name)
}

fn line_height(value: &str) -> String {
    if let Some(px) = parse_px(value) {
        let rounded = px.round();
        let token = match rounded as i64 {
            12 => Some("3"),
            16 => Some("4"),
            20 => Some("5"),
            24 => Some("6"),
            28 => Some("7"),
            32 => Some("8"),
            36 => Some("9"),
            40 => Some("10"),
            _ => None,
        };
        return match token {
            Some(token) => format!("leading-{}", token),
            None => format!("leading-[{}px]", format_number(rounded)),
        };
    }
    let named = match value {
        "1" => Some("none"),
        "1.25" => Some("tight"),
        "1.38" | "1.375" => Some("snug"),
        "1.5" => Some("normal"),
        "1.63" | "1.625" => Some("relaxed"),
        "2" => Some("loose"),
        _ => None,
    };
    match named {
        Some(name) => format!("leading-{}", name),
        None => arbitrary("leading", value),
    }
}

/// Bucketed blur utility for a lone `blur(Npx)`, arbitrary property otherwise.
fn blur_or_arbitrary(prefix: &str, property: &str, value: &str) -> String {
    let radius = value
        .strip_prefix("blur(")
        .and_then(|rest| rest.strip_suffix(')'))
        .and_then(parse_px);
    let Some(radius) = radius else {
        return format!("[{}:{}]", property, escape_arbitrary(value));
    };
    let suffix = if radius == 0.0 {
        "-none"
    } else if radius <= 4.0 {
        "-sm"
    } else if radius <= 8.0 {
        ""
    } else if radius <= 12.0 {
        "-md"
    } else if radius <= 16.0 {
        "-lg"
    } else if radius <= 24.0 {
        "-xl"
    } else {
        "-3xl"
    };
    format!("{}{}", prefix, suffix)
}

fn mix_blend(value: &str) -> String {
    match value {
        "normal" | "multiply" | "screen" | "overlay" | "darken" | "lighten" | "color-dodge"
        | "color-burn" | "hard-light" | "soft-light" | "difference" | "exclusion" | "hue"
        | "saturation" | "color" | "luminosity" | "plus-lighter" => format!("mix-blend-{}", value),
        _ => String::new(),
    }
}

fn outline(value: &str) -> String {
    if value == "none" {
        return "outline-none".to_string();
    }
    let mut parts = value.splitn(3, ' ');
    let width = parts.next().and_then(parse_px).map(f64::round);
    let color = parts.nth(1).map(str::trim).unwrap_or_default();
    let mut classes = vec!["outline".to_string()];
    if let Some(width) = width {
        classes.push(format!("outline-{}", format_number(width)));
    }
    if !color.is_empty() {
        classes.push(color_class("outline", color));
    }
    classes.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(prop: &str, value: &str) -> String {
        map(prop, value).unwrap_or_else(|| panic!("{prop} is a visual property"))
    }

    #[test]
    fn palette_colors_and_arbitrary_fallbacks() {
        assert_eq!(class("background", "rgba(255, 255, 255, 1)"), "bg-white");
        assert_eq!(class("background", "rgba(255, 0, 0, 1)"), "bg-[#FF0000]");
        assert_eq!(class("color", "#3b82f6"), "text-blue-500");
        assert_eq!(class("color", "rgba(0, 0, 0, 0.5)"), "text-[rgba(0,0,0,0.5)]");
        assert_eq!(
            class("background", "var(--brand-primary, rgba(255, 0, 0, 1))"),
            "bg-[var(--brand-primary,rgba(255,0,0,1))]"
        );
        assert_eq!(class("color", "var(--ink, #000000)"), "text-[color:var(--ink,#000000)]");
    }

    #[test]
    fn border_shorthand_splits_into_width_style_color() {
        assert_eq!(class("border", "1px solid rgba(0, 0, 0, 1)"), "border border-solid border-black");
        assert_eq!(
            class("border", "3px dashed rgba(17, 24, 39, 1)"),
            "border-[3px] border-dashed border-gray-900"
        );
        assert_eq!(class("bordertopwidth", "2px"), "border-t-2");
    }

    #[test]
    fn radius_rotation_and_opacity() {
        assert_eq!(class("borderradius", "8px"), "rounded-lg");
        assert_eq!(class("borderradius", "4px"), "rounded");
        assert_eq!(class("borderradius", "50%"), "rounded-full");
        assert_eq!(class("borderradius", "10px"), "rounded-[10px]");
        assert_eq!(class("transform", "rotate(-45deg)"), "-rotate-45");
        assert_eq!(class("transform", "rotate(30.4deg)"), "rotate-[30deg]");
        assert_eq!(class("opacity", "0.5"), "opacity-50");
        assert_eq!(class("opacity", "0.3"), "opacity-25");
    }

    #[test]
    fn typography() {
        assert_eq!(class("fontfamily", "Open Sans"), "font-['Open_Sans']");
        assert_eq!(class("fontweight", "600"), "font-semibold");
        assert_eq!(class("fontsize", "14px"), "text-sm");
        assert_eq!(class("fontsize", "15px"), "text-[15px]");
        assert_eq!(class("lineheight", "24px"), "leading-6");
        assert_eq!(class("lineheight", "1.5"), "leading-normal");
        assert_eq!(class("verticalalign", "middle"), "");
    }

    #[test]
    fn filters_and_shadows() {
        assert_eq!(class("filter", "blur(4px)"), "blur-sm");
        assert_eq!(class("backdropfilter", "blur(10px)"), "backdrop-blur-md");
        assert_eq!(
            class("filter", "brightness(1.2) contrast(1.1)"),
            "[filter:brightness(1.2)_contrast(1.1)]"
        );
        assert_eq!(
            class("boxshadow", "0px 4px 4px 0px rgba(0, 0, 0, 0.25)"),
            "shadow-[0px_4px_4px_0px_rgba(0,0,0,0.25)]"
        );
    }
}
