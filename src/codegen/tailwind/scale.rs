//! Tailwind spacing scale and arbitrary-value helpers.

use std::cmp::Ordering;

use crate::alt_node::format_number;

/// Pixel value -> spacing token. There is no `18` (72px) in v3.
const SPACING_SCALE: [(u32, &str); 35] = [
    (0, "0"),
    (1, "px"),
    (2, "0.5"),
    (4, "1"),
    (6, "1.5"),
    (8, "2"),
    (10, "2.5"),
    (12, "3"),
    (14, "3.5"),
    (16, "4"),
    (20, "5"),
    (24, "6"),
    (28, "7"),
    (32, "8"),
    (36, "9"),
    (40, "10"),
    (44, "11"),
    (48, "12"),
    (56, "14"),
    (64, "16"),
    (80, "20"),
    (96, "24"),
    (112, "28"),
    (128, "32"),
    (144, "36"),
    (160, "40"),
    (176, "44"),
    (192, "48"),
    (208, "52"),
    (224, "56"),
    (240, "60"),
    (256, "64"),
    (288, "72"),
    (320, "80"),
    (384, "96"),
];

pub const DEFAULT_TOLERANCE: f64 = 0.05;

/// Exact scale token for a whole, non-negative pixel value.
pub fn token_for_px(px: f64) -> Option<&'static str> {
    if px < 0.0 || px.fract() != 0.0 {
        return None;
    }
    SPACING_SCALE
        .iter()
        .find(|(value, _)| f64::from(*value) == px)
        .map(|(_, token)| *token)
}

pub fn px_for_token(token: &str) -> Option<f64> {
    SPACING_SCALE
        .iter()
        .find(|(_, t)| *t == token)
        .map(|(value, _)| f64::from(*value))
}

/// Closest scale point whose relative distance to `px` is within `tolerance`.
pub fn nearest_token(px: f64, tolerance: f64) -> Option<&'static str> {
    if px <= 0.0 {
        return token_for_px(px);
    }
    SPACING_SCALE
        .iter()
        .map(|(value, token)| (f64::from(*value), *token))
        .filter(|(value, _)| (px - value).abs() / px <= tolerance)
        .min_by(|a, b| {
            (px - a.0)
                .abs()
                .partial_cmp(&(px - b.0).abs())
                .unwrap_or(Ordering::Equal)
        })
        .map(|(_, token)| token)
}

/// `16px` -> 16, `0` -> 0; anything else is not a pixel length.
pub fn parse_px(value: &str) -> Option<f64> {
    let value = value.trim();
    if value == "0" {
        return Some(0.0);
    }
    value.strip_suffix("px")?.trim().parse().ok()
}

/// `prefix-[value]`, with whitespace escaped the way Tailwind expects.
pub fn arbitrary(prefix: &str, value: &str) -> String {
    format!("{}-[{}]", prefix, escape_arbitrary(value))
}

pub fn escape_arbitrary(value: &str) -> String {
    value
        .trim()
        .replace(", ", ",")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

/// Spacing-like utility (`p`, `m`, `gap`, `w`, ...): scale token when the
/// rounded pixel value is on the scale, else an arbitrary pixel value.
pub fn scale_class(prefix: &str, value: &str) -> String {
    let value = value.trim();
    let Some(px) = parse_px(value) else {
        return match value {
            "auto" => format!("{}-auto", prefix),
            _ => arbitrary(prefix, value),
        };
    };
    let rounded = px.round();
    if rounded < 0.0 {
        return match token_for_px(-rounded) {
            Some(token) => format!("-{}-{}", prefix, token),
            None => format!("{}-[{}px]", prefix, format_number(rounded)),
        };
    }
    match token_for_px(rounded) {
        Some(token) => format!("{}-{}", prefix, token),
        None => format!("{}-[{}px]", prefix, format_number(rounded)),
    }
}

/// Arbitrary pixel value of a `prefix-[Npx]` class.
pub fn arbitrary_px(class: &str, prefix: &str) -> Option<f64> {
    class
        .strip_prefix(prefix)?
        .strip_prefix("-[")?
        .strip_suffix("px]")?
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_tokens_and_reverse_lookup() {
        assert_eq!(token_for_px(16.0), Some("4"));
        assert_eq!(token_for_px(1.0), Some("px"));
        assert_eq!(token_for_px(72.0), None);
        assert_eq!(token_for_px(16.5), None);
        assert_eq!(px_for_token("2.5"), Some(10.0));
    }

    #[test]
    fn nearest_token_respects_tolerance() {
        assert_eq!(nearest_token(390.0, 0.05), Some("96"));
        assert_eq!(nearest_token(15.0, 0.05), None);
        assert_eq!(nearest_token(31.0, 0.05), Some("8"));
        assert_eq!(nearest_token(0.0, 0.05), Some("0"));
    }

    #[test]
    fn scale_class_rounds_and_falls_back() {
        assert_eq!(scale_class("p", "16px"), "p-4");
        assert_eq!(scale_class("w", "876.99px"), "w-[877px]");
        assert_eq!(scale_class("ml", "-4px"), "-ml-1");
        assert_eq!(scale_class("mt", "-13px"), "mt-[-13px]");
        assert_eq!(scale_class("h", "auto"), "h-auto");
        assert_eq!(scale_class("left", "calc(50% + 4px)"), "left-[calc(50%_+_4px)]");
    }

    #[test]
    fn arbitrary_escapes_color_spacing() {
        assert_eq!(arbitrary("bg", "rgba(0, 0, 0, 0.5)"), "bg-[rgba(0,0,0,0.5)]");
        assert_eq!(arbitrary_px("gap-[10px]", "gap"), Some(10.0));
        assert_eq!(arbitrary_px("gap-2", "gap"), None);
    }
}
