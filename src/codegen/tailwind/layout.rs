//! Layout utilities: display, flex and grid, box model, positioning, sizing.

use super::scale::{arbitrary, escape_arbitrary, parse_px, scale_class};

/// `None` when `prop` is not a layout property.
pub(super) fn map(prop: &str, value: &str) -> Option<String> {
    let class = match prop {
        "display" => display(value).to_string(),
        "flexdirection" => match value {
            "row" => "flex-row",
            "column" => "flex-col",
            "row-reverse" => "flex-row-reverse",
            "column-reverse" => "flex-col-reverse",
            _ => "",
        }
        .to_string(),
        "flexwrap" => match value {
            "wrap" => "flex-wrap",
            "nowrap" => "flex-nowrap",
            "wrap-reverse" => "flex-wrap-reverse",
            _ => "",
        }
        .to_string(),
        "flexgrow" => match value {
            "0" => "grow-0".to_string(),
            "1" => "grow".to_string(),
            other => arbitrary("grow", other),
        },
        "flexshrink" => match value {
            "0" => "shrink-0".to_string(),
            "1" => "shrink".to_string(),
            other => arbitrary("shrink", other),
        },
        "flex" => match value {
            "1" | "1 1 0%" => "flex-1".to_string(),
            "auto" | "1 1 auto" => "flex-auto".to_string(),
            "none" | "0 0 auto" => "flex-none".to_string(),
            other => arbitrary("flex", other),
        },
        "alignself" => match value {
            "stretch" => "self-stretch",
            "flex-start" | "start" => "self-start",
            "flex-end" | "end" => "self-end",
            "center" => "self-center",
            "baseline" => "self-baseline",
            "auto" => "self-auto",
            _ => "",
        }
        .to_string(),
        "justifycontent" => match value {
            "flex-start" | "start" => "justify-start",
            "center" => "justify-center",
            "flex-end" | "end" => "justify-end",
            "space-between" => "justify-between",
            "space-around" => "justify-around",
            "space-evenly" => "justify-evenly",
            _ => "",
        }
        .to_string(),
        "alignitems" => match value {
            "flex-start" | "start" => "items-start",
            "center" => "items-center",
            "flex-end" | "end" => "items-end",
            "baseline" => "items-baseline",
            "stretch" => "items-stretch",
            _ => "",
        }
        .to_string(),
        "aligncontent" => match value {
            "flex-start" | "start" => "content-start",
            "center" => "content-center",
            "flex-end" | "end" => "content-end",
            "space-between" => "content-between",
            "space-around" => "content-around",
            "stretch" => "content-stretch",
            _ => "",
        }
        .to_string(),
        "placeitems" => match value {
            "start" => "place-items-start",
            "center" => "place-items-center",
            "end" => "place-items-end",
            "stretch" => "place-items-stretch",
            _ => "",
        }
        .to_string(),
        "gridtemplatecolumns" => grid_template("grid-cols", value),
        "gridtemplaterows" => grid_template("grid-rows", value),
        "gridarea" => grid_area(value),
        "gridcolumn" => grid_span("col", value),
        "gridrow" => grid_span("row", value),
        "position" => match value {
            "static" | "relative" | "absolute" | "fixed" | "sticky" => value.to_string(),
            _ => String::new(),
        },
        "top" | "right" | "bottom" | "left" => inset(prop, value),
        "zindex" => z_index(value),
        "overflow" | "overflowx" | "overflowy" => overflow(prop, value),
        "width" => size("w", value),
        "height" => size("h", value),
        "minwidth" => size("min-w", value),
        "maxwidth" => size("max-w", value),
        "minheight" => size("min-h", value),
        "maxheight" => size("max-h", value),
        "padding" => box_shorthand("p", value),
        "paddingtop" => scale_class("pt", value),
        "paddingright" => scale_class("pr", value),
        "paddingbottom" => scale_class("pb", value),
        "paddingleft" => scale_class("pl", value),
        "margin" => box_shorthand("m", value),
        "margintop" => scale_class("mt", value),
        "marginright" => scale_class("mr", value),
        "marginbottom" => scale_class("mb", value),
        "marginleft" => scale_class("ml", value),
        "gap" => gap("gap", value),
        "rowgap" => gap("gap-y", value),
        "columngap" => gap("gap-x", value),
        "translate" => translate(value),
        "translatex" => translate_axis("x", value),
        "translatey" => translate_axis("y", value),
        "aspectratio" => aspect_ratio(value),
        _ => return None,
    };
    Some(class)
}

fn display(value: &str) -> &'static str {
    match value {
        "flex" => "flex",
        "inline-flex" => "inline-flex",
        "block" => "block",
        "inline" => "inline",
        "inline-block" => "inline-block",
        "grid" => "grid",
        "inline-grid" => "inline-grid",
        "none" | "hidden" => "hidden",
        "contents" => "contents",
        _ => "",
    }
}

fn grid_template(prefix: &str, value: &str) -> String {
    let count = value
        .strip_prefix("repeat(")
        .and_then(|rest| rest.strip_suffix(", minmax(0, 1fr))"))
        .and_then(|n| n.trim().parse::<u32>().ok());
    match count {
        Some(n) => format!("{}-{}", prefix, n),
        None if value == "none" => format!("{}-none", prefix),
        None => arbitrary(prefix, value),
    }
}

/// `row-start / column-start` into start utilities.
fn grid_area(value: &str) -> String {
    let parts: Vec<&str> = value.split('/').map(str::trim).collect();
    match parts.as_slice() {
        [row, column] if is_line_number(row) && is_line_number(column) => {
            format!("row-start-{} col-start-{}", row, column)
        }
        _ => format!("[grid-area:{}]", escape_arbitrary(value)),
    }
}

/// `N / span M` -> `col-start-N col-span-M`.
fn grid_span(axis: &str, value: &str) -> String {
    let parts: Vec<&str> = value.split('/').map(str::trim).collect();
    match parts.as_slice() {
        [start, span] => match span.strip_prefix("span ") {
            Some(count) if is_line_number(start) => {
                format!("{}-start-{} {}-span-{}", axis, start, axis, count.trim())
            }
            _ => arbitrary(axis, value),
        },
        [span] => match span.strip_prefix("span ") {
            Some(count) => format!("{}-span-{}", axis, count.trim()),
            None => arbitrary(axis, value),
        },
        _ => arbitrary(axis, value),
    }
}

fn is_line_number(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}

fn inset(side: &str, value: &str) -> String {
    match value {
        "50%" => format!("{}-1/2", side),
        "100%" => format!("{}-full", side),
        _ => scale_class(side, value),
    }
}

fn z_index(value: &str) -> String {
    match value {
        "0" | "10" | "20" | "30" | "40" | "50" => format!("z-{}", value),
        "auto" => "z-auto".to_string(),
        _ => format!("z-[{}]", value),
    }
}

fn overflow(prop: &str, value: &str) -> String {
    let prefix = match prop {
        "overflowx" => "overflow-x",
        "overflowy" => "overflow-y",
        _ => "overflow",
    };
    match value {
        "hidden" | "auto" | "scroll" | "clip" => format!("{}-{}", prefix, value),
        _ => String::new(),
    }
}

fn size(prefix: &str, value: &str) -> String {
    let fraction = match value {
        "100%" => Some("full"),
        "50%" => Some("1/2"),
        "25%" => Some("1/4"),
        "75%" => Some("3/4"),
        "fit-content" => Some("fit"),
        "max-content" => Some("max"),
        "min-content" => Some("min"),
        _ => None,
    };
    if let Some(fraction) = fraction {
        return format!("{}-{}", prefix, fraction);
    }
    match (prefix, value) {
        ("w", "100vw") => "w-screen".to_string(),
        ("h", "100vh") => "h-screen".to_string(),
        _ => scale_class(prefix, value),
    }
}

/// Padding or margin shorthand with one to four values.
fn box_shorthand(prefix: &str, value: &str) -> String {
    let parts: Vec<&str> = value.split_whitespace().collect();
    let side = |suffix: &str| format!("{}{}", prefix, suffix);
    let classes = match parts.as_slice() {
        [all] => vec![scale_class(prefix, all)],
        [vertical, horizontal] => vec![
            scale_class(&side("y"), vertical),
            scale_class(&side("x"), horizontal),
        ],
        [top, horizontal, bottom] => vec![
            scale_class(&side("t"), top),
            scale_class(&side("x"), horizontal),
            scale_class(&side("b"), bottom),
        ],
        [top, right, bottom, left] => vec![
            scale_class(&side("t"), top),
            scale_class(&side("r"), right),
            scale_class(&side("b"), bottom),
            scale_class(&side("l"), left),
        ],
        _ => vec![arbitrary(prefix, value)],
    };
    classes.join(" ")
}

/// Gaps cannot be negative; those are carried as child margins instead.
fn gap(prefix: &str, value: &str) -> String {
    match parse_px(value) {
        Some(px) if px < 0.0 => String::new(),
        _ => scale_class(prefix, value),
    }
}

/// Two-value `translate` as emitted for centered constraints.
fn translate(value: &str) -> String {
    let mut parts = value.split_whitespace();
    let x = parts.next().unwrap_or("0");
    let y = parts.next().unwrap_or("0");
    [translate_axis("x", x), translate_axis("y", y)]
        .into_iter()
        .filter(|class| !class.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn translate_axis(axis: &str, value: &str) -> String {
    match value {
        "0" | "0px" | "0%" => String::new(),
        "-50%" => format!("-translate-{}-1/2", axis),
        "50%" => format!("translate-{}-1/2", axis),
        "-100%" => format!("-translate-{}-full", axis),
        "100%" => format!("translate-{}-full", axis),
        _ => arbitrary(&format!("translate-{}", axis), value),
    }
}

fn aspect_ratio(value: &str) -> String {
    let ratio = match value.split_once('/') {
        Some((w, h)) => match (w.trim().parse::<f64>(), h.trim().parse::<f64>()) {
            (Ok(w), Ok(h)) if h != 0.0 => Some(w / h),
            _ => None,
        },
        None => value.parse::<f64>().ok(),
    };
    match ratio {
        Some(r) if (r - 1.0).abs() < 0.001 => "aspect-square".to_string(),
        Some(r) if (r - 16.0 / 9.0).abs() < 0.01 => "aspect-video".to_string(),
        _ => arbitrary("aspect", value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(prop: &str, value: &str) -> String {
        map(prop, value).unwrap_or_else(|| panic!("{prop} is a layout property"))
    }

    #[test]
    fn padding_shorthand_expands_per_axis() {
        assert_eq!(class("padding", "16px"), "p-4");
        assert_eq!(class("padding", "8px 16px"), "py-2 px-4");
        assert_eq!(class("padding", "8px 16px 8px 13px"), "pt-2 pr-4 pb-2 pl-[13px]");
    }

    #[test]
    fn grid_helpers() {
        assert_eq!(class("gridtemplatecolumns", "repeat(3, minmax(0, 1fr))"), "grid-cols-3");
        assert_eq!(class("gridtemplatecolumns", "max-content"), "grid-cols-[max-content]");
        assert_eq!(class("gridarea", "1 / 1"), "row-start-1 col-start-1");
        assert_eq!(class("gridcolumn", "2 / span 3"), "col-start-2 col-span-3");
    }

    #[test]
    fn positioning_and_translate() {
        assert_eq!(class("left", "calc(50% + 5.00px)"), "left-[calc(50%_+_5.00px)]");
        assert_eq!(class("top", "0px"), "top-0");
        assert_eq!(class("translate", "-50% -50%"), "-translate-x-1/2 -translate-y-1/2");
        assert_eq!(class("translate", "-50% 0"), "-translate-x-1/2");
        assert_eq!(class("zindex", "3"), "z-[3]");
        assert_eq!(class("zindex", "10"), "z-10");
    }

    #[test]
    fn sizes_and_gaps() {
        assert_eq!(class("width", "100%"), "w-full");
        assert_eq!(class("minwidth", "1px"), "min-w-px");
        assert_eq!(class("height", "48px"), "h-12");
        assert_eq!(class("gap", "-12px"), "");
        assert_eq!(class("rowgap", "10px"), "gap-y-2.5");
        assert_eq!(class("aspectratio", "1.7778"), "aspect-video");
    }

    #[test]
    fn non_layout_property_is_not_claimed() {
        assert_eq!(map("color", "red"), None);
    }
}
