//! Class-list post-processing.
//!
//! A node's classes are assembled from several sources (structural classes,
//! mapped base styles, responsive overrides, rule classes) and then cleaned
//! up in one pass by [`finalize`]: duplicates and shorthand/side overlaps are
//! resolved, near-scale arbitrary spacing is snapped, and redundant flex
//! defaults are dropped.

use std::collections::{HashMap, HashSet};

use super::scale::{arbitrary_px, nearest_token, px_for_token};

// `ml`/`mt` carry positional offsets and are never snapped.
const SNAPPED_PREFIXES: [&str; 15] = [
    "gap-x", "gap-y", "gap", "p", "px", "py", "pt", "pr", "pb", "pl", "m", "mx", "my", "mr",
    "mb",
];

const FLEX_DEFAULTS: [&str; 5] = ["flex-nowrap", "flex-row", "self-auto", "grow-0", "shrink"];

/// Whitespace split that keeps arbitrary values (`border-[1px solid]`) whole.
pub fn split_classes(classes: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    for ch in classes.chars() {
        match ch {
            '[' => {
                depth += 1;
                current.push(ch);
            }
            ']' => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            c if c.is_whitespace() && depth == 0 => {
                if !current.is_empty() {
                    out.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

/// `md:pt-2` -> (`md:`, `pt-2`). Colons inside brackets are not variants.
pub fn split_variant(class: &str) -> (&str, &str) {
    let mut depth = 0usize;
    let mut split = None;
    for (i, ch) in class.char_indices() {
        match ch {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            ':' if depth == 0 => split = Some(i + 1),
            _ => {}
        }
    }
    match split {
        Some(i) => class.split_at(i),
        None => ("", class),
    }
}

/// Full clean-up pipeline for one element's class list.
pub fn finalize(classes: Vec<String>, tolerance: f64) -> Vec<String> {
    let classes = expand_overridden_shorthands(classes);
    let classes = dedupe(classes);
    let classes = snap_to_scale(classes, tolerance);
    let classes = remove_negative_gaps(classes);
    let classes = normalize_flex_defaults(classes);
    let classes = consolidate_spacing(classes);
    drop_self_stretch_with_max_width(classes)
}

/// Utility group a class belongs to; later classes of the same group win.
fn property_group(base: &str) -> Option<&'static str> {
    let base = base.strip_prefix('-').unwrap_or(base);
    let exact = match base {
        "flex" | "inline-flex" | "block" | "inline-block" | "grid" | "inline-grid" | "hidden"
        | "inline" | "contents" => Some("display"),
        "static" | "relative" | "absolute" | "fixed" | "sticky" => Some("position"),
        "flex-row" | "flex-col" | "flex-row-reverse" | "flex-col-reverse" => Some("flex-direction"),
        "flex-wrap" | "flex-nowrap" | "flex-wrap-reverse" => Some("flex-wrap"),
        "grow" | "grow-0" => Some("grow"),
        "shrink" | "shrink-0" => Some("shrink"),
        "rounded" => Some("rounded"),
        "text-left" | "text-center" | "text-right" | "text-justify" => Some("text-align"),
        "italic" | "not-italic" => Some("font-style"),
        _ => None,
    };
    if exact.is_some() {
        return exact;
    }

    const PREFIXES: [(&str, &str); 44] = [
        ("min-w-", "min-w"),
        ("max-w-", "max-w"),
        ("min-h-", "min-h"),
        ("max-h-", "max-h"),
        ("w-", "w"),
        ("h-", "h"),
        ("gap-x-", "gap-x"),
        ("gap-y-", "gap-y"),
        ("gap-", "gap"),
        ("px-", "px"),
        ("py-", "py"),
        ("pt-", "pt"),
        ("pr-", "pr"),
        ("pb-", "pb"),
        ("pl-", "pl"),
        ("p-", "p"),
        ("mx-", "mx"),
        ("my-", "my"),
        ("mt-", "mt"),
        ("mr-", "mr"),
        ("mb-", "mb"),
        ("ml-", "ml"),
        ("m-", "m"),
        ("top-", "top"),
        ("right-", "right"),
        ("bottom-", "bottom"),
        ("left-", "left"),
        ("z-", "z"),
        ("opacity-", "opacity"),
        ("rounded-tl", "rounded-tl"),
        ("rounded-tr", "rounded-tr"),
        ("rounded-br", "rounded-br"),
        ("rounded-bl", "rounded-bl"),
        ("rounded-", "rounded"),
        ("justify-", "justify"),
        ("items-", "items"),
        ("self-", "self"),
        ("leading-", "leading"),
        ("tracking-", "tracking"),
        ("overflow-x-", "overflow-x"),
        ("overflow-y-", "overflow-y"),
        ("overflow-", "overflow"),
        ("rotate-", "rotate"),
        ("backdrop-blur", "backdrop-blur"),
    ];
    if let Some((_, group)) = PREFIXES.iter().find(|(prefix, _)| base.starts_with(prefix)) {
        return Some(group);
    }

    if let Some(rest) = base.strip_prefix("font-") {
        return Some(match rest {
            "thin" | "extralight" | "light" | "normal" | "medium" | "semibold" | "bold"
            | "extrabold" | "black" => "font-weight",
            _ if rest.starts_with("['") => "font-family",
            _ => return None,
        });
    }
    if let Some(rest) = base.strip_prefix("text-") {
        let is_size = matches!(
            rest,
            "xs" | "sm" | "base" | "lg" | "xl" | "2xl" | "3xl" | "4xl" | "5xl" | "6xl" | "7xl"
                | "8xl" | "9xl"
        ) || (rest.starts_with('[') && rest.ends_with("px]"));
        return is_size.then_some("font-size");
    }
    if base == "blur" || base.starts_with("blur-") {
        return Some("blur");
    }
    None
}

/// Spacing shorthand -> the sides it covers.
fn shorthand_sides(base: &str) -> Option<(char, &'static [char], &str)> {
    let (head, value) = base.split_once('-')?;
    let mut chars = head.chars();
    let letter = chars.next().filter(|c| *c == 'p' || *c == 'm')?;
    let sides: &'static [char] = match chars.next() {
        None => &['t', 'r', 'b', 'l'],
        Some('x') => &['l', 'r'],
        Some('y') => &['t', 'b'],
        _ => return None,
    };
    if chars.next().is_some() {
        return None;
    }
    Some((letter, sides, value))
}

fn side_of(base: &str) -> Option<(char, char)> {
    let (head, _) = base.split_once('-')?;
    let mut chars = head.chars();
    let letter = chars.next().filter(|c| *c == 'p' || *c == 'm')?;
    let side = chars.next().filter(|c| matches!(c, 't' | 'r' | 'b' | 'l'))?;
    chars.next().is_none().then_some((letter, side))
}

/// A specific side beats a shorthand covering it; the shorthand's other
/// sides are kept as specific classes so nothing is lost.
fn expand_overridden_shorthands(classes: Vec<String>) -> Vec<String> {
    let specific: HashSet<(String, char, char)> = classes
        .iter()
        .filter_map(|class| {
            let (variant, base) = split_variant(class);
            let (letter, side) = side_of(base.trim_start_matches('-'))?;
            Some((variant.to_string(), letter, side))
        })
        .collect();

    let mut out = Vec::with_capacity(classes.len());
    for class in classes {
        let (variant, base) = split_variant(&class);
        let (sign, unsigned) = match base.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", base),
        };
        let Some((letter, sides, value)) = shorthand_sides(unsigned) else {
            out.push(class);
            continue;
        };
        let overridden = |side: char| specific.contains(&(variant.to_string(), letter, side));
        if !sides.iter().any(|s| overridden(*s)) {
            out.push(class);
            continue;
        }
        for side in sides.iter().filter(|s| !overridden(**s)) {
            out.push(format!("{}{}{}{}-{}", variant, sign, letter, side, value));
        }
    }
    out
}

/// Exact duplicates collapse; within a property group the last class wins.
pub fn dedupe(classes: Vec<String>) -> Vec<String> {
    let group_key = |class: &str| {
        let (variant, base) = split_variant(class);
        property_group(base).map(|group| format!("{}{}", variant, group))
    };
    let mut last_in_group: HashMap<String, usize> = HashMap::new();
    for (index, class) in classes.iter().enumerate() {
        if let Some(key) = group_key(class) {
            last_in_group.insert(key, index);
        }
    }

    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(classes.len());
    for (index, class) in classes.iter().enumerate() {
        if let Some(key) = group_key(class) {
            if last_in_group.get(&key) != Some(&index) {
                continue;
            }
        }
        if seen.insert(class.clone()) {
            out.push(class.clone());
        }
    }
    out
}

/// `gap-[10px]` -> `gap-2.5`; `pt-[31px]` -> `pt-8` within tolerance.
fn snap_to_scale(classes: Vec<String>, tolerance: f64) -> Vec<String> {
    classes
        .into_iter()
        .map(|class| {
            let (variant, base) = split_variant(&class);
            for prefix in SNAPPED_PREFIXES {
                if let Some(px) = arbitrary_px(base, prefix) {
                    if let Some(token) = nearest_token(px, tolerance) {
                        return format!("{}{}-{}", variant, prefix, token);
                    }
                }
            }
            class
        })
        .collect()
}

fn remove_negative_gaps(classes: Vec<String>) -> Vec<String> {
    classes
        .into_iter()
        .filter(|class| {
            let (_, base) = split_variant(class);
            !["gap-[-", "gap-x-[-", "gap-y-[-"]
                .iter()
                .any(|p| base.starts_with(p))
        })
        .collect()
}

/// Drop default flex values and make start alignment explicit on flex containers.
fn normalize_flex_defaults(classes: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = classes
        .into_iter()
        .filter(|class| !FLEX_DEFAULTS.contains(&class.as_str()))
        .collect();
    let is_flex = out.iter().any(|c| c == "flex" || c == "inline-flex");
    if is_flex {
        if !out.iter().any(|c| c.starts_with("justify-")) {
            out.push("justify-start".to_string());
        }
        if !out.iter().any(|c| c.starts_with("items-")) {
            out.push("items-start".to_string());
        }
    }
    out
}

/// Equal opposite sides on the spacing scale collapse into `x`/`y`, all
/// four into the plain shorthand. Arbitrary values are left alone.
fn consolidate_spacing(classes: Vec<String>) -> Vec<String> {
    let mut sides: HashMap<(String, char), HashMap<char, (usize, String)>> = HashMap::new();
    for (index, class) in classes.iter().enumerate() {
        let (variant, base) = split_variant(class);
        let Some((letter, side)) = side_of(base) else {
            continue;
        };
        let Some((_, token)) = base.split_once('-') else {
            continue;
        };
        if px_for_token(token).is_none() {
            continue;
        }
        sides
            .entry((variant.to_string(), letter))
            .or_default()
            .insert(side, (index, token.to_string()));
    }

    let mut replaced: HashMap<usize, String> = HashMap::new();
    let mut removed: HashSet<usize> = HashSet::new();
    for ((variant, letter), found) in &sides {
        let token = |side: char| found.get(&side).map(|(_, t)| t.as_str());
        let index = |side: char| found.get(&side).map(|(i, _)| *i).unwrap_or(usize::MAX);
        let all_equal = ['t', 'r', 'b', 'l']
            .iter()
            .all(|s| token(*s).is_some() && token(*s) == token('t'));
        if all_equal {
            let first = ['t', 'r', 'b', 'l'].iter().map(|s| index(*s)).min().unwrap_or(0);
            replaced.insert(first, format!("{}{}-{}", variant, letter, token('t').unwrap_or("0")));
            removed.extend(['t', 'r', 'b', 'l'].iter().map(|s| index(*s)).filter(|i| *i != first));
            continue;
        }
        for (axis, a, b) in [('x', 'l', 'r'), ('y', 't', 'b')] {
            if let (Some(ta), Some(tb)) = (token(a), token(b)) {
                if ta == tb {
                    let first = index(a).min(index(b));
                    replaced.insert(first, format!("{}{}{}-{}", variant, letter, axis, ta));
                    removed.insert(index(a).max(index(b)));
                }
            }
        }
    }

    classes
        .into_iter()
        .enumerate()
        .filter(|(index, _)| !removed.contains(index))
        .map(|(index, class)| replaced.remove(&index).unwrap_or(class))
        .collect()
}

fn drop_self_stretch_with_max_width(classes: Vec<String>) -> Vec<String> {
    if !classes.iter().any(|c| c.starts_with("max-w-")) {
        return classes;
    }
    classes.into_iter().filter(|c| c != "self-stretch").collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(classes: &[&str]) -> Vec<String> {
        classes.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn split_keeps_bracketed_values_whole() {
        assert_eq!(
            split_classes("border border-[var(--x, rgba(0 0 0))]  border-solid"),
            owned(&["border", "border-[var(--x, rgba(0 0 0))]", "border-solid"])
        );
        assert_eq!(split_variant("md:pt-2"), ("md:", "pt-2"));
        assert_eq!(split_variant("[grid-area:1_/_1]"), ("", "[grid-area:1_/_1]"));
    }

    #[test]
    fn later_class_of_same_group_wins() {
        assert_eq!(
            dedupe(owned(&["text-[14px]", "flex", "text-sm", "inline-flex", "flex"])),
            owned(&["text-sm", "flex"])
        );
        assert_eq!(dedupe(owned(&["w-4", "md:w-8"])), owned(&["w-4", "md:w-8"]));
    }

    #[test]
    fn specific_side_suppresses_shorthand() {
        assert_eq!(
            finalize(owned(&["py-2", "pt-[40px]"]), 0.05),
            owned(&["pb-2", "pt-10"])
        );
    }

    #[test]
    fn snapping_respects_tolerance_and_positions() {
        assert_eq!(
            finalize(owned(&["gap-[10px]", "pl-[31px]", "ml-[31px]", "w-[390px]"]), 0.05),
            owned(&["gap-2.5", "pl-8", "ml-[31px]", "w-[390px]"])
        );
    }

    #[test]
    fn symmetric_scale_padding_collapses() {
        assert_eq!(finalize(owned(&["pl-4", "pr-4"]), 0.05), owned(&["px-4"]));
        assert_eq!(
            finalize(owned(&["pt-2", "pr-2", "pb-2", "pl-2"]), 0.05),
            owned(&["p-2"])
        );
        assert_eq!(finalize(owned(&["pl-4", "pr-2"]), 0.05), owned(&["pl-4", "pr-2"]));
        assert_eq!(
            finalize(owned(&["pl-[13px]", "pr-[13px]"]), 0.0),
            owned(&["pl-[13px]", "pr-[13px]"])
        );
    }

    #[test]
    fn flex_defaults_and_negative_gaps() {
        assert_eq!(
            finalize(owned(&["flex", "flex-row", "flex-nowrap", "gap-[-12px]", "items-center"]), 0.05),
            owned(&["flex", "items-center", "justify-start"])
        );
    }

    #[test]
    fn self_stretch_dropped_with_max_width() {
        assert_eq!(
            finalize(owned(&["self-stretch", "max-w-[600px]"]), 0.05),
            owned(&["max-w-[600px]"])
        );
    }
}
