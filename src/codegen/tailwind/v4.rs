//! Tailwind v3 -> v4 class migration.

use tracing::debug;

use super::classes::split_variant;

const RENAMES: [(&str, &str); 15] = [
    ("shadow-sm", "shadow-xs"),
    ("shadow", "shadow-sm"),
    ("drop-shadow-sm", "drop-shadow-xs"),
    ("drop-shadow", "drop-shadow-sm"),
    ("blur-sm", "blur-xs"),
    ("blur", "blur-sm"),
    ("backdrop-blur-sm", "backdrop-blur-xs"),
    ("backdrop-blur", "backdrop-blur-sm"),
    ("rounded-sm", "rounded-xs"),
    ("rounded", "rounded-sm"),
    ("ring", "ring-3"),
    ("outline-none", "outline-hidden"),
    ("overflow-ellipsis", "text-ellipsis"),
    ("decoration-slice", "box-decoration-slice"),
    ("decoration-clone", "box-decoration-clone"),
];

const OPACITY_UTILITIES: [&str; 6] = ["bg", "text", "border", "divide", "ring", "placeholder"];

/// Rewrite one v3 class into v4 syntax. `None` means the utility no longer
/// exists and the class is dropped.
pub fn migrate_class(class: &str) -> Option<String> {
    let (variant, base) = split_variant(class);

    if let Some((_, renamed)) = RENAMES.iter().find(|(from, _)| *from == base) {
        return Some(format!("{}{}", variant, renamed));
    }
    if is_removed_opacity_utility(base) {
        debug!(class, "dropping v3 opacity utility");
        return None;
    }
    if let Some(migrated) = variable_shorthand(base) {
        return Some(format!("{}{}", variant, migrated));
    }
    if (base.starts_with("grid-cols-[") || base.starts_with("grid-rows-[")) && base.contains(',') {
        return Some(format!("{}{}", variant, base.replace(',', "_")));
    }
    if let Some(rest) = base.strip_prefix('!') {
        if !rest.starts_with('-') {
            return Some(format!("{}{}!", variant, rest));
        }
    }
    Some(class.to_string())
}

pub fn migrate(classes: Vec<String>) -> Vec<String> {
    classes
        .iter()
        .filter_map(|class| migrate_class(class))
        .collect()
}

fn is_removed_opacity_utility(base: &str) -> bool {
    OPACITY_UTILITIES.iter().any(|utility| {
        base.strip_prefix(utility)
            .and_then(|rest| rest.strip_prefix("-opacity-"))
            .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
    })
}

/// `bg-[--x]`, `bg-[var(--x,#fff)]` -> `bg-(--x)`;
/// `text-[color:var(--x)]` -> `text-(color:--x)`.
fn variable_shorthand(base: &str) -> Option<String> {
    let open = base.find('[')?;
    let inner = base[open..].strip_prefix('[')?.strip_suffix(']')?;
    let prefix = &base[..open];

    let (hint, expr) = match inner.split_once(':') {
        Some((hint, expr)) if hint.chars().all(|c| c.is_ascii_alphabetic()) => {
            (Some(hint), expr)
        }
        _ => (None, inner),
    };

    let name = if expr.starts_with("--") {
        expr
    } else {
        let args = expr.strip_prefix("var(")?.strip_suffix(')')?;
        let name = args.split(',').next()?.trim();
        if !name.starts_with("--") {
            return None;
        }
        name
    };

    Some(match hint {
        Some(hint) => format!("{}({}:{})", prefix, hint, name),
        None => format!("{}({})", prefix, name),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renamed_scales_shift_down() {
        assert_eq!(migrate_class("shadow").as_deref(), Some("shadow-sm"));
        assert_eq!(migrate_class("rounded").as_deref(), Some("rounded-sm"));
        assert_eq!(migrate_class("md:rounded-sm").as_deref(), Some("md:rounded-xs"));
        assert_eq!(migrate_class("rounded-lg").as_deref(), Some("rounded-lg"));
        assert_eq!(migrate_class("outline-none").as_deref(), Some("outline-hidden"));
    }

    #[test]
    fn variables_use_parenthesized_shorthand() {
        assert_eq!(migrate_class("bg-[--brand]").as_deref(), Some("bg-(--brand)"));
        assert_eq!(
            migrate_class("bg-[var(--brand,rgba(255,0,0,1))]").as_deref(),
            Some("bg-(--brand)")
        );
        assert_eq!(
            migrate_class("text-[color:var(--ink,#000000)]").as_deref(),
            Some("text-(color:--ink)")
        );
        assert_eq!(migrate_class("w-[390px]").as_deref(), Some("w-[390px]"));
    }

    #[test]
    fn grid_commas_important_and_removed_utilities() {
        assert_eq!(
            migrate_class("grid-cols-[max-content,auto]").as_deref(),
            Some("grid-cols-[max-content_auto]")
        );
        assert_eq!(migrate_class("!flex").as_deref(), Some("flex!"));
        assert_eq!(migrate_class("bg-opacity-50"), None);
        assert_eq!(
            migrate(vec!["flex".into(), "text-opacity-75".into(), "shadow-sm".into()]),
            vec!["flex".to_string(), "shadow-xs".to_string()]
        );
    }
}
