//! Machine-safe unique names for AltNodes.

use std::collections::HashMap;

/// Per-session counter of base names.
///
/// The first occurrence of a base name is used as-is; later ones get a
/// zero-padded suffix starting at `_01`.
#[derive(Debug, Default, Clone)]
pub struct NameRegistry {
    counts: HashMap<String, usize>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unique_name(&mut self, raw: &str) -> String {
        let base = sanitize_identifier(raw);
        let count = self.counts.entry(base.clone()).or_insert(0);
        let name = if *count == 0 {
            base
        } else {
            format!("{}_{:02}", base, count)
        };
        *count += 1;
        name
    }

    pub fn reset(&mut self) {
        self.counts.clear();
    }

    pub fn len(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Strip everything but ASCII alphanumerics; never empty, never digit-leading.
pub fn sanitize_identifier(raw: &str) -> String {
    let cleaned: String = raw.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
    match cleaned.chars().next() {
        None => "Component".to_string(),
        Some(c) if c.is_ascii_digit() => format!("Component{}", cleaned),
        Some(_) => cleaned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicates_get_padded_suffixes() {
        let mut names = NameRegistry::new();
        assert_eq!(names.unique_name("Label"), "Label");
        assert_eq!(names.unique_name("Label"), "Label_01");
        assert_eq!(names.unique_name("Label"), "Label_02");
        assert_eq!(names.unique_name("Title"), "Title");
        assert_eq!(names.len(), 4);
    }

    #[test]
    fn punctuation_collapses_onto_the_same_base() {
        let mut names = NameRegistry::new();
        assert_eq!(names.unique_name("Primary Button"), "PrimaryButton");
        assert_eq!(names.unique_name("Primary-Button"), "PrimaryButton_01");
    }

    #[test]
    fn sanitize_handles_empty_and_digit_leading_names() {
        assert_eq!(sanitize_identifier("!!!"), "Component");
        assert_eq!(sanitize_identifier(""), "Component");
        assert_eq!(sanitize_identifier("404 page"), "Component404page");
        assert_eq!(sanitize_identifier("Héro"), "Hro");
    }

    #[test]
    fn reset_restarts_numbering() {
        let mut names = NameRegistry::new();
        names.unique_name("Card");
        names.reset();
        assert!(names.is_empty());
        assert_eq!(names.unique_name("Card"), "Card");
    }
}
