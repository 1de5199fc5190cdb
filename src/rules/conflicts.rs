use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::Rule;

const LAYOUT_PROPERTIES: [&str; 6] = [
    "display",
    "position",
    "width",
    "height",
    "flex-direction",
    "flex-wrap",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictSeverity {
    Minor,
    Major,
}

/// Two or more matching rules emitted the same property.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleConflict {
    pub property: String,
    pub winner: String,
    pub overridden: Vec<String>,
    pub severity: ConflictSeverity,
}

/// Layout-affecting properties are major, everything else minor.
pub fn severity_for(property: &str) -> ConflictSeverity {
    if LAYOUT_PROPERTIES.contains(&property) || property.starts_with("grid-") {
        ConflictSeverity::Major
    } else {
        ConflictSeverity::Minor
    }
}

pub(super) fn collect(
    contributors: &IndexMap<String, Vec<usize>>,
    provenance: &IndexMap<String, String>,
    rules: &[Rule],
) -> Vec<RuleConflict> {
    contributors
        .iter()
        .filter(|(_, entries)| entries.len() > 1)
        .filter_map(|(property, entries)| {
            let winner = provenance.get(property)?;
            let overridden = entries
                .iter()
                .map(|index| rules[*index].id.clone())
                .filter(|id| id != winner)
                .collect();
            Some(RuleConflict {
                property: property.clone(),
                winner: winner.clone(),
                overridden,
                severity: severity_for(property),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_and_grid_properties_are_major() {
        assert_eq!(severity_for("display"), ConflictSeverity::Major);
        assert_eq!(severity_for("grid-template-columns"), ConflictSeverity::Major);
        assert_eq!(severity_for("color"), ConflictSeverity::Minor);
        assert_eq!(severity_for("className"), ConflictSeverity::Minor);
    }
}
