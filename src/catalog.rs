//! Built-in reference data: the goals every user starts with and the places money can be invested.

use crate::model::{Amount, GoalDefinition};

const BUILTIN_GOALS: &[(&str, &str, i64)] = &[
    ("ahorro_emergencia", "Ahorro de Emergencia", 150_000),
    ("mudanza", "Mudanza", 100_000),
    ("etfs", "ETFs", 1_500_000),
    ("estudios", "Estudios", 7_000),
    ("anillo", "Anillo", 20_000),
];

/// Where a contribution was invested, as `(id, label)`.
pub const INVESTMENT_PLACES: &[(&str, &str)] = &[
    ("nu", "Nu"),
    ("cetes", "Cetes"),
    ("bonos", "Bonos"),
    ("udibonos", "Udibonos"),
    ("etfs_place", "ETFs"),
];

/// The read-only list of built-in goals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    goals: Vec<GoalDefinition>,
}

impl Catalog {
    /// Wraps an arbitrary list of definitions, mostly useful for tests.
    pub fn new(goals: Vec<GoalDefinition>) -> Self {
        Self { goals }
    }

    pub fn goals(&self) -> &[GoalDefinition] {
        &self.goals
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(
            BUILTIN_GOALS
                .iter()
                .map(|(id, label, target)| {
                    GoalDefinition::builtin(*id, *label, Amount::from(*target))
                })
                .collect(),
        )
    }
}

/// Returns the label of a known place if `name` matches one case-insensitively, otherwise `name`
/// trimmed. Places are free text on the sheet, this only tidies up the common ones.
pub fn place_label(name: &str) -> String {
    let trimmed = name.trim();
    INVESTMENT_PLACES
        .iter()
        .find(|(id, label)| id.eq_ignore_ascii_case(trimmed) || label.eq_ignore_ascii_case(trimmed))
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog() {
        let catalog = Catalog::default();
        assert_eq!(catalog.goals().len(), 5);
        assert!(catalog.goals().iter().all(|g| !g.is_custom));
        let anillo = catalog.goals().iter().find(|g| g.id == "anillo").unwrap();
        assert_eq!(anillo.label, "Anillo");
        assert_eq!(anillo.target, Amount::from(20000));
    }

    #[test]
    fn test_place_label() {
        assert_eq!(place_label(" cetes "), "Cetes");
        assert_eq!(place_label("etfs_place"), "ETFs");
        assert_eq!(place_label("GBM"), "GBM");
    }
}
