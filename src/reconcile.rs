//! Merges the built-in catalog with the user's custom goals and hidden set into the list of goal
//! definitions the investment view works from.

use crate::model::{CustomGoals, GoalDefinition, HiddenGoals};
use tracing::trace;

/// Produces the active goal definitions.
///
/// Built-in goals come first, in catalog order, then custom goals in creation order. Any goal whose
/// id or label is in `hidden` is left out. Hiding a custom goal also removes it from the custom
/// list, but a custom list fetched from an older log entry may still carry it.
///
/// Labels are not de-duplicated. A custom goal may share a label with a built-in one; the
/// aggregator merges them by label and the later definition wins.
pub fn reconcile(
    catalog: &[GoalDefinition],
    custom: &CustomGoals,
    hidden: &HiddenGoals,
) -> Vec<GoalDefinition> {
    catalog
        .iter()
        .chain(custom.goals().iter())
        .filter(|g| {
            let hide = hidden.contains(&g.id) || hidden.contains(&g.label);
            if hide {
                trace!("Goal '{}' is hidden", g.label);
            }
            !hide
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::model::Amount;

    fn labels(goals: &[GoalDefinition]) -> Vec<&str> {
        goals.iter().map(|g| g.label.as_str()).collect()
    }

    #[test]
    fn test_builtins_then_custom() {
        let catalog = Catalog::default();
        let custom = CustomGoals::new(vec![
            GoalDefinition::custom("c1", "Boda", Amount::from(50000)),
            GoalDefinition::custom("c2", "Auto", Amount::from(90000)),
        ]);
        let goals = reconcile(catalog.goals(), &custom, &HiddenGoals::default());
        assert_eq!(
            labels(&goals),
            vec![
                "Ahorro de Emergencia",
                "Mudanza",
                "ETFs",
                "Estudios",
                "Anillo",
                "Boda",
                "Auto"
            ]
        );
    }

    #[test]
    fn test_hidden_by_id_or_label() {
        let catalog = Catalog::default();
        let hidden = HiddenGoals::new(["mudanza", "Anillo"]);
        let goals = reconcile(catalog.goals(), &CustomGoals::default(), &hidden);
        assert_eq!(
            labels(&goals),
            vec!["Ahorro de Emergencia", "ETFs", "Estudios"]
        );
    }

    #[test]
    fn test_hidden_custom_goal_stays_out() {
        let catalog = Catalog::default();
        let custom = CustomGoals::new(vec![
            GoalDefinition::custom("c1", "Boda", Amount::from(50000)),
            GoalDefinition::custom("c2", "Auto", Amount::from(90000)),
        ]);
        let hidden = HiddenGoals::new(["c1"]);
        let goals = reconcile(catalog.goals(), &custom, &hidden);
        assert!(!goals.iter().any(|g| g.label == "Boda"));
        assert!(goals.iter().any(|g| g.label == "Auto"));
    }

    #[test]
    fn test_idempotent() {
        let catalog = Catalog::default();
        let custom = CustomGoals::new(vec![GoalDefinition::custom(
            "c1",
            "Boda",
            Amount::from(50000),
        )]);
        let hidden = HiddenGoals::new(["etfs"]);
        let first = reconcile(catalog.goals(), &custom, &hidden);
        let second = reconcile(catalog.goals(), &custom, &hidden);
        assert_eq!(first, second);
    }

    #[test]
    fn test_duplicate_labels_are_kept() {
        let catalog = Catalog::default();
        let custom = CustomGoals::new(vec![GoalDefinition::custom(
            "c1",
            "anillo",
            Amount::from(30000),
        )]);
        let goals = reconcile(catalog.goals(), &custom, &HiddenGoals::default());
        assert_eq!(goals.len(), 6);
        assert_eq!(goals.iter().filter(|g| g.key() == "anillo").count(), 2);
    }
}
