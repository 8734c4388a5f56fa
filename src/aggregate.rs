//! Folds investment records into per-goal running totals.

use crate::model::{
    normalize_label, ActiveGoal, Amount, GoalDefinition, GoalStats, HiddenGoals, InvestmentRecord,
    TargetOverrides,
};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Aggregates `records` against `goals`.
///
/// - Goals are keyed by normalized label. When two definitions share a key the later one replaces
///   the earlier one in place, so the goal keeps its first position but takes the later id, label,
///   target and custom flag.
/// - Built-in goals take their target from `overrides` when the map has an entry for their label.
///   Custom goals carry their own target.
/// - Every record counts towards `grand_total`, except one that would overflow it, which is
///   skipped and logged. Records whose category is hidden count nowhere
///   else.
/// - A record whose category matches no goal creates an orphan goal, appended in the order first
///   seen, with a target from `overrides` or zero.
pub fn aggregate(
    goals: &[GoalDefinition],
    overrides: &TargetOverrides,
    hidden: &HiddenGoals,
    records: &[InvestmentRecord],
) -> GoalStats {
    let mut active: Vec<ActiveGoal> = Vec::with_capacity(goals.len());
    let mut index: HashMap<String, usize> = HashMap::with_capacity(goals.len());

    for definition in goals {
        let target = if definition.is_custom {
            definition.target
        } else {
            overrides
                .get(&definition.label)
                .unwrap_or(definition.target)
        };
        let goal = ActiveGoal {
            id: Some(definition.id.clone()),
            label: definition.label.clone(),
            target,
            current: Amount::ZERO,
            is_custom: definition.is_custom,
            is_orphan: false,
        };
        match index.get(&definition.key()) {
            Some(&ix) => {
                debug!(
                    "Goal '{}' ({}) shadows '{}' ({}), they share a label",
                    goal.label,
                    goal.identifier(),
                    active[ix].label,
                    active[ix].identifier()
                );
                active[ix] = goal;
            }
            None => {
                index.insert(definition.key(), active.len());
                active.push(goal);
            }
        }
    }

    let mut grand_total = Amount::ZERO;
    for record in records {
        grand_total = match grand_total.checked_add(record.total) {
            Some(total) => total,
            None => {
                warn!(
                    "Skipping a {} record for '{}', the grand total would overflow",
                    record.total, record.category
                );
                continue;
            }
        };
        if hidden.hides_category(&record.category) {
            continue;
        }

        let key = normalize_label(&record.category);
        match index.get(&key) {
            Some(&ix) => match active[ix].current.checked_add(record.total) {
                Some(current) => active[ix].current = current,
                None => warn!(
                    "Not adding {} to '{}', its total would overflow",
                    record.total, active[ix].label
                ),
            },
            None => {
                let label = record.category.trim();
                let target = overrides
                    .get(&record.category)
                    .or_else(|| overrides.get(label))
                    .unwrap_or(Amount::ZERO);
                debug!("Category '{label}' has no goal, adding it as an orphan");
                index.insert(key, active.len());
                active.push(ActiveGoal {
                    id: None,
                    label: label.to_string(),
                    target,
                    current: record.total,
                    is_custom: false,
                    is_orphan: true,
                });
            }
        }
    }

    GoalStats {
        grand_total,
        goals: active,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn record(category: &str, total: i64) -> InvestmentRecord {
        InvestmentRecord {
            date: "01/01/2025".to_string(),
            total: Amount::from(total),
            category: category.to_string(),
            place: "Nu".to_string(),
        }
    }

    fn builtins() -> Vec<GoalDefinition> {
        Catalog::default().goals().to_vec()
    }

    #[test]
    fn test_case_insensitive_join() {
        let records = vec![record("etfs", 100), record(" ETFs ", 200), record("ETFS", 300)];
        let stats = aggregate(
            &builtins(),
            &TargetOverrides::default(),
            &HiddenGoals::default(),
            &records,
        );
        assert_eq!(stats.goals.len(), 5);
        let etfs = stats.find("ETFs").unwrap();
        assert_eq!(etfs.current, Amount::from(600));
        assert_eq!(etfs.label, "ETFs");
        assert!(!etfs.is_orphan);
    }

    #[test]
    fn test_override_precedence() {
        let goals = vec![GoalDefinition::builtin("anillo", "Anillo", Amount::from(20000))];
        let overrides = TargetOverrides::new([("Anillo", Amount::from(25000))]);
        let stats = aggregate(&goals, &overrides, &HiddenGoals::default(), &[]);
        assert_eq!(stats.goals[0].target, Amount::from(25000));
    }

    #[test]
    fn test_override_ignored_for_custom_goal() {
        let goals = vec![GoalDefinition::custom("c1", "Boda", Amount::from(50000))];
        let overrides = TargetOverrides::new([("Boda", Amount::from(1))]);
        let stats = aggregate(&goals, &overrides, &HiddenGoals::default(), &[]);
        assert_eq!(stats.goals[0].target, Amount::from(50000));
    }

    #[test]
    fn test_orphan_synthesis() {
        let records = vec![record("Viaje", 500), record("viaje", 250)];
        let stats = aggregate(
            &builtins(),
            &TargetOverrides::default(),
            &HiddenGoals::default(),
            &records,
        );
        let viaje = stats.goals.last().unwrap();
        assert_eq!(viaje.label, "Viaje");
        assert_eq!(viaje.current, Amount::from(750));
        assert_eq!(viaje.target, Amount::ZERO);
        assert!(viaje.is_orphan);
        assert_eq!(viaje.id, None);
        assert_eq!(viaje.progress(), None);
    }

    #[test]
    fn test_orphan_takes_override_target() {
        let overrides = TargetOverrides::new([("Viaje", Amount::from(3000))]);
        let stats = aggregate(&[], &overrides, &HiddenGoals::default(), &[record("Viaje", 500)]);
        assert_eq!(stats.goals[0].target, Amount::from(3000));
    }

    #[test]
    fn test_orphans_in_order_first_seen() {
        let records = vec![
            record("Viaje", 1),
            record("Auto", 1),
            record("Anillo", 1),
            record("viaje", 1),
        ];
        let stats = aggregate(
            &builtins(),
            &TargetOverrides::default(),
            &HiddenGoals::default(),
            &records,
        );
        let labels: Vec<&str> = stats.goals.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Ahorro de Emergencia",
                "Mudanza",
                "ETFs",
                "Estudios",
                "Anillo",
                "Viaje",
                "Auto"
            ]
        );
    }

    #[test]
    fn test_total_conservation_with_hidden() {
        let records = vec![
            record("Anillo", 1000),
            record("Viaje", 500),
            record("Mudanza", 250),
            record("ETFs", 125),
        ];
        let hidden = HiddenGoals::new(["Anillo", "viaje"]);
        let stats = aggregate(&builtins(), &TargetOverrides::default(), &hidden, &records);

        let sum: Amount = records.iter().map(|r| r.total).sum();
        assert_eq!(stats.grand_total, sum);
        assert_eq!(stats.grand_total, Amount::from(1875));

        // Hidden categories count only towards the grand total.
        assert!(stats.find("Viaje").is_none());
        assert_eq!(stats.find("Anillo").unwrap().current, Amount::ZERO);
        let visible: Amount = stats.goals.iter().map(|g| g.current).sum();
        assert_eq!(visible, Amount::from(375));
    }

    #[test]
    fn test_overflowing_record_is_skipped() {
        let huge = |category: &str| InvestmentRecord {
            total: Amount::new(rust_decimal::Decimal::MAX),
            ..record(category, 0)
        };
        let records = vec![huge("ETFs"), huge("ETFs"), record("Anillo", 10)];
        let stats = aggregate(
            &builtins(),
            &TargetOverrides::default(),
            &HiddenGoals::default(),
            &records,
        );

        let max = Amount::new(rust_decimal::Decimal::MAX);
        assert_eq!(stats.grand_total, max);
        assert_eq!(stats.find("ETFs").unwrap().current, max);
        // The grand total is already at its limit, so the later record is skipped too.
        assert_eq!(stats.find("Anillo").unwrap().current, Amount::ZERO);
    }

    #[test]
    fn test_duplicate_label_last_definition_wins() {
        let goals = vec![
            GoalDefinition::builtin("anillo", "Anillo", Amount::from(20000)),
            GoalDefinition::builtin("etfs", "ETFs", Amount::from(1500000)),
            GoalDefinition::custom("c1", "anillo ", Amount::from(30000)),
        ];
        let overrides = TargetOverrides::new([("Anillo", Amount::from(25000))]);
        let stats = aggregate(
            &goals,
            &overrides,
            &HiddenGoals::default(),
            &[record("ANILLO", 700)],
        );

        assert_eq!(stats.goals.len(), 2);
        let merged = &stats.goals[0];
        assert_eq!(merged.id.as_deref(), Some("c1"));
        assert!(merged.is_custom);
        assert_eq!(merged.target, Amount::from(30000));
        assert_eq!(merged.current, Amount::from(700));
    }

    #[test]
    fn test_no_records() {
        let stats = aggregate(
            &builtins(),
            &TargetOverrides::default(),
            &HiddenGoals::default(),
            &[],
        );
        assert!(stats.grand_total.is_zero());
        assert!(stats.goals.iter().all(|g| g.current.is_zero()));
    }
}
