use crate::model::{normalize_label, Amount};
use rust_decimal::Decimal;
use serde::Serialize;

/// A goal as shown in the investment view: its definition merged with the contributions made
/// towards it. Derived on every aggregation and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveGoal {
    /// `None` for orphans, which exist only because records reference them.
    pub id: Option<String>,
    pub label: String,
    pub target: Amount,
    pub current: Amount,
    pub is_custom: bool,
    pub is_orphan: bool,
}

impl ActiveGoal {
    pub fn key(&self) -> String {
        normalize_label(&self.label)
    }

    /// The id when there is one, otherwise the label. This is what gets hidden.
    pub fn identifier(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.label)
    }

    /// Percentage of the target reached, uncapped. `None` when there is no target.
    pub fn progress(&self) -> Option<Decimal> {
        if !self.target.is_positive() {
            return None;
        }
        Some(self.current.value() / self.target.value() * Decimal::ONE_HUNDRED)
    }

    /// What is still missing to reach the target, never below zero.
    pub fn remaining(&self) -> Amount {
        let remaining = self.target - self.current;
        if remaining.is_negative() {
            Amount::ZERO
        } else {
            remaining
        }
    }

    pub fn is_completed(&self) -> bool {
        self.target.is_positive() && self.current >= self.target
    }
}

/// The result of aggregating investment records against goals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalStats {
    /// Every record's total, including those that belong to hidden goals.
    pub grand_total: Amount,
    pub goals: Vec<ActiveGoal>,
}

impl GoalStats {
    pub fn find(&self, label: &str) -> Option<&ActiveGoal> {
        let key = normalize_label(label);
        self.goals.iter().find(|g| g.key() == key)
    }
}
