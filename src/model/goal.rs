use crate::model::Amount;
use serde::{Deserialize, Serialize};

/// The key used to join goals with investment records and to de-duplicate goals: the label,
/// trimmed and lowercased.
pub fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase()
}

/// A savings goal, either built in or created by the user.
///
/// The label is what the user sees and what investment records carry in their `category` column,
/// so it doubles as the join key (see [`normalize_label`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalDefinition {
    pub id: String,
    pub label: String,
    pub target: Amount,
    #[serde(default)]
    pub is_custom: bool,
}

impl GoalDefinition {
    /// Creates a built-in goal definition.
    pub fn builtin(id: impl Into<String>, label: impl Into<String>, target: Amount) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            target,
            is_custom: false,
        }
    }

    /// Creates a user-owned goal definition.
    pub fn custom(id: impl Into<String>, label: impl Into<String>, target: Amount) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            target,
            is_custom: true,
        }
    }

    pub fn key(&self) -> String {
        normalize_label(&self.label)
    }
}
