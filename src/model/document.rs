//! The three configuration documents kept in the remote configuration log.
//!
//! Each document is stored as a JSON string under a fixed key. The schemas here are checked on
//! read; anything that does not match is treated as a missing document by the caller.

use crate::model::{normalize_label, Amount, GoalDefinition};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;

/// The fixed keys under which documents are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentKey {
    CustomGoals,
    HiddenGoals,
    TargetOverrides,
}

serde_plain::derive_display_from_serialize!(DocumentKey);
serde_plain::derive_fromstr_from_deserialize!(DocumentKey);

/// A typed configuration document.
pub trait Document: Default + Clone + Debug + Serialize + DeserializeOwned {
    const KEY: DocumentKey;
}

/// Goals the user created, in creation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomGoals(Vec<GoalDefinition>);

impl Document for CustomGoals {
    const KEY: DocumentKey = DocumentKey::CustomGoals;
}

impl CustomGoals {
    pub fn new(goals: Vec<GoalDefinition>) -> Self {
        Self(goals)
    }

    pub fn goals(&self) -> &[GoalDefinition] {
        &self.0
    }

    pub fn push(&mut self, goal: GoalDefinition) {
        self.0.push(goal);
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut GoalDefinition> {
        self.0.iter_mut().find(|g| g.id == id)
    }

    /// Removes the goal with `id`, returning it if it was present.
    pub fn remove(&mut self, id: &str) -> Option<GoalDefinition> {
        let ix = self.0.iter().position(|g| g.id == id)?;
        Some(self.0.remove(ix))
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.0.iter().any(|g| g.id == id)
    }
}

/// Identifiers of goals the user removed from view. An entry may be a goal id or a goal label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HiddenGoals(BTreeSet<String>);

impl Document for HiddenGoals {
    const KEY: DocumentKey = DocumentKey::HiddenGoals;
}

impl HiddenGoals {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(entries.into_iter().map(Into::into).collect())
    }

    /// Adds an identifier. Returns false if it was already present.
    pub fn insert(&mut self, entry: impl Into<String>) -> bool {
        self.0.insert(entry.into())
    }

    /// Exact membership, as used when filtering definitions by id or label.
    pub fn contains(&self, entry: &str) -> bool {
        self.0.contains(entry)
    }

    /// Membership of a record category: matches the raw string or, failing that, any entry whose
    /// normalized form equals the normalized category.
    pub fn hides_category(&self, category: &str) -> bool {
        if self.0.contains(category) {
            return true;
        }
        let key = normalize_label(category);
        self.0.iter().any(|entry| normalize_label(entry) == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// User-set targets for built-in goals, keyed by the goal label exactly as it was labeled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetOverrides(BTreeMap<String, Amount>);

impl Document for TargetOverrides {
    const KEY: DocumentKey = DocumentKey::TargetOverrides;
}

impl TargetOverrides {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Amount)>,
        S: Into<String>,
    {
        Self(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn get(&self, label: &str) -> Option<Amount> {
        self.0.get(label).copied()
    }

    pub fn set(&mut self, label: impl Into<String>, target: Amount) -> Option<Amount> {
        self.0.insert(label.into(), target)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_strings() {
        assert_eq!(DocumentKey::CustomGoals.to_string(), "CUSTOM_GOALS");
        assert_eq!(
            "TARGET_OVERRIDES".parse::<DocumentKey>().unwrap(),
            DocumentKey::TargetOverrides
        );
        assert!("targets".parse::<DocumentKey>().is_err());
    }

    #[test]
    fn test_hidden_matches_raw_or_normalized() {
        let hidden = HiddenGoals::new(["anillo", " Viaje ", "custom_17"]);
        assert!(hidden.hides_category("Anillo"));
        assert!(hidden.hides_category("viaje"));
        assert!(hidden.hides_category("custom_17"));
        assert!(!hidden.hides_category("Mudanza"));
        assert!(!hidden.contains("Anillo"));
    }

    #[test]
    fn test_documents_are_plain_json() {
        let hidden = HiddenGoals::new(["b", "a"]);
        assert_eq!(serde_json::to_string(&hidden).unwrap(), r#"["a","b"]"#);

        let overrides = TargetOverrides::new([("Anillo", Amount::from(25000))]);
        assert_eq!(
            serde_json::to_string(&overrides).unwrap(),
            r#"{"Anillo":25000}"#
        );

        let parsed: TargetOverrides = serde_json::from_str(r#"{"ETFs":"$2,000,000"}"#).unwrap();
        assert_eq!(parsed.get("ETFs"), Some(Amount::from(2000000)));
    }

    #[test]
    fn test_custom_goals_remove() {
        let mut custom = CustomGoals::new(vec![
            GoalDefinition::custom("c1", "Boda", Amount::from(50000)),
            GoalDefinition::custom("c2", "Auto", Amount::from(90000)),
        ]);
        assert_eq!(custom.remove("c1").map(|g| g.label), Some("Boda".to_string()));
        assert!(custom.remove("c1").is_none());
        assert_eq!(custom.goals().len(), 1);
    }
}
