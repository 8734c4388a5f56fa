//! The goal session: configuration documents and investment records held in memory for one view,
//! plus the operations that change them.
//!
//! Every mutation happens in two steps. The synchronous call validates its input, applies the
//! change to the in-memory state and returns a [`PendingSync`] holding a snapshot of what must be
//! written. [`GoalService::persist`] then performs the writes. A failed write is returned to the
//! caller and the local change stays applied; retrying, alerting or reloading is up to the
//! caller.
//!
//! Two pending syncs for the same document each carry the full document as it was when they were
//! created, so whichever reaches the remote store last wins.

use crate::aggregate::aggregate;
use crate::api::RecordStore;
use crate::catalog::{self, Catalog};
use crate::config_store::{ConfigStore, Documents};
use crate::error::{SyncFailure, SyncTarget, ValidationError};
use crate::model::{
    normalize_label, ActiveGoal, Amount, CustomGoals, Document, GoalDefinition, GoalStats,
    HiddenGoals, InvestmentRecord, RecordKind, TargetOverrides,
};
use crate::reconcile::reconcile;
use crate::utils;
use anyhow::Context;
use std::str::FromStr;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// The answer to "are you sure?" for destructive operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

impl From<bool> for Confirmation {
    fn from(yes: bool) -> Self {
        if yes {
            Confirmation::Confirmed
        } else {
            Confirmation::Declined
        }
    }
}

/// One write, holding a copy of the state it saves. Documents are serialized when the write is
/// performed, so a serialization failure surfaces from `persist` like any other failed write.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PendingWrite {
    Custom(CustomGoals),
    Hidden(HiddenGoals),
    Overrides(TargetOverrides),
    Contribution(InvestmentRecord),
}

impl PendingWrite {
    fn target(&self) -> SyncTarget {
        match self {
            PendingWrite::Custom(_) => SyncTarget::Document(CustomGoals::KEY),
            PendingWrite::Hidden(_) => SyncTarget::Document(HiddenGoals::KEY),
            PendingWrite::Overrides(_) => SyncTarget::Document(TargetOverrides::KEY),
            PendingWrite::Contribution(_) => SyncTarget::Contribution,
        }
    }
}

/// Writes produced by a local change that still have to reach the remote store.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "local changes are not saved until persisted"]
pub struct PendingSync {
    writes: Vec<PendingWrite>,
}

impl PendingSync {
    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }
}

/// Acknowledges that every write of a `PendingSync` was saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ack {
    pub saved: usize,
}

pub struct GoalService {
    store: ConfigStore,
    catalog: Catalog,
    documents: Documents,
    records: Vec<InvestmentRecord>,
}

impl GoalService {
    /// Creates a session with empty documents and no records. Call `load` to fetch them.
    pub fn new(store: Box<dyn RecordStore + Send>, catalog: Catalog) -> Self {
        Self {
            store: ConfigStore::new(store),
            catalog,
            documents: Documents::default(),
            records: Vec::new(),
        }
    }

    /// Replaces the in-memory state with what the remote store holds. Never fails: whatever
    /// cannot be fetched falls back to empty and is logged.
    pub async fn load(&mut self) {
        self.documents = self.store.load_all().await;
        self.records = match self.store.records().list(RecordKind::Investment).await {
            Ok(rows) => InvestmentRecord::parse_rows(rows),
            Err(e) => {
                warn!("Unable to fetch investment records, showing none: {e:#}");
                Vec::new()
            }
        };
        debug!(
            "Loaded {} custom goals, {} hidden, {} overrides and {} investment records",
            self.documents.custom.goals().len(),
            self.documents.hidden.len(),
            self.documents.overrides.len(),
            self.records.len()
        );
    }

    pub fn documents(&self) -> &Documents {
        &self.documents
    }

    pub fn records(&self) -> &[InvestmentRecord] {
        &self.records
    }

    /// The reconciled goal definitions.
    pub fn goals(&self) -> Vec<GoalDefinition> {
        reconcile(
            self.catalog.goals(),
            &self.documents.custom,
            &self.documents.hidden,
        )
    }

    /// Aggregates the in-memory records against the reconciled goals.
    pub fn stats(&self) -> GoalStats {
        aggregate(
            &self.goals(),
            &self.documents.overrides,
            &self.documents.hidden,
            &self.records,
        )
    }

    /// Finds a visible goal by id or by label, ignoring case and surrounding whitespace.
    pub fn find_goal(&self, query: &str) -> Result<ActiveGoal, ValidationError> {
        let key = normalize_label(query);
        self.stats()
            .goals
            .into_iter()
            .find(|g| g.id.as_deref() == Some(query.trim()) || g.key() == key)
            .ok_or_else(|| ValidationError::UnknownGoal(query.to_string()))
    }

    /// Adds a custom goal.
    ///
    /// # Errors
    /// - `EmptyLabel` if `label` is blank.
    /// - `InvalidTarget` if `target` is not a positive number.
    /// - `HiddenLabel` if the hidden set covers `label`, since the new goal would never show.
    pub fn create_goal(
        &mut self,
        label: &str,
        target: &str,
    ) -> Result<(GoalDefinition, PendingSync), ValidationError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(ValidationError::EmptyLabel);
        }
        let target = parse_target(target)?;
        if !target.is_positive() {
            return Err(ValidationError::InvalidTarget(target.to_string()));
        }
        if self.documents.hidden.hides_category(label) {
            return Err(ValidationError::HiddenLabel(label.to_string()));
        }

        let goal = GoalDefinition::custom(self.new_goal_id(), label, target);
        if self.goals().iter().any(|g| g.key() == goal.key()) {
            debug!("Custom goal '{label}' shares its label with an existing goal");
        }
        self.documents.custom.push(goal.clone());
        info!("Created goal '{}' with target {}", goal.label, goal.target);

        let pending = self.snapshot(&[Snapshot::Custom]);
        Ok((goal, pending))
    }

    /// Changes the target of `goal`. Custom goals are edited in place; any other goal gets an
    /// override keyed by its label.
    ///
    /// # Errors
    /// - `InvalidTarget` if `new_target` is not a number or is negative.
    /// - `UnknownGoal` if `goal` is custom but no longer in the custom list.
    pub fn edit_target(
        &mut self,
        goal: &ActiveGoal,
        new_target: &str,
    ) -> Result<PendingSync, ValidationError> {
        let target = parse_target(new_target)?;
        if target.is_negative() {
            return Err(ValidationError::InvalidTarget(new_target.to_string()));
        }

        let pending = if goal.is_custom {
            let id = goal.id.as_deref().unwrap_or_default();
            let definition = self
                .documents
                .custom
                .get_mut(id)
                .ok_or_else(|| ValidationError::UnknownGoal(goal.label.clone()))?;
            definition.target = target;
            self.snapshot(&[Snapshot::Custom])
        } else {
            self.documents.overrides.set(goal.label.clone(), target);
            self.snapshot(&[Snapshot::Overrides])
        };
        info!("Set the target of '{}' to {target}", goal.label);
        Ok(pending)
    }

    /// Hides `goal`. Its identifier (the id, or the label for orphans) and its label go into the
    /// hidden set, so neither its definition nor records carrying its label bring it back. A custom
    /// goal is also removed from the custom list, which adds a second write.
    ///
    /// # Errors
    /// - `NotConfirmed` unless `confirmation` is `Confirmed`. Nothing changes in that case.
    pub fn hide_goal(
        &mut self,
        goal: &ActiveGoal,
        confirmation: Confirmation,
    ) -> Result<PendingSync, ValidationError> {
        if confirmation != Confirmation::Confirmed {
            return Err(ValidationError::NotConfirmed(goal.label.clone()));
        }

        let hidden = &mut self.documents.hidden;
        hidden.insert(goal.identifier());
        hidden.insert(goal.label.clone());

        let mut documents = vec![Snapshot::Hidden];
        if goal.is_custom {
            if let Some(id) = goal.id.as_deref() {
                if self.documents.custom.remove(id).is_some() {
                    documents.push(Snapshot::Custom);
                }
            }
        }
        info!("Hid goal '{}'", goal.label);
        Ok(self.snapshot(&documents))
    }

    /// Records a contribution of `total` towards the goal labeled `category`, invested at `place`.
    /// `date` defaults to today as `dd/mm/yyyy`.
    ///
    /// # Errors
    /// - `InvalidAmount` if `total` is not a positive number.
    /// - `EmptyCategory` or `EmptyPlace` if either is blank.
    pub fn add_contribution(
        &mut self,
        total: &str,
        category: &str,
        place: &str,
        date: Option<&str>,
    ) -> Result<(InvestmentRecord, PendingSync), ValidationError> {
        let total = Amount::from_str(total)
            .ok()
            .filter(Amount::is_positive)
            .ok_or_else(|| ValidationError::InvalidAmount(total.to_string()))?;
        if category.trim().is_empty() {
            return Err(ValidationError::EmptyCategory);
        }
        if place.trim().is_empty() {
            return Err(ValidationError::EmptyPlace);
        }

        // Use the goal's own spelling when the category names a known goal.
        let category = self
            .find_goal(category)
            .map(|g| g.label)
            .unwrap_or_else(|_| category.trim().to_string());
        let record = InvestmentRecord {
            date: date
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string)
                .unwrap_or_else(utils::today),
            total,
            category,
            place: catalog::place_label(place),
        };
        self.records.push(record.clone());
        info!("Added {} towards '{}'", record.total, record.category);

        let pending = PendingSync {
            writes: vec![PendingWrite::Contribution(record.clone())],
        };
        Ok((record, pending))
    }

    /// Performs the writes of `pending` in order, stopping at the first failure.
    pub async fn persist(&mut self, pending: PendingSync) -> Result<Ack, SyncFailure> {
        let mut saved = 0;
        for write in pending.writes {
            let target = write.target();
            self.perform(write)
                .await
                .map_err(|e| SyncFailure::new(target, saved, e))?;
            saved += 1;
        }
        Ok(Ack { saved })
    }

    async fn perform(&mut self, write: PendingWrite) -> crate::Result<()> {
        match write {
            PendingWrite::Custom(custom) => self.store.save_document(&custom).await,
            PendingWrite::Hidden(hidden) => self.store.save_document(&hidden).await,
            PendingWrite::Overrides(overrides) => self.store.save_document(&overrides).await,
            PendingWrite::Contribution(record) => self.save_contribution(&record).await,
        }
    }

    async fn save_contribution(&mut self, record: &InvestmentRecord) -> crate::Result<()> {
        let payload =
            serde_json::to_value(record).context("Unable to serialize the investment record")?;
        self.store
            .records()
            .append(RecordKind::Investment, payload)
            .await
            .context("Unable to save the investment record")
    }

    fn new_goal_id(&self) -> String {
        loop {
            let id = format!("custom_{}", Uuid::new_v4().simple());
            if !self.documents.custom.contains_id(&id) {
                return id;
            }
        }
    }

    fn snapshot(&self, which: &[Snapshot]) -> PendingSync {
        let writes = which
            .iter()
            .map(|s| match s {
                Snapshot::Custom => PendingWrite::Custom(self.documents.custom.clone()),
                Snapshot::Hidden => PendingWrite::Hidden(self.documents.hidden.clone()),
                Snapshot::Overrides => PendingWrite::Overrides(self.documents.overrides.clone()),
            })
            .collect();
        PendingSync { writes }
    }
}

#[derive(Debug, Clone, Copy)]
enum Snapshot {
    Custom,
    Hidden,
    Overrides,
}

fn parse_target(s: &str) -> Result<Amount, ValidationError> {
    if s.trim().is_empty() {
        return Err(ValidationError::InvalidTarget(s.to_string()));
    }
    Amount::from_str(s).map_err(|_| ValidationError::InvalidTarget(s.to_string()))
}
