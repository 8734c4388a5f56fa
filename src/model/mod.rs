//! Types that represent the core data model: goal definitions, investment records, the three
//! configuration documents and the derived per-goal statistics.
mod active;
mod amount;
mod document;
mod goal;
mod record;

pub use active::{ActiveGoal, GoalStats};
pub use amount::{Amount, AmountError};
pub use document::{CustomGoals, Document, DocumentKey, HiddenGoals, TargetOverrides};
pub use goal::{normalize_label, GoalDefinition};
pub use record::{ConfigRecord, InvestmentRecord, RecordKind};
