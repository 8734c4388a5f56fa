//! Implements the `RecordStore` trait in memory.
//!
//! Note: this is compiled even in the "production" version of this app so that we can run the whole
//! app, top-to-bottom, without the remote endpoint. Clones share state, which lets tests hand a
//! store to the code under test and still inspect or sabotage it afterwards.

use crate::api::RecordStore;
use crate::model::RecordKind;
use crate::Result;
use anyhow::{bail, Context};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use std::io::Cursor;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::warn;

#[derive(Debug, Default)]
struct State {
    rows: HashMap<RecordKind, Vec<Value>>,
    failing_lists: HashSet<RecordKind>,
    failing_appends: HashSet<RecordKind>,
    failing_keys: HashSet<String>,
}

/// An in-memory `RecordStore`. `TestStore::default()` is seeded with a few investment rows;
/// `TestStore::empty()` starts with nothing.
#[derive(Debug, Clone)]
pub struct TestStore {
    state: Arc<Mutex<State>>,
}

impl TestStore {
    pub fn empty() -> Self {
        Self {
            state: Arc::new(Mutex::new(State::default())),
        }
    }

    /// Appends a row directly, bypassing failure injection.
    pub fn push(&self, kind: RecordKind, row: Value) {
        self.lock().rows.entry(kind).or_default().push(row);
    }

    /// Returns a copy of every row of `kind`.
    pub fn rows(&self, kind: RecordKind) -> Vec<Value> {
        self.lock().rows.get(&kind).cloned().unwrap_or_default()
    }

    /// Makes `list(kind)` fail until cleared.
    pub fn fail_list(&self, kind: RecordKind, fail: bool) {
        toggle(&mut self.lock().failing_lists, kind, fail);
    }

    /// Makes `append(kind, ..)` fail until cleared.
    pub fn fail_append(&self, kind: RecordKind, fail: bool) {
        toggle(&mut self.lock().failing_appends, kind, fail);
    }

    /// Makes appends of configuration rows whose `key` equals `key` fail until cleared.
    pub fn fail_key(&self, key: impl Into<String>, fail: bool) {
        toggle(&mut self.lock().failing_keys, key.into(), fail);
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // A panic while holding the lock can only come from a failing test.
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

fn toggle<T: Eq + std::hash::Hash>(set: &mut HashSet<T>, item: T, on: bool) {
    if on {
        set.insert(item);
    } else {
        set.remove(&item);
    }
}

#[async_trait::async_trait]
impl RecordStore for TestStore {
    async fn list(&mut self, kind: RecordKind) -> Result<Vec<Value>> {
        let state = self.lock();
        if state.failing_lists.contains(&kind) {
            bail!("Listing {kind} records failed (injected)");
        }
        Ok(state.rows.get(&kind).cloned().unwrap_or_default())
    }

    async fn append(&mut self, kind: RecordKind, payload: Value) -> Result<()> {
        let mut state = self.lock();
        if state.failing_appends.contains(&kind) {
            bail!("Saving the {kind} record failed (injected)");
        }
        let Value::Object(map) = payload else {
            bail!("A {kind} record must be a JSON object");
        };
        if let Some(Value::String(key)) = map.get("key") {
            if kind == RecordKind::Config && state.failing_keys.contains(key) {
                bail!("Saving {key} failed (injected)");
            }
        }
        state.rows.entry(kind).or_default().push(Value::Object(map));
        Ok(())
    }
}

impl TestStore {
    fn seeded() -> Result<Self> {
        let store = Self::empty();
        for row in load_csv(INVESTMENT_DATA)? {
            store.push(RecordKind::Investment, row);
        }
        Ok(store)
    }
}

impl Default for TestStore {
    /// Loads seed data from this module.
    fn default() -> Self {
        Self::seeded().unwrap_or_else(|e| {
            warn!("Unable to load seed data, starting empty: {e:#}");
            Self::empty()
        })
    }
}

/// Loads rows from a CSV-formatted string with a header row into JSON objects.
fn load_csv(csv_data: &str) -> Result<Vec<Value>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(Cursor::new(csv_data.as_bytes()));
    let headers = rdr.headers().context("Seed data has no headers")?.clone();

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.context("Unable to read seed data")?;
        let row: Map<String, Value> = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.to_string(), Value::String(v.to_string())))
            .collect();
        rows.push(Value::Object(row));
    }
    Ok(rows)
}

/// Seed investment data.
const INVESTMENT_DATA: &str = r##"date,total,category,place
05/01/2025,"$5,000.00",Ahorro de Emergencia,Nu
12/01/2025,"$2,500.00",ETFs,ETFs
20/01/2025,$800.00,Estudios,Cetes
02/02/2025,"$3,000.00",Anillo,Bonos
15/02/2025,"$1,200.00",etfs,ETFs
01/03/2025,$750.00,Viaje,Nu
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_seeded() {
        let mut store = TestStore::default();
        let rows = store.list(RecordKind::Investment).await.unwrap();
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0]["category"], "Ahorro de Emergencia");
        assert_eq!(rows[0]["total"], "$5,000.00");
        assert!(store.list(RecordKind::Config).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let handle = TestStore::empty();
        let mut store = handle.clone();
        store
            .append(RecordKind::Config, json!({"key": "HIDDEN_GOALS", "value": "[]"}))
            .await
            .unwrap();
        assert_eq!(handle.rows(RecordKind::Config).len(), 1);
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let handle = TestStore::empty();
        let mut store = handle.clone();

        handle.fail_list(RecordKind::Config, true);
        assert!(store.list(RecordKind::Config).await.is_err());
        handle.fail_list(RecordKind::Config, false);
        assert!(store.list(RecordKind::Config).await.is_ok());

        handle.fail_key("CUSTOM_GOALS", true);
        let failed = store
            .append(RecordKind::Config, json!({"key": "CUSTOM_GOALS", "value": "[]"}))
            .await;
        assert!(failed.is_err());
        let saved = store
            .append(RecordKind::Config, json!({"key": "HIDDEN_GOALS", "value": "[]"}))
            .await;
        assert!(saved.is_ok());
        assert_eq!(handle.rows(RecordKind::Config).len(), 1);
    }
}
