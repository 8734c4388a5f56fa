//! Reads and writes the configuration documents kept in the remote `config` log.
//!
//! The remote side only ever appends `(key, value)` rows. Reading reduces that log to the last
//! row per key, in the order the rows were returned. Reads never fail: a log that cannot be
//! fetched, or a document that does not parse, falls back to the document's default and is
//! logged. Writes append a new row and report failure to the caller.

use crate::api::RecordStore;
use crate::model::{
    ConfigRecord, CustomGoals, Document, DocumentKey, HiddenGoals, RecordKind, TargetOverrides,
};
use crate::{utils, Result};
use anyhow::Context;
use std::collections::HashMap;
use tracing::{debug, trace, warn};

/// The three documents as held in memory for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Documents {
    pub custom: CustomGoals,
    pub hidden: HiddenGoals,
    pub overrides: TargetOverrides,
}

/// A serialized document ready to be written. The value is captured when the write is created, so
/// later in-memory changes do not affect it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentWrite {
    key: DocumentKey,
    value: String,
}

impl DocumentWrite {
    pub fn new<D: Document>(document: &D) -> Result<Self> {
        let value = serde_json::to_string(document)
            .with_context(|| format!("Unable to serialize {}", D::KEY))?;
        Ok(Self { key: D::KEY, value })
    }

    pub fn key(&self) -> DocumentKey {
        self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Client for the configuration documents, on top of a `RecordStore`.
pub struct ConfigStore {
    store: Box<dyn RecordStore + Send>,
}

impl ConfigStore {
    pub fn new(store: Box<dyn RecordStore + Send>) -> Self {
        Self { store }
    }

    /// The underlying store, for reading and writing other kinds of records.
    pub(crate) fn records(&mut self) -> &mut (dyn RecordStore + Send) {
        self.store.as_mut()
    }

    /// Fetches the config log and reduces it to the last written value per key.
    async fn fetch_latest(&mut self) -> Result<HashMap<String, String>> {
        let rows = self
            .store
            .list(RecordKind::Config)
            .await
            .context("Unable to fetch the configuration log")?;
        trace!("Fetched {} configuration rows", rows.len());

        let mut latest = HashMap::new();
        for (ix, row) in rows.into_iter().enumerate() {
            match serde_json::from_value::<ConfigRecord>(row) {
                Ok(record) => {
                    latest.insert(record.key, record.value);
                }
                Err(e) => warn!("Ignoring configuration row {ix}: {e}"),
            }
        }
        Ok(latest)
    }

    /// Returns the last written value for `key`, or `None` if there is none or the log could not
    /// be fetched.
    pub async fn fetch_document(&mut self, key: DocumentKey) -> Option<String> {
        match self.fetch_latest().await {
            Ok(mut latest) => latest.remove(&key.to_string()),
            Err(e) => {
                warn!("Treating {key} as missing: {e:#}");
                None
            }
        }
    }

    /// Fetches and parses one document, falling back to its default.
    pub async fn load<D: Document>(&mut self) -> D {
        let raw = self.fetch_document(D::KEY).await;
        parse_document(raw.as_deref())
    }

    /// Fetches the log once and parses all three documents from it.
    pub async fn load_all(&mut self) -> Documents {
        let mut latest = match self.fetch_latest().await {
            Ok(latest) => latest,
            Err(e) => {
                warn!("Using default goal configuration: {e:#}");
                HashMap::new()
            }
        };
        let mut take = |key: DocumentKey| latest.remove(&key.to_string());
        let custom = take(CustomGoals::KEY);
        let hidden = take(HiddenGoals::KEY);
        let overrides = take(TargetOverrides::KEY);
        Documents {
            custom: parse_document(custom.as_deref()),
            hidden: parse_document(hidden.as_deref()),
            overrides: parse_document(overrides.as_deref()),
        }
    }

    /// Appends a new row for `document`.
    pub async fn save_document<D: Document>(&mut self, document: &D) -> Result<()> {
        self.save(&DocumentWrite::new(document)?).await
    }

    /// Appends a new row holding an already serialized document.
    pub async fn save(&mut self, write: &DocumentWrite) -> Result<()> {
        let record = ConfigRecord {
            date: utils::today(),
            key: write.key.to_string(),
            value: write.value.clone(),
        };
        let payload = serde_json::to_value(&record).context("Unable to serialize config record")?;
        self.store
            .append(RecordKind::Config, payload)
            .await
            .with_context(|| format!("Unable to save {}", write.key))?;
        debug!("Saved {}", write.key);
        Ok(())
    }
}

/// Parses a document, treating a missing or malformed value as the default.
fn parse_document<D: Document>(raw: Option<&str>) -> D {
    let Some(raw) = raw else {
        return D::default();
    };
    match serde_json::from_str(raw) {
        Ok(document) => document,
        Err(e) => {
            warn!("{} is malformed, using the default: {e}", D::KEY);
            D::default()
        }
    }
}
