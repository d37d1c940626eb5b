//! Per-item performance records and their backing file.
//!
//! A record is stored as `[correct, asked, weight]`. The weight is derived
//! from the other two fields once an item has been asked; unasked items
//! carry a seed weight so new material surfaces early.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::error::{DrillError, Result};
use crate::model::{ItemId, Outcome};

/// Seed weight of an item that has never been asked: as if asked twice
/// with nothing correct.
pub const INITIAL_WEIGHT: f64 = 2.0;

/// Records keyed by item id. Ordered so the file serializes stably.
pub type Records = BTreeMap<ItemId, Record>;

/// Performance statistics for one item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "(f64, u64, f64)", into = "(f64, u64, f64)")]
pub struct Record {
    /// Accumulated credit (1 per full, 0.5 per partial answer).
    pub correct: f64,
    /// Number of times the item was asked.
    pub asked: u64,
    /// Current sampling weight.
    pub weight: f64,
}

impl Record {
    /// A never-asked record with the given seed weight.
    pub fn seed(initial_weight: f64) -> Self {
        Self {
            correct: 0.0,
            asked: 0,
            weight: initial_weight,
        }
    }
}

impl TryFrom<(f64, u64, f64)> for Record {
    type Error = String;

    fn try_from((correct, asked, weight): (f64, u64, f64)) -> std::result::Result<Self, String> {
        if !correct.is_finite() || correct < 0.0 {
            return Err(format!("correct must be a non-negative number, got {correct}"));
        }
        if !weight.is_finite() || weight <= 0.0 {
            return Err(format!("weight must be a positive number, got {weight}"));
        }
        Ok(Self {
            correct,
            asked,
            weight,
        })
    }
}

impl From<Record> for (f64, u64, f64) {
    fn from(r: Record) -> Self {
        (r.correct, r.asked, r.weight)
    }
}

/// Sampling weight for a record: `asked / (1 + correct²)`, or the seed
/// weight when the item has never been asked.
pub fn weight_of(record: &Record, initial_weight: f64) -> f64 {
    derive_weight(record.correct, record.asked, initial_weight)
}

fn derive_weight(correct: f64, asked: u64, initial_weight: f64) -> f64 {
    if asked == 0 {
        initial_weight
    } else {
        asked as f64 / (1.0 + correct * correct)
    }
}

/// Fold one graded answer into a record.
pub fn apply_outcome(record: &Record, outcome: Outcome) -> Record {
    let correct = record.correct + outcome.value();
    let asked = record.asked + 1;
    Record {
        correct,
        asked,
        weight: derive_weight(correct, asked, INITIAL_WEIGHT),
    }
}

/// Result of synchronizing records with the corpus.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    pub records: Records,
    /// Ids that received a fresh seed record.
    pub added: Vec<ItemId>,
}

/// Make sure every corpus id has a record.
///
/// Missing ids get a seed record. Records for ids no longer in the corpus
/// are kept untouched.
pub fn reconcile<'a, I>(item_ids: I, existing: Records, initial_weight: f64) -> Reconciled
where
    I: IntoIterator<Item = &'a ItemId>,
{
    let mut records = existing;
    let mut added = Vec::new();
    for id in item_ids {
        if !records.contains_key(id) {
            records.insert(id.clone(), Record::seed(initial_weight));
            added.push(id.clone());
        }
    }
    Reconciled { records, added }
}

/// Record ids that no corpus item refers to any more.
pub fn orphans<'a, I>(item_ids: I, records: &Records) -> Vec<ItemId>
where
    I: IntoIterator<Item = &'a ItemId>,
{
    let known: std::collections::BTreeSet<&ItemId> = item_ids.into_iter().collect();
    records
        .keys()
        .filter(|id| !known.contains(id))
        .cloned()
        .collect()
}

/// Put every record back to the never-asked seed.
pub fn reset(records: &Records, initial_weight: f64) -> Records {
    records
        .keys()
        .map(|id| (id.clone(), Record::seed(initial_weight)))
        .collect()
}

/// The records file on disk.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every record. A missing file is an empty record set.
    pub fn load(&self) -> Result<Records> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("no records file at {}, starting fresh", self.path.display());
                return Ok(Records::new());
            }
            Err(e) => return Err(DrillError::records(&self.path, e)),
        };
        serde_json::from_str(&content).map_err(|e| DrillError::records(&self.path, e))
    }

    /// Rewrite the whole file atomically.
    ///
    /// The records are written to a temporary file next to the target and
    /// renamed over it, so a failure leaves the previous file intact.
    pub fn persist(&self, records: &Records) -> Result<()> {
        let mut json =
            serde_json::to_string_pretty(records).map_err(|e| DrillError::records(&self.path, e))?;
        json.push('\n');
        write_atomic(&self.path, json.as_bytes())?;
        tracing::info!("saved {} record(s) to {}", records.len(), self.path.display());
        Ok(())
    }

    /// Copy the records file to `target`.
    pub fn backup(&self, target: &Path) -> Result<()> {
        let bytes = std::fs::read(&self.path).map_err(|e| DrillError::records(&self.path, e))?;
        write_atomic(target, &bytes)?;
        tracing::info!("backed up {} to {}", self.path.display(), target.display());
        Ok(())
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| DrillError::records(path, e))?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| DrillError::records(path, e))?;
    tmp.write_all(bytes)
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| DrillError::records(path, e))?;
    tmp.persist(path)
        .map_err(|e| DrillError::records(path, e.error))?;
    Ok(())
}
