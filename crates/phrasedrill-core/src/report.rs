//! Session report types with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{ItemId, Outcome, QuestionType};
use crate::scheduler::PoolTooSmall;

/// The result of one drill session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    /// Unique session identifier.
    pub id: Uuid,
    /// When the session started.
    pub created_at: DateTime<Utc>,
    /// Number of questions asked for.
    pub requested: usize,
    /// Graded items in asking order.
    pub entries: Vec<AnsweredItem>,
    /// Sum of outcome values.
    pub score: f64,
    /// `100 * score / entries.len()`, 0 for an empty session.
    pub grade: f64,
    /// Set when the pool held fewer items than requested.
    #[serde(default)]
    pub pool_warning: Option<PoolTooSmall>,
    /// Casual mode was active at commit time.
    #[serde(default)]
    pub casual: bool,
    /// Records were updated on disk.
    #[serde(default)]
    pub persisted: bool,
}

/// One graded item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnsweredItem {
    pub id: ItemId,
    pub question_type: QuestionType,
    pub summary: String,
    pub outcome: Outcome,
}

impl SessionReport {
    pub(crate) fn new(requested: usize, pool_warning: Option<PoolTooSmall>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            requested,
            entries: Vec::new(),
            score: 0.0,
            grade: 0.0,
            pool_warning,
            casual: false,
            persisted: false,
        }
    }

    pub(crate) fn push(&mut self, entry: AnsweredItem) {
        self.score += entry.outcome.value();
        self.entries.push(entry);
        self.grade = 100.0 * self.score / self.entries.len() as f64;
    }

    /// Number of items asked.
    pub fn asked(&self) -> usize {
        self.entries.len()
    }

    /// Final score line, e.g. `Final score: 3.5 out of 5 (70%)`.
    pub fn score_line(&self) -> String {
        format!(
            "Final score: {} out of {} ({}%)",
            self.score,
            self.asked(),
            self.grade as u32
        )
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: SessionReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Conventional file name inside a report directory.
    pub fn file_name(&self) -> String {
        format!("session-{}.json", self.created_at.format("%Y-%m-%dT%H%M%S"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, outcome: Outcome) -> AnsweredItem {
        AnsweredItem {
            id: id.into(),
            question_type: QuestionType::Vocabulary,
            summary: id.into(),
            outcome,
        }
    }

    #[test]
    fn push_accumulates_score_and_grade() {
        let mut report = SessionReport::new(4, None);
        assert_eq!(report.grade, 0.0);
        report.push(entry("a", Outcome::Full));
        report.push(entry("b", Outcome::Partial));
        report.push(entry("c", Outcome::None));
        report.push(entry("d", Outcome::Partial));
        assert_eq!(report.score, 2.0);
        assert_eq!(report.grade, 50.0);
        assert_eq!(report.score_line(), "Final score: 2 out of 4 (50%)");
    }

    #[test]
    fn json_roundtrip() {
        let mut report = SessionReport::new(2, Some(PoolTooSmall {
            requested: 2,
            available: 1,
        }));
        report.push(entry("a", Outcome::Full));
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join(report.file_name());

        report.save_json(&path).unwrap();
        let loaded = SessionReport::load_json(&path).unwrap();

        assert_eq!(loaded.id, report.id);
        assert_eq!(loaded.entries, report.entries);
        assert_eq!(loaded.pool_warning, report.pool_warning);
    }
}
