//! Drill session orchestration.
//!
//! A session selects items, evaluates each through an [`AnswerSource`],
//! and accumulates a [`SessionReport`]. Records are only touched by
//! [`DrillSession::commit`], in one batch, and not at all in casual mode.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::Rng;

use crate::config::DrillConfig;
use crate::corpus::Corpus;
use crate::error::{DrillError, Result};
use crate::model::QuestionType;
use crate::question::GradingSettings;
use crate::records::{apply_outcome, reconcile, Record, RecordStore, Records};
use crate::report::{AnsweredItem, SessionReport};
use crate::scheduler::select;
use crate::traits::AnswerSource;

/// Shared casual-mode switch.
///
/// Clones share the same flag, so a signal handler can flip it while a
/// session is running on another thread.
#[derive(Debug, Clone, Default)]
pub struct CasualFlag(Arc<AtomicBool>);

impl CasualFlag {
    pub fn new(active: bool) -> Self {
        Self(Arc::new(AtomicBool::new(active)))
    }

    pub fn is_active(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn set(&self, active: bool) {
        self.0.store(active, Ordering::SeqCst);
    }

    /// Flip the flag and return the new state.
    pub fn toggle(&self) -> bool {
        !self.0.fetch_xor(true, Ordering::SeqCst)
    }
}

/// Settings and shared state for one drill invocation.
#[derive(Debug, Clone)]
pub struct DrillContext {
    pub initial_weight: f64,
    pub grading: GradingSettings,
    pub casual: CasualFlag,
}

impl DrillContext {
    pub fn from_config(config: &DrillConfig, casual: CasualFlag) -> Self {
        Self {
            initial_weight: config.initial_weight,
            grading: config.grading(),
            casual,
        }
    }
}

/// What one session asks for.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionPlan {
    pub count: usize,
    pub enabled: BTreeSet<QuestionType>,
}

impl SessionPlan {
    pub fn from_config(config: &DrillConfig) -> Self {
        Self {
            count: config.questions,
            enabled: config.enabled(),
        }
    }
}

/// How the end-of-session record update went.
#[derive(Debug)]
pub enum CommitStatus {
    /// Casual mode was active; nothing was written.
    Casual,
    /// Records were updated on disk.
    Saved,
    /// Writing failed. The session result stands.
    Failed(DrillError),
}

/// Load records, seed any corpus id without one, and persist the seeds
/// right away so they survive an aborted session.
///
/// The file is only rewritten when something was added.
pub fn sync_records(corpus: &Corpus, store: &RecordStore, initial_weight: f64) -> Result<Records> {
    let existing = store.load()?;
    let reconciled = reconcile(corpus.ids(), existing, initial_weight);
    if !reconciled.added.is_empty() {
        tracing::info!(
            "seeding {} new record(s) in {}",
            reconciled.added.len(),
            store.path().display()
        );
        store.persist(&reconciled.records)?;
    }
    Ok(reconciled.records)
}

/// One drill run over a loaded corpus.
pub struct DrillSession<'a> {
    corpus: &'a Corpus,
    context: &'a DrillContext,
}

impl<'a> DrillSession<'a> {
    pub fn new(corpus: &'a Corpus, context: &'a DrillContext) -> Self {
        Self { corpus, context }
    }

    /// Select, ask and grade the items of one session.
    ///
    /// Running out of input aborts with [`DrillError::InputClosed`] and
    /// leaves no trace in the records.
    pub fn run<R: Rng + ?Sized>(
        &self,
        records: &Records,
        plan: &SessionPlan,
        answers: &mut dyn AnswerSource,
        rng: &mut R,
    ) -> Result<SessionReport> {
        let selection = select(
            self.corpus.by_type(),
            records,
            &plan.enabled,
            plan.count,
            self.context.initial_weight,
            rng,
        )?;
        let mut report = SessionReport::new(plan.count, selection.warning);

        for id in &selection.ids {
            let Some(item) = self.corpus.get(id) else {
                tracing::warn!("selected id '{id}' is not in the corpus");
                continue;
            };
            let outcome = item
                .question
                .evaluate(answers, rng, &self.context.grading)?;
            answers.feedback(&format!("    -> {}", outcome.feedback()));
            tracing::debug!("{id}: {outcome:?}");
            report.push(AnsweredItem {
                id: id.clone(),
                question_type: item.question_type(),
                summary: item.question.summarize(),
                outcome,
            });
        }

        Ok(report)
    }

    /// Fold the session outcomes into the records and persist them.
    ///
    /// The casual flag is read here, so toggling it at any point before
    /// the end of the session decides whether anything is written. A
    /// write failure is logged and returned as [`CommitStatus::Failed`]
    /// instead of an error.
    pub fn commit(
        &self,
        report: &mut SessionReport,
        records: &Records,
        store: &RecordStore,
    ) -> CommitStatus {
        if self.context.casual.is_active() {
            report.casual = true;
            report.persisted = false;
            tracing::info!("casual mode active, records left untouched");
            return CommitStatus::Casual;
        }

        let updated = updated_records(records, report, self.context.initial_weight);
        match store.persist(&updated) {
            Ok(()) => {
                report.persisted = true;
                CommitStatus::Saved
            }
            Err(e) => {
                tracing::warn!("session scored but records were not saved: {e}");
                report.persisted = false;
                CommitStatus::Failed(e)
            }
        }
    }
}

/// Apply every outcome of a session to a copy of `records`.
pub fn updated_records(records: &Records, report: &SessionReport, initial_weight: f64) -> Records {
    let mut updated = records.clone();
    for entry in &report.entries {
        let current = updated
            .get(&entry.id)
            .copied()
            .unwrap_or_else(|| Record::seed(initial_weight));
        updated.insert(entry.id.clone(), apply_outcome(&current, entry.outcome));
    }
    updated
}

/// Ungraded recall exercise: ask for one sentence per asked item, stop at
/// the first empty line, then list what the session covered.
///
/// Returns the number of sentences written. End of input ends the review
/// quietly.
pub fn review(answers: &mut dyn AnswerSource, report: &SessionReport) -> Result<usize> {
    answers.feedback(
        "Enter a sentence involving each of the previous questions. \
         Press Enter on an empty line to stop.",
    );

    let mut written = 0;
    for i in 1..=report.asked() {
        let line = match answers.ask(&format!("{i}:")) {
            Ok(line) => line,
            Err(DrillError::InputClosed) => break,
            Err(e) => return Err(e),
        };
        if line.trim().is_empty() {
            break;
        }
        written += 1;
    }

    answers.feedback("The concepts featured in the exercises were:");
    for (i, entry) in report.entries.iter().enumerate() {
        answers.feedback(&format!("{}. {}", i + 1, entry.summary));
    }
    Ok(written)
}

/// Encouragement for a grade in `0..=100`.
pub fn verdict(grade: f64) -> &'static str {
    match grade {
        g if (0.0..40.0).contains(&g) => "Rough one. Back to the notebook!",
        g if (40.0..60.0).contains(&g) => "Getting there, but the exam will want more.",
        g if (60.0..80.0).contains(&g) => "Need to work on these a bit more!",
        g if (80.0..90.0).contains(&g) => "Good job! Practice makes perfect though.",
        g if (90.0..100.0).contains(&g) => "Amazing, nearly there.",
        g if g == 100.0 => "Flawless! Keep it up!",
        _ => "Invalid grade",
    }
}
