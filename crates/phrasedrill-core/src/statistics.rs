//! Aggregate views over the corpus and its records.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::corpus::Corpus;
use crate::model::{ItemId, QuestionType};
use crate::records::{Record, Records};

/// Per-type performance totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeSummary {
    pub question_type: QuestionType,
    /// Items of this type in the corpus.
    pub items: usize,
    /// Total times asked.
    pub asked: u64,
    /// Total credit earned.
    pub correct: f64,
    /// `correct / asked`, 0 when never asked.
    pub accuracy: f64,
    /// Mean record weight over items that have a record.
    pub mean_weight: f64,
}

/// An item ranked by how badly it is going.
#[derive(Debug, Clone, PartialEq)]
pub struct HardItem {
    pub id: ItemId,
    pub question_type: QuestionType,
    pub summary: String,
    pub record: Record,
}

/// Summarize records per question type, skipping types with no items.
pub fn summarize(corpus: &Corpus, records: &Records) -> Vec<TypeSummary> {
    corpus
        .by_type()
        .iter()
        .filter(|(_, items)| !items.is_empty())
        .map(|(ty, items)| {
            let known: Vec<&Record> = items.keys().filter_map(|id| records.get(id)).collect();
            let asked: u64 = known.iter().map(|r| r.asked).sum();
            let correct: f64 = known.iter().map(|r| r.correct).sum();
            let accuracy = if asked == 0 {
                0.0
            } else {
                correct / asked as f64
            };
            let mean_weight = if known.is_empty() {
                0.0
            } else {
                known.iter().map(|r| r.weight).sum::<f64>() / known.len() as f64
            };
            TypeSummary {
                question_type: *ty,
                items: items.len(),
                asked,
                correct,
                accuracy,
                mean_weight,
            }
        })
        .collect()
}

/// The `k` corpus items with the highest weight. Ties go to the smaller id.
pub fn hardest(corpus: &Corpus, records: &Records, k: usize) -> Vec<HardItem> {
    let mut ranked: Vec<HardItem> = corpus
        .by_type()
        .values()
        .flat_map(|items| items.iter())
        .filter_map(|(id, item)| {
            records.get(id).map(|record| HardItem {
                id: id.clone(),
                question_type: item.question_type(),
                summary: item.question.summarize(),
                record: *record,
            })
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.record
            .weight
            .partial_cmp(&a.record.weight)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });
    ranked.truncate(k);
    ranked
}
