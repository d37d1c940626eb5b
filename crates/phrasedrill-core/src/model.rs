//! Core data model types for phrasedrill.
//!
//! Question types, graded outcomes and corpus items. The per-item
//! performance record lives in [`crate::records`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::question::Question;

/// Stable identifier of a corpus item, unique across all types.
pub type ItemId = String;

/// The closed set of exercise kinds.
///
/// Declaration order is the display order used everywhere items are
/// grouped by type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Vocabulary,
    #[serde(alias = "fill")]
    FillInGap,
    Expression,
    PhrasalVerb,
    #[serde(alias = "synonyms")]
    WordField,
    Idiom,
    MultipleChoice,
    Pronunciation,
}

impl QuestionType {
    /// Every question type in display order.
    pub const ALL: [QuestionType; 8] = [
        QuestionType::Vocabulary,
        QuestionType::FillInGap,
        QuestionType::Expression,
        QuestionType::PhrasalVerb,
        QuestionType::WordField,
        QuestionType::Idiom,
        QuestionType::MultipleChoice,
        QuestionType::Pronunciation,
    ];

    /// Corpus key for this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Vocabulary => "vocabulary",
            QuestionType::FillInGap => "fill_in_gap",
            QuestionType::Expression => "expression",
            QuestionType::PhrasalVerb => "phrasal_verb",
            QuestionType::WordField => "word_field",
            QuestionType::Idiom => "idiom",
            QuestionType::MultipleChoice => "multiple_choice",
            QuestionType::Pronunciation => "pronunciation",
        }
    }

    /// Human-readable label for prompts and tables.
    pub fn label(&self) -> &'static str {
        match self {
            QuestionType::Vocabulary => "Vocabulary",
            QuestionType::FillInGap => "Fill in the gap",
            QuestionType::Expression => "Expressions",
            QuestionType::PhrasalVerb => "Phrasal verbs",
            QuestionType::WordField => "Word fields",
            QuestionType::Idiom => "Idioms",
            QuestionType::MultipleChoice => "Multiple choice",
            QuestionType::Pronunciation => "Pronunciation",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "vocabulary" => Ok(QuestionType::Vocabulary),
            "fill_in_gap" | "fill" => Ok(QuestionType::FillInGap),
            "expression" => Ok(QuestionType::Expression),
            "phrasal_verb" => Ok(QuestionType::PhrasalVerb),
            "word_field" | "synonyms" => Ok(QuestionType::WordField),
            "idiom" => Ok(QuestionType::Idiom),
            "multiple_choice" => Ok(QuestionType::MultipleChoice),
            "pronunciation" => Ok(QuestionType::Pronunciation),
            other => Err(format!("unknown question type: {other}")),
        }
    }
}

/// Graded result of one evaluated item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Full,
    Partial,
    None,
}

impl Outcome {
    /// Score contributed by this outcome.
    pub fn value(&self) -> f64 {
        match self {
            Outcome::Full => 1.0,
            Outcome::Partial => 0.5,
            Outcome::None => 0.0,
        }
    }

    /// Feedback line shown after an item is graded.
    pub fn feedback(&self) -> &'static str {
        match self {
            Outcome::Full => "Correct! One point",
            Outcome::Partial => "So-so: half a point",
            Outcome::None => "Whoops, incorrect: no points",
        }
    }
}

/// Parses a human judgement: `yes`, `sorta` or `no`.
impl FromStr for Outcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "yes" | "y" => Ok(Outcome::Full),
            "sorta" | "s" => Ok(Outcome::Partial),
            "no" | "n" => Ok(Outcome::None),
            other => Err(format!("expected yes, no or sorta, got '{other}'")),
        }
    }
}

/// One corpus entry: a stable id and its typed question payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: ItemId,
    pub question: Question,
}

impl Item {
    pub fn question_type(&self) -> QuestionType {
        self.question.question_type()
    }
}
