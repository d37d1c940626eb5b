//! Question variants and their grading rules.
//!
//! [`Question`] is a closed enum; each variant owns a validated payload and
//! `evaluate` dispatches to that variant's rule. Input is collected through
//! an [`AnswerSource`], randomness through a caller-supplied RNG.

use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{DrillError, Result};
use crate::model::{Outcome, QuestionType};
use crate::traits::AnswerSource;

/// Default share of a word field that must be recalled for full credit.
pub const DEFAULT_WORD_FIELD_THRESHOLD: f64 = 1.0;

/// Default number of letters revealed in an idiom hint.
pub const DEFAULT_HINT_CHARS: usize = 3;

const JUDGE_CHOICES: &str = "(yes, no, sorta)";

/// Grading knobs that apply at evaluation time.
#[derive(Debug, Clone, PartialEq)]
pub struct GradingSettings {
    /// Recall ratio needed for full credit on a word field.
    pub word_field_threshold: f64,
    /// Pin the phrasal-verb sub-mode instead of choosing at random.
    pub phrasal_mode: Option<PhrasalMode>,
}

impl Default for GradingSettings {
    fn default() -> Self {
        Self {
            word_field_threshold: DEFAULT_WORD_FIELD_THRESHOLD,
            phrasal_mode: None,
        }
    }
}

/// The two ways a phrasal verb can be asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhrasalMode {
    /// Translate the verb phrase.
    Translate,
    /// Supply the verb and its particles for a prompt sentence.
    Particle,
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Vocabulary {
    /// The word to translate.
    pub word: String,
    /// Translations accepted without a judgement. May be empty.
    pub meanings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FillInGap {
    /// Sentence with the gap marked by underscores.
    pub sentence: String,
    /// The word that fills the gap.
    pub word: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    /// Sentence using the expression.
    pub sentence: String,
    /// Reference meaning shown before the learner judges their answer.
    pub meaning: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhrasalVerb {
    /// Base verb, e.g. `put`.
    pub verb: String,
    /// Particles in order, e.g. `up`, `with`. Never empty.
    pub particles: Vec<String>,
    /// Accepted translations of the whole phrase.
    pub meanings: Vec<String>,
    /// Whether an object may sit between verb and particles.
    pub separable: bool,
    /// Example sentence shown with the question.
    pub sentence: String,
}

impl PhrasalVerb {
    /// The verb followed by its particles, e.g. `put up with`.
    pub fn phrase(&self) -> String {
        std::iter::once(self.verb.as_str())
            .chain(self.particles.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A prompt word and the set of words belonging to its field.
#[derive(Debug, Clone, PartialEq)]
pub struct WordField {
    pub prompt: String,
    words: Vec<String>,
}

/// Outcome of a word-field answer, with the overlap that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct WordFieldGrade {
    /// Expected words the answer contained, in answer order.
    pub right: Vec<String>,
    /// Answer words outside the field, in answer order.
    pub wrong: Vec<String>,
    /// Expected words the answer left out.
    pub missing: Vec<String>,
    pub outcome: Outcome,
}

impl WordField {
    /// Build a word field, normalizing the expected words.
    ///
    /// Fails with [`DrillError::DegenerateField`] when no expected word
    /// survives normalization.
    pub fn new(id: &str, prompt: impl Into<String>, words: Vec<String>) -> Result<Self> {
        let mut seen = BTreeSet::new();
        let words: Vec<String> = words
            .iter()
            .map(|w| normalize_word(w))
            .filter(|w| !w.is_empty() && seen.insert(w.clone()))
            .collect();
        if words.is_empty() {
            return Err(DrillError::DegenerateField { id: id.to_string() });
        }
        Ok(Self {
            prompt: prompt.into(),
            words,
        })
    }

    /// The normalized expected words.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Grade a comma-separated answer against the field.
    ///
    /// With `r` recalled words out of `s` expected: full credit when
    /// `r/s >= threshold`, half credit when `2r/s >= threshold`.
    pub fn grade(&self, input: &str, threshold: f64) -> WordFieldGrade {
        let mut right = Vec::new();
        let mut wrong = Vec::new();
        for token in input.split(',').map(normalize_word) {
            if token.is_empty() {
                continue;
            }
            if self.words.contains(&token) {
                if !right.contains(&token) {
                    right.push(token);
                }
            } else if !wrong.contains(&token) {
                wrong.push(token);
            }
        }
        let missing = self
            .words
            .iter()
            .filter(|w| !right.contains(w))
            .cloned()
            .collect();

        let r = right.len() as f64;
        let s = self.words.len() as f64;
        let outcome = if r / s >= threshold {
            Outcome::Full
        } else if 2.0 * r / s >= threshold {
            Outcome::Partial
        } else {
            Outcome::None
        };

        WordFieldGrade {
            right,
            wrong,
            missing,
            outcome,
        }
    }
}

fn normalize_word(word: &str) -> String {
    word.trim().to_lowercase()
}

/// An idiom to recall from its meaning and a partially revealed mask.
#[derive(Debug, Clone, PartialEq)]
pub struct Idiom {
    /// The idiom, trimmed of surrounding whitespace.
    pub idiom: String,
    pub meaning: String,
    hint_chars: usize,
}

impl Idiom {
    /// Build an idiom that reveals `hint_chars` letters in its hint.
    ///
    /// Fails with [`DrillError::IdiomTooShort`] when the idiom has fewer
    /// letters than that.
    pub fn new(
        id: &str,
        idiom: impl Into<String>,
        meaning: impl Into<String>,
        hint_chars: usize,
    ) -> Result<Self> {
        let idiom = idiom.into().trim().to_string();
        let letters = letter_positions(&idiom).len();
        if letters < hint_chars {
            return Err(DrillError::IdiomTooShort {
                id: id.to_string(),
                letters,
                required: hint_chars,
            });
        }
        Ok(Self {
            idiom,
            meaning: meaning.into(),
            hint_chars,
        })
    }

    /// Mask the idiom, revealing `hint_chars` random letters.
    ///
    /// Letters and digits become `_`; whitespace and punctuation stay.
    pub fn hint<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let letters = letter_positions(&self.idiom);
        let revealed: BTreeSet<usize> =
            rand::seq::index::sample(rng, letters.len(), self.hint_chars)
                .into_iter()
                .map(|i| letters[i])
                .collect();

        self.idiom
            .chars()
            .enumerate()
            .map(|(i, c)| {
                if !c.is_alphanumeric() || revealed.contains(&i) {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }
}

/// Char indices of alphabetic characters.
fn letter_positions(text: &str) -> Vec<usize> {
    text.chars()
        .enumerate()
        .filter(|(_, c)| c.is_alphabetic())
        .map(|(i, _)| i)
        .collect()
}

/// A question whose first option is the canonical answer.
#[derive(Debug, Clone, PartialEq)]
pub struct MultipleChoice {
    pub question: String,
    /// Correct answer first, then the distractors.
    pub options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pronunciation {
    /// The word whose pronunciation is asked.
    pub word: String,
    /// Sentence giving the word its context.
    pub sentence: String,
    /// Correct transcription first, then the distractors.
    pub options: Vec<String>,
}

// ---------------------------------------------------------------------------
// Question
// ---------------------------------------------------------------------------

/// One exercise, ready to be asked.
#[derive(Debug, Clone, PartialEq)]
pub enum Question {
    Vocabulary(Vocabulary),
    FillInGap(FillInGap),
    Expression(Expression),
    PhrasalVerb(PhrasalVerb),
    WordField(WordField),
    Idiom(Idiom),
    MultipleChoice(MultipleChoice),
    Pronunciation(Pronunciation),
}

impl Question {
    pub fn question_type(&self) -> QuestionType {
        match self {
            Question::Vocabulary(_) => QuestionType::Vocabulary,
            Question::FillInGap(_) => QuestionType::FillInGap,
            Question::Expression(_) => QuestionType::Expression,
            Question::PhrasalVerb(_) => QuestionType::PhrasalVerb,
            Question::WordField(_) => QuestionType::WordField,
            Question::Idiom(_) => QuestionType::Idiom,
            Question::MultipleChoice(_) => QuestionType::MultipleChoice,
            Question::Pronunciation(_) => QuestionType::Pronunciation,
        }
    }

    /// Short label used in end-of-session review. Never used for grading.
    pub fn summarize(&self) -> String {
        match self {
            Question::Vocabulary(q) => q.word.clone(),
            Question::FillInGap(q) => q.word.clone(),
            Question::Expression(q) => q.sentence.clone(),
            Question::PhrasalVerb(q) => q.phrase(),
            Question::WordField(q) => q.prompt.clone(),
            Question::Idiom(q) => q.idiom.clone(),
            Question::MultipleChoice(q) => q.question.clone(),
            Question::Pronunciation(q) => q.word.clone(),
        }
    }

    /// Ask the question and grade the answer.
    pub fn evaluate<R: Rng + ?Sized>(
        &self,
        answers: &mut dyn AnswerSource,
        rng: &mut R,
        settings: &GradingSettings,
    ) -> Result<Outcome> {
        match self {
            Question::Vocabulary(q) => {
                let answer = answers.ask(&format!("Translate: {}", q.word))?;
                grade_translation(answers, &answer, &q.meanings)
            }
            Question::FillInGap(q) => {
                let answer = answers.ask(&format!("Fill in the gap: {}", q.sentence))?;
                answers.feedback(&format!("Correct answer: {}", q.word));
                Ok(if answer.trim() == q.word {
                    Outcome::Full
                } else {
                    Outcome::None
                })
            }
            Question::Expression(q) => {
                answers.ask(&format!("Translate: {}", q.meaning))?;
                answers.feedback(&format!("Suggested translation: {}", q.sentence));
                answers.judge(&format!("Accept answer? {JUDGE_CHOICES}"))
            }
            Question::PhrasalVerb(q) => {
                let mode = settings.phrasal_mode.unwrap_or_else(|| {
                    if rng.random_bool(0.5) {
                        PhrasalMode::Translate
                    } else {
                        PhrasalMode::Particle
                    }
                });
                evaluate_phrasal(q, mode, answers)
            }
            Question::WordField(q) => {
                let answer = answers.ask(&format!(
                    "Word field of: {} ({} words stored). Enter comma-separated words",
                    q.prompt,
                    q.words.len()
                ))?;
                let grade = q.grade(&answer, settings.word_field_threshold);
                answers.feedback(&format!(
                    "Expected words ({}): {}",
                    q.words.len(),
                    q.words.join(", ")
                ));
                answers.feedback(&format!(
                    "Correct answers ({}): {}",
                    grade.right.len(),
                    grade.right.join(", ")
                ));
                answers.feedback(&format!(
                    "Wrong answers ({}): {}",
                    grade.wrong.len(),
                    grade.wrong.join(", ")
                ));
                Ok(grade.outcome)
            }
            Question::Idiom(q) => {
                let hint = q.hint(rng);
                let answer = answers.ask(&format!("Idiom meaning '{}': {hint}", q.meaning))?;
                answers.feedback(&format!("Correct answer: {}", q.idiom));
                Ok(if answer.trim().to_lowercase() == q.idiom.trim().to_lowercase() {
                    Outcome::Full
                } else {
                    Outcome::None
                })
            }
            Question::MultipleChoice(q) => evaluate_choice(&q.question, &q.options, answers, rng),
            Question::Pronunciation(q) => {
                let outcome = evaluate_choice(
                    &format!("How is '{}' pronounced?", q.word),
                    &q.options,
                    answers,
                    rng,
                )?;
                answers.feedback(&format!("Practice: {}", q.sentence));
                Ok(outcome)
            }
        }
    }
}

/// Accept a listed meaning outright; otherwise let the user judge.
fn grade_translation(
    answers: &mut dyn AnswerSource,
    answer: &str,
    meanings: &[String],
) -> Result<Outcome> {
    let answer = answer.trim();
    if meanings.iter().any(|m| m == answer) {
        return Ok(Outcome::Full);
    }
    answers.feedback(&format!("Possible meanings: {}", meanings.join(", ")));
    answers.judge(&format!("Accept '{answer}'? {JUDGE_CHOICES}"))
}

fn evaluate_phrasal(
    q: &PhrasalVerb,
    mode: PhrasalMode,
    answers: &mut dyn AnswerSource,
) -> Result<Outcome> {
    let separable = if q.separable {
        "separable"
    } else {
        "inseparable"
    };
    match mode {
        PhrasalMode::Translate => {
            let answer = answers.ask(&format!("Translate the phrasal verb: {}", q.phrase()))?;
            let outcome = grade_translation(answers, &answer, &q.meanings)?;
            answers.feedback(&format!("'{}' is {separable}", q.phrase()));
            Ok(outcome)
        }
        PhrasalMode::Particle => {
            let answer = answers.ask(&format!(
                "Complete with a phrasal verb built on '{}': {}",
                q.verb, q.sentence
            ))?;
            answers.feedback(&format!("Correct answer: {} ({separable})", q.phrase()));
            let expected = std::iter::once(&q.verb).chain(q.particles.iter());
            Ok(if answer.split_whitespace().eq(expected.map(String::as_str)) {
                Outcome::Full
            } else {
                Outcome::None
            })
        }
    }
}

/// Shuffle the options, ask for one, and compare with the canonical answer.
fn evaluate_choice<R: Rng + ?Sized>(
    prompt: &str,
    options: &[String],
    answers: &mut dyn AnswerSource,
    rng: &mut R,
) -> Result<Outcome> {
    let Some(correct) = options.first() else {
        return Ok(Outcome::None);
    };
    let mut shuffled = options.to_vec();
    shuffled.shuffle(rng);

    let picked = answers.choose(prompt, &shuffled)?;
    if shuffled.get(picked) == Some(correct) {
        Ok(Outcome::Full)
    } else {
        answers.feedback(&format!("Correct answer: {correct}"));
        Ok(Outcome::None)
    }
}
