//! The answer-collection seam between questions and the user.
//!
//! Questions never touch the terminal. They ask an [`AnswerSource`] for a
//! line of text, a selection or a human judgement, and hand it feedback
//! strings to render. The CLI implements this over stdin/stdout; tests use
//! [`crate::mock::ScriptedAnswers`].

use crate::error::Result;
use crate::model::Outcome;

// ---------------------------------------------------------------------------
// Answer source trait
// ---------------------------------------------------------------------------

/// Interactive input collection for a drill session.
///
/// Every reading method fails with [`crate::error::DrillError::InputClosed`]
/// once no more input can be obtained.
pub trait AnswerSource {
    /// Show `prompt` and read one free-text answer.
    fn ask(&mut self, prompt: &str) -> Result<String>;

    /// Show `prompt` with numbered `options` and read a zero-based index
    /// into `options`.
    fn choose(&mut self, prompt: &str, options: &[String]) -> Result<usize>;

    /// Ask the user to grade their own answer as yes, no or sorta.
    fn judge(&mut self, prompt: &str) -> Result<Outcome>;

    /// Render a feedback line.
    fn feedback(&mut self, text: &str);
}
