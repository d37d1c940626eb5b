//! Scripted answer source for testing.

use std::collections::VecDeque;

use crate::error::{DrillError, Result};
use crate::model::Outcome;
use crate::traits::AnswerSource;

/// An answer source that replays a fixed list of input lines.
///
/// Lines are consumed the way a user would type them: `ask` takes the next
/// line verbatim, `choose` accepts either the option text or its 1-based
/// number, and `judge` accepts yes/no/sorta. Unusable lines are skipped,
/// mirroring a console that re-prompts. Once the script runs out every
/// read fails with [`DrillError::InputClosed`].
#[derive(Debug, Default)]
pub struct ScriptedAnswers {
    lines: VecDeque<String>,
    prompts: Vec<String>,
    feedback: Vec<String>,
}

impl ScriptedAnswers {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
            feedback: Vec::new(),
        }
    }

    /// Every prompt shown so far.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    /// Every feedback line emitted so far.
    pub fn feedback_lines(&self) -> &[String] {
        &self.feedback
    }

    /// Number of scripted lines not consumed yet.
    pub fn remaining(&self) -> usize {
        self.lines.len()
    }

    fn next_line(&mut self) -> Result<String> {
        self.lines.pop_front().ok_or(DrillError::InputClosed)
    }
}

impl AnswerSource for ScriptedAnswers {
    fn ask(&mut self, prompt: &str) -> Result<String> {
        self.prompts.push(prompt.to_string());
        self.next_line()
    }

    fn choose(&mut self, prompt: &str, options: &[String]) -> Result<usize> {
        self.prompts.push(prompt.to_string());
        loop {
            let line = self.next_line()?;
            if let Some(index) = parse_choice(&line, options) {
                return Ok(index);
            }
        }
    }

    fn judge(&mut self, prompt: &str) -> Result<Outcome> {
        self.prompts.push(prompt.to_string());
        loop {
            if let Ok(outcome) = self.next_line()?.parse() {
                return Ok(outcome);
            }
        }
    }

    fn feedback(&mut self, text: &str) {
        self.feedback.push(text.to_string());
    }
}

/// Resolve a typed selection to an option index.
///
/// Accepts the exact option text or its 1-based position.
pub fn parse_choice(line: &str, options: &[String]) -> Option<usize> {
    let line = line.trim();
    if let Some(index) = options.iter().position(|o| o == line) {
        return Some(index);
    }
    match line.parse::<usize>() {
        Ok(n) if (1..=options.len()).contains(&n) => Some(n - 1),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Vec<String> {
        vec!["/aɪ/".into(), "/iː/".into(), "/eɪ/".into()]
    }

    #[test]
    fn parse_choice_by_text_or_number() {
        assert_eq!(parse_choice("/iː/", &options()), Some(1));
        assert_eq!(parse_choice(" 3 ", &options()), Some(2));
        assert_eq!(parse_choice("0", &options()), None);
        assert_eq!(parse_choice("4", &options()), None);
        assert_eq!(parse_choice("nope", &options()), None);
    }

    #[test]
    fn judge_skips_unusable_lines() {
        let mut answers = ScriptedAnswers::new(["maybe", "sorta"]);
        assert_eq!(answers.judge("ok?").unwrap(), Outcome::Partial);
        assert_eq!(answers.remaining(), 0);
    }

    #[test]
    fn exhausted_script_reports_closed_input() {
        let mut answers = ScriptedAnswers::new(Vec::<String>::new());
        assert!(matches!(answers.ask("?"), Err(DrillError::InputClosed)));
        assert!(matches!(
            answers.choose("?", &options()),
            Err(DrillError::InputClosed)
        ));
    }

    #[test]
    fn records_prompts_and_feedback() {
        let mut answers = ScriptedAnswers::new(["hola"]);
        answers.ask("Translate: hello").unwrap();
        answers.feedback("Possible meanings: hola");
        assert_eq!(answers.prompts(), ["Translate: hello"]);
        assert_eq!(answers.feedback_lines(), ["Possible meanings: hola"]);
    }
}
