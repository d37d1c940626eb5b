//! Terminal answer source.

use std::io::{BufRead, ErrorKind, Write};

use phrasedrill_core::error::{DrillError, Result};
use phrasedrill_core::mock::parse_choice;
use phrasedrill_core::model::Outcome;
use phrasedrill_core::traits::AnswerSource;

/// Reads answers line by line and writes prompts and feedback.
///
/// `choose` and `judge` re-prompt until the input is usable. End of input
/// or a read error surfaces as [`DrillError::InputClosed`]. A line that is
/// not valid UTF-8 is reported and read again.
pub struct ConsoleAnswers<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsoleAnswers<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn show(&mut self, text: &str) {
        if let Err(e) = writeln!(self.output, "{text}") {
            tracing::debug!("failed to write to terminal: {e}");
        }
    }

    fn prompt(&mut self, prompt: &str) {
        if write!(self.output, "{prompt} ")
            .and_then(|_| self.output.flush())
            .is_err()
        {
            tracing::debug!("failed to write prompt");
        }
    }

    fn read_line(&mut self, prompt: &str) -> Result<String> {
        self.prompt(prompt);
        loop {
            let mut bytes = Vec::new();
            match self.input.read_until(b'\n', &mut bytes) {
                Ok(0) => return Err(DrillError::InputClosed),
                Ok(_) => {}
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    tracing::warn!("failed to read answer: {e}");
                    return Err(DrillError::InputClosed);
                }
            }
            match String::from_utf8(bytes) {
                Ok(line) => return Ok(line.trim_end_matches(['\n', '\r']).to_string()),
                Err(e) => {
                    tracing::debug!("undecodable input line: {e}");
                    self.show("Could not decode that input (expected UTF-8), try again.");
                    self.prompt(prompt);
                }
            }
        }
    }
}

impl<R: BufRead, W: Write> AnswerSource for ConsoleAnswers<R, W> {
    fn ask(&mut self, prompt: &str) -> Result<String> {
        self.read_line(prompt)
    }

    fn choose(&mut self, prompt: &str, options: &[String]) -> Result<usize> {
        self.show(prompt);
        for (i, option) in options.iter().enumerate() {
            self.show(&format!("  {}. {option}", i + 1));
        }
        loop {
            let line = self.read_line(">")?;
            if let Some(index) = parse_choice(&line, options) {
                return Ok(index);
            }
            self.show(&format!("Pick a number between 1 and {}.", options.len()));
        }
    }

    fn judge(&mut self, prompt: &str) -> Result<Outcome> {
        loop {
            if let Ok(outcome) = self.read_line(prompt)?.parse::<Outcome>() {
                return Ok(outcome);
            }
        }
    }

    fn feedback(&mut self, text: &str) {
        self.show(text);
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn console(input: &str) -> ConsoleAnswers<Cursor<Vec<u8>>, Vec<u8>> {
        ConsoleAnswers::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn output(c: &ConsoleAnswers<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8_lossy(&c.output).into_owned()
    }

    #[test]
    fn ask_strips_line_ending() {
        let mut c = console("gato\r\nperro\n");
        assert_eq!(c.ask("Translate: cat").unwrap(), "gato");
        assert_eq!(c.ask("Translate: dog").unwrap(), "perro");
        assert!(output(&c).contains("Translate: cat "));
    }

    #[test]
    fn eof_is_input_closed() {
        let mut c = console("");
        assert!(matches!(c.ask("?"), Err(DrillError::InputClosed)));
    }

    #[test]
    fn undecodable_line_is_read_again() {
        let input = b"c\xe1ntaros\nc\xc3\xa1ntaros\n".to_vec();
        let mut c = ConsoleAnswers::new(Cursor::new(input), Vec::new());
        assert_eq!(c.ask("Translate: pouring").unwrap(), "cántaros");
        assert!(output(&c).contains("Could not decode that input"));
        assert!(matches!(c.ask("?"), Err(DrillError::InputClosed)));
    }

    #[test]
    fn choose_reprompts_until_valid() {
        let options = vec!["tomato".to_string(), "potato".to_string()];
        let mut c = console("7\nmaybe\npotato\n");
        assert_eq!(c.choose("Pick one", &options).unwrap(), 1);
        let out = output(&c);
        assert!(out.contains("  1. tomato"));
        assert!(out.contains("Pick a number between 1 and 2."));
    }

    #[test]
    fn judge_loops_until_yes_no_or_sorta() {
        let mut c = console("perhaps\nsorta\n");
        assert_eq!(c.judge("Accept?").unwrap(), Outcome::Partial);
        let mut c = console("perhaps\n");
        assert!(c.judge("Accept?").is_err());
    }
}
