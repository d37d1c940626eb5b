pub mod backup;
pub mod drill;
pub mod init;
pub mod reset;
pub mod stats;
pub mod validate;

use std::io::{BufRead, Write};

use anyhow::Result;

/// Ask for explicit confirmation on stdin. Only `yes` confirms.
pub(crate) fn confirm(prompt: &str) -> Result<bool> {
    let stdin = std::io::stdin();
    confirm_from(&mut stdin.lock(), &mut std::io::stdout(), prompt)
}

fn confirm_from(input: &mut impl BufRead, output: &mut impl Write, prompt: &str) -> Result<bool> {
    write!(output, "{prompt} (type 'yes' to confirm): ")?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().eq_ignore_ascii_case("yes"))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn only_yes_confirms() {
        let mut out = Vec::new();
        assert!(confirm_from(&mut Cursor::new("yes\n"), &mut out, "Reset?").unwrap());
        assert!(confirm_from(&mut Cursor::new(" YES \n"), &mut out, "Reset?").unwrap());
        assert!(!confirm_from(&mut Cursor::new("y\n"), &mut out, "Reset?").unwrap());
        assert!(!confirm_from(&mut Cursor::new(""), &mut out, "Reset?").unwrap());
    }
}
