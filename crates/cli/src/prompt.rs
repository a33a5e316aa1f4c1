//! Line-oriented prompting over any reader/writer pair.

use std::io::{BufRead, Write};

use stockcard_inventory::{WriteOffConfirmation, WriteOffRequest};

use crate::shell::ShellError;

/// Asks questions on `output` and reads trimmed answers from `input`.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print `label` (no newline) and read one trimmed line.
    ///
    /// Returns [`ShellError::Eof`] once the input is exhausted.
    pub fn ask(&mut self, label: &str) -> Result<String, ShellError> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(ShellError::Eof);
        }
        Ok(line.trim().to_string())
    }

    /// Like [`Prompter::ask`], but an empty answer becomes `None`.
    pub fn ask_optional(&mut self, label: &str) -> Result<Option<String>, ShellError> {
        let answer = self.ask(label)?;
        Ok(if answer.is_empty() { None } else { Some(answer) })
    }

    pub fn say(&mut self, line: impl core::fmt::Display) -> Result<(), ShellError> {
        writeln!(self.output, "{line}")?;
        Ok(())
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.to_lowercase().as_str(), "y" | "yes")
}

impl<R: BufRead, W: Write> WriteOffConfirmation for Prompter<R, W> {
    /// Anything but an explicit yes (including EOF or an I/O failure) declines.
    fn confirm(&mut self, request: &WriteOffRequest<'_>) -> bool {
        if self
            .say(format_args!("Remaining stock: {} pcs.", request.remaining))
            .is_err()
        {
            return false;
        }
        self.ask(&format!("Confirm write-off of {}? (yes/no): ", request.card_id))
            .map(|answer| is_yes(&answer))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use stockcard_core::CardId;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn ask_trims_and_reports_eof() {
        let mut p = prompter("  hello \n");
        assert_eq!(p.ask("> ").unwrap(), "hello");
        assert!(matches!(p.ask("> "), Err(ShellError::Eof)));
        assert_eq!(String::from_utf8(p.into_output()).unwrap(), "> > ");
    }

    #[test]
    fn ask_optional_maps_blank_to_none() {
        let mut p = prompter("\nvalue\n");
        assert_eq!(p.ask_optional("a: ").unwrap(), None);
        assert_eq!(p.ask_optional("b: ").unwrap(), Some("value".to_string()));
    }

    #[test]
    fn confirmation_accepts_only_yes() {
        let id = CardId::parse("A1").unwrap();
        let request = WriteOffRequest {
            card_id: &id,
            name: "Mouse",
            remaining: 5,
        };

        for (answer, expected) in [("yes\n", true), ("Y\n", true), ("no\n", false), ("", false)] {
            let mut p = prompter(answer);
            assert_eq!(p.confirm(&request), expected, "answer {answer:?}");
        }

        let mut p = prompter("yes\n");
        p.confirm(&request);
        let shown = String::from_utf8(p.into_output()).unwrap();
        assert!(shown.contains("Remaining stock: 5 pcs."));
        assert!(shown.contains("Confirm write-off of A1?"));
    }
}
