//! Operator confirmation between phases

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// What the operator decided at a gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Continue,
    Quit,
}

/// Source of continue/quit decisions
pub trait ConfirmationSource {
    /// Block until a decision is available
    fn next_decision(&mut self) -> io::Result<Decision>;
}

pub const PROMPT: &str = "Type 'continue' to proceed or 'quit' to exit: ";
pub const INVALID_INPUT: &str = "Invalid input. Please type 'continue' or 'quit'.";

/// Reads decisions line by line, re-prompting on anything else.
///
/// End of input counts as `Quit`.
pub struct TerminalConfirmation<R, W> {
    input: R,
    output: W,
}

impl TerminalConfirmation<io::StdinLock<'static>, io::Stdout> {
    /// Prompt on stdout, read stdin
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalConfirmation<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> ConfirmationSource for TerminalConfirmation<R, W> {
    fn next_decision(&mut self) -> io::Result<Decision> {
        loop {
            write!(self.output, "\n{}", PROMPT)?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(Decision::Quit);
            }
            match line.trim().to_lowercase().as_str() {
                "continue" => return Ok(Decision::Continue),
                "quit" => return Ok(Decision::Quit),
                _ => writeln!(self.output, "{}", INVALID_INPUT)?,
            }
        }
    }
}

/// Replays a fixed list of decisions; `Quit` once exhausted
#[derive(Debug, Clone, Default)]
pub struct ScriptedConfirmation {
    decisions: VecDeque<Decision>,
    asked: usize,
}

impl ScriptedConfirmation {
    pub fn new(decisions: impl IntoIterator<Item = Decision>) -> Self {
        Self {
            decisions: decisions.into_iter().collect(),
            asked: 0,
        }
    }

    /// How many times a decision was requested
    pub fn asked(&self) -> usize {
        self.asked
    }
}

impl ConfirmationSource for ScriptedConfirmation {
    fn next_decision(&mut self) -> io::Result<Decision> {
        self.asked += 1;
        Ok(self.decisions.pop_front().unwrap_or(Decision::Quit))
    }
}

/// Always continues (`--yes`)
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoConfirm;

impl ConfirmationSource for AutoConfirm {
    fn next_decision(&mut self) -> io::Result<Decision> {
        Ok(Decision::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_terminal_reprompts_until_valid() {
        let mut output = Vec::new();
        let decision = {
            let mut source =
                TerminalConfirmation::new(Cursor::new("maybe\n  CONTINUE \n"), &mut output);
            source.next_decision().unwrap()
        };

        assert_eq!(decision, Decision::Continue);
        let printed = String::from_utf8(output).unwrap();
        assert_eq!(printed.matches(PROMPT).count(), 2);
        assert!(printed.contains(INVALID_INPUT));
    }

    #[test]
    fn test_terminal_end_of_input_quits() {
        let mut source = TerminalConfirmation::new(Cursor::new(""), Vec::new());
        assert_eq!(source.next_decision().unwrap(), Decision::Quit);

        let mut source = TerminalConfirmation::new(Cursor::new("quit\n"), Vec::new());
        assert_eq!(source.next_decision().unwrap(), Decision::Quit);
    }

    #[test]
    fn test_scripted_exhaustion_quits() {
        let mut source = ScriptedConfirmation::new([Decision::Continue]);
        assert_eq!(source.next_decision().unwrap(), Decision::Continue);
        assert_eq!(source.next_decision().unwrap(), Decision::Quit);
        assert_eq!(source.asked(), 2);
    }

    #[test]
    fn test_auto_confirm() {
        assert_eq!(AutoConfirm.next_decision().unwrap(), Decision::Continue);
    }
}
