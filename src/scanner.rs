//! Reading and validating lines of user input.
//!
//! Every read goes through [`InputScanner::next_line`], which is also where the
//! abort sentinel is recognised. Raw fetches return [`InputError`]; the
//! `collect_valid_*` helpers re-prompt on formatting problems and only stop
//! early with an [`Interrupt`].

use crate::command::{CommandInput, CommandWord, UnitInput};
use crate::error::{InputError, Interrupt};
use crate::output::Reporter;
use crate::unit::ValidUnit;
use regex::Regex;
use std::io;
use std::sync::LazyLock;
use tracing::debug;

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Typed at any prompt to cancel the command in progress.
pub(crate) const ABORT_SENTINEL: &str = "abort";
const NEGATIVE_NUMBER: &str = "the number cannot be negative, please try again";
const INTEGER_TOO_LARGE: &str = "the number is too large, please try again";
const UNIT_FORMAT: &str = "invalid input format, accepted format is: <amount> <unit>";

/// Source of input lines.
///
/// `read_line` blocks until a line is available and returns `Ok(None)` once
/// the source is exhausted.
pub trait LineSource {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;
}

/// Parse a command line into at most three parts.
///
/// The command word and subcommand are lower-cased; the remainder keeps the
/// casing and spacing the user typed.
pub fn parse_command(line: &str) -> CommandInput {
    let mut tokens = WHITESPACE.splitn(line.trim(), 3);
    let command = tokens
        .next()
        .map(|word| CommandWord::from_token(&word.to_lowercase()))
        .unwrap_or(CommandWord::Unknown);
    let subcommand = tokens
        .next()
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);
    let remainder = tokens.next().filter(|s| !s.is_empty()).map(str::to_string);
    CommandInput {
        command,
        subcommand,
        remainder,
    }
}

/// Parse `<amount> <unit>`.
pub fn parse_unit(line: &str) -> Result<UnitInput, InputError> {
    let tokens: Vec<&str> = WHITESPACE
        .splitn(line.trim(), 2)
        .filter(|s| !s.is_empty())
        .collect();
    if tokens.len() < 2 {
        return Err(InputError::MissingUnitTokens);
    }
    let amount = parse_float(tokens[0])?;
    let unit = ValidUnit::from_token(tokens[1])
        .ok_or_else(|| InputError::UnknownUnit(tokens[1].to_string()))?;
    Ok(UnitInput { amount, unit })
}

fn parse_float(text: &str) -> Result<f64, InputError> {
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(InputError::NotANumber(text.to_string())),
    }
}

pub struct InputScanner {
    source: Box<dyn LineSource>,
    prompt: String,
}

impl InputScanner {
    pub fn new(source: impl LineSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            prompt: "> ".to_string(),
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Read the next non-blank line, trimmed.
    pub fn next_line(&mut self) -> Result<String, InputError> {
        let line = self
            .source
            .read_line(&self.prompt)?
            .ok_or(InputError::InputClosed)?;
        let line = line.trim();
        if line.is_empty() {
            return Err(InputError::EmptyInput);
        }
        if line.eq_ignore_ascii_case(ABORT_SENTINEL) {
            debug!("abort sentinel read");
            return Err(InputError::Aborted);
        }
        Ok(line.to_string())
    }

    pub fn next_integer(&mut self) -> Result<i64, InputError> {
        let line = self.next_line()?;
        line.parse::<i64>().map_err(|_| InputError::NotANumber(line))
    }

    pub fn next_float(&mut self) -> Result<f64, InputError> {
        let line = self.next_line()?;
        parse_float(&line)
    }

    pub fn fetch_command(&mut self) -> Result<CommandInput, InputError> {
        let line = self.next_line()?;
        Ok(parse_command(&line))
    }

    pub fn fetch_unit(&mut self) -> Result<UnitInput, InputError> {
        let line = self.next_line()?;
        parse_unit(&line)
    }

    pub fn collect_valid_string(&mut self, output: &mut dyn Reporter) -> Result<String, Interrupt> {
        self.retry(output, |scanner| scanner.next_line().map(Ok))
    }

    /// A non-negative float.
    pub fn collect_valid_float(&mut self, output: &mut dyn Reporter) -> Result<f64, Interrupt> {
        self.retry(output, |scanner| {
            scanner
                .next_float()
                .map(|value| if value < 0.0 { Err(NEGATIVE_NUMBER) } else { Ok(value) })
        })
    }

    /// A non-negative integer.
    pub fn collect_valid_integer(&mut self, output: &mut dyn Reporter) -> Result<u32, Interrupt> {
        self.retry(output, |scanner| {
            scanner.next_integer().map(|value| {
                if value < 0 {
                    Err(NEGATIVE_NUMBER)
                } else {
                    u32::try_from(value).map_err(|_| INTEGER_TOO_LARGE)
                }
            })
        })
    }

    pub fn collect_valid_unit_input(
        &mut self,
        output: &mut dyn Reporter,
    ) -> Result<UnitInput, Interrupt> {
        self.retry(output, |scanner| match scanner.fetch_unit() {
            Ok(input) if input.amount < 0.0 => Ok(Err(NEGATIVE_NUMBER)),
            Ok(input) => Ok(Ok(input)),
            Err(InputError::MissingUnitTokens) => Ok(Err(UNIT_FORMAT)),
            Err(other) => Err(other),
        })
    }

    /// Run `attempt` until it yields a value.
    ///
    /// `attempt` returns `Ok(Err(reason))` for a value that parsed but was
    /// rejected. Both that and recoverable input errors re-prompt; interrupts
    /// end the loop immediately.
    fn retry<T>(
        &mut self,
        output: &mut dyn Reporter,
        mut attempt: impl FnMut(&mut Self) -> Result<Result<T, &'static str>, InputError>,
    ) -> Result<T, Interrupt> {
        loop {
            match attempt(self) {
                Ok(Ok(value)) => return Ok(value),
                Ok(Err(reason)) => output.prompt(reason)?,
                Err(error) => match error.into_interrupt() {
                    Ok(interrupt) => return Err(interrupt),
                    Err(recoverable) => {
                        debug!(%recoverable, "re-prompting for input");
                        output.prompt(&recoverable.to_string())?
                    }
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io_adapters::{LineReader, MemWriter};
    use crate::output::ConsoleReporter;
    use std::io::Cursor;

    fn scanner(input: &str) -> InputScanner {
        InputScanner::new(LineReader::new(Cursor::new(input.as_bytes().to_vec())))
    }

    fn reporter() -> (ConsoleReporter<MemWriter>, std::rc::Rc<std::cell::RefCell<Vec<u8>>>) {
        let (writer, handle) = MemWriter::with_handle();
        (ConsoleReporter::new(writer), handle)
    }

    #[test]
    fn test_next_line_trims() {
        let mut s = scanner("lISt   testSuBcOmmand    test   uSEr iNput stRing   \n");
        assert_eq!(
            s.next_line().unwrap(),
            "lISt   testSuBcOmmand    test   uSEr iNput stRing"
        );
    }

    #[test]
    fn test_abort_sentinel_in_any_case() {
        let mut s = scanner("AbOrt \n   ABoRT\n");
        assert!(matches!(s.next_line(), Err(InputError::Aborted)));
        assert!(matches!(s.next_float(), Err(InputError::Aborted)));
    }

    #[test]
    fn test_empty_and_closed_input() {
        let mut s = scanner("   \n");
        assert!(matches!(s.next_line(), Err(InputError::EmptyInput)));
        assert!(matches!(s.next_line(), Err(InputError::InputClosed)));
    }

    #[test]
    fn test_next_integer() {
        let mut s = scanner("123\n123.45\n");
        assert_eq!(s.next_integer().unwrap(), 123);
        match s.next_integer() {
            Err(InputError::NotANumber(text)) => assert_eq!(text, "123.45"),
            other => panic!("expected NotANumber, got {other:?}"),
        }
    }

    #[test]
    fn test_next_float() {
        let mut s = scanner(".2349\nstring\ninf\n");
        assert!((s.next_float().unwrap() - 0.2349).abs() < 1e-12);
        assert!(matches!(s.next_float(), Err(InputError::NotANumber(_))));
        assert!(matches!(s.next_float(), Err(InputError::NotANumber(_))));
    }

    #[test]
    fn test_fetch_command_splits_three_ways() {
        let mut s = scanner("lISt   testSub    rest of text\n");
        let input = s.fetch_command().unwrap();
        assert_eq!(input.command, CommandWord::List);
        assert_eq!(input.subcommand.as_deref(), Some("testsub"));
        assert_eq!(input.remainder.as_deref(), Some("rest of text"));

        let input = parse_command("lISt   testSuBcOmmand    test   uSEr iNput stRing");
        assert_eq!(input.remainder.as_deref(), Some("test   uSEr iNput stRing"));
    }

    #[test]
    fn test_fetch_command_with_fewer_tokens() {
        let input = parse_command("HELP");
        assert_eq!(input.command, CommandWord::Help);
        assert_eq!(input.subcommand, None);
        assert_eq!(input.remainder, None);

        let input = parse_command("go Back");
        assert_eq!(input.command, CommandWord::Go);
        assert_eq!(input.subcommand.as_deref(), Some("back"));
        assert_eq!(input.remainder, None);
    }

    #[test]
    fn test_unknown_command_word_is_not_an_error() {
        let input = parse_command("lst something");
        assert_eq!(input.command, CommandWord::Unknown);
        assert_eq!(input.subcommand.as_deref(), Some("something"));
    }

    #[test]
    fn test_fetch_unit() {
        let mut s = scanner("123.45 KG\nk\n123\n12 cups\nabc g\n");
        let input = s.fetch_unit().unwrap();
        assert!((input.amount - 123.45).abs() < 1e-12);
        assert_eq!(input.unit, ValidUnit::Kg);
        assert!(matches!(s.fetch_unit(), Err(InputError::MissingUnitTokens)));
        assert!(matches!(s.fetch_unit(), Err(InputError::MissingUnitTokens)));
        match s.fetch_unit() {
            Err(InputError::UnknownUnit(unit)) => assert_eq!(unit, "cups"),
            other => panic!("expected UnknownUnit, got {other:?}"),
        }
        assert!(matches!(s.fetch_unit(), Err(InputError::NotANumber(_))));
    }

    #[test]
    fn test_collect_valid_float_retries_until_non_negative() {
        let mut s = scanner("\nten\n-4\n2.5\n");
        let (mut out, handle) = reporter();
        assert_eq!(s.collect_valid_float(&mut out).unwrap(), 2.5);
        let printed = String::from_utf8(handle.borrow().clone()).unwrap();
        assert_eq!(printed.lines().count(), 3);
        assert!(printed.contains("'ten' is not a valid number"));
        assert!(printed.contains("cannot be negative"));
    }

    #[test]
    fn test_collect_valid_integer_rejects_floats_and_negatives() {
        let mut s = scanner("1.5\n-1\n99999999999\n7\n");
        let (mut out, _) = reporter();
        assert_eq!(s.collect_valid_integer(&mut out).unwrap(), 7);
    }

    #[test]
    fn test_abort_wins_over_retry() {
        let mut s = scanner("nope\n-3\n  ABoRT  \n5\n");
        let (mut out, _) = reporter();
        assert!(matches!(
            s.collect_valid_integer(&mut out),
            Err(Interrupt::Aborted)
        ));
        // the line after the sentinel is still unread
        assert_eq!(s.next_integer().unwrap(), 5);

        let mut s = scanner("kg\nabort\n");
        assert!(matches!(
            s.collect_valid_unit_input(&mut out),
            Err(Interrupt::Aborted)
        ));
    }

    #[test]
    fn test_collectors_stop_when_input_closes() {
        let mut s = scanner("\n\n");
        let (mut out, _) = reporter();
        assert!(matches!(
            s.collect_valid_string(&mut out),
            Err(Interrupt::Closed)
        ));
    }

    #[test]
    fn test_collect_valid_unit_input() {
        let mut s = scanner("12\n12 cups\n-1 kg\n 300   g \n");
        let (mut out, handle) = reporter();
        let input = s.collect_valid_unit_input(&mut out).unwrap();
        assert_eq!(input.unit, ValidUnit::G);
        assert_eq!(input.amount, 300.0);
        let printed = String::from_utf8(handle.borrow().clone()).unwrap();
        assert!(printed.contains("<amount> <unit>"));
        assert!(printed.contains("unknown unit 'cups'"));
    }
}
