//! Error types for the pantry shell.
//!
//! Each layer gets its own `thiserror` enum so callers can match on exactly the
//! failures that layer produces. Conversions between them are `#[from]` so `?`
//! carries a failure upward without re-wrapping by hand.

use crate::command::CommandWord;
use crate::unit::ValidUnit;
use std::io;
use thiserror::Error;

/// Failures produced while reading and parsing a single line of input.
#[derive(Debug, Error)]
pub enum InputError {
    /// The trimmed line was blank.
    #[error("input cannot be empty")]
    EmptyInput,

    /// The underlying line source has no more lines.
    #[error("there are no more lines to read")]
    InputClosed,

    /// The line could not be parsed as the requested number type.
    #[error("'{0}' is not a valid number")]
    NotANumber(String),

    /// A unit input had fewer than two tokens.
    #[error("missing unit input, expected: <amount> <unit>")]
    MissingUnitTokens,

    /// The unit token is not part of the unit vocabulary.
    #[error("unknown unit '{0}', accepted units are: kg, g, l, dl, ml")]
    UnknownUnit(String),

    /// The user typed the abort sentinel.
    #[error("operation aborted")]
    Aborted,

    #[error("failed to read input: {0}")]
    Io(#[from] io::Error),
}

impl InputError {
    /// Splits interrupts from recoverable formatting problems.
    ///
    /// `Ok` carries the interrupt a retry loop must return; `Err` hands the
    /// error back so the loop can re-prompt with its message.
    pub fn into_interrupt(self) -> Result<Interrupt, InputError> {
        match self {
            InputError::Aborted => Ok(Interrupt::Aborted),
            InputError::InputClosed => Ok(Interrupt::Closed),
            InputError::Io(e) => Ok(Interrupt::Io(e)),
            other => Err(other),
        }
    }
}

/// Outcome of a multi-step collection that did not produce a value.
///
/// Retry helpers never return a formatting error; they only stop early for one
/// of these reasons.
#[derive(Debug, Error)]
pub enum Interrupt {
    #[error("operation aborted")]
    Aborted,

    #[error("input closed")]
    Closed,

    #[error("console failure: {0}")]
    Io(#[from] io::Error),
}

/// Failures of the unit algebra.
#[derive(Debug, Error, PartialEq)]
pub enum UnitError {
    /// Conversion across unit families, e.g. kg to l.
    #[error("illegal operation: cannot convert from {from} to {to}")]
    IncompatibleUnits { from: ValidUnit, to: ValidUnit },

    #[error("amount cannot be negative: {0}")]
    NegativeAmount(f64),
}

/// Failures of an ingredient storage.
#[derive(Debug, Error, PartialEq)]
pub enum StorageError {
    /// The ingredient has no identity to be stored under.
    #[error("ingredient cannot be empty")]
    NullIngredient,

    #[error(transparent)]
    Unit(#[from] UnitError),
}

/// Failures surfaced while executing a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The subcommand is not declared by the command.
    #[error("invalid command combination: '{command}' + '{subcommand}'")]
    IllegalCombination {
        command: CommandWord,
        subcommand: String,
    },

    #[error(transparent)]
    Interrupted(#[from] Interrupt),

    #[error("no storage selected, use 'go storage <name>' first")]
    NoActiveStorage,

    #[error("storage '{0}' does not exist")]
    UnknownStorage(String),

    #[error("storage '{0}' already exists")]
    DuplicateStorage(String),

    #[error("recipe '{0}' does not exist")]
    UnknownRecipe(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Unit(#[from] UnitError),

    #[error("console failure: {0}")]
    Io(#[from] io::Error),
}

impl CommandError {
    pub fn illegal(command: CommandWord, subcommand: impl Into<String>) -> Self {
        CommandError::IllegalCombination {
            command,
            subcommand: subcommand.into(),
        }
    }

    /// Whether the read loop must stop after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            CommandError::Interrupted(Interrupt::Closed | Interrupt::Io(_)) | CommandError::Io(_)
        )
    }
}
