//! A small interactive shell for keeping track of food storages.
//!
//! Users create named storages (a fridge, a pantry), stock them with
//! ingredients that carry an amount, a unit, a value and an expiry date, and
//! describe recipes whose requirements can be checked against the current
//! storage. Lots of the same ingredient with the same expiry date are merged,
//! converting between units of one family (kg/g, l/dl/ml) on the way.
//!
//! The main entry point is [`Interpreter`], which reads command lines from an
//! [`InputScanner`], runs them against a [`Session`] and writes everything the
//! user sees through a [`Reporter`]. Typing `abort` at any prompt cancels the
//! command in progress.

mod builtin;
pub mod command;
pub mod converter;
pub mod error;
pub mod ingredient;
mod interpreter;
pub mod io_adapters;
pub mod output;
pub mod recipe;
pub mod scanner;
pub mod session;
pub mod storage;
pub mod unit;

pub use interpreter::Interpreter;
pub use io_adapters::{LineReader, MemWriter};
pub use output::{ConsoleReporter, Reporter};
pub use scanner::{InputScanner, LineSource};
pub use session::{Clock, Session};
