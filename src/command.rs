use crate::output::Reporter;
use crate::scanner::InputScanner;
use crate::session::Session;
use crate::unit::ValidUnit;
use std::fmt;

/// Command words understood by the shell.
///
/// Any word that is not recognised resolves to [`CommandWord::Unknown`] rather
/// than failing, so the dispatcher always has a variant to route to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandWord {
    Add,
    Remove,
    Find,
    List,
    Clear,
    Go,
    Stats,
    Help,
    Exit,
    Unknown,
}

impl CommandWord {
    /// Every word a user can type, in help order.
    pub const KNOWN: [CommandWord; 9] = [
        CommandWord::Add,
        CommandWord::Remove,
        CommandWord::Find,
        CommandWord::List,
        CommandWord::Clear,
        CommandWord::Go,
        CommandWord::Stats,
        CommandWord::Help,
        CommandWord::Exit,
    ];

    /// Resolve a lower-cased token to a command word.
    pub fn from_token(token: &str) -> CommandWord {
        Self::KNOWN
            .into_iter()
            .find(|word| word.name() == token)
            .unwrap_or(CommandWord::Unknown)
    }

    /// Canonical spelling, also used as the help key.
    pub fn name(self) -> &'static str {
        match self {
            CommandWord::Add => "add",
            CommandWord::Remove => "remove",
            CommandWord::Find => "find",
            CommandWord::List => "list",
            CommandWord::Clear => "clear",
            CommandWord::Go => "go",
            CommandWord::Stats => "stats",
            CommandWord::Help => "help",
            CommandWord::Exit => "exit",
            CommandWord::Unknown => "unknown",
        }
    }
}

impl fmt::Display for CommandWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One parsed command line: `<command> [<subcommand> [<remainder>]]`.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandInput {
    pub command: CommandWord,
    /// Lower-cased second token.
    pub subcommand: Option<String>,
    /// Everything after the second token, as typed.
    pub remainder: Option<String>,
}

/// `<amount> <unit>` as typed at a measurement prompt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitInput {
    pub amount: f64,
    pub unit: ValidUnit,
}

/// Everything a command may touch while it runs.
///
/// Commands read further input through `scanner`, report through `output`, and
/// mutate only `session`.
pub struct Context<'a> {
    pub session: &'a mut Session,
    pub scanner: &'a mut InputScanner,
    pub output: &'a mut dyn Reporter,
}
