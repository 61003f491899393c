//! Everything the shell shows to the user goes through [`Reporter`].

use std::error::Error;
use std::fmt::Display;
use std::io::{self, Write};

/// Sink for user-facing output.
pub trait Reporter {
    /// Outcome of an operation, e.g. `(true, "added", "milk")`.
    fn status(&mut self, success: bool, verb: &str, subject: &str) -> io::Result<()>;

    /// A request for more input.
    fn prompt(&mut self, message: &str) -> io::Result<()>;

    /// An informational line that asks for nothing.
    fn notice(&mut self, message: &str) -> io::Result<()>;

    /// Instructions for `key`: a command word, `general` or `unknown`.
    fn help(&mut self, key: &str) -> io::Result<()>;

    /// One line of a listing.
    fn item(&mut self, item: &dyn Display) -> io::Result<()>;

    fn statistic(&mut self, label: &str, value: f64) -> io::Result<()>;

    fn error(&mut self, error: &dyn Error) -> io::Result<()>;
}

/// Plain-text reporter over any writer.
pub struct ConsoleReporter<W: Write> {
    out: W,
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn status(&mut self, success: bool, verb: &str, subject: &str) -> io::Result<()> {
        if success {
            writeln!(self.out, "Successfully {verb} {subject}.")
        } else {
            writeln!(self.out, "Failed: could not {verb} {subject}.")
        }
    }

    fn prompt(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "{message}")
    }

    fn notice(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "{message}")
    }

    fn help(&mut self, key: &str) -> io::Result<()> {
        for line in help_text(key) {
            writeln!(self.out, "{line}")?;
        }
        Ok(())
    }

    fn item(&mut self, item: &dyn Display) -> io::Result<()> {
        writeln!(self.out, "  {item}")
    }

    fn statistic(&mut self, label: &str, value: f64) -> io::Result<()> {
        writeln!(self.out, "{label}: {value:.2}")
    }

    fn error(&mut self, error: &dyn Error) -> io::Result<()> {
        writeln!(self.out, "Error: {error}")
    }
}

fn help_text(key: &str) -> &'static [&'static str] {
    match key {
        "add" => &[
            "add storage <name>        create a storage",
            "add ingredient <name>     add an ingredient to the current storage",
            "add recipe <name>         describe a recipe and its ingredients",
        ],
        "remove" => &[
            "remove storage <name>     delete a storage",
            "remove ingredient <name>  remove an ingredient from the current storage",
            "remove expired            remove everything past its expiry date",
            "remove recipe <name>      forget a recipe",
        ],
        "find" => &[
            "find ingredient <name>    show an ingredient in the current storage",
            "find recipe <name>        check whether a recipe can be made",
        ],
        "list" => &[
            "list storage              show the current storage",
            "list inventory            show every storage",
            "list recipes              show every recipe",
        ],
        "clear" => &[
            "clear storage             empty the current storage",
            "clear history             forget previously visited storages",
        ],
        "go" => &[
            "go storage <name>         switch to another storage",
            "go back                   return to the previous storage",
        ],
        "stats" => &[
            "stats value               total value of the current storage",
            "stats expired             expired ingredients in the current storage",
        ],
        "help" => &["help [<command>]          show instructions"],
        "exit" => &["exit                      leave the shell"],
        "unknown" => &["Unknown command. Type 'help' to see the available commands."],
        _ => &[
            "Commands: add, remove, find, list, clear, go, stats, help, exit.",
            "Type 'help <command>' for details, or 'abort' at any prompt to cancel.",
        ],
    }
}
