use anyhow::Result;
use argh::FromArgs;
use pantry_shell::{Clock, ConsoleReporter, InputScanner, Interpreter, LineReader, Session};
use rustyline::DefaultEditor;
use std::io;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(FromArgs)]
/// Keep track of what is in your fridge, pantry and freezer.
struct Options {
    /// read commands from standard input line by line, without line editing
    #[argh(switch)]
    plain: bool,

    /// create a storage on start; may be repeated, the first one becomes active
    #[argh(option)]
    storage: Vec<String>,

    /// log filter, e.g. "debug" or "pantry_shell=info"; overrides RUST_LOG
    #[argh(option)]
    log: Option<String>,

    /// prompt shown before each line in interactive mode
    #[argh(option, default = "String::from(\"pantry> \")")]
    prompt: String,
}

fn main() -> Result<()> {
    let options: Options = argh::from_env();

    let filter = match &options.log {
        Some(directives) => EnvFilter::try_new(directives)?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let mut session = Session::new(Clock::System);
    for name in &options.storage {
        session.inventory.create_storage(name)?;
    }
    if let Some(first) = options.storage.first() {
        session.inventory.select(first)?;
    }

    let scanner = if options.plain {
        InputScanner::new(LineReader::new(io::stdin().lock()))
    } else {
        InputScanner::new(DefaultEditor::new()?)
    }
    .with_prompt(options.prompt);

    info!(plain = options.plain, storages = options.storage.len(), "starting pantry shell");
    let mut shell = Interpreter::new(session, scanner, Box::new(ConsoleReporter::new(io::stdout())));
    shell.repl()
}
