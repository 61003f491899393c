use crate::builtin;
use crate::command::{CommandInput, Context};
use crate::error::{CommandError, InputError, Interrupt};
use crate::output::Reporter;
use crate::scanner::InputScanner;
use crate::session::Session;
use anyhow::Context as _;
use tracing::{debug, info, warn};

/// The pantry shell read loop.
///
/// The interpreter owns the [`Session`], the [`InputScanner`] commands read
/// from and the [`Reporter`] they write to. [`Interpreter::repl`] keeps
/// fetching command lines until `exit` is typed or the input ends.
///
/// Example
/// ```
/// use pantry_shell::{Clock, ConsoleReporter, InputScanner, Interpreter, LineReader, Session};
/// use std::io::Cursor;
///
/// let script = Cursor::new(b"add storage Fridge\nlist storage\nexit\n".to_vec());
/// let mut shell = Interpreter::new(
///     Session::new(Clock::System),
///     InputScanner::new(LineReader::new(script)),
///     Box::new(ConsoleReporter::new(Vec::new())),
/// );
/// shell.repl().unwrap();
/// assert!(shell.session().should_exit);
/// ```
pub struct Interpreter {
    session: Session,
    scanner: InputScanner,
    output: Box<dyn Reporter>,
}

impl Interpreter {
    pub fn new(session: Session, scanner: InputScanner, output: Box<dyn Reporter>) -> Self {
        Self {
            session,
            scanner,
            output,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Run a single parsed command line.
    ///
    /// Any follow-up questions the command asks are read from the
    /// interpreter's scanner.
    pub fn execute(&mut self, input: CommandInput) -> Result<(), CommandError> {
        let mut ctx = Context {
            session: &mut self.session,
            scanner: &mut self.scanner,
            output: self.output.as_mut(),
        };
        builtin::dispatch(input, &mut ctx)
    }

    /// Read-eval-print loop.
    ///
    /// Command failures are reported and the loop continues. It returns `Ok`
    /// after `exit` or at end of input, and `Err` only when the console itself
    /// fails.
    pub fn repl(&mut self) -> anyhow::Result<()> {
        self.output
            .notice("Welcome to the pantry shell. Type 'help' to see what you can do.")?;

        while !self.session.should_exit {
            let input = match self.scanner.fetch_command() {
                Ok(input) => input,
                Err(InputError::EmptyInput | InputError::Aborted) => continue,
                Err(InputError::InputClosed) => {
                    info!("input closed, leaving");
                    break;
                }
                Err(InputError::Io(err)) => {
                    return Err(err).context("failed to read the next command");
                }
                Err(other) => {
                    self.output.error(&other)?;
                    continue;
                }
            };

            let command = input.command;
            match self.execute(input) {
                Ok(()) => debug!(%command, "command finished"),
                Err(CommandError::Interrupted(Interrupt::Closed)) => {
                    info!(%command, "input closed during command, leaving");
                    break;
                }
                Err(err) if err.is_fatal() => {
                    return Err(err).with_context(|| format!("'{command}' failed"));
                }
                Err(err) => {
                    warn!(%command, %err, "command failed");
                    self.output.error(&err)?;
                }
            }
        }
        Ok(())
    }
}
