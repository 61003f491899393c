use crate::scanner::{ABORT_SENTINEL, LineSource};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::cell::RefCell;
use std::io::{self, BufRead, Result as IoResult, Write};
use std::rc::Rc;
use tracing::warn;

/// Line source over any buffered reader: piped stdin, files, test cursors.
///
/// The prompt is not echoed. Bytes that are not valid UTF-8 are replaced with
/// U+FFFD instead of failing the read.
pub struct LineReader<R: BufRead> {
    reader: R,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> LineSource for LineReader<R> {
    fn read_line(&mut self, _prompt: &str) -> IoResult<Option<String>> {
        let mut bytes = Vec::new();
        if self.reader.read_until(b'\n', &mut bytes)? == 0 {
            return Ok(None);
        }
        let mut line = String::from_utf8_lossy(&bytes).into_owned();
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }
}

/// Interactive line source with editing and history.
impl LineSource for DefaultEditor {
    fn read_line(&mut self, prompt: &str) -> IoResult<Option<String>> {
        let line = readline_outcome(self.readline(prompt))?;
        if let Some(line) = &line {
            if !line.trim().is_empty() && line != ABORT_SENTINEL {
                if let Err(err) = self.add_history_entry(line.as_str()) {
                    warn!(%err, "could not record history entry");
                }
            }
        }
        Ok(line)
    }
}

/// Ctrl-D ends the input; Ctrl-C cancels like typing `abort`.
fn readline_outcome(result: Result<String, ReadlineError>) -> IoResult<Option<String>> {
    match result {
        Ok(line) => Ok(Some(line)),
        Err(ReadlineError::Interrupted) => Ok(Some(ABORT_SENTINEL.to_string())),
        Err(ReadlineError::Eof) => Ok(None),
        Err(ReadlineError::Io(err)) => Err(err),
        Err(err) => Err(io::Error::other(err.to_string())),
    }
}

/// Memory-backed writer for capturing console output.
pub struct MemWriter {
    buf: Rc<RefCell<Vec<u8>>>,
}

impl MemWriter {
    pub fn new() -> Self {
        Self {
            buf: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Return inner Rc so caller can read collected bytes.
    pub fn into_inner(self) -> Rc<RefCell<Vec<u8>>> {
        self.buf
    }

    /// Convenience: create writer and return (writer, rc_handle).
    pub fn with_handle() -> (Self, Rc<RefCell<Vec<u8>>>) {
        let mw = MemWriter::new();
        let rc = mw.buf.clone();
        (mw, rc)
    }
}

impl Default for MemWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for MemWriter {
    fn write(&mut self, data: &[u8]) -> IoResult<usize> {
        self.buf.borrow_mut().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> IoResult<()> {
        Ok(())
    }
}
