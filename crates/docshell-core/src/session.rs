//! Interactive dispatch loop.
//!
//! Reads one line at a time, classifies it with [`parse_line`] and runs the
//! resulting command. A failing command is reported and the loop carries on;
//! only an exit token or the end of input stops it.

use crate::command::{parse_line, Input};
use crate::connection::ConnectionManager;
use crate::error::{Result, ShellError};
use crate::operations::Operations;
use std::io::{BufRead, Write};
use tracing::{debug, error, info};

/// Where the loop currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingLine,
    Executing,
    Terminated,
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    ExitToken,
    EndOfInput,
}

/// Counters for a finished session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    /// Commands run, including failed ones.
    pub executed: u64,
    pub failed: u64,
    pub termination: Termination,
}

/// A dispatch loop bound to one connection.
pub struct Session<'c> {
    connection: &'c ConnectionManager,
    state: SessionState,
}

impl<'c> Session<'c> {
    pub fn new(connection: &'c ConnectionManager) -> Self {
        Self {
            connection,
            state: SessionState::AwaitingLine,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Run until an exit token or end of input.
    ///
    /// Command output goes to `out`, diagnostics for failed commands to `err`.
    /// Only failures of the streams themselves end the loop early.
    pub fn run<R, W, E>(
        &mut self,
        mut input: R,
        out: &mut W,
        err: &mut E,
    ) -> Result<SessionSummary>
    where
        R: BufRead,
        W: Write,
        E: Write,
    {
        let mut executed = 0;
        let mut failed = 0;
        let mut buf = Vec::new();

        let termination = loop {
            self.state = SessionState::AwaitingLine;
            let line = match read_line(&mut input, &mut buf)? {
                Some(line) => line,
                None => break Termination::EndOfInput,
            };

            let command = match parse_line(&line) {
                Input::Exit => break Termination::ExitToken,
                Input::Blank => continue,
                Input::Command(command) => command,
            };

            self.state = SessionState::Executing;
            executed += 1;
            debug!("Dispatching {}", command);

            let result = self
                .connection
                .store()
                .and_then(|store| Operations::new(store, &mut *out).execute(&command));

            if let Err(e) = result {
                if let ShellError::Io { .. } = e {
                    self.state = SessionState::Terminated;
                    return Err(e);
                }
                failed += 1;
                error!("Command {} failed: {}", command.name(), e);
                report(&mut *err, e)?;
            }
        };

        self.state = SessionState::Terminated;
        info!(
            "Session ended ({:?}) after {} commands, {} failed",
            termination, executed, failed
        );
        Ok(SessionSummary {
            executed,
            failed,
            termination,
        })
    }
}

/// Next input line without its terminator. Bytes that are not valid UTF-8
/// become U+FFFD instead of failing the read.
fn read_line<R: BufRead>(input: &mut R, buf: &mut Vec<u8>) -> Result<Option<String>> {
    buf.clear();
    if input.read_until(b'\n', buf)? == 0 {
        return Ok(None);
    }
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
    Ok(Some(String::from_utf8_lossy(buf).into_owned()))
}

/// Write an error and its full cause chain.
pub fn report<E: Write>(err: &mut E, error: ShellError) -> Result<()> {
    writeln!(err, "{:?}", anyhow::Error::new(error))?;
    err.flush()?;
    Ok(())
}
