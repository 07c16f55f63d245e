//! Synchronous invocation of external programs
//!
//! Commands are built from argument vectors and executed directly, never
//! through a shell, so interpolated names and paths cannot change the
//! command's meaning. Each call waits for the child to exit; there are no
//! retries and no timeouts.

use crate::{HerdError, Result};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Exit status and captured stdout of a finished command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when the child was killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Stdout with the trailing newline removed
    pub fn line(&self) -> &str {
        self.stdout.trim_end_matches(['\n', '\r'])
    }
}

/// Runs external programs and reports their exit status
#[derive(Debug, Clone, Copy)]
pub struct CommandRunner;

impl CommandRunner {
    pub fn new() -> Self {
        Self
    }

    /// Run `program` and capture stdout in full.
    ///
    /// Stderr is inherited unless `quiet` is set, in which case it is discarded.
    pub async fn capture(&self, program: &str, args: &[String], quiet: bool) -> Result<CommandOutput> {
        debug!(command = %render(program, args), quiet, "capturing command");

        let mut cmd = Command::new(program);
        cmd.args(args);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(if quiet { Stdio::null() } else { Stdio::inherit() });

        // `output()` would re-pipe stderr; spawning keeps the stdio set above
        let spawn_error = |e| HerdError::Spawn {
            program: program.to_string(),
            source: e,
        };
        let child = cmd.spawn().map_err(spawn_error)?;
        let output = child.wait_with_output().await.map_err(spawn_error)?;

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }

    /// Run `program` with stdout and stderr passed through to the terminal
    pub async fn passthrough(&self, program: &str, args: &[String]) -> Result<Option<i32>> {
        debug!(command = %render(program, args), "running command");

        let status = Command::new(program)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| HerdError::Spawn {
                program: program.to_string(),
                source: e,
            })?;

        Ok(status.code())
    }
}

impl Default for CommandRunner {
    fn default() -> Self {
        Self::new()
    }
}

/// Human-readable command line, for logs and echoes only
pub fn render(program: &str, args: &[String]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}
