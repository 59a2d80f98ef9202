use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, warn};

/// Execute and handle command line executions
pub struct CliExecutor;

impl CliExecutor {
    /// A new Executor instance
    pub fn new() -> Self {
        Self
    }

    /// Execute a CLI command and return its stdout untouched. The command's stderr goes
    /// straight to the terminal. A non-zero exit status is logged but not treated as an
    /// error.
    pub async fn output(&self, command: &str, args: &[&str]) -> anyhow::Result<String> {
        debug!(%command, ?args, "Capturing command output");
        // `Command::output` would pipe stderr as well
        let output = Command::new(command)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()?
            .wait_with_output()
            .await?;

        if !output.status.success() {
            warn!(
                %command,
                ?args,
                status = ?output.status.code(),
                "Command exited with a failure status"
            );
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Run a command attached to this process' terminal and wait for it to exit.
    /// Returns the exit code, `1` when the child was killed by a signal.
    pub async fn interactive(&self, command: &str, args: &[&str]) -> anyhow::Result<i32> {
        debug!(%command, ?args, "Running interactive command");
        let status = Command::new(command)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await?;

        debug!(?status, "Interactive command finished");
        Ok(status.code().unwrap_or(1))
    }
}
