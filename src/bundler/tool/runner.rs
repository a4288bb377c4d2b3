//! Subprocess-backed [`ToolRunner`].

use super::{BuildStep, ToolRunner};
use crate::bundler::{
    error::{Error, Result},
    utils::fs,
};
use std::{process::Stdio, time::Duration};
use tokio::{
    io::{AsyncBufReadExt, AsyncRead, BufReader},
    process::Command,
};

/// Upper bound on a single tool invocation (10 minutes).
pub const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(600);

/// Runs build steps as child processes.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    timeout: Duration,
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TOOL_TIMEOUT,
        }
    }
}

impl ProcessRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl ToolRunner for ProcessRunner {
    async fn run(&self, step: &BuildStep) -> Result<()> {
        let program = step.program_name();
        log::debug!("Running: {step}");

        // A leftover from an earlier build must not pass for this run's output
        fs::remove_file(&step.output).await?;

        let mut child = Command::new(&step.program)
            .args(&step.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|error| Error::ProcessLaunchFailure {
                program: program.clone(),
                error,
            })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        // Drain both pipes while waiting so a chatty tool cannot block on a full pipe
        let status = tokio::time::timeout(self.timeout, async {
            tokio::join!(forward_lines(stdout, &program), forward_lines(stderr, &program));
            child.wait().await
        })
        .await;

        match status {
            Ok(Ok(status)) if !status.success() => {
                log::warn!("{program} exited with {status}");
            }
            Ok(Ok(_)) => {}
            Ok(Err(error)) => {
                return Err(Error::ProcessLaunchFailure { program, error });
            }
            Err(_elapsed) => {
                log::warn!(
                    "{program} timed out after {}s, terminating...",
                    self.timeout.as_secs()
                );
                if let Err(e) = child.kill().await {
                    log::warn!("Failed to kill {program}: {e}");
                }
                return Err(Error::ProcessTimeout {
                    program,
                    timeout: self.timeout,
                });
            }
        }

        if tokio::fs::try_exists(&step.output).await.unwrap_or(false) {
            Ok(())
        } else {
            Err(Error::OutputMissing {
                program,
                output: step.output.clone(),
            })
        }
    }
}

async fn forward_lines<R: AsyncRead + Unpin>(stream: Option<R>, program: &str) {
    let Some(stream) = stream else {
        return;
    };

    let mut lines = BufReader::new(stream).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        log::debug!("[{program}] {line}");
    }
}
