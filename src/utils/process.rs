// src/utils/process.rs: Child process execution

use std::io;
use std::path::Path;
use std::process::{ExitStatus, Stdio};

use log::debug;
use tokio::process::Command;
use tokio::task::JoinHandle;

use crate::config::defs::PipelineError;
use crate::utils::command::CommandLine;
use crate::utils::streams::{read_child_stream, ChildStream};


/// Outcome of a child process that exited 0.
#[derive(Debug)]
pub struct ExecutionResult {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl ExecutionResult {
    pub fn success(&self) -> bool {
        self.status.success()
    }
}


/// Short tool name for error messages: file name of the program path.
fn tool_name(cmd: &CommandLine) -> String {
    Path::new(cmd.program())
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| cmd.program().to_string())
}


/// Stops pipe readers whose output will never be collected.
fn abort_readers(readers: [&JoinHandle<io::Result<String>>; 2]) {
    for reader in readers {
        reader.abort();
    }
}


/// Runs a command to completion, capturing stdout and stderr in full.
///
/// Both pipes are drained concurrently so a chatty child cannot block on a
/// full pipe. The working directory is inherited and stdin is closed.
///
/// # Arguments
///
/// * `cmd` - Program and arguments.
///
/// # Returns
/// ExecutionResult on exit code 0, `ProcessExecution` on any other exit,
/// `ProcessLaunch` when the program could not be started.
pub async fn run_command(cmd: &CommandLine) -> Result<ExecutionResult, PipelineError> {
    let tool = tool_name(cmd);
    debug!("Spawning: {}", cmd);

    let mut child = Command::new(cmd.program())
        .args(cmd.args())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| PipelineError::ProcessLaunch {
            tool: tool.clone(),
            command: cmd.clone(),
            error: e.to_string(),
        })?;

    let io_error = |e: io::Error| PipelineError::IOError(format!("Failed to read output of {}: {}", tool, e));

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| PipelineError::IOError(format!("Failed to get stdout from {}", tool)))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| PipelineError::IOError(format!("Failed to get stderr from {}", tool)))?;

    let stdout_task = tokio::spawn(read_child_stream(stdout, ChildStream::Stdout, tool.clone()));
    let stderr_task = tokio::spawn(read_child_stream(stderr, ChildStream::Stderr, tool.clone()));

    let status = match child.wait().await {
        Ok(status) => status,
        Err(e) => {
            abort_readers([&stdout_task, &stderr_task]);
            return Err(io_error(e));
        }
    };

    let stdout = stdout_task
        .await
        .map_err(|e| PipelineError::IOError(format!("{} stdout reader panicked: {}", tool, e)))?
        .map_err(io_error)?;
    let stderr = stderr_task
        .await
        .map_err(|e| PipelineError::IOError(format!("{} stderr reader panicked: {}", tool, e)))?
        .map_err(io_error)?;

    if !status.success() {
        // None means the child was killed by a signal.
        let exit_code = status.code().unwrap_or(-1);
        return Err(PipelineError::ProcessExecution {
            tool,
            exit_code,
            stderr,
            command: cmd.clone(),
        });
    }

    debug!("{} finished: {} bytes stdout, {} bytes stderr", tool, stdout.len(), stderr.len());
    Ok(ExecutionResult { status, stdout, stderr })
}
