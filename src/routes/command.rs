// Command execution boundary for routing table queries
//
// Commands are always spawned with an explicit argument list, never through a shell.

use std::future::Future;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use crate::error::{AppError, AppResult};

/// Runs an executable and hands back its standard output.
///
/// Callers check [`command_available`] first; implementations may assume the path exists.
pub trait CommandRunner {
    fn run_and_capture_output(
        &self,
        path: &Path,
        args: &[String],
    ) -> impl Future<Output = AppResult<String>> + Send;
}

/// Returns true if `path` points at an existing regular file
pub fn command_available(path: &Path) -> bool {
    path.is_file()
}

/// Spawns real subprocesses with a bounded wait
#[derive(Debug, Clone)]
pub struct SystemCommandRunner {
    timeout: Duration,
}

impl SystemCommandRunner {
    pub fn new(timeout: Duration) -> Self {
        SystemCommandRunner { timeout }
    }
}

impl CommandRunner for SystemCommandRunner {
    async fn run_and_capture_output(&self, path: &Path, args: &[String]) -> AppResult<String> {
        let command_line = format!("{} {}", path.display(), args.join(" "))
            .trim_end()
            .to_string();
        tracing::debug!("Executing {}", command_line);

        let mut command = Command::new(path);
        command.args(args).stdin(Stdio::null()).kill_on_drop(true);
        let child = command.output();

        // Dropping the future on timeout kills the child
        let output = tokio::time::timeout(self.timeout, child)
            .await
            .map_err(|_| AppError::CommandTimeout {
                command: command_line.clone(),
                timeout: self.timeout,
            })?
            .map_err(|e| AppError::CommandExecution(format!("{}: {}", command_line, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::CommandFailed {
                command: command_line,
                status: output.status.code(),
                stderr: stderr.trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        tracing::trace!("{} output:\n{}", command_line, stdout);
        Ok(stdout)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    /// Replays canned output and records every invocation.
    ///
    /// Clones share the call log.
    #[derive(Clone)]
    pub struct FakeRunner {
        output: Option<String>,
        calls: Arc<Mutex<Vec<(PathBuf, Vec<String>)>>>,
    }

    impl FakeRunner {
        pub fn with_output(output: &str) -> Self {
            FakeRunner {
                output: Some(output.to_string()),
                calls: Arc::default(),
            }
        }

        pub fn failing() -> Self {
            FakeRunner {
                output: None,
                calls: Arc::default(),
            }
        }

        pub fn calls(&self) -> Vec<(PathBuf, Vec<String>)> {
            self.calls.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    impl CommandRunner for FakeRunner {
        async fn run_and_capture_output(&self, path: &Path, args: &[String]) -> AppResult<String> {
            self.calls
                .lock()
                .unwrap()
                .push((path.to_path_buf(), args.to_vec()));

            match &self.output {
                Some(output) => Ok(output.clone()),
                None => Err(AppError::CommandFailed {
                    command: path.display().to_string(),
                    status: Some(2),
                    stderr: "RTNETLINK answers: Operation not permitted".to_string(),
                }),
            }
        }
    }

    // Any path that is guaranteed to exist as a regular file
    pub fn existing_executable() -> PathBuf {
        std::env::current_exe().unwrap()
    }
}
