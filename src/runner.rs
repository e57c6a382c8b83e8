use crate::command::CommandLine;
use crate::error::ErrorConverter;
use crate::Error;
use crate::Result;
use log::{debug, warn};
use std::io::{self, Read};
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Shared flag to abort a running command from another thread.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Running commands are killed at the next poll.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Exit status and captured output streams of a finished command.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, missing if the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Executes external commands.
///
/// A finished process is always returned as `Ok`, regardless of its exit code.
/// Errors are reserved for commands that could not be started,
/// ran out of time or were cancelled.
pub trait CommandRunner {
    fn run(
        &self,
        command: &CommandLine,
        timeout: Duration,
        cancel: &CancelToken,
    ) -> Result<ProcessOutput>;
}

impl<T: CommandRunner + ?Sized> CommandRunner for &T {
    fn run(
        &self,
        command: &CommandLine,
        timeout: Duration,
        cancel: &CancelToken,
    ) -> Result<ProcessOutput> {
        (**self).run(command, timeout, cancel)
    }
}

/// Runs commands as real child processes.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(
        &self,
        command: &CommandLine,
        timeout: Duration,
        cancel: &CancelToken,
    ) -> Result<ProcessOutput> {
        // A missing working directory would otherwise surface as NotFound
        // and be confused with a missing executable.
        if let Some(cwd) = &command.cwd {
            if !cwd.is_dir() {
                return Error::unexpected(&format!(
                    "Working directory '{}' does not exist",
                    cwd.display()
                ));
            }
        }

        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(cwd) = &command.cwd {
            cmd.current_dir(cwd);
        }

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(Error::Launch {
                    program: command.program.display().to_string(),
                    source: err,
                })
            }
            Err(err) => {
                return Err(Error::Unexpected {
                    reason: format!("Failed to start '{}'", command.program.display()),
                    source: Some(Box::new(err)),
                })
            }
        };
        debug!("Started process {} for: {command}", child.id());

        // Both pipes are drained concurrently, a full pipe would block the child
        let stdout = spawn_reader(child.stdout.take());
        let stderr = spawn_reader(child.stderr.take());

        // No deadline if the timeout does not fit into an Instant
        let deadline = Instant::now().checked_add(timeout);
        let status = loop {
            if let Some(status) = child
                .try_wait()
                .unexpected_err("Failed to query process status")?
            {
                break status;
            }
            if cancel.is_cancelled() {
                terminate(&mut child);
                return Err(Error::Cancelled);
            }
            let mut pause = POLL_INTERVAL;
            if let Some(deadline) = deadline {
                let now = Instant::now();
                if now >= deadline {
                    terminate(&mut child);
                    return Err(Error::Timeout {
                        program: command.program_name(),
                        timeout,
                    });
                }
                pause = pause.min(deadline - now);
            }
            thread::sleep(pause);
        };
        debug!("Process exited with {status}");

        // Background processes started by the child may inherit the pipes,
        // so reading the rest of the output is bound by the same deadline.
        let stdout = receive_output(&stdout, deadline, command, timeout)?;
        let stderr = receive_output(&stderr, deadline, command, timeout)?;

        Ok(ProcessOutput {
            code: status.code(),
            stdout,
            stderr,
        })
    }
}

fn spawn_reader<R: Read + Send + 'static>(source: Option<R>) -> Receiver<io::Result<String>> {
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        let mut buffer = Vec::new();
        let result = match source {
            Some(mut source) => source.read_to_end(&mut buffer).map(|_| ()),
            None => Ok(()),
        };
        // Nobody listens anymore if the run has already timed out
        let _ = sender.send(result.map(|()| String::from_utf8_lossy(&buffer).into_owned()));
    });
    receiver
}

fn receive_output(
    receiver: &Receiver<io::Result<String>>,
    deadline: Option<Instant>,
    command: &CommandLine,
    timeout: Duration,
) -> Result<String> {
    let received = match deadline {
        Some(deadline) => receiver.recv_timeout(deadline.saturating_duration_since(Instant::now())),
        None => receiver.recv().map_err(RecvTimeoutError::from),
    };
    match received {
        Ok(result) => result.unexpected_err("Failed to read process output"),
        Err(RecvTimeoutError::Timeout) => {
            warn!(
                "Output of '{}' is still open after the process exited",
                command.program_name()
            );
            Err(Error::Timeout {
                program: command.program_name(),
                timeout,
            })
        }
        Err(RecvTimeoutError::Disconnected) => Error::unexpected("Output reader thread panicked"),
    }
}

// Reader threads stay detached, grandchildren may keep the pipes open.
fn terminate(child: &mut Child) {
    if let Err(err) = child.kill() {
        warn!("Failed to kill process {}: {err}", child.id());
    }
    if let Err(err) = child.wait() {
        warn!("Failed to reap process {}: {err}", child.id());
    }
}
