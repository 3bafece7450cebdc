use std::io::{self, Read, Write};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::compare::Comparator;
use crate::error::ComparisonError;
use crate::model::Comparison;

pub const DEFAULT_WORKER_TIMEOUT: Duration = Duration::from_secs(5);
const POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, Serialize)]
struct WorkerRequest<'a> {
    source: &'a [String],
    target: &'a [String],
}

/// Accepted worker replies: `{"similarity": f, "reordered": b}` or the
/// two-element form `[f, b]`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WorkerResponse {
    Object { similarity: f64, reordered: bool },
    Tuple(f64, bool),
}

impl From<WorkerResponse> for Comparison {
    fn from(response: WorkerResponse) -> Self {
        match response {
            WorkerResponse::Object {
                similarity,
                reordered,
            }
            | WorkerResponse::Tuple(similarity, reordered) => Comparison {
                similarity,
                reordered,
            },
        }
    }
}

/// Comparator that delegates each comparison to an external command.
///
/// One child process per call: the request is written as JSON on stdin and
/// a single JSON reply is read from stdout. A child that outlives `timeout`
/// is killed, and pipes still held open past `timeout` by its descendants
/// fail the call with [`ComparisonError::Timeout`].
#[derive(Debug, Clone)]
pub struct ProcessComparator {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl ProcessComparator {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: DEFAULT_WORKER_TIMEOUT,
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn spawn(&self) -> Result<Child, ComparisonError> {
        Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(ComparisonError::Spawn)
    }
}

impl Comparator for ProcessComparator {
    fn compare(&self, source: &[String], target: &[String]) -> Result<Comparison, ComparisonError> {
        if source.is_empty() && target.is_empty() {
            return Err(ComparisonError::EmptyInput);
        }
        let payload = serde_json::to_vec(&WorkerRequest { source, target })
            .map_err(|err| ComparisonError::Malformed(err.to_string()))?;

        let mut child = self.spawn()?;
        let stdin = child.stdin.take();
        let writer = pipe_thread(move || -> io::Result<()> {
            if let Some(mut stdin) = stdin {
                stdin.write_all(&payload)?;
            }
            Ok(())
        });
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if Instant::now() >= deadline {
                if let Err(err) = child.kill() {
                    debug!(program = %self.program, error = %err, "worker_kill_failed");
                }
                if let Err(err) = child.wait() {
                    debug!(program = %self.program, error = %err, "worker_reap_failed");
                }
                return Err(ComparisonError::Timeout(self.timeout));
            }
            thread::sleep(POLL_INTERVAL);
        };

        // Descendants of the worker can keep its pipes open after it exits.
        match self.await_pipe(&writer, deadline)? {
            Err(err) if err.kind() != io::ErrorKind::BrokenPipe => return Err(err.into()),
            _ => {}
        }
        let stdout = self.await_pipe(&stdout, deadline)??;
        let stderr = self.await_pipe(&stderr, deadline)??;

        if !status.success() {
            return Err(ComparisonError::Exit {
                code: status.code(),
                stderr: String::from_utf8_lossy(&stderr).trim().to_string(),
            });
        }
        parse_response(&stdout)
    }
}

impl ProcessComparator {
    fn await_pipe<T>(&self, rx: &Receiver<T>, deadline: Instant) -> Result<T, ComparisonError> {
        match rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
            Ok(value) => Ok(value),
            Err(RecvTimeoutError::Timeout) => {
                debug!(program = %self.program, "worker_pipe_still_open");
                Err(ComparisonError::Timeout(self.timeout))
            }
            Err(RecvTimeoutError::Disconnected) => Err(ComparisonError::Io(io::Error::other(
                "worker pipe thread panicked",
            ))),
        }
    }
}

fn pipe_thread<T, F>(work: F) -> Receiver<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        // The receiver is gone once the call has timed out.
        let _ = tx.send(work());
    });
    rx
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Receiver<io::Result<Vec<u8>>> {
    pipe_thread(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            pipe.read_to_end(&mut buf)?;
        }
        Ok(buf)
    })
}

pub(crate) fn parse_response(stdout: &[u8]) -> Result<Comparison, ComparisonError> {
    let response: WorkerResponse = serde_json::from_slice(stdout)
        .map_err(|err| ComparisonError::Malformed(err.to_string()))?;
    let comparison = Comparison::from(response);
    if !(0.0..=100.0).contains(&comparison.similarity) {
        return Err(ComparisonError::Malformed(format!(
            "similarity {} outside 0..=100",
            comparison.similarity
        )));
    }
    Ok(comparison)
}
