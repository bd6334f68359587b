use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::stream::{BackgroundStream, StopHandle, StreamSource};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitReason {
    /// The process exited on its own with this code (`None` if killed by a signal).
    Exited(Option<i32>),
    /// `stop()` was called.
    Stopped,
    /// The process could not be started or waited on.
    Failed(String),
}

impl std::fmt::Display for ExitReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exited(Some(code)) => write!(f, "exited with code {code}"),
            Self::Exited(None) => write!(f, "terminated by signal"),
            Self::Stopped => write!(f, "stopped"),
            Self::Failed(message) => write!(f, "failed: {message}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessEvent {
    /// One line of stdout or stderr, without the trailing newline.
    Line(String),
    /// Always the last message.
    Ended(ExitReason),
}

/// A subprocess whose output lines are streamed as messages.
///
/// Stdin is closed. The child is killed on `stop()` and when the worker is
/// dropped.
#[derive(Debug, Clone)]
pub struct ProcessStream {
    program: String,
    args: Vec<String>,
}

impl ProcessStream {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Run `command` through `sh -c`.
    pub fn shell(command: impl Into<String>) -> Self {
        Self::new("sh", vec!["-c".to_string(), command.into()])
    }
}

impl BackgroundStream for ProcessStream {
    type Message = ProcessEvent;

    fn start(self) -> (StreamSource<ProcessEvent>, StopHandle) {
        let (tx, source) = StreamSource::channel();
        let stop = StopHandle::new();
        tokio::spawn(run(self, tx, stop.token()));
        (source, stop)
    }
}

async fn run(stream: ProcessStream, tx: UnboundedSender<ProcessEvent>, token: CancellationToken) {
    info!(program = %stream.program, args = ?stream.args, "Starting stream");
    let reason = match pump(&stream, &tx, &token).await {
        Ok(reason) => reason,
        Err(e) => {
            warn!(program = %stream.program, "Stream failed: {e}");
            ExitReason::Failed(e.to_string())
        }
    };
    info!(program = %stream.program, %reason, "Stream ended");
    let _ = tx.send(ProcessEvent::Ended(reason));
}

async fn pump(
    stream: &ProcessStream,
    tx: &UnboundedSender<ProcessEvent>,
    token: &CancellationToken,
) -> std::io::Result<ExitReason> {
    let mut child = Command::new(&stream.program)
        .args(&stream.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()?;

    let mut stdout = child.stdout.take().map(|out| BufReader::new(out).lines());
    let mut stderr = child.stderr.take().map(|err| BufReader::new(err).lines());

    while stdout.is_some() || stderr.is_some() {
        tokio::select! {
            () = token.cancelled() => {
                debug!(program = %stream.program, "Killing stream process");
                child.kill().await?;
                return Ok(ExitReason::Stopped);
            }
            line = next_line(&mut stdout) => forward(line, &mut stdout, tx),
            line = next_line(&mut stderr) => forward(line, &mut stderr, tx),
        }
    }

    tokio::select! {
        () = token.cancelled() => {
            child.kill().await?;
            Ok(ExitReason::Stopped)
        }
        status = child.wait() => Ok(ExitReason::Exited(status?.code())),
    }
}

type Lines<R> = tokio::io::Lines<BufReader<R>>;

/// Next line from an open pipe; pends forever once the pipe is closed.
async fn next_line<R>(lines: &mut Option<Lines<R>>) -> std::io::Result<Option<String>>
where
    R: tokio::io::AsyncRead + Unpin,
{
    match lines {
        Some(lines) => lines.next_line().await,
        None => std::future::pending().await,
    }
}

fn forward<R>(
    line: std::io::Result<Option<String>>,
    pipe: &mut Option<Lines<R>>,
    tx: &UnboundedSender<ProcessEvent>,
) {
    match line {
        Ok(Some(line)) => {
            let _ = tx.send(ProcessEvent::Line(line));
        }
        Ok(None) => *pipe = None,
        Err(e) => {
            warn!("Stream read failed: {e}");
            *pipe = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn collect(source: &mut StreamSource<ProcessEvent>) -> Vec<ProcessEvent> {
        let mut events = Vec::new();
        while let Some(event) = source.next().await {
            let ended = matches!(event, ProcessEvent::Ended(_));
            events.push(event);
            if ended {
                break;
            }
        }
        events
    }

    #[tokio::test]
    async fn test_lines_then_exit_code() {
        let (mut source, _stop) = ProcessStream::shell("echo one; echo two; exit 3").start();
        let events = collect(&mut source).await;

        assert_eq!(
            events,
            vec![
                ProcessEvent::Line("one".to_string()),
                ProcessEvent::Line("two".to_string()),
                ProcessEvent::Ended(ExitReason::Exited(Some(3))),
            ]
        );
    }

    #[tokio::test]
    async fn test_stderr_is_streamed() {
        let (mut source, _stop) = ProcessStream::shell("echo oops >&2").start();
        let events = collect(&mut source).await;
        assert!(events.contains(&ProcessEvent::Line("oops".to_string())));
    }

    #[tokio::test]
    async fn test_stop_kills_process() {
        let (mut source, stop) = ProcessStream::shell("echo ready; sleep 30").start();
        assert_eq!(source.next().await, Some(ProcessEvent::Line("ready".to_string())));

        stop.stop();
        let events = collect(&mut source).await;
        assert_eq!(events.last(), Some(&ProcessEvent::Ended(ExitReason::Stopped)));

        // Stopping again after the end is harmless
        stop.stop();
    }

    #[tokio::test]
    async fn test_missing_program_fails() {
        let (mut source, _stop) =
            ProcessStream::new("/nonexistent/cloudnav-test-binary", Vec::new()).start();
        let events = collect(&mut source).await;
        assert!(matches!(
            events.as_slice(),
            [ProcessEvent::Ended(ExitReason::Failed(_))]
        ));
    }
}
