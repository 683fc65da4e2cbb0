//! Command listener - TCP client that feeds the mailbox
//!
//! Connects once to the gesture relay and copies every non-empty line into the
//! [`CommandMailbox`]. Lines that are not UTF-8 are dropped and reading goes on.
//! There is no reconnection: a failed connect, a read error or the relay closing the
//! stream ends the listener for good.

use std::time::Duration;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpStream;
use tokio::runtime::Runtime;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::core::CommandMailbox;
use crate::types::{DEFAULT_RELAY_HOST, DEFAULT_RELAY_PORT};

/// Listener configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RELAY_HOST.to_string(),
            port: DEFAULT_RELAY_PORT,
        }
    }
}

impl ListenerConfig {
    /// Create from `TILT_TETRIS_HOST` / `TILT_TETRIS_PORT`; unparsable values fall back to defaults.
    pub fn from_env() -> Self {
        use std::env;

        let host = env::var("TILT_TETRIS_HOST").unwrap_or_else(|_| DEFAULT_RELAY_HOST.to_string());
        let port = env::var("TILT_TETRIS_PORT")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_RELAY_PORT);

        Self { host, port }
    }

    /// Check if the listener is disabled via environment
    pub fn is_disabled() -> bool {
        std::env::var("TILT_TETRIS_LISTENER_DISABLED")
            .map(|v| v == "1" || v.to_lowercase() == "true")
            .unwrap_or(false)
    }

    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Why the listener stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerExit {
    ConnectFailed,
    /// The relay closed the stream
    Closed,
    ReadError,
    Shutdown,
}

/// Connect, then forward lines into `mailbox` until the stream ends or `shutdown` fires.
pub async fn run_listener(
    config: ListenerConfig,
    mailbox: CommandMailbox,
    mut shutdown: oneshot::Receiver<()>,
) -> ListenerExit {
    let endpoint = config.endpoint();
    let stream = tokio::select! {
        _ = &mut shutdown => return ListenerExit::Shutdown,
        result = TcpStream::connect((config.host.as_str(), config.port)) => match result {
            Ok(stream) => stream,
            Err(e) => {
                eprintln!("[Listener] Error connecting to {}: {}", endpoint, e);
                return ListenerExit::ConnectFailed;
            }
        },
    };
    println!("[Listener] Connected to {}", endpoint);

    let mut reader = BufReader::new(stream);
    let mut frame = Vec::new();
    loop {
        frame.clear();
        // A dropped sender counts as shutdown too
        let read = tokio::select! {
            _ = &mut shutdown => None,
            read = reader.read_until(b'\n', &mut frame) => Some(read),
        };

        match read {
            None => {
                println!("[Listener] Shutting down");
                return ListenerExit::Shutdown;
            }
            Some(Ok(0)) => {
                println!("[Listener] Disconnected from {}: stream closed", endpoint);
                return ListenerExit::Closed;
            }
            Some(Ok(_)) => {
                if let Some(tag) = decode_frame(&frame) {
                    mailbox.send(tag);
                }
            }
            Some(Err(e)) => {
                eprintln!("[Listener] Disconnected from {}: {}", endpoint, e);
                return ListenerExit::ReadError;
            }
        }
    }
}

/// Text of one received line without its terminator.
///
/// Empty lines and lines that are not UTF-8 yield `None` and are skipped.
fn decode_frame(frame: &[u8]) -> Option<&str> {
    let line = frame.strip_suffix(b"\n").unwrap_or(frame);
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    if line.is_empty() {
        return None;
    }
    std::str::from_utf8(line).ok()
}

/// Running listener, owning its runtime.
///
/// Bridges the blocking game loop with the async socket read. Dropping it shuts the
/// listener down; do not drop it from inside another tokio runtime.
pub struct CommandListener {
    runtime: Option<Runtime>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<ListenerExit>>,
}

impl CommandListener {
    /// Start listening on a dedicated runtime
    pub fn start(config: ListenerConfig, mailbox: CommandMailbox) -> anyhow::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("tilt-listener")
            .enable_all()
            .build()
            .context("failed to create listener runtime")?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = runtime.spawn(run_listener(config, mailbox, shutdown_rx));

        Ok(Self {
            runtime: Some(runtime),
            shutdown_tx: Some(shutdown_tx),
            task: Some(task),
        })
    }

    /// Start from environment variables.
    ///
    /// Returns None if `TILT_TETRIS_LISTENER_DISABLED` is set.
    pub fn start_from_env(mailbox: CommandMailbox) -> anyhow::Result<Option<Self>> {
        if ListenerConfig::is_disabled() {
            println!("[Listener] Disabled via TILT_TETRIS_LISTENER_DISABLED");
            return Ok(None);
        }
        Self::start(ListenerConfig::from_env(), mailbox).map(Some)
    }

    /// Whether the listener task has stopped (connect failure, disconnect or shutdown)
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, |task| task.is_finished())
    }

    /// Wait up to `timeout` for the listener to stop on its own
    pub fn wait(&mut self, timeout: Duration) -> Option<ListenerExit> {
        let runtime = self.runtime.as_ref()?;
        let task = self.task.as_mut()?;
        let exit = runtime
            .block_on(async { tokio::time::timeout(timeout, task).await })
            .ok()?
            .ok();
        self.task = None;
        exit
    }

    /// Stop the listener: signal it, which drops the stream, then join the task.
    pub fn shutdown(&mut self) -> Option<ListenerExit> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }

        let exit = match (self.runtime.as_ref(), self.task.take()) {
            (Some(runtime), Some(task)) => runtime.block_on(task).ok(),
            _ => None,
        };

        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_timeout(Duration::from_millis(100));
        }
        exit
    }
}

impl Drop for CommandListener {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_endpoint_is_loopback_relay() {
        let config = ListenerConfig::default();
        assert_eq!(config.endpoint(), "127.0.0.1:65432");
    }

    #[test]
    fn frames_are_trimmed_and_filtered() {
        assert_eq!(decode_frame(b"Leaning Left\n"), Some("Leaning Left"));
        assert_eq!(decode_frame(b"shake\r\n"), Some("shake"));
        assert_eq!(decode_frame(b"Neutral"), Some("Neutral"));
        assert_eq!(decode_frame(b"\n"), None);
        assert_eq!(decode_frame(b"\r\n"), None);
        assert_eq!(decode_frame(b"\xff\xfe garbage\n"), None);
    }

    #[tokio::test]
    async fn connect_failure_is_final() {
        // Grab a free port, then close it so nothing listens there
        let probe = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = probe.local_addr().unwrap().port();
        drop(probe);

        let config = ListenerConfig {
            host: "127.0.0.1".to_string(),
            port,
        };
        let mailbox = CommandMailbox::new();
        let (_tx, rx) = oneshot::channel();
        let exit = run_listener(config, mailbox.clone(), rx).await;
        assert_eq!(exit, ListenerExit::ConnectFailed);
        assert!(mailbox.is_empty());
    }
}
