//! Gesture relay - the sensor side of the command stream
//!
//! Accepts any number of game clients and broadcasts gesture states to all of them,
//! one `\n`-terminated line per state. States pass through [`StateRouter`] first:
//!
//! - a repeated `shake` is held back until some other state arrives
//! - a repeated `Leaning Forward` is suppressed
//! - button events skip the state tracking and are always sent
//!
//! Clients whose writes fail are dropped. A failed accept is logged and skipped.

use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, watch};

use crate::types::{ControlCommand, DEFAULT_RELAY_HOST, DEFAULT_RELAY_PORT};

const SHAKE: &str = "shake";
const LEANING_FORWARD: &str = "Leaning Forward";
const NEUTRAL: &str = "Neutral";
const BUTTON_PRESSED: &str = "Button Pressed";
const BUTTON_RELEASED: &str = "Button Released";

/// Pause after a failed accept
const ACCEPT_BACKOFF: Duration = Duration::from_millis(50);

/// Relay configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    pub host: String,
    pub port: u16,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RELAY_HOST.to_string(),
            port: DEFAULT_RELAY_PORT,
        }
    }
}

impl RelayConfig {
    /// Create from `TILT_RELAY_HOST` / `TILT_RELAY_PORT`
    pub fn from_env() -> Self {
        use std::env;

        let host = env::var("TILT_RELAY_HOST").unwrap_or_else(|_| DEFAULT_RELAY_HOST.to_string());
        let port = env::var("TILT_RELAY_PORT")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_RELAY_PORT);

        Self { host, port }
    }

    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Decides which incoming labels are broadcast
#[derive(Debug, Clone)]
pub struct StateRouter {
    current: String,
}

impl Default for StateRouter {
    fn default() -> Self {
        Self {
            current: NEUTRAL.to_string(),
        }
    }
}

impl StateRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last state that was broadcast
    pub fn current(&self) -> &str {
        &self.current
    }

    /// Route one label; returns the line to broadcast, if any
    pub fn route(&mut self, label: &str) -> Option<String> {
        let label = label.trim();
        if label.is_empty() {
            return None;
        }

        // Button lines may carry extra text from the sensor firmware
        if label.contains(BUTTON_PRESSED) {
            return Some(BUTTON_PRESSED.to_string());
        }
        if label.contains(BUTTON_RELEASED) {
            return Some(BUTTON_RELEASED.to_string());
        }

        self.update_state(label)
    }

    fn update_state(&mut self, state: &str) -> Option<String> {
        if self.current == SHAKE && state == SHAKE {
            println!("[Relay] Cannot shake again until the state changes");
            return None;
        }
        if self.current == LEANING_FORWARD && state == LEANING_FORWARD {
            return None;
        }

        if ControlCommand::parse(state) == ControlCommand::Unrecognized {
            eprintln!("[Relay] Forwarding unknown state {:?}", state);
        }
        self.current = state.to_string();
        Some(self.current.clone())
    }
}

struct RelayClient {
    id: usize,
    addr: SocketAddr,
    stream: TcpStream,
}

/// Bound relay server
pub struct RelayServer {
    listener: TcpListener,
    clients: Vec<RelayClient>,
    router: StateRouter,
    client_count: watch::Sender<usize>,
    next_id: usize,
}

impl RelayServer {
    pub async fn bind(config: &RelayConfig) -> anyhow::Result<Self> {
        let listener = TcpListener::bind((config.host.as_str(), config.port))
            .await
            .with_context(|| format!("failed to bind relay on {}", config.endpoint()))?;
        let (client_count, _) = watch::channel(0);

        Ok(Self {
            listener,
            clients: Vec::new(),
            router: StateRouter::new(),
            client_count,
            next_id: 0,
        })
    }

    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Watch the number of connected clients
    pub fn subscribe_clients(&self) -> watch::Receiver<usize> {
        self.client_count.subscribe()
    }

    /// Accept clients and broadcast states until `states` closes
    pub async fn run(mut self, mut states: mpsc::Receiver<String>) -> anyhow::Result<()> {
        println!("[Relay] TCP server listening on {}", self.local_addr()?);

        loop {
            tokio::select! {
                accepted = self.listener.accept() => {
                    if !self.register(accepted) {
                        tokio::time::sleep(ACCEPT_BACKOFF).await;
                    }
                }
                state = states.recv() => match state {
                    Some(label) => {
                        if let Some(line) = self.router.route(&label) {
                            println!("[Relay] Updated state: {}", line);
                            self.broadcast(&line).await;
                        }
                    }
                    None => {
                        println!("[Relay] State input closed, stopping");
                        return Ok(());
                    }
                },
            }
        }
    }

    /// Add an accepted client. Accept errors are logged and leave the relay running.
    fn register(&mut self, accepted: io::Result<(TcpStream, SocketAddr)>) -> bool {
        let (stream, addr) = match accepted {
            Ok(accepted) => accepted,
            Err(e) => {
                eprintln!("[Relay] Failed to accept client: {}", e);
                return false;
            }
        };

        self.next_id += 1;
        println!("[Relay] Client {} connected from {}", self.next_id, addr);
        self.clients.push(RelayClient {
            id: self.next_id,
            addr,
            stream,
        });
        self.client_count.send_replace(self.clients.len());
        true
    }

    async fn broadcast(&mut self, line: &str) {
        let payload = format!("{}\n", line);
        let mut alive = Vec::with_capacity(self.clients.len());

        for mut client in self.clients.drain(..) {
            match client.stream.write_all(payload.as_bytes()).await {
                Ok(()) => alive.push(client),
                Err(e) => eprintln!(
                    "[Relay] Client {} ({}) dropped: {}",
                    client.id, client.addr, e
                ),
            }
        }

        self.clients = alive;
        self.client_count.send_replace(self.clients.len());
    }
}

/// Bind and run a relay fed by `states`
pub async fn run_relay(config: RelayConfig, states: mpsc::Receiver<String>) -> anyhow::Result<()> {
    RelayServer::bind(&config).await?.run(states).await
}
