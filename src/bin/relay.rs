//! Gesture relay (`tilt-relay`).
//!
//! Reads classified gesture states from stdin, one per line, and broadcasts them to
//! every connected game. Closing stdin stops the relay.
//!
//! ```bash
//! printf 'Leaning Left\nshake\n' | tilt-relay
//! ```

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use tilt_tetris::adapter::{run_relay, RelayConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let config = RelayConfig::from_env();
    let (tx, rx) = mpsc::channel::<String>(64);

    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if tx.send(line).await.is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    eprintln!("[Relay] Failed to read stdin: {}", e);
                    break;
                }
            }
        }
    });

    run_relay(config, rx).await
}
