//! Relay tests - debounced broadcast to connected games

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader, Lines};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::time::timeout;

use tilt_tetris::adapter::{RelayConfig, RelayServer};

const WAIT: Duration = Duration::from_secs(5);

async fn bind_local() -> RelayServer {
    let config = RelayConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
    };
    RelayServer::bind(&config).await.unwrap()
}

async fn next_line(lines: &mut Lines<BufReader<TcpStream>>) -> Option<String> {
    timeout(WAIT, lines.next_line()).await.unwrap().unwrap()
}

#[tokio::test]
async fn test_broadcasts_debounced_states_to_every_client() {
    let server = bind_local().await;
    let addr = server.local_addr().unwrap();
    let mut clients_rx = server.subscribe_clients();
    let (states_tx, states_rx) = mpsc::channel(16);
    let relay = tokio::spawn(server.run(states_rx));

    let mut a = BufReader::new(TcpStream::connect(addr).await.unwrap()).lines();
    let mut b = BufReader::new(TcpStream::connect(addr).await.unwrap()).lines();
    timeout(WAIT, clients_rx.wait_for(|&n| n == 2))
        .await
        .unwrap()
        .unwrap();

    let input = [
        "Leaning Left",
        "shake",
        "shake",
        "Neutral",
        "Leaning Forward",
        "Leaning Forward",
        "Button Pressed",
        "Leaning Left",
        "Leaning Left",
    ];
    for state in input {
        states_tx.send(state.to_string()).await.unwrap();
    }
    drop(states_tx);

    let expected = [
        "Leaning Left",
        "shake",
        "Neutral",
        "Leaning Forward",
        "Button Pressed",
        "Leaning Left",
        "Leaning Left",
    ];
    for lines in [&mut a, &mut b] {
        for want in expected {
            assert_eq!(next_line(lines).await.as_deref(), Some(want));
        }
    }

    timeout(WAIT, relay).await.unwrap().unwrap().unwrap();
    // Server gone: both streams end
    assert_eq!(next_line(&mut a).await, None);
    assert_eq!(next_line(&mut b).await, None);
}

#[tokio::test]
async fn test_button_does_not_unlock_repeated_shake() {
    let server = bind_local().await;
    let addr = server.local_addr().unwrap();
    let mut clients_rx = server.subscribe_clients();
    let (states_tx, states_rx) = mpsc::channel(16);
    let relay = tokio::spawn(server.run(states_rx));

    let mut lines = BufReader::new(TcpStream::connect(addr).await.unwrap()).lines();
    timeout(WAIT, clients_rx.wait_for(|&n| n == 1))
        .await
        .unwrap()
        .unwrap();

    for state in ["shake", "Button Released", "shake", "Neutral"] {
        states_tx.send(state.to_string()).await.unwrap();
    }
    drop(states_tx);

    for want in ["shake", "Button Released", "Neutral"] {
        assert_eq!(next_line(&mut lines).await.as_deref(), Some(want));
    }
    timeout(WAIT, relay).await.unwrap().unwrap().unwrap();
}

#[tokio::test]
async fn test_disconnected_client_is_dropped() {
    let server = bind_local().await;
    let addr = server.local_addr().unwrap();
    let mut clients_rx = server.subscribe_clients();
    let (states_tx, states_rx) = mpsc::channel(16);
    let relay = tokio::spawn(server.run(states_rx));

    let client = TcpStream::connect(addr).await.unwrap();
    timeout(WAIT, clients_rx.wait_for(|&n| n == 1))
        .await
        .unwrap()
        .unwrap();
    drop(client);

    // The first write after the peer hangs up may still succeed; keep sending until one fails
    let dropped = timeout(WAIT, async {
        loop {
            states_tx.send("Leaning Right".to_string()).await.unwrap();
            if *clients_rx.borrow_and_update() == 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await;
    assert!(dropped.is_ok());

    drop(states_tx);
    timeout(WAIT, relay).await.unwrap().unwrap().unwrap();
}
