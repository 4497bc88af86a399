#![allow(dead_code)]

use futures_util::{SinkExt, StreamExt};
use rendezvous_server::{AdmissionPolicy, Config, Server};
use serde_json::Value;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

pub type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

const RECV_TIMEOUT: Duration = Duration::from_secs(2);

// Bind on an ephemeral loopback port and serve in the background.
pub async fn spawn_server(policy: AdmissionPolicy) -> SocketAddr {
    let config = Config {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        policy,
        ..Config::default()
    };
    let server = Server::bind(&config).await.expect("bind server");
    let addr = server.local_addr().unwrap();
    tokio::spawn(server.run_until(std::future::pending()));
    addr
}

pub async fn connect(addr: SocketAddr) -> Client {
    let (ws, _) = connect_async(format!("ws://{addr}"))
        .await
        .expect("websocket handshake");
    ws
}

// Connect and wait for the admission ack, so admission order is deterministic.
pub async fn join(addr: SocketAddr) -> (Client, Value) {
    let mut ws = connect(addr).await;
    let ack = recv_json(&mut ws).await;
    assert_eq!(ack["type"], "connection", "unexpected first frame: {ack}");
    (ws, ack)
}

pub async fn recv_text(ws: &mut Client) -> String {
    loop {
        let msg = timeout(RECV_TIMEOUT, ws.next())
            .await
            .expect("timed out waiting for a frame")
            .expect("stream ended")
            .expect("websocket error");
        match msg {
            Message::Text(text) => return text.as_str().to_string(),
            Message::Ping(_) | Message::Pong(_) => continue,
            other => panic!("expected text frame, got {other:?}"),
        }
    }
}

pub async fn recv_json(ws: &mut Client) -> Value {
    serde_json::from_str(&recv_text(ws).await).expect("server sent invalid JSON")
}

pub async fn send(ws: &mut Client, text: &str) {
    ws.send(Message::text(text.to_string())).await.expect("send");
}

// Nothing should arrive for a short while.
pub async fn assert_silent(ws: &mut Client) {
    if let Ok(Some(msg)) = timeout(Duration::from_millis(200), ws.next()).await {
        panic!("expected silence, got {msg:?}");
    }
}
