//! Error types for the rendezvous server

use thiserror::Error;

/// Errors that can occur while serving connections
#[derive(Error, Debug)]
pub enum SignalingError {
    /// Socket-level failure (bind, accept, peer address)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// WebSocket handshake or transport error
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// Invalid startup configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Errors from a single client frame. None of these reach the client.
#[derive(Error, Debug)]
pub enum ClientRequestError {
    /// Frame is not a JSON object with a string `type`
    #[error("Malformed message: {0}")]
    Malformed(#[from] rendezvous_protocol::ProtocolError),

    /// Well-formed, but not a kind the server relays
    #[error("Unsupported message type: {0}")]
    UnsupportedType(String),
}
