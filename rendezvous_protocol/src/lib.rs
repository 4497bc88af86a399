//! Message envelope spoken between the rendezvous server and its clients
//!
//! Every frame is a single JSON text document with a `type` discriminator.
//!
//! ## Server → client
//!
//! - `{"type":"connection","id":"<uuid>","totalClients":1,"message":"..."}`
//! - `{"type":"paired","message":"..."}` or `{"type":"ready"}`
//! - `{"type":"partnerLeft","message":"..."}` or `{"type":"disconnected"}`
//! - `{"type":"error","message":"Room is full"}`
//!
//! ## Client → server → partner
//!
//! - `{"type":"offer","sdp":...}`
//! - `{"type":"answer","sdp":...}`
//! - `{"type":"ice-candidate","candidate":...}`
//!
//! Signaling frames are relayed verbatim; the server only looks at `type`.

#![forbid(unsafe_code)]

mod client;
mod peer_id;
mod server;

pub use client::{ClientEnvelope, ProtocolError, SignalKind};
pub use peer_id::PeerId;
pub use server::ServerMessage;
