//! WebSocket rendezvous server for WebRTC call setup
//!
//! Clients connect over WebSocket, wait in a FIFO pool, and are paired two at
//! a time. Once paired, `offer`, `answer` and `ice-candidate` frames are
//! relayed verbatim to the partner. Media never touches the server.
//!
//! # Protocol
//!
//! ## Server → client
//!
//! - `{"type":"connection","id":"<uuid>","totalClients":1,"message":"..."}` - Admitted
//! - `{"type":"paired","message":"..."}` / `{"type":"ready"}` - Partner found
//! - `{"type":"partnerLeft","message":"..."}` / `{"type":"disconnected"}` - Partner left
//! - `{"type":"error","message":"Room is full"}` - Rejected, then closed
//!
//! ## Client → server → partner
//!
//! - `{"type":"offer","sdp":...}`
//! - `{"type":"answer","sdp":...}`
//! - `{"type":"ice-candidate","candidate":...}`
//!
//! Anything else is ignored. Unparseable frames are dropped without closing
//! the connection.
//!
//! # Modes
//!
//! - **lobby** (default): unlimited admission; when a partner leaves the
//!   survivor gets `partnerLeft` and goes back into the pool.
//! - **room**: at most two clients; extra clients get `error` and are closed;
//!   when a partner leaves everyone left gets `disconnected` and the next
//!   arrival pairs with the survivor.
//!
//! # Example
//!
//! ```bash
//! # Start the server
//! PORT=8080 rendezvous-signaling --mode lobby
//!
//! # Connect two clients
//! websocat ws://127.0.0.1:8080
//! ```

#![forbid(unsafe_code)]

pub mod config;
pub mod coordinator;
pub mod error;
pub mod handler;
pub mod outbox;
pub mod policy;
pub mod relay;
pub mod server;
pub mod state;

pub use config::Config;
pub use coordinator::{Admission, Coordinator, Snapshot};
pub use error::SignalingError;
pub use handler::handle_connection;
pub use policy::AdmissionPolicy;
pub use server::Server;
pub use state::PeerState;
