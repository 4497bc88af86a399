//! Send capability of a connection
//!
//! Each connection owns a writer task draining its `Inbox` into the socket.
//! Coordinator notices and relayed signals share one ordered lane. Notices
//! are never dropped: there are only a handful per state change. Relayed
//! signals are capped at `depth` undelivered frames, and anything past that
//! is dropped. Nothing here ever waits, so a slow or dying peer can't stall
//! the lock holder or other connections.

use rendezvous_protocol::ServerMessage;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::mpsc;
use tracing::debug;

/// One item for a connection's writer task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// A coordinator notification
    Notice(String),
    /// A frame relayed verbatim from the partner
    Signal(String),
    /// Send a close frame and stop writing
    Close,
}

#[derive(Debug, Clone)]
pub struct Outbox {
    tx: mpsc::UnboundedSender<Outbound>,
    backlog: Arc<AtomicUsize>,
    depth: usize,
}

/// Receiving end drained by the writer task
#[derive(Debug)]
pub struct Inbox {
    rx: mpsc::UnboundedReceiver<Outbound>,
    backlog: Arc<AtomicUsize>,
}

impl Outbox {
    /// Create an outbox holding at most `depth` undelivered relayed frames
    pub fn channel(depth: usize) -> (Self, Inbox) {
        let (tx, rx) = mpsc::unbounded_channel();
        let backlog = Arc::new(AtomicUsize::new(0));
        (
            Self {
                tx,
                backlog: Arc::clone(&backlog),
                depth,
            },
            Inbox { rx, backlog },
        )
    }

    /// Queue a coordinator notification. False only if the writer is gone.
    pub fn notify(&self, msg: &ServerMessage) -> bool {
        self.tx.send(Outbound::Notice(msg.to_string())).is_ok()
    }

    /// Queue a relayed frame unless the backlog is full. False if dropped.
    pub fn relay(&self, text: &str) -> bool {
        let reserved = self
            .backlog
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < self.depth).then_some(n + 1)
            })
            .is_ok();
        if !reserved {
            debug!("outbound backlog full, dropping relayed frame");
            return false;
        }
        if self.tx.send(Outbound::Signal(text.to_owned())).is_err() {
            self.backlog.fetch_sub(1, Ordering::AcqRel);
            return false;
        }
        true
    }

    /// Ask the writer to send a close frame after everything already queued
    pub fn close(&self) -> bool {
        self.tx.send(Outbound::Close).is_ok()
    }

    /// The writer task is gone; nothing pushed here will be delivered
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl Inbox {
    pub async fn recv(&mut self) -> Option<Outbound> {
        let item = self.rx.recv().await;
        self.release(&item);
        item
    }

    pub fn try_recv(&mut self) -> Option<Outbound> {
        let item = self.rx.try_recv().ok();
        self.release(&item);
        item
    }

    fn release(&self, item: &Option<Outbound>) {
        if let Some(Outbound::Signal(_)) = item {
            self.backlog.fetch_sub(1, Ordering::AcqRel);
        }
    }
}
