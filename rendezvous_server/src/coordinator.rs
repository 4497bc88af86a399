//! Session coordinator: admission, pairing and teardown
//!
//! Every mutation runs under the write half of one lock and never awaits, so
//! admit, pair and teardown for different connections cannot interleave.
//! Relaying only needs the read half.

use crate::error::ClientRequestError;
use crate::outbox::Outbox;
use crate::policy::AdmissionPolicy;
use crate::relay::{self, RelayOutcome};
use crate::state::{PeerState, SessionState};
use parking_lot::RwLock;
use rendezvous_protocol::{ClientEnvelope, PeerId, ServerMessage};
use tracing::{debug, info};

/// Result of admitting a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Registered and waiting (or already paired)
    Admitted(PeerId),
    /// Turned away; the outbox got an error and a close
    Rejected(PeerId),
}

/// Point-in-time counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Snapshot {
    /// Live admitted connections, in any state
    pub registered: usize,
    /// Connections in the waiting pool
    pub waiting: usize,
    /// Active pairs (two connections each)
    pub pairs: usize,
}

#[derive(Debug)]
pub struct Coordinator {
    policy: AdmissionPolicy,
    state: RwLock<SessionState>,
}

impl Coordinator {
    pub fn new(policy: AdmissionPolicy) -> Self {
        Self {
            policy,
            state: RwLock::new(SessionState::new()),
        }
    }

    pub fn policy(&self) -> AdmissionPolicy {
        self.policy
    }

    /// Accept a freshly opened connection, or reject it when at capacity
    pub fn admit(&self, outbox: Outbox) -> Admission {
        let id = PeerId::new_random();
        let mut state = self.state.write();

        if self.policy.is_full(state.registered()) {
            info!("Room is full, rejecting connection {}", id.short());
            outbox.notify(&ServerMessage::room_full());
            outbox.close();
            return Admission::Rejected(id);
        }

        state.register(id, outbox);
        state.notify(
            &id,
            &ServerMessage::Connection {
                id,
                total_clients: state.waiting_len(),
                message: self.policy.welcome(),
            },
        );
        info!(
            "Client {} connected. Total clients: {}",
            id.short(),
            state.registered()
        );

        self.try_pair(&mut state);
        Admission::Admitted(id)
    }

    /// Handle one inbound text frame from `from`
    pub fn dispatch(&self, from: &PeerId, text: &str) -> Result<RelayOutcome, ClientRequestError> {
        let envelope: ClientEnvelope = text.parse()?;
        let Some(kind) = envelope.signal() else {
            return Err(ClientRequestError::UnsupportedType(envelope.kind));
        };

        let outcome = relay::relay(&self.state.read(), from, text);
        match outcome {
            RelayOutcome::Forwarded(to) => {
                debug!("Forwarding {} from {} to {}", kind.as_str(), from.short(), to.short())
            }
            RelayOutcome::NoPartner => {
                debug!("Dropping {} from unpaired client {}", kind.as_str(), from.short())
            }
            RelayOutcome::PartnerUnreachable(to) => {
                debug!("Partner {} unreachable, dropping {}", to.short(), kind.as_str())
            }
        }
        Ok(outcome)
    }

    /// Remove a closed connection. Returns false if it was already gone.
    pub fn teardown(&self, id: &PeerId) -> bool {
        let mut state = self.state.write();

        let Some(departure) = state.unregister(id) else {
            return false;
        };
        info!(
            "Client {} disconnected. Remaining clients: {}",
            id.short(),
            state.registered()
        );

        let Some(partner) = departure.partner else {
            return true;
        };

        let survivor_open = state.outbox(&partner).is_some_and(|o| !o.is_closed());
        if !survivor_open {
            // Its own teardown is on the way
            state.detach(partner);
            return true;
        }

        // Lobby tells the survivor it is waiting again; a room tells everyone
        // someone left. Either way the survivor can take the next free slot.
        if self.policy.requeue_on_disconnect {
            state.notify(&partner, &self.policy.partner_left_notice());
        } else {
            state.broadcast(&self.policy.partner_left_notice());
        }
        state.requeue(partner);
        info!("Client {} back in the pool after partner left", partner.short());
        self.try_pair(&mut state);
        true
    }

    pub fn snapshot(&self) -> Snapshot {
        let state = self.state.read();
        Snapshot {
            registered: state.registered(),
            waiting: state.waiting_len(),
            pairs: state.pair_count(),
        }
    }

    /// `None` once the connection is closed (or was never admitted)
    pub fn state_of(&self, id: &PeerId) -> Option<PeerState> {
        self.state.read().state_of(id)
    }

    pub fn partner_of(&self, id: &PeerId) -> Option<PeerId> {
        self.state.read().partner_of(id)
    }

    /// Pair waiting peers until fewer than two remain
    fn try_pair(&self, state: &mut SessionState) {
        while let Some((a, b)) = state.pop_pair() {
            info!("Paired {} with {}", a.short(), b.short());
            let notice = self.policy.pair_notice();
            state.notify(&a, &notice);
            state.notify(&b, &notice);
        }
    }

    #[cfg(test)]
    fn check_invariants(&self) {
        if let Err(e) = self.state.read().check_invariants() {
            panic!("invariant violated: {e}");
        }
    }
}
