//! Session state: connection registry, waiting pool and pair table
//!
//! All three live in one `SessionState` so a single lock covers the compound
//! invariant: a peer is in the pool exactly when it is `Waiting`, and the
//! pair table always holds both directions of every pair.

use crate::outbox::Outbox;
use rendezvous_protocol::{PeerId, ServerMessage};
use std::collections::{HashMap, VecDeque};

/// Lifecycle of an admitted connection. A closed connection has no entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerState {
    Waiting,
    Paired,
    /// Partner left while this connection's own socket was closing
    Detached,
}

#[derive(Debug)]
struct PeerEntry {
    state: PeerState,
    outbox: Outbox,
}

/// What was left behind when a connection was removed
#[derive(Debug)]
pub struct Departure {
    pub state: PeerState,
    pub partner: Option<PeerId>,
}

#[derive(Debug, Default)]
pub struct SessionState {
    /// Map of peer ID -> lifecycle state and send capability
    peers: HashMap<PeerId, PeerEntry>,
    /// Peers waiting for a partner, earliest first
    waiting: VecDeque<PeerId>,
    /// Both directions of every pair
    pairs: HashMap<PeerId, PeerId>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of admitted live connections
    pub fn registered(&self) -> usize {
        self.peers.len()
    }

    pub fn waiting_len(&self) -> usize {
        self.waiting.len()
    }

    pub fn pair_count(&self) -> usize {
        self.pairs.len() / 2
    }

    #[cfg(test)]
    pub fn contains(&self, id: &PeerId) -> bool {
        self.peers.contains_key(id)
    }

    pub fn state_of(&self, id: &PeerId) -> Option<PeerState> {
        self.peers.get(id).map(|p| p.state)
    }

    pub fn partner_of(&self, id: &PeerId) -> Option<PeerId> {
        self.pairs.get(id).copied()
    }

    pub fn outbox(&self, id: &PeerId) -> Option<&Outbox> {
        self.peers.get(id).map(|p| &p.outbox)
    }

    /// Register a new connection at the back of the waiting pool
    pub fn register(&mut self, id: PeerId, outbox: Outbox) {
        self.peers.insert(
            id,
            PeerEntry {
                state: PeerState::Waiting,
                outbox,
            },
        );
        self.waiting.push_back(id);
    }

    /// Take the two earliest waiting peers and pair them
    pub fn pop_pair(&mut self) -> Option<(PeerId, PeerId)> {
        if self.waiting.len() < 2 {
            return None;
        }
        let a = self.waiting.pop_front()?;
        let b = self.waiting.pop_front()?;

        self.pairs.insert(a, b);
        self.pairs.insert(b, a);
        self.set_state(&a, PeerState::Paired);
        self.set_state(&b, PeerState::Paired);

        Some((a, b))
    }

    /// Put a peer back at the end of the waiting pool
    pub fn requeue(&mut self, id: PeerId) {
        match self.state_of(&id) {
            None | Some(PeerState::Waiting) => return,
            Some(_) => {}
        }
        self.unpair(&id);
        self.set_state(&id, PeerState::Waiting);
        self.waiting.push_back(id);
    }

    /// Park a peer outside both the pool and the pair table
    pub fn detach(&mut self, id: PeerId) {
        self.unpair(&id);
        self.waiting.retain(|w| *w != id);
        self.set_state(&id, PeerState::Detached);
    }

    /// Remove a connection from every table. `None` if it was already gone.
    pub fn unregister(&mut self, id: &PeerId) -> Option<Departure> {
        let entry = self.peers.remove(id)?;
        if entry.state == PeerState::Waiting {
            self.waiting.retain(|w| w != id);
        }
        let partner = self.unpair(id);
        Some(Departure {
            state: entry.state,
            partner,
        })
    }

    /// Queue a notification for one peer; false if it is gone
    pub fn notify(&self, id: &PeerId, msg: &ServerMessage) -> bool {
        self.outbox(id).is_some_and(|o| o.notify(msg))
    }

    /// Queue a notification for every registered peer
    pub fn broadcast(&self, msg: &ServerMessage) {
        for entry in self.peers.values() {
            entry.outbox.notify(msg);
        }
    }

    fn set_state(&mut self, id: &PeerId, state: PeerState) {
        if let Some(entry) = self.peers.get_mut(id) {
            entry.state = state;
        }
    }

    /// Drop both directions of `id`'s pair, returning the former partner
    fn unpair(&mut self, id: &PeerId) -> Option<PeerId> {
        let partner = self.pairs.remove(id)?;
        self.pairs.remove(&partner);
        Some(partner)
    }

    /// Verify the cross-table invariants
    #[cfg(test)]
    pub fn check_invariants(&self) -> Result<(), String> {
        use std::collections::HashSet;

        let mut seen = HashSet::new();
        for id in &self.waiting {
            if !seen.insert(*id) {
                return Err(format!("{id} is in the pool twice"));
            }
            if self.state_of(id) != Some(PeerState::Waiting) {
                return Err(format!("{id} is pooled but not Waiting"));
            }
        }
        for (id, entry) in &self.peers {
            let pooled = seen.contains(id);
            if (entry.state == PeerState::Waiting) != pooled {
                return Err(format!("{id} Waiting/pool mismatch"));
            }
            let paired = self.pairs.contains_key(id);
            if (entry.state == PeerState::Paired) != paired {
                return Err(format!("{id} Paired/pair-table mismatch"));
            }
        }
        for (a, b) in &self.pairs {
            if a == b {
                return Err(format!("{a} is paired with itself"));
            }
            if self.pairs.get(b) != Some(a) {
                return Err(format!("pair {a} -> {b} is not symmetric"));
            }
            if !self.peers.contains_key(a) {
                return Err(format!("{a} is paired but not registered"));
            }
        }
        Ok(())
    }
}
