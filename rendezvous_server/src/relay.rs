//! Verbatim forwarding between the two members of a pair

use crate::state::SessionState;
use rendezvous_protocol::PeerId;

/// What became of a relayed frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayOutcome {
    /// Queued on the partner's socket
    Forwarded(PeerId),
    /// Sender is not paired (waiting, detached or already gone)
    NoPartner,
    /// Partner is closing or its queue is full; the frame was dropped
    PartnerUnreachable(PeerId),
}

/// Queue `text` for `from`'s current partner without touching its content
pub fn relay(state: &SessionState, from: &PeerId, text: &str) -> RelayOutcome {
    let Some(partner) = state.partner_of(from) else {
        return RelayOutcome::NoPartner;
    };
    let delivered = state
        .outbox(&partner)
        .is_some_and(|o| !o.is_closed() && o.relay(text));
    if delivered {
        RelayOutcome::Forwarded(partner)
    } else {
        RelayOutcome::PartnerUnreachable(partner)
    }
}
