//! Admission policy and the notification vocabulary that goes with it

use rendezvous_protocol::ServerMessage;

const WAITING_MESSAGE: &str = "Waiting for a partner...";
const PAIRED_MESSAGE: &str = "You've been paired with someone! You can start your call.";
const PARTNER_LEFT_MESSAGE: &str = "Your partner has disconnected. Waiting for a new partner...";

/// How connections are admitted and what happens to a survivor when its
/// partner leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdmissionPolicy {
    /// Maximum number of admitted live connections; `None` is unlimited
    pub capacity: Option<usize>,
    /// Tell the survivor of a broken pair it is waiting again (`partnerLeft`)
    /// rather than broadcasting `disconnected` to everyone. The survivor goes
    /// back into the pool either way.
    pub requeue_on_disconnect: bool,
}

impl AdmissionPolicy {
    /// Unlimited admission with FIFO requeue
    pub fn lobby() -> Self {
        Self {
            capacity: None,
            requeue_on_disconnect: true,
        }
    }

    /// Two-party room; extra clients are turned away
    pub fn room() -> Self {
        Self {
            capacity: Some(2),
            requeue_on_disconnect: false,
        }
    }

    pub fn is_full(&self, admitted: usize) -> bool {
        self.capacity.is_some_and(|cap| admitted >= cap)
    }

    pub(crate) fn welcome(&self) -> Option<String> {
        self.requeue_on_disconnect
            .then(|| WAITING_MESSAGE.to_string())
    }

    pub(crate) fn pair_notice(&self) -> ServerMessage {
        if self.requeue_on_disconnect {
            ServerMessage::Paired {
                message: PAIRED_MESSAGE.to_string(),
            }
        } else {
            ServerMessage::Ready
        }
    }

    pub(crate) fn partner_left_notice(&self) -> ServerMessage {
        if self.requeue_on_disconnect {
            ServerMessage::PartnerLeft {
                message: PARTNER_LEFT_MESSAGE.to_string(),
            }
        } else {
            ServerMessage::Disconnected
        }
    }
}

impl Default for AdmissionPolicy {
    fn default() -> Self {
        Self::lobby()
    }
}
