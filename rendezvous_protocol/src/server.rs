use crate::PeerId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Notifications the server pushes to a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// Admission acknowledgment
    #[serde(rename = "connection", rename_all = "camelCase")]
    Connection {
        id: PeerId,
        total_clients: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },

    /// A partner was found; both sides may start negotiating
    #[serde(rename = "paired")]
    Paired { message: String },

    /// Same as `Paired`, in the two-party room vocabulary
    #[serde(rename = "ready")]
    Ready,

    /// The partner went away and this client is back in the waiting pool
    #[serde(rename = "partnerLeft")]
    PartnerLeft { message: String },

    /// Someone in the room went away
    #[serde(rename = "disconnected")]
    Disconnected,

    /// Admission was refused
    #[serde(rename = "error")]
    Error { message: String },
}

impl ServerMessage {
    pub fn room_full() -> Self {
        Self::Error {
            message: "Room is full".to_string(),
        }
    }
}

impl fmt::Display for ServerMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use uuid::Uuid;

    fn as_value(msg: &ServerMessage) -> Value {
        serde_json::from_str(&msg.to_string()).unwrap()
    }

    #[test]
    fn connection_uses_camel_case_total() {
        let msg = ServerMessage::Connection {
            id: PeerId(Uuid::nil()),
            total_clients: 1,
            message: None,
        };
        assert_eq!(
            as_value(&msg),
            json!({
                "type": "connection",
                "id": "00000000-0000-0000-0000-000000000000",
                "totalClients": 1,
            })
        );
    }

    #[test]
    fn unit_notices_carry_only_the_type() {
        assert_eq!(as_value(&ServerMessage::Ready), json!({"type": "ready"}));
        assert_eq!(
            as_value(&ServerMessage::Disconnected),
            json!({"type": "disconnected"})
        );
    }

    #[test]
    fn room_full_error() {
        assert_eq!(
            as_value(&ServerMessage::room_full()),
            json!({"type": "error", "message": "Room is full"})
        );
    }

    #[test]
    fn parses_back_what_clients_receive() {
        let parsed: ServerMessage =
            serde_json::from_str(r#"{"type":"partnerLeft","message":"bye"}"#).unwrap();
        assert_eq!(
            parsed,
            ServerMessage::PartnerLeft {
                message: "bye".to_string()
            }
        );
    }
}
