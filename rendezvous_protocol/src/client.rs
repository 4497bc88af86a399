use serde::Deserialize;
use std::str::FromStr;
use thiserror::Error;

/// Errors from decoding a client frame
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// Not a JSON object with a string `type`
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Signaling kinds the server relays between partners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    Offer,
    Answer,
    IceCandidate,
}

impl SignalKind {
    pub fn from_type(kind: &str) -> Option<Self> {
        match kind {
            "offer" => Some(Self::Offer),
            "answer" => Some(Self::Answer),
            "ice-candidate" => Some(Self::IceCandidate),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Offer => "offer",
            Self::Answer => "answer",
            Self::IceCandidate => "ice-candidate",
        }
    }
}

/// The outer shape of a client frame.
///
/// Only the discriminator is decoded; payload fields are left untouched so the
/// original text can be forwarded as-is.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientEnvelope {
    #[serde(rename = "type")]
    pub kind: String,
}

impl ClientEnvelope {
    /// `None` for kinds the server does not relay
    pub fn signal(&self) -> Option<SignalKind> {
        SignalKind::from_type(&self.kind)
    }
}

impl FromStr for ClientEnvelope {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(serde_json::from_str(s)?)
    }
}
