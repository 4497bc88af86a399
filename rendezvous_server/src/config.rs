//! Command-line and environment configuration

use crate::error::SignalingError;
use crate::policy::AdmissionPolicy;
use clap::Parser;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Port used when neither `--port` nor `PORT` is given
pub const DEFAULT_PORT: u16 = 8080;

/// Undelivered relayed frames allowed per connection when not overridden
pub const DEFAULT_OUTBOUND_QUEUE: usize = 64;

/// Admission preset
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    /// Unlimited admission, FIFO pairing, survivors are requeued
    #[default]
    Lobby,
    /// Two-party room: at most two clients, departures are broadcast
    Room,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Resolved server configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub policy: AdmissionPolicy,
    pub outbound_queue: usize,
    pub log_level: LogLevel,
}

impl Config {
    /// Parse from the process arguments and environment, exiting with usage on error
    pub fn parse() -> Result<Self, SignalingError> {
        Self::from_args(Args::parse())
    }

    /// Parse from an explicit argument list
    pub fn try_parse_from<I, T>(args: I) -> Result<Self, SignalingError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let args = Args::try_parse_from(args).map_err(|e| SignalingError::Config(e.to_string()))?;
        Self::from_args(args)
    }

    fn from_args(args: Args) -> Result<Self, SignalingError> {
        let mut policy = match args.mode {
            Mode::Lobby => AdmissionPolicy::lobby(),
            Mode::Room => AdmissionPolicy::room(),
        };

        match args.capacity {
            Some(0) => policy.capacity = None,
            Some(1) => {
                return Err(SignalingError::Config(
                    "capacity must be 0 (unlimited) or at least 2".to_string(),
                ));
            }
            Some(n) => policy.capacity = Some(n),
            None => {}
        }

        if let Some(requeue) = args.requeue_on_disconnect {
            policy.requeue_on_disconnect = requeue;
        }

        if args.outbound_queue < 2 {
            return Err(SignalingError::Config(
                "outbound queue depth must be at least 2".to_string(),
            ));
        }

        Ok(Self {
            listen_addr: SocketAddr::from((args.host, args.port)),
            policy,
            outbound_queue: args.outbound_queue,
            log_level: args.log_level,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)),
            policy: AdmissionPolicy::default(),
            outbound_queue: DEFAULT_OUTBOUND_QUEUE,
            log_level: LogLevel::default(),
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "rendezvous-signaling",
    version,
    about = "Pairs WebRTC peers and relays their signaling"
)]
struct Args {
    // IPv4 or IPv6 literal.
    #[arg(long = "host", short = 'H', env = "RENDEZVOUS_HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    host: IpAddr,

    #[arg(long = "port", short = 'p', env = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    #[arg(long = "mode", env = "RENDEZVOUS_MODE", value_enum, default_value_t = Mode::Lobby)]
    mode: Mode,

    // Overrides the preset; 0 means unlimited.
    #[arg(long = "capacity", env = "RENDEZVOUS_CAPACITY")]
    capacity: Option<usize>,

    // Overrides the preset.
    #[arg(long = "requeue-on-disconnect", env = "RENDEZVOUS_REQUEUE")]
    requeue_on_disconnect: Option<bool>,

    #[arg(long = "outbound-queue", default_value_t = DEFAULT_OUTBOUND_QUEUE)]
    outbound_queue: usize,

    #[arg(long = "log", value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Config, SignalingError> {
        Config::try_parse_from(std::iter::once("rendezvous-signaling").chain(args.iter().copied()))
    }

    #[test]
    fn lobby_is_unlimited_and_requeues() {
        let cfg = parse(&["--mode", "lobby", "--port", "9000"]).unwrap();
        assert_eq!(cfg.policy, AdmissionPolicy::lobby());
        assert_eq!(cfg.listen_addr.port(), 9000);
    }

    #[test]
    fn room_preset_caps_at_two() {
        let cfg = parse(&["--mode", "room"]).unwrap();
        assert_eq!(cfg.policy.capacity, Some(2));
        assert!(!cfg.policy.requeue_on_disconnect);
    }

    #[test]
    fn overrides_apply_on_top_of_preset() {
        let cfg = parse(&[
            "--mode",
            "room",
            "--capacity",
            "0",
            "--requeue-on-disconnect",
            "true",
        ])
        .unwrap();
        assert_eq!(cfg.policy.capacity, None);
        assert!(cfg.policy.requeue_on_disconnect);
    }

    #[test]
    fn capacity_of_one_is_rejected() {
        assert!(matches!(
            parse(&["--capacity", "1"]),
            Err(SignalingError::Config(_))
        ));
    }

    #[test]
    fn tiny_queue_is_rejected() {
        assert!(parse(&["--outbound-queue", "0"]).is_err());
        assert!(parse(&["--outbound-queue", "1"]).is_err());
        assert_eq!(parse(&["--outbound-queue", "2"]).unwrap().outbound_queue, 2);
    }

    #[test]
    fn log_level_names() {
        let cfg = parse(&["--log", "debug"]).unwrap();
        assert_eq!(cfg.log_level.as_str(), "debug");
    }
}
