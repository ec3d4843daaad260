use thiserror::Error;

use crate::sounds::keys::ConfigurableSound;

/// Failures of the sound pipeline, from token assembly to decode.
#[derive(Debug, Error)]
pub enum SoundError {
    /// Numbers outside 1..=69 have no recorded decomposition.
    #[error("number {0} cannot be spoken, supported range is 1 to 69")]
    NumberOutOfRange(i64),
    /// A required configurable sound is not assigned to the event.
    #[error("required sound '{missing}' is not configured for this event")]
    InvalidConfiguration { missing: ConfigurableSound },
    #[error("failed to fetch '{path}': {reason}")]
    Fetch { path: String, reason: String },
    #[error("failed to decode '{path}': {reason}")]
    Decode { path: String, reason: String },
    #[error("decoded clip '{0}' contains no audio")]
    EmptyClip(String),
}

/// Reasons a protocol request is rejected. The Display form is what
/// goes back to the caller in the reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("Event not found")]
    EventNotFound,
    #[error("Not connected to any event")]
    NotInEvent,
    #[error("No session attached to this connection")]
    NoSession,
    #[error("Session is no longer valid")]
    InvalidSession,
    #[error("Missing permission for this event")]
    MissingPermission,
    #[error("Store unavailable")]
    StoreUnavailable,
}

/// Announcer-side connection failures.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("websocket error: {0}")]
    Ws(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("hub closed the connection")]
    ConnectionClosed,
    #[error("join rejected: {0}")]
    JoinRejected(String),
}
