//! Unified error type for the server crate.

use fracas_protocol::ProtocolError;
use fracas_room::RoomError;
use tokio_tungstenite::tungstenite;

/// Top-level error wrapping the transport, protocol, and room layers.
///
/// The `#[from]` variants let `?` convert sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum FracasError {
    /// Binding the listener failed.
    #[error("bind failed: {0}")]
    Bind(#[source] std::io::Error),

    /// Accepting a TCP connection failed.
    #[error("accept failed: {0}")]
    Accept(#[source] std::io::Error),

    /// The websocket handshake on a freshly accepted socket failed.
    #[error("websocket handshake failed: {0}")]
    Handshake(#[source] tungstenite::Error),

    /// Writing a frame to a peer failed.
    #[error("send failed: {0}")]
    Send(#[source] tungstenite::Error),

    /// Reading a frame from a peer failed.
    #[error("receive failed: {0}")]
    Receive(#[source] tungstenite::Error),

    /// An encode/decode or message-validation error.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A room-level error (turn violation, terminal room, dead actor).
    #[error(transparent)]
    Room(#[from] RoomError),
}
