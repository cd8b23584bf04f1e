//! Error types for the protocol layer.

/// Errors that can occur while encoding, decoding, or validating messages.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (malformed JSON, missing fields, wrong types).
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// A move token outside the legal set (rock/paper/scissors).
    ///
    /// Rejected here, at the boundary — the rules engine only ever sees
    /// the three legal moves.
    #[error("invalid move token: {0:?}")]
    InvalidMove(String),

    /// A message that decodes but violates protocol rules.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
