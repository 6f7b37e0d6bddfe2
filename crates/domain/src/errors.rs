use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Malformed DNS request: {0}")]
    MalformedRequest(String),

    #[error("Malformed DNS response: {0}")]
    MalformedResponse(String),

    #[error("Could not find peer in call metadata")]
    MissingPeer,

    #[error("Peer address is not an IP transport address: {0}")]
    NonIpPeer(String),

    #[error("DNS engine produced no answer")]
    NoAnswer,

    #[error("Failed to encode DNS response: {0}")]
    EncodeResponse(String),

    #[error("Failed to bind {addr}: {reason}")]
    Bind { addr: String, reason: String },

    #[error("TLS configuration error: {0}")]
    Tls(String),

    #[error("Bridge server is already running")]
    AlreadyRunning,
}

impl DomainError {
    /// Errors caused by the calling client rather than the bridge or its engine.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedRequest(_) | Self::MissingPeer | Self::NonIpPeer(_)
        )
    }
}
