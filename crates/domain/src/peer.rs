//! Transport peer of an inbound call and its narrowing to an IP address.

use crate::errors::DomainError;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// Where an inbound call came from, as reported by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeerAddr {
    Tcp(SocketAddr),
    /// Unix-domain socket peer; unnamed sockets carry no path.
    Unix(Option<String>),
    /// Any other transport, described by name.
    Other(String),
}

impl fmt::Display for PeerAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tcp(addr) => write!(f, "tcp://{}", addr),
            Self::Unix(Some(path)) => write!(f, "unix://{}", path),
            Self::Unix(None) => write!(f, "unix://(unnamed)"),
            Self::Other(desc) => write!(f, "{}", desc),
        }
    }
}

impl From<SocketAddr> for PeerAddr {
    fn from(addr: SocketAddr) -> Self {
        Self::Tcp(addr)
    }
}

/// Narrows a peer to its bare IP. Ports are dropped; non-IP transports are
/// rejected instead of being mapped to a placeholder address.
impl TryFrom<&PeerAddr> for IpAddr {
    type Error = DomainError;

    fn try_from(peer: &PeerAddr) -> Result<Self, Self::Error> {
        match peer {
            PeerAddr::Tcp(addr) => Ok(addr.ip()),
            other => Err(DomainError::NonIpPeer(other.to_string())),
        }
    }
}

/// Transport metadata attached to a single call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallMetadata {
    pub peer: Option<PeerAddr>,
}

impl CallMetadata {
    pub fn new(peer: Option<PeerAddr>) -> Self {
        Self { peer }
    }

    pub fn from_peer(peer: impl Into<PeerAddr>) -> Self {
        Self {
            peer: Some(peer.into()),
        }
    }

    pub fn client_ip(&self) -> Result<IpAddr, DomainError> {
        let peer = self.peer.as_ref().ok_or(DomainError::MissingPeer)?;
        IpAddr::try_from(peer)
    }
}
