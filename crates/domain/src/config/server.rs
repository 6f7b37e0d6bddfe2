use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

/// Listen address used when none is configured and TLS is off.
pub const DEFAULT_PLAINTEXT_LISTEN: &str = ":80";
/// Listen address used when none is configured and TLS is on.
pub const DEFAULT_TLS_LISTEN: &str = ":443";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// `host:port`; an empty host (`:8053`) means every IPv4 interface.
    #[serde(default)]
    pub listen_address: Option<String>,

    #[serde(default)]
    pub tls: Option<TlsConfig>,

    #[serde(default = "default_shutdown_grace_secs")]
    pub shutdown_grace_secs: u64,

    #[serde(default = "default_handshake_timeout_secs")]
    pub handshake_timeout_secs: u64,
}

/// PEM material for the encrypted listener.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct TlsConfig {
    pub cert_file: PathBuf,
    pub key_file: PathBuf,
    pub ca_file: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: None,
            tls: None,
            shutdown_grace_secs: default_shutdown_grace_secs(),
            handshake_timeout_secs: default_handshake_timeout_secs(),
        }
    }
}

impl ServerConfig {
    pub fn new(listen_address: Option<String>, tls: Option<TlsConfig>) -> Self {
        Self {
            listen_address,
            tls,
            ..Self::default()
        }
    }

    pub fn tls_enabled(&self) -> bool {
        self.tls.is_some()
    }

    /// Configured address, or the conventional port for the transport in use.
    pub fn listen_address(&self) -> &str {
        match self.listen_address.as_deref() {
            Some(addr) if !addr.trim().is_empty() => addr.trim(),
            _ if self.tls_enabled() => DEFAULT_TLS_LISTEN,
            _ => DEFAULT_PLAINTEXT_LISTEN,
        }
    }

    /// Address handed to the socket layer.
    pub fn bind_address(&self) -> String {
        let addr = self.listen_address();
        if addr.starts_with(':') {
            format!("{}{}", Ipv4Addr::UNSPECIFIED, addr)
        } else {
            addr.to_string()
        }
    }

    /// IP reported to the engine as the bridge's own address: the configured
    /// host when it is an IP literal, else the unspecified address.
    pub fn local_ip(&self) -> IpAddr {
        self.bind_address()
            .parse::<SocketAddr>()
            .map(|addr| addr.ip())
            .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }

    pub fn handshake_timeout(&self) -> Duration {
        Duration::from_secs(self.handshake_timeout_secs)
    }
}

fn default_shutdown_grace_secs() -> u64 {
    5
}

fn default_handshake_timeout_secs() -> u64 {
    10
}
