//! dns-bridge domain layer
pub mod config;
pub mod errors;
pub mod peer;

pub use config::{CliOverrides, Config, LocalDnsRecord, LoggingConfig, ServerConfig, TlsConfig};
pub use errors::DomainError;
pub use peer::{CallMetadata, PeerAddr};
