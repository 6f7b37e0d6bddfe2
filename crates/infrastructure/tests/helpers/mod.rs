#![allow(dead_code)]

mod clients;
mod engines;
mod tls_material;

pub use clients::{
    packet, plaintext_client, query_packet, tls_client, tls_client_with_foreign_cert,
};
pub use engines::{build_query, a_answer, FixedAnswerEngine, SilentEngine, SpyEngine, StuckEngine};
pub use tls_material::TlsMaterial;

use dns_bridge_domain::ServerConfig;

/// Plaintext config on an ephemeral loopback port.
pub fn loopback_config() -> ServerConfig {
    ServerConfig::new(Some("127.0.0.1:0".to_string()), None)
}
