mod connection;
pub mod proto;
pub mod server;
pub mod service;
pub mod tls;

pub use connection::BridgeConnection;
pub use proto::DnsPacket;
pub use server::BridgeServer;
pub use service::GrpcDnsService;
