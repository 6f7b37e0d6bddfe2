pub mod errors;
pub mod local_records;
pub mod logging;
pub mod root;
pub mod server;

pub use errors::ConfigError;
pub use local_records::LocalDnsRecord;
pub use logging::LoggingConfig;
pub use root::{CliOverrides, Config};
pub use server::{ServerConfig, TlsConfig, DEFAULT_PLAINTEXT_LISTEN, DEFAULT_TLS_LISTEN};
