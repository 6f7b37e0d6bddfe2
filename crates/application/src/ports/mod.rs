mod dns_engine;
mod response_writer;

pub use dns_engine::DnsEngine;
pub use response_writer::ResponseWriter;
