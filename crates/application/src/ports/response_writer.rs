use dns_bridge_domain::DomainError;
use hickory_proto::op::Message;
use std::net::IpAddr;

/// Sink a [`DnsEngine`](super::DnsEngine) writes its answer into.
///
/// An engine is expected to call [`write_msg`](Self::write_msg) or
/// [`write`](Self::write) exactly once per request. Implementations that are
/// not backed by a real connection treat the connection-level operations
/// (`close`, `hijack`, TSIG hooks) as no-ops.
pub trait ResponseWriter: Send {
    fn local_addr(&self) -> IpAddr;

    fn remote_addr(&self) -> IpAddr;

    fn write_msg(&mut self, message: Message) -> Result<(), DomainError>;

    /// Writes an already-encoded answer. Returns the number of bytes consumed.
    fn write(&mut self, bytes: &[u8]) -> Result<usize, DomainError>;

    fn close(&mut self) -> Result<(), DomainError>;

    fn tsig_status(&self) -> Result<(), DomainError>;

    fn tsig_timers_only(&mut self, timers_only: bool);

    fn hijack(&mut self);
}
