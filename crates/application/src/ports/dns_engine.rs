use super::ResponseWriter;
use async_trait::async_trait;
use hickory_proto::op::Message;

/// Resolution backend driven by the bridge.
///
/// `serve_dns` must write exactly one answer into `writer` before returning.
/// Errors are expressed in-band (SERVFAIL, REFUSED, ...) in the written
/// message; an engine that writes nothing is treated as a contract violation
/// by the caller.
#[async_trait]
pub trait DnsEngine: Send + Sync {
    async fn serve_dns(&self, writer: &mut dyn ResponseWriter, request: &Message);
}
