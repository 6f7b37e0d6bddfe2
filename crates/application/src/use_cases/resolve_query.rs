use crate::ports::DnsEngine;
use crate::services::ResponseCapture;
use dns_bridge_domain::{CallMetadata, DomainError};
use hickory_proto::op::Message;
use std::net::IpAddr;
use std::sync::Arc;
use tracing::{debug, warn};

/// Runs one wire-encoded DNS query through a [`DnsEngine`] and returns the
/// wire-encoded answer.
pub struct ResolveQueryUseCase {
    engine: Arc<dyn DnsEngine>,
    local_ip: IpAddr,
}

impl ResolveQueryUseCase {
    pub fn new(engine: Arc<dyn DnsEngine>, local_ip: IpAddr) -> Self {
        Self { engine, local_ip }
    }

    pub async fn execute(
        &self,
        raw_request: &[u8],
        metadata: &CallMetadata,
    ) -> Result<Vec<u8>, DomainError> {
        let request = Message::from_vec(raw_request).map_err(|e| {
            debug!(error = %e, len = raw_request.len(), "Rejecting undecodable request");
            DomainError::MalformedRequest(e.to_string())
        })?;

        let remote_ip = metadata.client_ip().inspect_err(|e| {
            warn!(error = %e, id = request.id(), "Rejecting call without an IP peer");
        })?;

        if let Some(query) = request.queries().first() {
            debug!(
                id = request.id(),
                client = %remote_ip,
                name = %query.name(),
                record_type = ?query.query_type(),
                "Dispatching query to engine"
            );
        }

        let mut capture = ResponseCapture::new(self.local_ip, remote_ip);
        self.engine.serve_dns(&mut capture, &request).await;

        let answer = capture.into_message().ok_or_else(|| {
            warn!(id = request.id(), client = %remote_ip, "Engine produced no answer");
            DomainError::NoAnswer
        })?;

        answer
            .to_vec()
            .map_err(|e| DomainError::EncodeResponse(e.to_string()))
    }
}
