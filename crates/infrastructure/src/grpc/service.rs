use super::proto::dns_service_server::DnsService;
use super::proto::DnsPacket;
use dns_bridge_application::use_cases::ResolveQueryUseCase;
use dns_bridge_domain::{CallMetadata, DomainError, PeerAddr};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tonic::{Request, Response, Status};
use tracing::{debug, error, field, info_span, warn, Instrument, Span};

/// `coredns.dns.DnsService` backed by a [`ResolveQueryUseCase`].
///
/// Cancelling the token passed to [`with_cancellation`](Self::with_cancellation)
/// cuts off every call still waiting on the engine with `UNAVAILABLE`.
#[derive(Clone)]
pub struct GrpcDnsService {
    use_case: Arc<ResolveQueryUseCase>,
    cancel: CancellationToken,
}

impl GrpcDnsService {
    pub fn new(use_case: Arc<ResolveQueryUseCase>) -> Self {
        Self {
            use_case,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }
}

#[tonic::async_trait]
impl DnsService for GrpcDnsService {
    async fn query(&self, request: Request<DnsPacket>) -> Result<Response<DnsPacket>, Status> {
        let metadata = call_metadata(&request);
        let packet = request.into_inner();
        let span = query_span(&metadata, &packet.msg);

        async move {
            let result = tokio::select! {
                result = self.use_case.execute(&packet.msg, &metadata) => result,
                _ = self.cancel.cancelled() => {
                    debug!("Query call cut off by shutdown");
                    return Err(Status::unavailable("DNS bridge is shutting down"));
                }
            };

            let msg = result.map_err(|e| {
                if e.is_client_error() {
                    warn!(error = %e, "Rejected query call");
                } else {
                    error!(error = %e, "Query call failed");
                }
                status_from_error(&e)
            })?;

            Ok(Response::new(DnsPacket { msg }))
        }
        .instrument(span)
        .await
    }
}

/// Span covering one `Query` call. The id is read straight from the DNS
/// header so it is present even for payloads that fail to decode.
pub fn query_span(metadata: &CallMetadata, payload: &[u8]) -> Span {
    let span = info_span!(
        "dns_query",
        peer = field::Empty,
        id = field::Empty,
        len = payload.len()
    );
    if let Some(peer) = &metadata.peer {
        span.record("peer", field::display(peer));
    }
    if let [hi, lo, ..] = payload {
        span.record("id", u16::from_be_bytes([*hi, *lo]));
    }
    span
}

/// Peer of a call: the [`PeerAddr`] our own connections attach, else the TCP
/// address tonic records for its built-in listeners.
pub fn call_metadata<T>(request: &Request<T>) -> CallMetadata {
    let peer = request
        .extensions()
        .get::<PeerAddr>()
        .cloned()
        .or_else(|| request.remote_addr().map(PeerAddr::Tcp));
    CallMetadata::new(peer)
}

pub fn status_from_error(err: &DomainError) -> Status {
    match err {
        DomainError::MalformedRequest(_) => Status::invalid_argument(err.to_string()),
        DomainError::MissingPeer | DomainError::NonIpPeer(_) => {
            Status::failed_precondition(err.to_string())
        }
        _ => Status::internal(err.to_string()),
    }
}
