use async_trait::async_trait;
use dns_bridge_application::ports::{DnsEngine, ResponseWriter};
use hickory_proto::op::{Message, MessageType, OpCode, Query, ResponseCode};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{Name, RData, Record, RecordType};
use std::net::{IpAddr, Ipv4Addr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::Notify;

pub fn build_query(id: u16, name: &str, record_type: RecordType) -> Message {
    let mut message = Message::new();
    message
        .set_id(id)
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(true)
        .add_query(Query::query(Name::from_ascii(name).unwrap(), record_type));
    message
}

pub fn a_answer(request: &Message, ip: Ipv4Addr, ttl: u32) -> Message {
    let mut response = Message::new();
    response
        .set_id(request.id())
        .set_message_type(MessageType::Response)
        .set_op_code(request.op_code())
        .set_recursion_desired(request.recursion_desired())
        .set_response_code(ResponseCode::NoError)
        .add_queries(request.queries().to_vec());

    if let Some(query) = request.queries().first() {
        response.add_answer(Record::from_rdata(
            query.name().clone(),
            ttl,
            RData::A(A(ip)),
        ));
    }
    response
}

/// Answers every query with a single A record.
pub struct FixedAnswerEngine {
    pub ip: Ipv4Addr,
}

#[async_trait]
impl DnsEngine for FixedAnswerEngine {
    async fn serve_dns(&self, writer: &mut dyn ResponseWriter, request: &Message) {
        writer.write_msg(a_answer(request, self.ip, 300)).unwrap();
    }
}

/// Never writes anything.
pub struct SilentEngine;

#[async_trait]
impl DnsEngine for SilentEngine {
    async fn serve_dns(&self, _writer: &mut dyn ResponseWriter, _request: &Message) {}
}

/// Answers with an address derived from the request id and records the
/// `(local, remote)` pair of every call.
#[derive(Default)]
pub struct SpyEngine {
    calls: AtomicUsize,
    seen_addrs: Mutex<Vec<(IpAddr, IpAddr)>>,
}

impl SpyEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen_addrs(&self) -> Vec<(IpAddr, IpAddr)> {
        self.seen_addrs.lock().unwrap().clone()
    }

    pub fn tag_for(id: u16) -> Ipv4Addr {
        let [hi, lo] = id.to_be_bytes();
        Ipv4Addr::new(10, 88, hi, lo)
    }
}

#[async_trait]
impl DnsEngine for SpyEngine {
    async fn serve_dns(&self, writer: &mut dyn ResponseWriter, request: &Message) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen_addrs
            .lock()
            .unwrap()
            .push((writer.local_addr(), writer.remote_addr()));

        for _ in 0..(request.id() % 3) {
            tokio::task::yield_now().await;
        }
        writer
            .write_msg(a_answer(request, Self::tag_for(request.id()), 30))
            .unwrap();
    }
}

/// Signals when a call arrives, then never answers.
#[derive(Default)]
pub struct StuckEngine {
    pub entered: Notify,
}

#[async_trait]
impl DnsEngine for StuckEngine {
    async fn serve_dns(&self, _writer: &mut dyn ResponseWriter, _request: &Message) {
        self.entered.notify_one();
        std::future::pending::<()>().await;
    }
}
