use async_trait::async_trait;
use dns_bridge_application::ports::{DnsEngine, ResponseWriter};
use dns_bridge_domain::config::ConfigError;
use dns_bridge_domain::LocalDnsRecord;
use hickory_proto::op::{Message, MessageType, OpCode, ResponseCode};
use hickory_proto::rr::rdata::{A, AAAA};
use hickory_proto::rr::{RData, Record, RecordType};
use std::collections::HashMap;
use std::net::IpAddr;
use tracing::{debug, error, info};

#[derive(Debug, Clone)]
struct LocalEntry {
    address: IpAddr,
    ttl: u32,
}

impl LocalEntry {
    fn record_type(&self) -> RecordType {
        match self.address {
            IpAddr::V4(_) => RecordType::A,
            IpAddr::V6(_) => RecordType::AAAA,
        }
    }

    fn rdata(&self) -> RData {
        match self.address {
            IpAddr::V4(ip) => RData::A(A(ip)),
            IpAddr::V6(ip) => RData::AAAA(AAAA(ip)),
        }
    }
}

/// Authoritative answers for a fixed set of A/AAAA records.
///
/// Names are matched case-insensitively without the trailing dot.
pub struct LocalRecordsEngine {
    records: HashMap<String, Vec<LocalEntry>>,
}

impl LocalRecordsEngine {
    pub fn from_config(
        records: &[LocalDnsRecord],
        default_domain: &Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut map: HashMap<String, Vec<LocalEntry>> = HashMap::new();

        for record in records {
            let address = record.address()?;
            map.entry(normalize_name(&record.fqdn(default_domain)))
                .or_default()
                .push(LocalEntry {
                    address,
                    ttl: record.ttl_or_default(),
                });
        }

        info!(names = map.len(), records = records.len(), "Local records loaded");
        Ok(Self { records: map })
    }

    pub fn len(&self) -> usize {
        self.records.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn respond(&self, request: &Message) -> Message {
        let mut response = Message::new();
        response
            .set_id(request.id())
            .set_message_type(MessageType::Response)
            .set_op_code(request.op_code())
            .set_recursion_desired(request.recursion_desired())
            .set_authoritative(true)
            .add_queries(request.queries().to_vec());

        if request.op_code() != OpCode::Query {
            response.set_response_code(ResponseCode::NotImp);
            return response;
        }

        let Some(query) = request.queries().first() else {
            response.set_response_code(ResponseCode::FormErr);
            return response;
        };

        let name = normalize_name(&query.name().to_ascii());
        let Some(entries) = self.records.get(&name) else {
            debug!(name = %name, "No local record (NXDOMAIN)");
            response.set_response_code(ResponseCode::NXDomain);
            return response;
        };

        let answers: Vec<Record> = entries
            .iter()
            .filter(|entry| {
                query.query_type() == RecordType::ANY || entry.record_type() == query.query_type()
            })
            .map(|entry| Record::from_rdata(query.name().clone(), entry.ttl, entry.rdata()))
            .collect();

        debug!(name = %name, answers = answers.len(), "Answering from local records");
        response
            .set_response_code(ResponseCode::NoError)
            .add_answers(answers);
        response
    }
}

#[async_trait]
impl DnsEngine for LocalRecordsEngine {
    async fn serve_dns(&self, writer: &mut dyn ResponseWriter, request: &Message) {
        let response = self.respond(request);
        if let Err(e) = writer.write_msg(response) {
            error!(error = %e, client = %writer.remote_addr(), "Failed to write response");
        }
    }
}

fn normalize_name(name: &str) -> String {
    name.trim_end_matches('.').to_ascii_lowercase()
}
