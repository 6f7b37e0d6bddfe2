//! Wire envelope of the `coredns.dns.DnsService` RPC.
//!
//! ```proto
//! package coredns.dns;
//! message DnsPacket { bytes msg = 1; }
//! service DnsService { rpc Query (DnsPacket) returns (DnsPacket); }
//! ```

/// A single wire-encoded DNS message, used for both request and response.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DnsPacket {
    #[prost(bytes = "vec", tag = "1")]
    pub msg: ::prost::alloc::vec::Vec<u8>,
}

include!(concat!(env!("OUT_DIR"), "/coredns.dns.DnsService.rs"));
