//! Generates the `coredns.dns.DnsService` gRPC stubs. The message type is
//! declared by hand in `src/grpc/proto.rs`, so no `protoc` is required.

fn main() {
    let query = tonic_build::manual::Method::builder()
        .name("query")
        .route_name("Query")
        .input_type("crate::grpc::proto::DnsPacket")
        .output_type("crate::grpc::proto::DnsPacket")
        .codec_path("tonic::codec::ProstCodec")
        .build();

    let dns_service = tonic_build::manual::Service::builder()
        .name("DnsService")
        .package("coredns.dns")
        .method(query)
        .build();

    tonic_build::manual::Builder::new().compile(&[dns_service]);
}
