use super::tls_material::TlsMaterial;
use dns_bridge_infrastructure::grpc::proto::dns_service_client::DnsServiceClient;
use dns_bridge_infrastructure::grpc::DnsPacket;
use hickory_proto::op::Message;
use hickory_proto::rr::RecordType;
use hyper_util::rt::TokioIo;
use rustls::pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer, ServerName};
use rustls::{ClientConfig, RootCertStore};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tonic::transport::{Channel, Endpoint, Uri};

pub fn packet(message: &Message) -> DnsPacket {
    DnsPacket {
        msg: message.to_vec().unwrap(),
    }
}

pub fn query_packet(id: u16, name: &str) -> DnsPacket {
    packet(&super::build_query(id, name, RecordType::A))
}

pub async fn plaintext_client(addr: SocketAddr) -> DnsServiceClient<Channel> {
    DnsServiceClient::connect(format!("http://{}", addr))
        .await
        .unwrap()
}

/// Client that trusts `material`'s CA and talks h2 over TLS to `addr`,
/// presenting `localhost` as the server name.
pub async fn tls_client(addr: SocketAddr, material: &TlsMaterial) -> DnsServiceClient<Channel> {
    connect_tls(addr, client_config(material, None)).await
}

/// Like [`tls_client`], but offers a self-signed client certificate that no
/// configured CA issued.
pub async fn tls_client_with_foreign_cert(
    addr: SocketAddr,
    material: &TlsMaterial,
) -> DnsServiceClient<Channel> {
    let identity = rcgen::generate_simple_self_signed(vec!["stranger.test".to_string()]).unwrap();
    let chain = vec![identity.cert.der().clone()];
    let key = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(identity.key_pair.serialize_der()));

    connect_tls(addr, client_config(material, Some((chain, key)))).await
}

fn client_config(
    material: &TlsMaterial,
    identity: Option<(Vec<CertificateDer<'static>>, PrivateKeyDer<'static>)>,
) -> ClientConfig {
    let mut roots = RootCertStore::empty();
    roots.add(material.ca_der()).unwrap();

    let builder =
        ClientConfig::builder_with_provider(Arc::new(rustls::crypto::ring::default_provider()))
            .with_safe_default_protocol_versions()
            .unwrap()
            .with_root_certificates(roots);

    let mut config = match identity {
        Some((chain, key)) => builder.with_client_auth_cert(chain, key).unwrap(),
        None => builder.with_no_client_auth(),
    };
    config.alpn_protocols = vec![b"h2".to_vec()];
    config
}

async fn connect_tls(addr: SocketAddr, config: ClientConfig) -> DnsServiceClient<Channel> {
    let connector = TlsConnector::from(Arc::new(config));

    let channel = Endpoint::from_static("http://localhost")
        .connect_with_connector(tower::service_fn(move |_: Uri| {
            let connector = connector.clone();
            async move {
                let tcp = TcpStream::connect(addr).await?;
                let server_name = ServerName::try_from("localhost")
                    .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
                let tls = connector.connect(server_name, tcp).await?;
                Ok::<_, std::io::Error>(TokioIo::new(tls))
            }
        }))
        .await
        .unwrap();

    DnsServiceClient::new(channel)
}
