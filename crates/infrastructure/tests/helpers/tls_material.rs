use dns_bridge_domain::TlsConfig;
use rcgen::{BasicConstraints, Certificate, CertificateParams, IsCa, KeyPair};
use rustls::pki_types::CertificateDer;
use std::io::Write;
use tempfile::NamedTempFile;

/// A throwaway CA and a `localhost` leaf signed by it, written to temp files.
pub struct TlsMaterial {
    ca: Certificate,
    ca_file: NamedTempFile,
    cert_file: NamedTempFile,
    key_file: NamedTempFile,
}

impl TlsMaterial {
    pub fn generate() -> Self {
        let ca_key = KeyPair::generate().unwrap();
        let mut ca_params = CertificateParams::new(Vec::<String>::new()).unwrap();
        ca_params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
        let ca = ca_params.self_signed(&ca_key).unwrap();

        let leaf_key = KeyPair::generate().unwrap();
        let leaf = CertificateParams::new(vec!["localhost".to_string()])
            .unwrap()
            .signed_by(&leaf_key, &ca, &ca_key)
            .unwrap();

        Self {
            ca_file: pem_file(&ca.pem()),
            cert_file: pem_file(&leaf.pem()),
            key_file: pem_file(&leaf_key.serialize_pem()),
            ca,
        }
    }

    pub fn config(&self) -> TlsConfig {
        TlsConfig {
            cert_file: self.cert_file.path().to_path_buf(),
            key_file: self.key_file.path().to_path_buf(),
            ca_file: self.ca_file.path().to_path_buf(),
        }
    }

    pub fn ca_der(&self) -> CertificateDer<'static> {
        self.ca.der().clone()
    }
}

fn pem_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
