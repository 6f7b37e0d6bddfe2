use super::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

const DEFAULT_LOCAL_TTL: u32 = 300;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LocalDnsRecord {
    pub hostname: String,

    #[serde(default)]
    pub domain: Option<String>,

    pub ip: String,

    pub record_type: String,

    #[serde(default)]
    pub ttl: Option<u32>,
}

impl LocalDnsRecord {
    pub fn fqdn(&self, default_domain: &Option<String>) -> String {
        if let Some(ref domain) = self.domain {
            format!("{}.{}", self.hostname, domain)
        } else if let Some(ref default) = default_domain {
            format!("{}.{}", self.hostname, default)
        } else {
            self.hostname.clone()
        }
    }

    pub fn ttl_or_default(&self) -> u32 {
        self.ttl.unwrap_or(DEFAULT_LOCAL_TTL)
    }

    /// Parses `ip` and checks it agrees with `record_type` (A ↔ IPv4, AAAA ↔ IPv6).
    pub fn address(&self) -> Result<IpAddr, ConfigError> {
        let ip: IpAddr = self.ip.parse().map_err(|_| {
            ConfigError::Validation(format!(
                "Local record '{}' has invalid IP '{}'",
                self.hostname, self.ip
            ))
        })?;

        let matches = match self.record_type.to_ascii_uppercase().as_str() {
            "A" => ip.is_ipv4(),
            "AAAA" => ip.is_ipv6(),
            other => {
                return Err(ConfigError::Validation(format!(
                    "Local record '{}' has unsupported type '{}'",
                    self.hostname, other
                )))
            }
        };

        if !matches {
            return Err(ConfigError::Validation(format!(
                "Local record '{}': {} does not match type {}",
                self.hostname, self.ip, self.record_type
            )));
        }
        Ok(ip)
    }
}
