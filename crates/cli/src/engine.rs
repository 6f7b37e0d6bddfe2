use dns_bridge_application::ports::DnsEngine;
use dns_bridge_domain::Config;
use dns_bridge_infrastructure::engine::LocalRecordsEngine;
use std::sync::Arc;
use tracing::warn;

pub fn build_engine(config: &Config) -> anyhow::Result<Arc<dyn DnsEngine>> {
    let engine = LocalRecordsEngine::from_config(&config.local_records, &config.local_domain)?;
    if engine.is_empty() {
        warn!("No local records configured; every query will be answered NXDOMAIN");
    }
    Ok(Arc::new(engine))
}
