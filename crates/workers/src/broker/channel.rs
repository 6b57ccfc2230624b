use std::sync::Arc;

use courier_common::proto::thrippy_service_client::ThrippyServiceClient;
use tonic::transport::{Channel, ClientTlsConfig, Endpoint};

use super::tls::{TlsIdentity, TlsLoadError};
use crate::config::BrokerConfig;
use crate::metrics::worker_metrics::WorkerMetrics;

#[derive(Debug, Clone)]
pub enum TransportSecurity {
    Tls(ClientTlsConfig),
    /// Plaintext. Only ever selected by an explicit dev-mode opt-in.
    Insecure,
}

/// Where and how to reach the secret broker. Built once, shared by every call.
#[derive(Debug, Clone)]
pub struct BrokerEndpoint {
    uri: String,
    security: TransportSecurity,
}

impl BrokerEndpoint {
    pub fn from_config(config: &BrokerConfig, dev: bool) -> Result<Self, TlsLoadError> {
        if dev && !config.has_tls_files() {
            tracing::warn!(addr = %config.address, "secret broker connection is NOT encrypted (dev mode)");
            return Ok(Self::insecure(&config.address));
        }
        let identity = TlsIdentity::load(config)?;
        Ok(Self::tls(&config.address, identity.tonic_client_tls()))
    }

    pub fn tls(addr: &str, tls: ClientTlsConfig) -> Self {
        Self {
            uri: with_scheme(addr, "https"),
            security: TransportSecurity::Tls(tls),
        }
    }

    pub fn insecure(addr: &str) -> Self {
        Self {
            uri: with_scheme(addr, "http"),
            security: TransportSecurity::Insecure,
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn is_secure(&self) -> bool {
        matches!(self.security, TransportSecurity::Tls(_))
    }
}

fn with_scheme(addr: &str, scheme: &str) -> String {
    if addr.contains("://") {
        addr.to_string()
    } else {
        format!("{scheme}://{addr}")
    }
}

/// One connection to the secret broker, owned by a single request.
///
/// The connection closes when the handle is dropped, which happens on every
/// exit path of the owning call including cancellation.
pub struct SecretChannel {
    client: ThrippyServiceClient<Channel>,
    metrics: Arc<WorkerMetrics>,
}

impl SecretChannel {
    pub async fn open(
        endpoint: &BrokerEndpoint,
        metrics: &Arc<WorkerMetrics>,
    ) -> Result<Self, tonic::transport::Error> {
        let mut ep = Endpoint::from_shared(endpoint.uri.clone())?;
        if let TransportSecurity::Tls(tls) = &endpoint.security {
            ep = ep.tls_config(tls.clone())?;
        }
        let channel = ep.connect().await?;

        metrics.channel_opened();
        Ok(Self {
            client: ThrippyServiceClient::new(channel),
            metrics: Arc::clone(metrics),
        })
    }

    pub fn client(&mut self) -> &mut ThrippyServiceClient<Channel> {
        &mut self.client
    }
}

impl Drop for SecretChannel {
    fn drop(&mut self) {
        self.metrics.channel_released();
    }
}
