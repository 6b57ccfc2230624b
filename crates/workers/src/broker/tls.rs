use std::fs;

use tonic::transport::{Certificate, ClientTlsConfig, Identity};

use crate::config::BrokerConfig;

/// PEM material for the broker connection, read once at startup.
pub struct TlsIdentity {
    pub ca_pem: Option<Vec<u8>>,
    pub client: Option<(Vec<u8>, Vec<u8>)>,
    pub server_name: Option<String>,
}

impl TlsIdentity {
    pub fn load(config: &BrokerConfig) -> Result<Self, TlsLoadError> {
        let ca_pem = config
            .ca_cert
            .as_ref()
            .map(|p| fs::read(p).map_err(|e| TlsLoadError(format!("ca {}: {e}", p.display()))))
            .transpose()?;

        let client = match (&config.client_cert, &config.client_key) {
            (Some(cert), Some(key)) => {
                let cert_pem = fs::read(cert)
                    .map_err(|e| TlsLoadError(format!("cert {}: {e}", cert.display())))?;
                let key_pem = fs::read(key)
                    .map_err(|e| TlsLoadError(format!("key {}: {e}", key.display())))?;
                Some((cert_pem, key_pem))
            }
            (None, None) => None,
            _ => {
                return Err(TlsLoadError(
                    "client certificate and key must be configured together".into(),
                ))
            }
        };

        Ok(Self {
            ca_pem,
            client,
            server_name: config.server_name.clone(),
        })
    }

    /// Native roots unless a CA file is configured; mTLS when a client pair is present.
    pub fn tonic_client_tls(&self) -> ClientTlsConfig {
        let mut tls = ClientTlsConfig::new();
        tls = match &self.ca_pem {
            Some(ca) => tls.ca_certificate(Certificate::from_pem(ca)),
            None => tls.with_native_roots(),
        };
        if let Some((cert, key)) = &self.client {
            tls = tls.identity(Identity::from_pem(cert, key));
        }
        if let Some(name) = &self.server_name {
            tls = tls.domain_name(name.clone());
        }
        tls
    }
}

#[derive(Debug, thiserror::Error)]
#[error("TLS: {0}")]
pub struct TlsLoadError(pub String);
