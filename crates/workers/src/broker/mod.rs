mod channel;
mod link_client;
mod tls;

pub use channel::{BrokerEndpoint, SecretChannel, TransportSecurity};
pub use link_client::{Credentials, LinkClient, Template, DEFAULT_TIMEOUT};
pub use tls::{TlsIdentity, TlsLoadError};
