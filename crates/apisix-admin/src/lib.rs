// apisix-admin: Async Rust client for the Apache APISIX Admin API

pub mod admin;
pub mod error;
pub mod transport;

pub use admin::AdminClient;
pub use admin::metadata::PluginMetadata;
pub use admin::secret::{AwsSecret, GcpAuthConfig, GcpSecret, Secret, SecretManager, VaultSecret};
pub use admin::types as admin_types;
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
