// forgekit-api: async client for the Laravel Forge server-management API

pub mod certificates;
pub mod client;
pub mod daemons;
pub mod error;
pub mod ids;
pub mod jobs;
pub mod keys;
pub mod models;
pub mod redirect_rules;
pub mod servers;
pub mod sites;
pub mod transport;

pub use client::{DEFAULT_BASE_URL, ForgeClient, RawResponse};
pub use error::Error;
pub use ids::{
    CertificateId, DaemonId, InvalidId, JobId, KeyId, RedirectRuleId, ServerId, SiteId,
};
pub use transport::TransportConfig;
