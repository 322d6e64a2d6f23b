// forgekit-core: reconciliation layer between plain resource attributes and
// the Forge API. Owns readiness polling, SSH-key overwrite, and the
// attribute mapping for every supported resource kind.

pub mod attributes;
pub mod config;
pub mod convert;
pub mod error;
pub mod reconciler;
pub mod resource;
pub mod resources;
pub mod wait;

pub use attributes::{AttributeValue, Attributes};
pub use config::ClientConfig;
pub use error::CoreError;
pub use reconciler::Reconciler;
pub use resource::ResourceKind;
pub use resources::{CertificateSource, JobFrequency, ProvisionedServer, ServerChanges, SiteChanges};
pub use wait::{WaitPhase, WaitPolicy, WaitSettings, wait_until};

pub use forgekit_api::{
    CertificateId, DEFAULT_BASE_URL, DaemonId, ForgeClient, JobId, KeyId, RedirectRuleId,
    ServerId, SiteId,
};
