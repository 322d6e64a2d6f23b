// Typed lifecycle operations, one file per resource family.
//
// Each file adds inherent methods to `Reconciler`. The attribute-level
// dispatch in `crate::resource` is built on top of these.

pub mod certificate;
pub mod daemon;
pub mod job;
pub mod key;
pub mod redirect_rule;
pub mod server;
pub mod site;

pub use certificate::CertificateSource;
pub use job::JobFrequency;
pub use server::{ProvisionedServer, ServerChanges};
pub use site::SiteChanges;
