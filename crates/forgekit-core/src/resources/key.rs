// SSH key lifecycle with optional overwrite.
//
// Forge rejects a key whose name is already in use on the server and offers
// no create-or-replace call. With overwrite enabled, the first collision
// triggers: find the existing key by name, delete it, let the deletion
// settle, then create once more. A second collision is final.

use tracing::{debug, info, warn};

use forgekit_api::models::{CreateKey, Key};
use forgekit_api::{KeyId, ServerId};

use crate::error::CoreError;
use crate::reconciler::{Reconciler, absent_on_404};

impl Reconciler {
    pub async fn create_key(
        &self,
        server: ServerId,
        req: &CreateKey,
        overwrite: bool,
    ) -> Result<Key, CoreError> {
        info!(%server, name = %req.name, overwrite, "creating ssh key");
        let mut may_retry = overwrite;
        loop {
            match self.client.create_key(server, req).await {
                Ok(key) => return Ok(key),
                Err(e) if may_retry && e.is_name_taken() => {
                    may_retry = false;
                    warn!(%server, name = %req.name, "key name already taken, replacing existing key");
                    self.remove_key_named(server, &req.name).await?;
                    debug!(settle_secs = self.waits.key_settle.as_secs(), "waiting for deletion to settle");
                    tokio::time::sleep(self.waits.key_settle).await;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Delete the first key named exactly `name`. No match is not an error.
    async fn remove_key_named(&self, server: ServerId, name: &str) -> Result<(), CoreError> {
        match self.client.find_key_by_name(server, name).await? {
            Some(existing) => {
                debug!(%server, key = %existing.id, "deleting colliding key");
                self.client.delete_key(server, existing.id).await?;
            }
            None => debug!(%server, name, "no key with that name to delete"),
        }
        Ok(())
    }

    pub async fn read_key(&self, server: ServerId, key: KeyId) -> Result<Option<Key>, CoreError> {
        absent_on_404(self.client.get_key(server, key).await)
    }

    pub async fn delete_key(&self, server: ServerId, key: KeyId) -> Result<(), CoreError> {
        info!(%server, %key, "deleting ssh key");
        Ok(self.client.delete_key(server, key).await?)
    }
}
