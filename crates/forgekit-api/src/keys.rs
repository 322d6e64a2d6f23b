// SSH key endpoints, scoped under a server.
//
// Forge has no search endpoint for keys; name lookups list every key on the
// server and scan.

use tracing::debug;

use crate::client::ForgeClient;
use crate::error::Error;
use crate::ids::{KeyId, ServerId};
use crate::models::{CreateKey, Key, KeyEnvelope, KeyList};

impl ForgeClient {
    /// `GET /servers/{server}/keys/{key}`
    pub async fn get_key(&self, server: ServerId, key: KeyId) -> Result<Key, Error> {
        debug!(%server, %key, "fetching key");
        let env: KeyEnvelope = self.get(&format!("servers/{server}/keys/{key}")).await?;
        Ok(env.key)
    }

    /// `GET /servers/{server}/keys`
    pub async fn list_keys(&self, server: ServerId) -> Result<Vec<Key>, Error> {
        debug!(%server, "listing keys");
        let list: KeyList = self.get(&format!("servers/{server}/keys")).await?;
        Ok(list.keys)
    }

    /// First key whose name matches exactly, if any.
    pub async fn find_key_by_name(&self, server: ServerId, name: &str) -> Result<Option<Key>, Error> {
        let keys = self.list_keys(server).await?;
        Ok(keys.into_iter().find(|k| k.name == name))
    }

    /// `POST /servers/{server}/keys`
    pub async fn create_key(&self, server: ServerId, req: &CreateKey) -> Result<Key, Error> {
        debug!(%server, name = %req.name, "creating key");
        let env: KeyEnvelope = self.post(&format!("servers/{server}/keys"), req).await?;
        Ok(env.key)
    }

    /// `DELETE /servers/{server}/keys/{key}`
    pub async fn delete_key(&self, server: ServerId, key: KeyId) -> Result<(), Error> {
        debug!(%server, %key, "deleting key");
        self.delete(&format!("servers/{server}/keys/{key}")).await
    }
}
