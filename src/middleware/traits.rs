use std::future::Future;

use crate::types::Identity;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Per-client server-side session holding at most one [`Identity`].
///
/// The gate only reads and overwrites the identity; creating, expiring and
/// destroying sessions belongs to the surrounding session infrastructure.
/// An implementation for [`tower_sessions::Session`] is provided.
///
/// # Example
///
/// ```rust,ignore
/// impl SessionStore for MySession {
///     async fn identity(&self, key: &str) -> Result<Option<Identity>, BoxError> {
///         Ok(self.attributes.get(key).cloned())
///     }
///
///     async fn set_identity(&self, key: &str, identity: Identity) -> Result<(), BoxError> {
///         self.attributes.insert(key, identity);
///         Ok(())
///     }
/// }
/// ```
pub trait SessionStore: Send + Sync {
    /// Read the identity stored under `key`.
    fn identity(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<Identity>, BoxError>> + Send;

    /// Store `identity` under `key`, replacing any previous value.
    fn set_identity(
        &self,
        key: &str,
        identity: Identity,
    ) -> impl Future<Output = Result<(), BoxError>> + Send;
}

impl SessionStore for tower_sessions::Session {
    /// A value under `key` that is not an [`Identity`] reads as absent, so the
    /// client is sent to login and the next verification overwrites it.
    async fn identity(&self, key: &str) -> Result<Option<Identity>, BoxError> {
        match self.get::<Identity>(key).await {
            Ok(identity) => Ok(identity),
            Err(tower_sessions::session::Error::SerdeJson(e)) => {
                tracing::warn!(key, error = %e, "Discarding undecodable session identity");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn set_identity(&self, key: &str, identity: Identity) -> Result<(), BoxError> {
        Ok(self.insert(key, identity).await?)
    }
}
