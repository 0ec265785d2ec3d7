use std::sync::Arc;

use super::config::{GateSettings, SsoConfig};
use super::error::GateError;
use super::redirect::RedirectPolicy;
use crate::client::AuthClient;

/// Shared state for the [`enforce_sso`](super::enforce_sso) middleware.
///
/// Holds configuration only; all per-client state lives in the session and
/// in cookies, so one gate is cloned into every request.
#[derive(Debug, Clone)]
pub struct SsoGate {
    pub(super) client: Arc<AuthClient>,
    pub(super) redirect: Arc<RedirectPolicy>,
    pub(super) settings: Arc<GateSettings>,
}

impl SsoGate {
    /// Build the gate, validating the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::Config`] if the application host or origin URI
    /// cannot form a valid callback URL.
    pub fn new(config: SsoConfig) -> Result<Self, GateError> {
        let redirect =
            RedirectPolicy::new(config.login_url, config.app_host, &config.settings.origin_uri)?;

        tracing::info!(
            origin = %redirect.origin_url(),
            verify = %config.client.verify_url(),
            "SSO gate configured"
        );

        Ok(Self {
            client: Arc::new(config.client),
            redirect: Arc::new(redirect),
            settings: Arc::new(config.settings),
        })
    }

    /// Redirect policy derived from the configuration.
    #[must_use]
    pub fn redirect_policy(&self) -> &RedirectPolicy {
        &self.redirect
    }
}
