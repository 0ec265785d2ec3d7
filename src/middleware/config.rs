use axum::http::HeaderName;
use url::Url;

use super::error::GateError;
use crate::client::AuthClient;

/// Shared gate settings used by both config and runtime state.
#[derive(Debug, Clone)]
pub(crate) struct GateSettings {
    pub(crate) origin_uri: String,
    pub(crate) bypass_prefixes: Vec<String>,
    pub(crate) ajax_header: HeaderName,
    pub(crate) ajax_value: String,
    pub(crate) token_param: String,
    pub(crate) link_cookie_name: String,
    pub(crate) pending_return_cookie_name: String,
    pub(crate) session_key: String,
    pub(crate) secure_cookies: bool,
    pub(crate) root_redirect: String,
}

impl GateSettings {
    fn defaults() -> Self {
        Self {
            origin_uri: "/sso/token".into(),
            bypass_prefixes: vec!["/static/".into(), "/api/".into()],
            ajax_header: HeaderName::from_static("x-requested-with"),
            ajax_value: "XMLHttpRequest".into(),
            token_param: "token".into(),
            link_cookie_name: "ssoid".into(),
            pending_return_cookie_name: "preurl".into(),
            session_key: "sso".into(),
            secure_cookies: true,
            root_redirect: "/".into(),
        }
    }
}

/// SSO gate configuration.
///
/// Required values (login endpoint, verification client, application host)
/// are constructor parameters. Everything else has a default matching the
/// identity provider's conventions and can be overridden with `with_*`.
///
/// Use [`from_env()`](SsoConfig::from_env) for convention-based setup,
/// or [`new()`](SsoConfig::new) with `with_*` methods for full control.
#[derive(Debug, Clone)]
pub struct SsoConfig {
    pub(super) client: AuthClient,
    pub(super) login_url: Url,
    pub(super) app_host: Url,
    pub(super) settings: GateSettings,
}

impl SsoConfig {
    /// Create config with the required endpoints.
    #[must_use]
    pub fn new(login_url: Url, client: AuthClient, app_host: Url) -> Self {
        Self {
            client,
            login_url,
            app_host,
            settings: GateSettings::defaults(),
        }
    }

    /// Create config from environment variables.
    ///
    /// # Required env vars
    /// - `SSO_LOGIN_URL`: identity provider login endpoint
    /// - `SSO_AUTH_URL`: token verification endpoint
    /// - `SSO_APP_HOST`: absolute base URL of this application
    ///
    /// # Optional env vars
    /// - `SSO_ORIGIN_URI`: token callback path (default `/sso/token`)
    /// - `SSO_BYPASS_PREFIXES`: comma-separated path prefixes that skip the gate
    /// - `SSO_AJAX_HEADER` / `SSO_AJAX_VALUE`: header marking programmatic calls
    /// - `SSO_INSECURE_COOKIES`: set to `"1"` or `"true"` to drop the `Secure` cookie flag
    ///
    /// # Errors
    ///
    /// Returns [`GateError::Config`] if required env vars are missing or values are invalid.
    pub fn from_env() -> Result<Self, GateError> {
        let login_url = required_url("SSO_LOGIN_URL")?;
        let auth_url = required_url("SSO_AUTH_URL")?;
        let app_host = required_url("SSO_APP_HOST")?;

        let mut config = Self::new(login_url, AuthClient::new(auth_url), app_host);

        if let Ok(origin_uri) = std::env::var("SSO_ORIGIN_URI") {
            config = config.with_origin_uri(origin_uri);
        }
        if let Ok(prefixes) = std::env::var("SSO_BYPASS_PREFIXES") {
            config = config.with_bypass_prefixes(
                prefixes
                    .split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(str::to_string)
                    .collect(),
            );
        }
        if let Ok(name) = std::env::var("SSO_AJAX_HEADER") {
            let header = HeaderName::try_from(name.as_str())
                .map_err(|e| GateError::Config(format!("SSO_AJAX_HEADER: {e}")))?;
            let value = std::env::var("SSO_AJAX_VALUE")
                .unwrap_or_else(|_| config.settings.ajax_value.clone());
            config = config.with_ajax_marker(header, value);
        } else if let Ok(value) = std::env::var("SSO_AJAX_VALUE") {
            let header = config.settings.ajax_header.clone();
            config = config.with_ajax_marker(header, value);
        }

        let insecure = matches!(
            std::env::var("SSO_INSECURE_COOKIES").as_deref(),
            Ok("1") | Ok("true"),
        );

        Ok(config.with_secure_cookies(!insecure))
    }

    #[must_use]
    pub fn with_origin_uri(mut self, path: impl Into<String>) -> Self {
        self.settings.origin_uri = path.into();
        self
    }

    #[must_use]
    pub fn with_bypass_prefixes(mut self, prefixes: Vec<String>) -> Self {
        self.settings.bypass_prefixes = prefixes;
        self
    }

    #[must_use]
    pub fn with_ajax_marker(mut self, header: HeaderName, value: impl Into<String>) -> Self {
        self.settings.ajax_header = header;
        self.settings.ajax_value = value.into();
        self
    }

    #[must_use]
    pub fn with_link_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.settings.link_cookie_name = name.into();
        self
    }

    #[must_use]
    pub fn with_pending_return_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.settings.pending_return_cookie_name = name.into();
        self
    }

    #[must_use]
    pub fn with_session_key(mut self, key: impl Into<String>) -> Self {
        self.settings.session_key = key.into();
        self
    }

    #[must_use]
    pub fn with_secure_cookies(mut self, secure: bool) -> Self {
        self.settings.secure_cookies = secure;
        self
    }

    /// Whether cookies are issued with the `Secure` flag.
    #[must_use]
    pub fn secure_cookies(&self) -> bool {
        self.settings.secure_cookies
    }
}

fn required_url(var: &'static str) -> Result<Url, GateError> {
    let value = std::env::var(var).map_err(|_| GateError::Config(format!("{var} is required")))?;
    value
        .parse()
        .map_err(|e| GateError::Config(format!("{var}: {e}")))
}
