use axum::http::Uri;
use url::Url;

use super::error::GateError;

/// Builds the identity-provider login URL and the URLs clients are sent back to.
///
/// A pure function of configuration: the login endpoint, the application host
/// and the origin URI path.
#[derive(Debug, Clone)]
pub struct RedirectPolicy {
    login_url: Url,
    app_host: Url,
    origin_url: Url,
}

impl RedirectPolicy {
    /// # Errors
    ///
    /// Returns [`GateError::Config`] if `app_host` cannot be a base URL or the
    /// origin URI is not an absolute path.
    pub fn new(login_url: Url, app_host: Url, origin_uri: &str) -> Result<Self, GateError> {
        if app_host.cannot_be_a_base() {
            return Err(GateError::Config(format!(
                "application host `{app_host}` is not a base URL"
            )));
        }
        if !origin_uri.starts_with('/') {
            return Err(GateError::Config(format!(
                "origin URI `{origin_uri}` must start with `/`"
            )));
        }
        let origin_url = app_host
            .join(origin_uri)
            .map_err(|e| GateError::Config(format!("origin URI `{origin_uri}`: {e}")))?;

        Ok(Self {
            login_url,
            app_host,
            origin_url,
        })
    }

    /// `<login endpoint>?origin=<absolute origin URL>`.
    #[must_use]
    pub fn login_url(&self) -> Url {
        let mut url = self.login_url.clone();
        url.query_pairs_mut()
            .append_pair("origin", self.origin_url.as_str());
        url
    }

    /// Absolute URL of the token exchange endpoint on this application.
    #[must_use]
    pub fn origin_url(&self) -> &Url {
        &self.origin_url
    }

    /// Absolute URL of the request, qualified with the configured host.
    ///
    /// The request path is taken verbatim, so a path such as `//other/x`
    /// cannot replace the host.
    #[must_use]
    pub fn current_url(&self, uri: &Uri) -> String {
        let mut url = self.app_host.clone();
        url.set_path(uri.path());
        url.set_query(uri.query());
        url.into()
    }

    /// The pending return URL, if it points back at this application.
    ///
    /// The token exchange endpoint itself is never a return target.
    #[must_use]
    pub fn return_target(&self, pending: &str) -> Option<Url> {
        let url = Url::parse(pending).ok()?;
        (url.origin() == self.app_host.origin() && url.path() != self.origin_url.path())
            .then_some(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> RedirectPolicy {
        RedirectPolicy::new(
            "https://sso.example.com/login".parse().unwrap(),
            "https://app.example.com".parse().unwrap(),
            "/sso/token",
        )
        .unwrap()
    }

    #[test]
    fn login_url_carries_encoded_origin() {
        assert_eq!(
            policy().login_url().as_str(),
            "https://sso.example.com/login?origin=https%3A%2F%2Fapp.example.com%2Fsso%2Ftoken"
        );
    }

    #[test]
    fn login_url_keeps_existing_query() {
        let policy = RedirectPolicy::new(
            "https://sso.example.com/login?tenant=main".parse().unwrap(),
            "https://app.example.com".parse().unwrap(),
            "/sso/token",
        )
        .unwrap();

        let url = policy.login_url();
        let pairs: Vec<_> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("tenant".to_string(), "main".to_string()),
                ("origin".to_string(), "https://app.example.com/sso/token".to_string()),
            ]
        );
    }

    #[test]
    fn origin_url_is_host_qualified() {
        assert_eq!(
            policy().origin_url().as_str(),
            "https://app.example.com/sso/token"
        );
    }

    #[test]
    fn current_url_keeps_path_and_query() {
        let uri: Uri = "/dashboard?tab=2".parse().unwrap();
        assert_eq!(
            policy().current_url(&uri),
            "https://app.example.com/dashboard?tab=2"
        );
    }

    #[test]
    fn current_url_never_changes_host() {
        let uri = Uri::builder()
            .path_and_query("//evil.example.com/x?y=1")
            .build()
            .unwrap();
        assert_eq!(
            policy().current_url(&uri),
            "https://app.example.com//evil.example.com/x?y=1"
        );

        let uri: Uri = "/".parse().unwrap();
        assert_eq!(policy().current_url(&uri), "https://app.example.com/");
    }

    #[test]
    fn return_target_accepts_own_host_only() {
        let policy = policy();
        assert!(policy.return_target("https://app.example.com/dashboard").is_some());
        assert!(policy.return_target("https://evil.example.com/dashboard").is_none());
        assert!(policy.return_target("http://app.example.com/dashboard").is_none());
        assert!(policy.return_target("/dashboard").is_none());
        assert!(policy.return_target("not a url").is_none());
        assert!(
            policy
                .return_target("https://app.example.com/sso/token?token=old")
                .is_none()
        );
    }

    #[test]
    fn rejects_relative_origin_uri() {
        let result = RedirectPolicy::new(
            "https://sso.example.com/login".parse().unwrap(),
            "https://app.example.com".parse().unwrap(),
            "sso/token",
        );
        assert!(result.is_err());
    }
}
