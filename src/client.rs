use serde::Deserialize;
use url::Url;

use crate::error::AuthFailure;
use crate::types::{Identity, SsoToken, UserId};

/// Response code the verification endpoint uses for an accepted token.
const SUCCESS_CODE: i64 = 1;

/// Verification response envelope.
///
/// `{ "code": <int>, "data": { "user": { "id": <int64>, "userName": <string> } } }`
///
/// Every field is optional at the serde level so that a missing field is
/// reported as the specific [`AuthFailure`] instead of a generic parse error.
#[derive(Debug, Deserialize)]
struct VerifyResponse {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    data: Option<VerifyData>,
}

#[derive(Debug, Deserialize)]
struct VerifyData {
    #[serde(default)]
    user: Option<VerifyUser>,
}

#[derive(Debug, Deserialize)]
struct VerifyUser {
    #[serde(default)]
    id: Option<i64>,
    #[serde(default, rename = "userName")]
    user_name: Option<String>,
}

/// Client for the remote token verification endpoint.
#[derive(Debug, Clone)]
pub struct AuthClient {
    verify_url: Url,
    http: reqwest::Client,
}

impl AuthClient {
    /// Create a client for the given verification endpoint.
    #[must_use]
    pub fn new(verify_url: Url) -> Self {
        Self {
            verify_url,
            http: reqwest::Client::new(),
        }
    }

    /// Use a custom HTTP client (for connection pool reuse, timeouts or testing).
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http = client;
        self
    }

    /// Verification endpoint URL.
    #[must_use]
    pub fn verify_url(&self) -> &Url {
        &self.verify_url
    }

    /// Verify a token with `GET <verify_url>?token=<token>`.
    ///
    /// A blank token fails immediately without a network call. No retries
    /// are attempted.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthFailure`] describing why the token was not accepted.
    pub async fn verify(&self, token: &SsoToken) -> Result<Identity, AuthFailure> {
        if token.is_blank() {
            return Err(AuthFailure::BlankToken);
        }

        let mut url = self.verify_url.clone();
        url.query_pairs_mut().append_pair("token", token.as_str());

        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            return Err(AuthFailure::UnexpectedStatus(response.status().as_u16()));
        }

        let body = response.text().await?;
        tracing::debug!(token = %token, body = %body, "Verification response received");
        parse_identity(&body)
    }
}

/// Parse a verification response body, failing closed on any schema violation.
fn parse_identity(body: &str) -> Result<Identity, AuthFailure> {
    if body.trim().is_empty() {
        return Err(AuthFailure::EmptyBody);
    }

    let response: VerifyResponse = serde_json::from_str(body)?;
    if response.code != Some(SUCCESS_CODE) {
        return Err(AuthFailure::VerificationRejected {
            code: response.code,
        });
    }

    let user = response
        .data
        .ok_or(AuthFailure::IncompleteIdentity("data"))?
        .user
        .ok_or(AuthFailure::IncompleteIdentity("data.user"))?;
    let id = user.id.ok_or(AuthFailure::IncompleteIdentity("user.id"))?;
    let user_name = user
        .user_name
        .filter(|name| !name.trim().is_empty())
        .ok_or(AuthFailure::IncompleteIdentity("user.userName"))?;

    Ok(Identity::new(UserId(id), user_name))
}
