/// Reasons a token could not be turned into an [`Identity`](crate::Identity).
///
/// Every variant means the same thing to the gate: the client is not
/// authenticated and gets redirected to the login page. The variants exist
/// so operators can tell the cases apart in logs.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AuthFailure {
    #[error("token is blank")]
    BlankToken,
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("verification endpoint returned HTTP {0}")]
    UnexpectedStatus(u16),
    #[error("verification endpoint returned an empty body")]
    EmptyBody,
    #[error("malformed verification response: {0}")]
    MalformedResponse(#[from] serde_json::Error),
    #[error("verification rejected (code: {code:?})")]
    VerificationRejected { code: Option<i64> },
    #[error("verification response is missing `{0}`")]
    IncompleteIdentity(&'static str),
}
