use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

/// Numeric user identifier issued by the authentication service.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From, Into,
)]
#[serde(transparent)]
pub struct UserId(pub i64);

/// Opaque SSO token (ticket) issued by the identity provider.
///
/// Never interpreted locally; it is only forwarded to the verification
/// endpoint and echoed back in the `ssoid` cookie.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, From, Into)]
pub struct SsoToken(String);

impl SsoToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Empty or whitespace only.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<&str> for SsoToken {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// The authenticated principal held in a session.
///
/// Guaranteed valid by construction: only a successful verification creates
/// one, and the fields cannot be changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    id: UserId,
    #[serde(rename = "userName")]
    user_name: String,
}

impl Identity {
    pub(crate) fn new(id: UserId, user_name: impl Into<String>) -> Self {
        Self {
            id,
            user_name: user_name.into(),
        }
    }

    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    #[must_use]
    pub fn user_name(&self) -> &str {
        &self.user_name
    }
}
