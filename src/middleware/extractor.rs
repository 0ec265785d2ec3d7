use std::convert::Infallible;

use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::request::Parts;

use super::error::GateError;
use crate::types::Identity;

/// Verified identity of the current request.
///
/// Only present on requests that passed [`enforce_sso`](super::enforce_sso)
/// after a successful verification. Returns `401 Unauthorized` otherwise,
/// e.g. on bypassed routes.
///
/// # Example
///
/// ```rust,ignore
/// async fn dashboard(identity: Identity) -> impl IntoResponse {
///     format!("Hello, {} (#{})", identity.user_name(), identity.id())
/// }
///
/// // Optional: bypassed routes can still greet a known user
/// async fn assets(identity: Option<Identity>) -> impl IntoResponse {
///     identity.map_or("anonymous".to_string(), |i| i.user_name().to_string())
/// }
/// ```
impl<S: Send + Sync> FromRequestParts<S> for Identity {
    type Rejection = GateError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .ok_or(GateError::Unauthenticated)
    }
}

impl<S: Send + Sync> OptionalFromRequestParts<S> for Identity {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<Identity>().cloned())
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{Request, StatusCode};
    use axum::response::IntoResponse;

    use super::*;
    use crate::types::UserId;

    fn parts(identity: Option<Identity>) -> Parts {
        let mut request = Request::builder().uri("/").body(()).unwrap();
        if let Some(identity) = identity {
            request.extensions_mut().insert(identity);
        }
        request.into_parts().0
    }

    #[tokio::test]
    async fn extracts_identity_from_extensions() {
        let alice = Identity::new(UserId(42), "alice");
        let mut parts = parts(Some(alice.clone()));

        let extracted = <Identity as FromRequestParts<()>>::from_request_parts(&mut parts, &())
            .await
            .unwrap();

        assert_eq!(extracted, alice);
    }

    #[tokio::test]
    async fn missing_identity_is_unauthorized() {
        let mut parts = parts(None);

        let rejection = <Identity as FromRequestParts<()>>::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();

        assert_eq!(rejection.into_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn optional_identity_is_none_when_missing() {
        let mut parts = parts(None);

        let extracted =
            <Identity as OptionalFromRequestParts<()>>::from_request_parts(&mut parts, &())
                .await
                .unwrap();

        assert_eq!(extracted, None);
    }
}
