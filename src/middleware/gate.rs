use axum::extract::{Request, State};
use axum::http::{HeaderMap, Uri};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;
use tower_sessions::Session;

use super::cookies;
use super::error::GateError;
use super::state::SsoGate;
use super::traits::SessionStore;
use crate::types::{Identity, SsoToken};

/// Where a request goes before any session or network access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Route {
    /// Static asset, API or AJAX traffic.
    Bypass,
    /// Identity provider callback, with the `token` query parameter if any.
    TokenExchange(Option<SsoToken>),
    /// Everything else.
    Protected,
}

/// Per-request gate state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum GateState {
    Bypass,
    TokenExchange(SsoToken),
    VerifiedPass(SsoToken),
    RedirectRequired,
}

/// Result of verifying a token and writing the identity into the session.
enum Established {
    /// Verification failed; the response redirects to the login page.
    NotAuthenticated(Response),
    /// Verification succeeded and the client is sent elsewhere.
    Redirected(Response),
    /// Verification succeeded and the request continues to its handler.
    Forward(CookieJar, Identity),
}

impl SsoGate {
    /// Classify a request from its URI and headers alone.
    pub(super) fn route(&self, uri: &Uri, headers: &HeaderMap) -> Route {
        let path = uri.path();

        if self
            .settings
            .bypass_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
        {
            return Route::Bypass;
        }

        let is_ajax = headers
            .get(&self.settings.ajax_header)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == self.settings.ajax_value);
        if is_ajax {
            return Route::Bypass;
        }

        if path == self.settings.origin_uri {
            let token = uri.query().and_then(|query| {
                url::form_urlencoded::parse(query.as_bytes())
                    .find(|(key, _)| key == self.settings.token_param.as_str())
                    .map(|(_, value)| SsoToken::new(value.into_owned()))
            });
            return Route::TokenExchange(token);
        }

        Route::Protected
    }

    /// Resolve a route into a gate state, consulting the session for protected paths.
    pub(super) async fn classify<S: SessionStore>(
        &self,
        route: Route,
        jar: &CookieJar,
        session: &S,
    ) -> Result<GateState, GateError> {
        match route {
            Route::Bypass => Ok(GateState::Bypass),
            Route::TokenExchange(Some(token)) if !token.is_blank() => {
                Ok(GateState::TokenExchange(token))
            }
            Route::TokenExchange(_) => {
                tracing::warn!("SSO callback without token");
                Ok(GateState::RedirectRequired)
            }
            Route::Protected => {
                let identity = session
                    .identity(&self.settings.session_key)
                    .await
                    .map_err(|e| GateError::Session(e.to_string()))?;
                if identity.is_none() {
                    return Ok(GateState::RedirectRequired);
                }

                Ok(cookies::get(jar, &self.settings.link_cookie_name)
                    .map_or(GateState::RedirectRequired, |token| {
                        GateState::VerifiedPass(SsoToken::new(token))
                    }))
            }
        }
    }

    /// Verify `token` and, on success, link the session to it.
    async fn verify_and_establish<S: SessionStore>(
        &self,
        uri: &Uri,
        jar: CookieJar,
        session: &S,
        token: SsoToken,
    ) -> Result<Established, GateError> {
        let identity = match self.client.verify(&token).await {
            Ok(identity) => identity,
            Err(failure) => {
                tracing::warn!(token = %token, error = %failure, "SSO verification failed");
                return Ok(Established::NotAuthenticated(
                    self.redirect_to_login(uri, jar),
                ));
            }
        };

        session
            .set_identity(&self.settings.session_key, identity.clone())
            .await
            .map_err(|e| GateError::Session(e.to_string()))?;

        tracing::info!(
            user_id = %identity.id(),
            user_name = %identity.user_name(),
            "SSO verification succeeded"
        );

        let pending_name = &self.settings.pending_return_cookie_name;
        let pending = cookies::get(&jar, pending_name);
        let jar = jar.add(cookies::link_cookie(
            &self.settings.link_cookie_name,
            token.as_str(),
            self.settings.secure_cookies,
        ));

        let on_origin = uri.path() == self.settings.origin_uri;
        if !on_origin && pending.is_none() {
            return Ok(Established::Forward(jar, identity));
        }

        let jar = if jar.get(pending_name).is_some() {
            jar.remove(cookies::removal_cookie(pending_name))
        } else {
            jar
        };

        let target = pending
            .and_then(|url| self.redirect.return_target(&url))
            .map_or_else(|| self.settings.root_redirect.clone(), String::from);

        Ok(Established::Redirected(
            (jar, Redirect::to(&target)).into_response(),
        ))
    }

    /// Send the client to the identity provider, remembering where it was going.
    ///
    /// The callback path is never recorded as the pending return URL so a
    /// previously captured one survives a failed exchange.
    fn redirect_to_login(&self, uri: &Uri, jar: CookieJar) -> Response {
        let jar = if uri.path() == self.settings.origin_uri {
            jar
        } else {
            jar.add(cookies::pending_return_cookie(
                &self.settings.pending_return_cookie_name,
                &self.redirect.current_url(uri),
                self.settings.secure_cookies,
            ))
        };

        (jar, Redirect::to(self.redirect.login_url().as_str())).into_response()
    }
}

/// Axum middleware enforcing SSO on every request it wraps.
///
/// Requires a `tower-sessions` [`SessionManagerLayer`](tower_sessions::SessionManagerLayer)
/// outside of it. Requests that pass the gate carry the verified [`Identity`]
/// in their extensions.
///
/// ```rust,ignore
/// let app = Router::new()
///     .route("/", get(home))
///     .fallback(not_found)
///     .layer(axum::middleware::from_fn_with_state(gate, enforce_sso))
///     .layer(SessionManagerLayer::new(MemoryStore::default()));
/// ```
pub async fn enforce_sso(State(gate): State<SsoGate>, req: Request, next: Next) -> Response {
    let uri = req.uri().clone();

    let route = gate.route(&uri, req.headers());
    if route == Route::Bypass {
        tracing::debug!(path = %uri.path(), "SSO gate bypassed");
        return next.run(req).await;
    }

    let Some(session) = req.extensions().get::<Session>().cloned() else {
        return GateError::MissingSessionLayer.into_response();
    };
    let jar = CookieJar::from_headers(req.headers());

    let state = match gate.classify(route, &jar, &session).await {
        Ok(state) => state,
        Err(e) => return e.into_response(),
    };
    tracing::debug!(path = %uri.path(), state = ?state, "SSO gate classified request");

    let token = match state {
        GateState::Bypass => return next.run(req).await,
        GateState::RedirectRequired => return gate.redirect_to_login(&uri, jar),
        GateState::TokenExchange(token) | GateState::VerifiedPass(token) => token,
    };

    match gate.verify_and_establish(&uri, jar, &session, token).await {
        Ok(Established::Forward(jar, identity)) => {
            let mut req = req;
            req.extensions_mut().insert(identity);
            (jar, next.run(req).await).into_response()
        }
        Ok(Established::NotAuthenticated(response) | Established::Redirected(response)) => {
            response
        }
        Err(e) => e.into_response(),
    }
}
