//! Plug-and-play SSO gate middleware for Axum.
//!
//! Every request passes through [`enforce_sso`] before reaching application
//! handlers. Static, API and AJAX traffic is forwarded untouched. The token
//! callback exchanges a one-time SSO token for a session. Everything else
//! needs a session identity plus the `ssoid` cookie, is re-verified against
//! the authentication service, and is otherwise redirected to the login page.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use sso_gate::middleware::{SsoConfig, SsoGate, enforce_sso};
//! use tower_sessions::{MemoryStore, SessionManagerLayer};
//!
//! // 1. Configure from environment (fails fast on missing URLs)
//! let gate = SsoGate::new(SsoConfig::from_env()?)?;
//!
//! // 2. Wrap the routes (and fallback) with the gate, inside a session layer
//! let app = axum::Router::new()
//!     .route("/", get(home))
//!     .fallback(not_found)
//!     .layer(axum::middleware::from_fn_with_state(gate, enforce_sso))
//!     .layer(SessionManagerLayer::new(MemoryStore::default()));
//!
//! // 3. Take the verified identity in handlers
//! async fn home(identity: sso_gate::Identity) -> String {
//!     format!("Hello, {}", identity.user_name())
//! }
//! ```

mod config;
mod cookies;
mod error;
mod extractor;
mod gate;
mod redirect;
mod state;
mod traits;

pub use config::SsoConfig;
pub use error::GateError;
pub use gate::enforce_sso;
pub use redirect::RedirectPolicy;
pub use state::SsoGate;
pub use traits::{BoxError, SessionStore};
