#![doc = include_str!("../README.md")]

pub mod client;
pub mod error;
#[cfg(feature = "middleware")]
pub mod middleware;
pub mod types;

// Re-exports for convenient access
pub use client::AuthClient;
pub use error::AuthFailure;
#[cfg(feature = "middleware")]
pub use middleware::{GateError, SsoConfig, SsoGate, enforce_sso};
pub use types::{Identity, SsoToken, UserId};
