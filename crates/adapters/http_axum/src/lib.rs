//! # domo-adapter-http-axum
//!
//! HTTP adapter for the domo hub — REST handlers, the WebSocket stream,
//! and domain-error → status-code mapping.
//!
//! ## Dependency rule
//! Depends on `domo-app` and `domo-domain` only. Wiring (configuration,
//! seeding, driver startup, serving) happens in the `domod` binary.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
pub mod ws;
