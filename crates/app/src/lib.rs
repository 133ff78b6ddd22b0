//! # domo-app
//!
//! Application layer for the domo hub.
//!
//! ## Responsibilities
//! - The **device registry** — canonical in-memory state and the single
//!   mutation point every write funnels through
//! - The **update bus** — in-process fan-out of state-change notifications
//!   to stream subscribers
//! - The **telemetry log** — append-only sensor history
//! - The **seed set** — the demo devices loaded at startup
//! - The **simulation driver** — the cancellable background loop that
//!   replays a canned temperature series through the registry
//!
//! ## Dependency rule
//! Depends on `domo-domain` only (plus `tokio::sync`/`tokio::time` for
//! channels and the driver period). Never imports adapter crates; adapters
//! depend on *this* crate, not the reverse.

pub mod registry;
pub mod seed;
pub mod simulation;
pub mod telemetry_log;
pub mod update_bus;
