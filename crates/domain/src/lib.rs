//! # domo-domain
//!
//! Pure domain model for the domo smart-home simulator.
//!
//! ## Responsibilities
//! - Foundational types: validated device identifiers, error conventions,
//!   timestamps
//! - Define **Devices** — the closed set of simulated kinds (light,
//!   thermostat, lock) with their field constraints
//! - Define **Patches** — sparse partial updates and their all-or-nothing
//!   validation against a device's kind
//! - Define **Stream events** — the notifications pushed to subscribers
//! - Define **Telemetry records** and derived **Statistics**
//!
//! ## Dependency rule
//! This crate has **no internal dependencies** and performs no IO.
//! It must never import anything from `app`, adapters, or runtime crates.

pub mod error;
pub mod id;
pub mod time;

pub mod device;
pub mod event;
pub mod patch;
pub mod stats;
pub mod telemetry;
