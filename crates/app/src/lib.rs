//! # tuyable-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `DeviceTransport` — datapoint store, signal strength and connection events of one device
//!   - `EventPublisher` — raise host events such as fingerbot button presses
//! - Run the **update coordinator**: debounced connection state and update fan-out
//! - Provide the **entity adapters** (button, select, sensor) that render and write datapoints
//! - Manage **entries**: one registered device with its coordinator and entities
//! - Provide **in-process infrastructure** (event bus) that doesn't need IO
//!
//! ## Dependency rule
//! Depends on `tuyable-domain` only (plus `tokio` for tasks and channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod coordinator;
pub mod entities;
pub mod error;
pub mod event_bus;
pub mod ports;
pub mod services;

#[cfg(test)]
mod test_support;
