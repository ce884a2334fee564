//! # tuyable-domain
//!
//! Pure domain model for the Tuya BLE entity bridge.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Datapoints** (typed values addressed by a small integer id)
//! - Define **Products** (catalog metadata and sub-profiles such as fingerbots)
//! - Define **Entity descriptors** (how one datapoint becomes a button, select or sensor)
//! - Hold the static **catalog**: product database and per-kind mapping tables
//! - Define **Events** raised towards the host (physical button presses, …)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod catalog;
pub mod datapoint;
pub mod device;
pub mod entity;
pub mod event;
pub mod product;
