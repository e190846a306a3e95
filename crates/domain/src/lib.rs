//! # devicehub-domain
//!
//! Pure domain model for the devicehub command responder.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Devices** (id, kind, name, location, state, availability)
//! - Define **Actions** (`on`, `off`, `play`, `stop`, `pause`) and the
//!   per-kind capability table
//! - Run the **state transition engine** that applies an action to a device
//! - Define the **command contract** (request/response) exchanged on the bus
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or IO crates.
//! IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod action;
pub mod command;
pub mod device;
pub mod transition;
