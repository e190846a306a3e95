//! # devicehub-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement:
//!   - `ResponsePublisher` — emit correlated command responses
//! - Own the **device registry** (per-device locking, deterministic lookup)
//! - **Resolve** commands to devices and **correlate** responses to requests
//! - Run the **command pipeline** (`CommandService`) and the concurrent
//!   **dispatcher** that feeds it
//! - Provide **in-process infrastructure** (response bus) that doesn't need IO
//!
//! ## Dependency rule
//! Depends on `devicehub-domain` only (plus `tokio` for channels and tasks).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod correlator;
pub mod event_bus;
pub mod ports;
pub mod registry;
pub mod resolver;
pub mod routing;
pub mod seed;
pub mod services;
