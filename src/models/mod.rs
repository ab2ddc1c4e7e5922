//! Domain models for FROG.
//!
//! # Core Concepts
//!
//! ## External Entities
//!
//! - [`CatalogEntry`]: An importable activity definition served by the remote catalog.
//!   Read-only; identity is its `uuid`.
//! - [`OptimRequest`] / [`OptimResponse`]: Envelope exchanged with the optimization service.
//!
//! ## Transient Entities
//!
//! These exist only while a browser session is mounted:
//!
//! - [`LoginState`]: The router's login mode plus optional session settings.
//! - [`InjectedData`]: Bootstrap payload embedded at render time, consumed once.

mod activity;
mod login;
mod optim;

pub use activity::*;
pub use login::*;
pub use optim::*;
