//! FROG classroom orchestration service.
//!
//! - [`login`]: login resolution and routing for a browser session
//! - [`root`]: top-level render mode and connection monitoring
//! - [`catalog`]: the activity library and its remote catalog
//! - [`optim`]: relay to the optimization service
//! - [`api`]: HTTP API exposing the library search and the optimizer relay

pub mod api;
pub mod catalog;
pub mod config;
pub mod login;
pub mod models;
pub mod optim;
pub mod root;
